//! Spreadsheet loading.
//!
//! [`Table`] wraps the polars `DataFrame` read from the first worksheet of a
//! workbook (or a CSV file) and exposes the read-only views the charts and
//! statistics need: numeric columns in order, a named column as floats, and
//! full-row value counts.

mod inference;
mod workbook;

use crate::error::{AnalysisError, Result, ResultExt};
use crate::utils::{ColumnKind, column_kind, series_to_f64, series_to_labels, temporal_to_millis};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Immutable in-memory table loaded from a spreadsheet.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

/// One distinct row and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCount {
    /// Display label of the row: `(v,)` for one column, `(v1, v2, ...)` otherwise.
    pub label: String,
    /// Number of occurrences.
    pub count: usize,
}

impl Table {
    /// Load the first worksheet of a spreadsheet.
    ///
    /// Fails with a file error when the path is missing or not a readable
    /// spreadsheet, and with a format error when the sheet cannot be turned
    /// into a table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalysisError::file(path, "file not found"));
        }
        if !path.is_file() {
            return Err(AnalysisError::file(path, "not a regular file"));
        }

        let df = if workbook::is_workbook(path) {
            workbook::read_workbook(path)?
        } else if workbook::is_csv(path) {
            workbook::read_csv(path)?
        } else {
            return Err(AnalysisError::format(
                path,
                "unsupported extension (expected xlsx, xlsm, xlsb, xls, ods or csv)",
            ));
        };

        info!(
            "Loaded {} ({} rows x {} columns)",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(Self { df })
    }

    /// Wrap an existing DataFrame.
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Borrow the underlying DataFrame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Whether a column with exactly this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().iter().any(|c| c.as_str() == name)
    }

    /// Kind of the named column.
    pub fn kind_of(&self, name: &str) -> Result<ColumnKind> {
        Ok(column_kind(self.column(name)?.dtype()))
    }

    /// Names of the numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|c| column_kind(c.dtype()) == ColumnKind::Numeric)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Values of a numeric column as floats.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        series_to_f64(column.as_materialized_series())
            .context(format!("Reading '{name}' as numbers"))
    }

    /// Values of a column usable as an x axis.
    ///
    /// Temporal columns map to epoch milliseconds, numeric columns to their
    /// values, anything else to the row position.
    pub fn axis_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        let series = column.as_materialized_series();
        match column_kind(series.dtype()) {
            ColumnKind::Temporal => {
                temporal_to_millis(series).context(format!("Reading '{name}' as dates"))
            }
            ColumnKind::Numeric => {
                series_to_f64(series).context(format!("Reading '{name}' as numbers"))
            }
            _ => Ok((0..series.len()).map(|i| Some(i as f64)).collect()),
        }
    }

    /// Null count for every column, in table order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.null_count()))
            .collect()
    }

    /// Count identical rows, dropping rows that contain any missing cell.
    ///
    /// Sorted by descending count. Equal counts are ordered by row values,
    /// numbers and dates by magnitude and everything else as text.
    pub fn row_value_counts(&self) -> Result<Vec<RowCount>> {
        if self.df.width() == 0 {
            return Ok(Vec::new());
        }

        let columns = self
            .df
            .get_columns()
            .iter()
            .map(|c| {
                let series = c.as_materialized_series();
                let numbers = match column_kind(series.dtype()) {
                    ColumnKind::Numeric => Some(series_to_f64(series)?),
                    ColumnKind::Temporal => Some(temporal_to_millis(series)?),
                    _ => None,
                };
                Ok((series_to_labels(series)?, numbers))
            })
            .collect::<PolarsResult<Vec<_>>>()
            .context("Stringifying rows for value counts")?;

        let mut counted: Vec<(Vec<CellKey>, RowCount)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in 0..self.df.height() {
            let cells: Option<Vec<&str>> = columns
                .iter()
                .map(|(labels, _)| labels[row].as_deref())
                .collect();
            let Some(cells) = cells else {
                continue;
            };

            let label = match cells.as_slice() {
                [only] => format!("({only},)"),
                _ => format!("({})", cells.join(", ")),
            };

            if let Some(&i) = index.get(&label) {
                counted[i].1.count += 1;
                continue;
            }
            let key = columns
                .iter()
                .zip(&cells)
                .map(|((_, numbers), cell)| match numbers {
                    Some(numbers) => CellKey::Number(numbers[row].unwrap_or_default()),
                    None => CellKey::Text(cell.to_string()),
                })
                .collect();
            index.insert(label.clone(), counted.len());
            counted.push((key, RowCount { label, count: 1 }));
        }

        counted.sort_by(|a, b| compare_keys(&a.0, &b.0));
        // stable, so equal counts stay in key order
        counted.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        Ok(counted.into_iter().map(|(_, count)| count).collect())
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
    }
}

/// Sort key of one cell in a counted row.
#[derive(Debug, Clone, PartialEq)]
enum CellKey {
    Number(f64),
    Text(String),
}

fn compare_keys(a: &[CellKey], b: &[CellKey]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (CellKey::Number(x), CellKey::Number(y)) => x.total_cmp(y),
            (CellKey::Text(x), CellKey::Text(y)) => x.cmp(y),
            (CellKey::Number(_), CellKey::Text(_)) => Ordering::Less,
            (CellKey::Text(_), CellKey::Number(_)) => Ordering::Greater,
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_table() -> Table {
        let df = df!(
            "a" => &[1i64, 2, 1, 1],
            "b" => &[Some(10.0f64), Some(20.0), Some(10.0), None],
            "c" => &["x", "y", "x", "x"]
        )
        .unwrap();
        Table::from_dataframe(df)
    }

    #[test]
    fn test_numeric_columns_in_order() {
        let table = sample_table();
        assert_eq!(table.numeric_columns(), vec!["a", "b"]);
        assert_eq!(table.kind_of("c").unwrap(), ColumnKind::Text);
    }

    #[test]
    fn test_numeric_values() {
        let table = sample_table();
        assert_eq!(
            table.numeric_values("b").unwrap(),
            vec![Some(10.0), Some(20.0), Some(10.0), None]
        );
        assert!(matches!(
            table.numeric_values("zzz"),
            Err(AnalysisError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_row_value_counts_drops_incomplete_rows() {
        let table = sample_table();
        let counts = table.row_value_counts().unwrap();
        assert_eq!(
            counts,
            vec![
                RowCount {
                    label: "(1, 10, x)".to_string(),
                    count: 2
                },
                RowCount {
                    label: "(2, 20, y)".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_row_value_counts_single_column() {
        let df = df!("fruit" => &["apple", "pear", "pear"]).unwrap();
        let counts = Table::from_dataframe(df).row_value_counts().unwrap();
        assert_eq!(counts[0].label, "(pear,)");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].label, "(apple,)");
    }

    #[test]
    fn test_row_value_counts_ties_follow_row_values() {
        let df = df!("letter" => &["b", "a", "b", "a", "c"]).unwrap();
        let counts = Table::from_dataframe(df).row_value_counts().unwrap();
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["(a,)", "(b,)", "(c,)"]);
        assert_eq!(counts.iter().map(|c| c.count).collect::<Vec<_>>(), vec![2, 2, 1]);
    }

    #[test]
    fn test_row_value_counts_ties_compare_numbers_by_magnitude() {
        let df = df!("n" => &[10i64, 9, 2], "tag" => &["x", "x", "x"]).unwrap();
        let counts = Table::from_dataframe(df).row_value_counts().unwrap();
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["(2, x)", "(9, x)", "(10, x)"]);
    }

    #[test]
    fn test_missing_counts_cover_all_columns() {
        let table = sample_table();
        assert_eq!(
            table.missing_counts(),
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 0)
            ]
        );
    }

    #[test]
    fn test_axis_values_for_text_column_are_positions() {
        let table = sample_table();
        assert_eq!(
            table.axis_values("c").unwrap(),
            vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Table::load("definitely/not/here.xlsx").unwrap_err();
        assert!(err.is_file_error());
    }
}
