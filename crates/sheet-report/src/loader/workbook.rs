//! Workbook and CSV decoding.

use super::inference::{Cell, build_column, column_names};
use crate::error::{AnalysisError, Result};
use calamine::{Data, DataType as _, Range, Reader, open_workbook_auto};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Extensions decoded through the workbook reader.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read the first worksheet of a workbook into a DataFrame.
pub(crate) fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AnalysisError::file(path, format!("not a readable spreadsheet: {e}")))?;

    let sheet_names = workbook.sheet_names();
    debug!("Workbook sheets: {:?}", sheet_names);

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AnalysisError::format(path, "workbook contains no worksheet"))?
        .map_err(|e| AnalysisError::format(path, format!("failed to read worksheet: {e}")))?;

    range_to_dataframe(&range).map_err(|e| AnalysisError::format(path, e))
}

/// Read a CSV file into a DataFrame, parsing date-like strings.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| AnalysisError::file(path, e))?
        .finish()
        .map_err(|e| AnalysisError::format(path, e))
}

/// Whether `path` should go through the workbook reader.
pub(crate) fn is_workbook(path: &Path) -> bool {
    extension(path).is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `path` should go through the CSV reader.
pub(crate) fn is_csv(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "csv")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Convert a cell range (header row first) into a typed DataFrame.
fn range_to_dataframe(range: &Range<Data>) -> PolarsResult<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let header: Vec<Cell> = header.iter().map(decode_cell).collect();
    let names = column_names(&header);

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).map(decode_cell).unwrap_or(Cell::Missing));
        }
    }

    let columns = names
        .iter()
        .zip(cells.iter())
        .map(|(name, column)| build_column(name, column))
        .collect::<PolarsResult<Vec<_>>>()?;

    DataFrame::new(columns)
}

fn decode_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Text(cell.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    #[test]
    fn test_range_to_dataframe_types() {
        let range = range_from(vec![
            vec![
                Data::String("a".into()),
                Data::String("b".into()),
                Data::String("c".into()),
            ],
            vec![Data::Float(1.0), Data::Float(2.5), Data::String("x".into())],
            vec![Data::Float(2.0), Data::Float(3.5), Data::String("y".into())],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("b").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("c").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_error_cells_are_missing() {
        let range = range_from(vec![
            vec![Data::String("v".into())],
            vec![Data::Float(1.0)],
            vec![Data::Error(calamine::CellErrorType::NA)],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.column("v").unwrap().null_count(), 1);
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_extension_dispatch() {
        assert!(is_workbook(&PathBuf::from("Opinion Data.xlsx")));
        assert!(is_workbook(&PathBuf::from("legacy.XLS")));
        assert!(is_csv(&PathBuf::from("data.csv")));
        assert!(!is_workbook(&PathBuf::from("notes.md")));
        assert!(!is_csv(&PathBuf::from("noext")));
    }
}
