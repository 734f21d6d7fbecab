//! Descriptive statistics for a loaded table.
//!
//! [`StatisticsBundle::compute`] derives three outputs, fresh on every call:
//!
//! - a summary (count, mean, std, min, quartiles, max) per numeric column
//! - a Pearson correlation matrix over the numeric columns
//! - the missing-value count of every column, numeric or not

mod correlation;
mod summary;

pub use correlation::CorrelationMatrix;
pub use summary::ColumnSummary;

pub(crate) use summary::quantile;

use crate::error::Result;
use crate::loader::Table;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueCount {
    pub column: String,
    pub missing: usize,
}

/// Summary statistics, correlations and missing-value counts of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsBundle {
    pub summary: Vec<ColumnSummary>,
    pub correlations: CorrelationMatrix,
    pub missing_values: Vec<MissingValueCount>,
}

impl StatisticsBundle {
    /// Compute all statistics for `table`.
    pub fn compute(table: &Table) -> Result<Self> {
        let numeric = table.numeric_columns();
        if numeric.is_empty() {
            warn!("Table has no numeric columns; summary and correlations are empty");
        }

        let columns = numeric
            .iter()
            .map(|name| Ok((name.clone(), table.numeric_values(name)?)))
            .collect::<Result<Vec<_>>>()?;

        let summary = columns
            .iter()
            .map(|(name, values)| ColumnSummary::from_values(name.clone(), values))
            .collect();

        let correlations = CorrelationMatrix::from_columns(&columns);

        let missing_values = table
            .missing_counts()
            .into_iter()
            .map(|(column, missing)| MissingValueCount { column, missing })
            .collect();

        debug!(
            "Computed statistics for {} numeric of {} columns",
            numeric.len(),
            table.width()
        );

        Ok(Self {
            summary,
            correlations,
            missing_values,
        })
    }

    /// Summary for a column, if it is numeric.
    pub fn summary_for(&self, column: &str) -> Option<&ColumnSummary> {
        self.summary.iter().find(|s| s.column == column)
    }

    /// Missing-value count for a column.
    pub fn missing_for(&self, column: &str) -> Option<usize> {
        self.missing_values
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.missing)
    }

    /// Total number of missing cells across the table.
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|m| m.missing).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundle_covers_numeric_and_all_columns() {
        let df = df!(
            "a" => &[1i64, 2, 3, 4],
            "b" => &[2i64, 4, 6, 9],
            "c" => &[Some("x"), None, Some("y"), Some("z")]
        )
        .unwrap();
        let bundle = StatisticsBundle::compute(&Table::from_dataframe(df)).unwrap();

        let summarized: Vec<&str> = bundle.summary.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(summarized, vec!["a", "b"]);
        assert_eq!(bundle.correlations.columns, vec!["a", "b"]);
        assert_eq!(bundle.missing_values.len(), 3);
        assert_eq!(bundle.missing_for("c"), Some(1));
        assert_eq!(bundle.missing_for("a"), Some(0));
        assert_eq!(bundle.total_missing(), 1);
        assert!(bundle.summary_for("c").is_none());
    }

    #[test]
    fn test_bundle_without_numeric_columns() {
        let df = df!("c" => &["x", "y"]).unwrap();
        let bundle = StatisticsBundle::compute(&Table::from_dataframe(df)).unwrap();

        assert!(bundle.summary.is_empty());
        assert!(bundle.correlations.is_empty());
        assert_eq!(bundle.missing_values.len(), 1);
    }

    #[test]
    fn test_undefined_values_serialize_as_null() {
        let df = df!("a" => &[1.0f64]).unwrap();
        let bundle = StatisticsBundle::compute(&Table::from_dataframe(df)).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert!(json["summary"][0]["std"].is_null());
        assert!(json["correlations"]["values"][0][0].is_null());
        assert_eq!(json["missing_values"][0]["missing"], 0);
    }
}
