//! Column construction from raw worksheet cells.
//!
//! Each column is typed from its non-empty cells: all numbers become a numeric
//! column, all booleans a boolean column, all dates a datetime column, and any
//! mixture falls back to strings. An entirely empty column is a float column
//! of nulls.

use crate::utils::format_number;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// A single worksheet cell after decoding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Missing,
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Cell {
    fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    fn display(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Number(v) => Some(format_number(*v)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

/// Turn header cells into unique column names.
///
/// Blank headers become `Unnamed: {index}`; repeated names get `.1`, `.2`, ...
pub(crate) fn column_names(header: &[Cell]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match cell.display() {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("Unnamed: {idx}"),
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }

    names
}

/// Build a typed polars column from one column of cells.
pub(crate) fn build_column(name: &str, cells: &[Cell]) -> PolarsResult<Column> {
    let present: Vec<&Cell> = cells.iter().filter(|c| !c.is_missing()).collect();
    let has_missing = present.len() < cells.len();

    let series = if present.is_empty() {
        Series::new(name.into(), vec![None::<f64>; cells.len()])
    } else if present.iter().all(|c| matches!(c, Cell::Number(_))) {
        number_series(name, cells, has_missing)
    } else if present.iter().all(|c| matches!(c, Cell::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else if present.iter().all(|c| matches!(c, Cell::DateTime(_))) {
        let millis: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::DateTime(dt) => Some(dt.and_utc().timestamp_millis()),
                _ => None,
            })
            .collect();
        Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
    } else {
        let values: Vec<Option<String>> = cells.iter().map(Cell::display).collect();
        Series::new(name.into(), values)
    };

    Ok(Column::from(series))
}

fn number_series(name: &str, cells: &[Cell], has_missing: bool) -> Series {
    let values: Vec<Option<f64>> = cells
        .iter()
        .map(|c| match c {
            Cell::Number(v) => Some(*v),
            _ => None,
        })
        .collect();

    let integral = values
        .iter()
        .flatten()
        .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);

    if integral && !has_missing {
        let ints: Vec<i64> = values.iter().flatten().map(|v| *v as i64).collect();
        Series::new(name.into(), ints)
    } else {
        Series::new(name.into(), values)
    }
}
