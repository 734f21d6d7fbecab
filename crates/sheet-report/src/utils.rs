//! Shared helpers for column typing and value extraction.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Kind of a table column as seen by the charts and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime values
    Temporal,
    /// Boolean values
    Boolean,
    /// String values
    Text,
    /// Anything else
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date or datetime type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_temporal_dtype(dtype) {
        ColumnKind::Temporal
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Read a numeric series as `f64` values, keeping nulls (and NaN) as `None`.
pub fn series_to_f64(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Read a temporal series as milliseconds since the epoch.
pub fn temporal_to_millis(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let millis = match series.dtype() {
        DataType::Date => series
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .cast(&DataType::Int64)?,
        DataType::Datetime(TimeUnit::Milliseconds, _) => series.cast(&DataType::Int64)?,
        DataType::Datetime(_, tz) => series
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, tz.clone()))?
            .cast(&DataType::Int64)?,
        _ => series.cast(&DataType::Int64)?,
    };
    Ok(millis
        .i64()?
        .into_iter()
        .map(|v| v.map(|ms| ms as f64))
        .collect())
}

/// Read any series as display strings, keeping nulls as `None`.
pub fn series_to_strings(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Read any series as display labels.
///
/// Numbers drop a trailing `.0`, dates print as `YYYY-MM-DD` (with a time
/// part when not midnight), everything else uses the polars string cast.
pub fn series_to_labels(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    match column_kind(series.dtype()) {
        ColumnKind::Numeric => Ok(series_to_f64(series)?
            .into_iter()
            .map(|v| v.map(format_number))
            .collect()),
        ColumnKind::Temporal => Ok(temporal_to_millis(series)?
            .into_iter()
            .map(|v| v.map(format_millis_as_timestamp))
            .collect()),
        _ => series_to_strings(series),
    }
}

/// Format an epoch-millisecond value, omitting a midnight time of day.
pub fn format_millis_as_timestamp(millis: f64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis.round() as i64) {
        Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("{millis:.0}"),
    }
}

/// Format an epoch-millisecond value as a calendar date.
pub fn format_millis_as_date(millis: f64) -> String {
    chrono::DateTime::from_timestamp_millis(millis.round() as i64)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{millis:.0}"))
}

/// Format a float without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Float32), ColumnKind::Numeric);
        assert_eq!(
            column_kind(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            ColumnKind::Temporal
        );
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
    }

    #[test]
    fn test_series_to_f64_keeps_nulls() {
        let series = Series::new("a".into(), &[Some(1i64), None, Some(3)]);
        let values = series_to_f64(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_series_to_f64_drops_nan() {
        let series = Series::new("a".into(), &[1.0f64, f64::NAN]);
        assert_eq!(series_to_f64(&series).unwrap(), vec![Some(1.0), None]);
    }

    #[test]
    fn test_series_to_strings() {
        let series = Series::new("c".into(), &[Some("x"), None]);
        let values = series_to_strings(&series).unwrap();
        assert_eq!(values, vec![Some("x".to_string()), None]);
    }

    #[test]
    fn test_temporal_to_millis_roundtrip_date() {
        let series = Series::new("date".into(), &[Some(86_400_000i64), None])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let millis = temporal_to_millis(&series).unwrap();
        assert_eq!(millis, vec![Some(86_400_000.0), None]);
        assert_eq!(format_millis_as_date(86_400_000.0), "1970-01-02");
    }

    #[test]
    fn test_series_to_labels() {
        let numbers = Series::new("n".into(), &[Some(10.0f64), Some(2.5), None]);
        assert_eq!(
            series_to_labels(&numbers).unwrap(),
            vec![Some("10".to_string()), Some("2.5".to_string()), None]
        );

        let dates = Series::new("d".into(), &[0i64, 3_600_000])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        assert_eq!(
            series_to_labels(&dates).unwrap(),
            vec![
                Some("1970-01-01".to_string()),
                Some("1970-01-01 01:00:00".to_string())
            ]
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-4.0), "-4");
    }
}
