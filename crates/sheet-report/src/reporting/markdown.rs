//! Template placeholders and markdown tables.

use crate::charts::ChartArtifact;
use crate::statistics::{ColumnSummary, CorrelationMatrix, MissingValueCount};
use crate::utils::format_number;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

// `{{ name }}` with optional inner whitespace
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("Invalid regex: placeholder"));

/// Replace `{{name}}` tokens that have a value in `values`.
///
/// Unknown names are left in place untouched.
pub(crate) fn fill_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format_number(v),
        Some(v) => format!("{v:.4}"),
        None => "NaN".to_string(),
    }
}

fn table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = format!("| {} |\n", header.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(header.len())));
    for row in rows {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out
}

/// Columns as rows, statistics as header cells.
pub(crate) fn summary_table(summary: &[ColumnSummary]) -> String {
    if summary.is_empty() {
        return "_No numeric columns._\n".to_string();
    }
    let header: Vec<String> = [
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|s| {
            vec![
                s.column.clone(),
                s.count.to_string(),
                cell(s.mean),
                cell(s.std),
                cell(s.min),
                cell(s.q25),
                cell(s.median),
                cell(s.q75),
                cell(s.max),
            ]
        })
        .collect();
    table(&header, &rows)
}

pub(crate) fn correlation_table(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return "_No numeric columns._\n".to_string();
    }
    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().cloned());
    let rows: Vec<Vec<String>> = matrix
        .columns
        .iter()
        .zip(&matrix.values)
        .map(|(name, values)| {
            let mut row = vec![name.clone()];
            row.extend(values.iter().map(|v| cell(*v)));
            row
        })
        .collect();
    table(&header, &rows)
}

pub(crate) fn missing_values_table(missing: &[MissingValueCount]) -> String {
    if missing.is_empty() {
        return "_No columns._\n".to_string();
    }
    let header = vec!["column".to_string(), "missing".to_string()];
    let rows: Vec<Vec<String>> = missing
        .iter()
        .map(|m| vec![m.column.clone(), m.missing.to_string()])
        .collect();
    table(&header, &rows)
}

/// Image links for every chart, relative to the report's directory when
/// possible.
pub(crate) fn chart_list(artifacts: &[ChartArtifact], report_dir: &Path) -> String {
    artifacts
        .iter()
        .map(|a| {
            let path = a.path.strip_prefix(report_dir).unwrap_or(&a.path);
            let link = path.to_string_lossy().replace('\\', "/");
            format!("![{}]({link})\n", a.kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_fill_known_and_keep_unknown() {
        let values = HashMap::from([("row_count", "42".to_string())]);
        let out = fill_placeholders("Rows: {{row_count}}, {{ row_count }}; {{other}}", &values);
        assert_eq!(out, "Rows: 42, 42; {{other}}");
    }

    #[test]
    fn test_fill_without_tokens_is_identity() {
        let text = "# Report\n\nNo tokens { here }.\n";
        assert_eq!(fill_placeholders(text, &HashMap::new()), text);
    }

    #[test]
    fn test_summary_table_layout() {
        let summary = vec![ColumnSummary::from_values("a", &[Some(1.0), Some(2.0)])];
        let out = summary_table(&summary);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| column | count | mean | std | min | 25% | 50% | 75% | max |");
        assert_eq!(lines[1], "|---|---|---|---|---|---|---|---|---|");
        assert_eq!(lines[2], "| a | 2 | 1.5000 | 0.7071 | 1 | 1.2500 | 1.5000 | 1.7500 | 2 |");
    }

    #[test]
    fn test_correlation_table_marks_undefined() {
        let matrix = CorrelationMatrix::from_columns(&[("a".to_string(), vec![Some(1.0)])]);
        let out = correlation_table(&matrix);
        assert!(out.contains("| a | NaN |"));
    }

    #[test]
    fn test_chart_list_relative_links() {
        let artifacts = vec![ChartArtifact {
            kind: ChartKind::Pie,
            path: PathBuf::from("out/visualizations/pie_chart.png"),
            rendered: true,
        }];
        assert_eq!(
            chart_list(&artifacts, Path::new("out")),
            "![pie_chart](visualizations/pie_chart.png)\n"
        );
    }
}
