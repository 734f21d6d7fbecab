//! Chart rendering.
//!
//! Every chart is one [`ChartSpec`] entry in [`CHARTS`]: a precondition that
//! inspects the table and a renderer that draws onto a fresh figure. When a
//! precondition is not met the figure is still written (background only)
//! and a warning names the chart and the reason, so a run always leaves the
//! same eleven files behind.

mod canvas;
mod categorical;
mod numeric;
mod temporal;

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::loader::Table;
use canvas::{Canvas, with_figure};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The eleven chart kinds, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
    Column,
    Bubble,
    Histogram,
    BoxPlot,
    Funnel,
    Waterfall,
}

impl ChartKind {
    pub const ALL: [ChartKind; 11] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Area,
        ChartKind::Scatter,
        ChartKind::Column,
        ChartKind::Bubble,
        ChartKind::Histogram,
        ChartKind::BoxPlot,
        ChartKind::Funnel,
        ChartKind::Waterfall,
    ];

    /// File name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar_chart",
            ChartKind::Line => "line_chart",
            ChartKind::Pie => "pie_chart",
            ChartKind::Area => "area_chart",
            ChartKind::Scatter => "scatter_chart",
            ChartKind::Column => "column_chart",
            ChartKind::Bubble => "bubble_chart",
            ChartKind::Histogram => "histogram",
            ChartKind::BoxPlot => "box_plot",
            ChartKind::Funnel => "funnel_chart",
            ChartKind::Waterfall => "waterfall_chart",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.file_stem())
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// A chart file written by [`render_all`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub path: PathBuf,
    /// False when the precondition was unmet and only a blank figure was saved.
    pub rendered: bool,
}

/// Outcome of a chart precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    Met,
    Unmet(String),
}

type PreconditionFn = fn(&Table, &AnalyzerConfig) -> Result<Precondition>;
type RenderFn = fn(&Canvas<'_>, &Table, &AnalyzerConfig) -> anyhow::Result<()>;

/// Registry entry pairing a chart kind with its check and renderer.
pub struct ChartSpec {
    pub kind: ChartKind,
    precondition: PreconditionFn,
    render: RenderFn,
}

impl ChartSpec {
    /// Evaluate the precondition against `table`.
    pub fn check(&self, table: &Table, config: &AnalyzerConfig) -> Result<Precondition> {
        (self.precondition)(table, config)
    }
}

/// All charts, in rendering order.
pub const CHARTS: [ChartSpec; 11] = [
    ChartSpec {
        kind: ChartKind::Bar,
        precondition: has_complete_row,
        render: categorical::render_bar,
    },
    ChartSpec {
        kind: ChartKind::Line,
        precondition: has_date_and_values,
        render: temporal::render_line,
    },
    ChartSpec {
        kind: ChartKind::Pie,
        precondition: has_complete_row,
        render: categorical::render_pie,
    },
    ChartSpec {
        kind: ChartKind::Area,
        precondition: has_date_and_values,
        render: temporal::render_area,
    },
    ChartSpec {
        kind: ChartKind::Scatter,
        precondition: min_numeric_columns::<2>,
        render: numeric::render_scatter,
    },
    ChartSpec {
        kind: ChartKind::Column,
        precondition: has_complete_row,
        render: categorical::render_column,
    },
    ChartSpec {
        kind: ChartKind::Bubble,
        precondition: min_numeric_columns::<3>,
        render: numeric::render_bubble,
    },
    ChartSpec {
        kind: ChartKind::Histogram,
        precondition: min_numeric_columns::<1>,
        render: numeric::render_histogram,
    },
    ChartSpec {
        kind: ChartKind::BoxPlot,
        precondition: min_numeric_columns::<1>,
        render: numeric::render_box_plot,
    },
    ChartSpec {
        kind: ChartKind::Funnel,
        precondition: has_complete_row,
        render: categorical::render_funnel,
    },
    ChartSpec {
        kind: ChartKind::Waterfall,
        precondition: min_numeric_columns::<1>,
        render: numeric::render_waterfall,
    },
];

fn min_numeric_columns<const N: usize>(table: &Table, _: &AnalyzerConfig) -> Result<Precondition> {
    let found = table.numeric_columns().len();
    Ok(if found >= N {
        Precondition::Met
    } else {
        Precondition::Unmet(format!("needs {N} numeric column(s), found {found}"))
    })
}

fn has_complete_row(table: &Table, _: &AnalyzerConfig) -> Result<Precondition> {
    Ok(if table.row_value_counts()?.is_empty() {
        Precondition::Unmet("no row without missing values".to_string())
    } else {
        Precondition::Met
    })
}

fn has_date_and_values(table: &Table, config: &AnalyzerConfig) -> Result<Precondition> {
    let date = config.date_column.as_str();
    if !table.has_column(date) {
        return Ok(Precondition::Unmet(format!("no column named '{date}'")));
    }
    Ok(if temporal::value_columns(table, date)?.is_empty() {
        Precondition::Unmet(format!("no numeric column besides '{date}'"))
    } else {
        Precondition::Met
    })
}

/// Write every chart in [`CHARTS`] to `config.output_dir`.
///
/// Creates the directory when absent. Unmet preconditions yield blank
/// figures; I/O and drawing failures are returned as errors.
pub fn render_all(table: &Table, config: &AnalyzerConfig) -> Result<Vec<ChartArtifact>> {
    let dir = &config.output_dir;
    std::fs::create_dir_all(dir).map_err(|e| AnalysisError::file(dir, e))?;

    let mut artifacts = Vec::with_capacity(CHARTS.len());
    for spec in &CHARTS {
        let path = dir.join(spec.kind.file_name());
        let rendered = match spec.check(table, config)? {
            Precondition::Met => {
                with_figure(&path, &config.style, |area| (spec.render)(area, table, config))
                    .map_err(|e| render_error(spec.kind, e))?;
                true
            }
            Precondition::Unmet(reason) => {
                warn!("Skipping {}: {reason}; saving a blank figure", spec.kind);
                with_figure(&path, &config.style, |_| Ok(()))
                    .map_err(|e| render_error(spec.kind, e))?;
                false
            }
        };
        debug!("Wrote {} (rendered: {rendered})", path.display());
        artifacts.push(ChartArtifact {
            kind: spec.kind,
            path,
            rendered,
        });
    }

    info!(
        "Saved {} charts to {} ({} rendered)",
        artifacts.len(),
        dir.display(),
        artifacts.iter().filter(|a| a.rendered).count()
    );
    Ok(artifacts)
}

fn render_error(kind: ChartKind, err: anyhow::Error) -> AnalysisError {
    AnalysisError::Render {
        chart: kind.to_string(),
        reason: format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_order_matches_kinds() {
        let kinds: Vec<ChartKind> = CHARTS.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
    }

    #[test]
    fn test_file_names() {
        let names: Vec<String> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "bar_chart.png",
                "line_chart.png",
                "pie_chart.png",
                "area_chart.png",
                "scatter_chart.png",
                "column_chart.png",
                "bubble_chart.png",
                "histogram.png",
                "box_plot.png",
                "funnel_chart.png",
                "waterfall_chart.png",
            ]
        );
    }

    #[test]
    fn test_numeric_preconditions() {
        let df = df!("a" => &[1.0f64, 2.0], "b" => &[3.0f64, 4.0]).unwrap();
        let table = Table::from_dataframe(df);
        let config = AnalyzerConfig::default();

        assert_eq!(min_numeric_columns::<2>(&table, &config).unwrap(), Precondition::Met);
        assert!(matches!(
            min_numeric_columns::<3>(&table, &config).unwrap(),
            Precondition::Unmet(_)
        ));
    }

    #[test]
    fn test_date_precondition() {
        let config = AnalyzerConfig::default();

        let without = Table::from_dataframe(df!("a" => &[1.0f64]).unwrap());
        assert!(matches!(
            has_date_and_values(&without, &config).unwrap(),
            Precondition::Unmet(_)
        ));

        let only_date = Table::from_dataframe(df!("date" => &[1i64], "c" => &["x"]).unwrap());
        assert!(matches!(
            has_date_and_values(&only_date, &config).unwrap(),
            Precondition::Unmet(_)
        ));

        let with = Table::from_dataframe(df!("date" => &[1i64], "v" => &[2.0f64]).unwrap());
        assert_eq!(has_date_and_values(&with, &config).unwrap(), Precondition::Met);
    }

    #[test]
    fn test_complete_row_precondition() {
        let config = AnalyzerConfig::default();
        let sparse = df!("a" => &[Some(1.0f64), None], "b" => &[None::<f64>, Some(2.0)]).unwrap();
        assert!(matches!(
            has_complete_row(&Table::from_dataframe(sparse), &config).unwrap(),
            Precondition::Unmet(_)
        ));
    }

    #[test]
    fn test_render_all_writes_every_file_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::builder()
            .output_dir(dir.path().join("charts"))
            .build()
            .unwrap();
        let table = Table::from_dataframe(DataFrame::empty());

        let artifacts = render_all(&table, &config).unwrap();

        assert_eq!(artifacts.len(), 11);
        assert!(artifacts.iter().all(|a| !a.rendered));
        assert!(artifacts.iter().all(|a| a.path.is_file()));
    }

    #[test]
    fn test_render_all_draws_every_chart_when_preconditions_hold() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::builder()
            .output_dir(dir.path().join("charts"))
            .build()
            .unwrap();

        let day = 86_400_000i64;
        let date = Series::new("date".into(), &[day, 2 * day, 3 * day, 4 * day, 5 * day])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let df = DataFrame::new(vec![
            date.into_column(),
            Column::new("region".into(), &["north", "south", "north", "east", "south"]),
            Column::new("sales".into(), &[120.0f64, 95.5, 130.0, 80.0, 101.25]),
            Column::new("units".into(), &[12i64, 9, 13, 8, 10]),
            Column::new("margin".into(), &[0.2f64, 0.15, 0.22, 0.1, 0.18]),
        ])
        .unwrap();
        let table = Table::from_dataframe(df);

        for spec in &CHARTS {
            assert_eq!(spec.check(&table, &config).unwrap(), Precondition::Met, "{}", spec.kind);
        }

        let artifacts = render_all(&table, &config).unwrap();

        assert_eq!(artifacts.len(), 11);
        for artifact in &artifacts {
            assert!(artifact.rendered, "{} was not rendered", artifact.kind);
            assert!(std::fs::metadata(&artifact.path).unwrap().len() > 0);
        }
    }
}
