//! Report driver: analyze, chart, compute statistics, then emit the report.

use super::markdown;
use crate::analyzer::DataAnalyzer;
use crate::charts::ChartArtifact;
use crate::config::ReportConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::statistics::StatisticsBundle;
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a report run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub source: PathBuf,
    pub artifacts: Vec<ChartArtifact>,
    pub statistics: StatisticsBundle,
    pub report_path: PathBuf,
    pub statistics_path: Option<PathBuf>,
    pub generated_at: String,
}

/// Runs the full analysis for one input and writes the final report.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Analyze `path`, write charts, then turn the template into the report.
    ///
    /// Load errors propagate before any file is written. A missing template
    /// or an unwritable output path is a file error.
    pub fn generate_report(&self, path: impl AsRef<Path>) -> Result<ReportOutcome> {
        let source = path.as_ref();
        let analyzer = DataAnalyzer::with_config(source, self.config.analyzer.clone())?;
        let artifacts = analyzer.generate_all_charts()?;
        let statistics = analyzer.generate_statistics()?;

        let template_path = &self.config.template_path;
        let template = fs::read_to_string(template_path)
            .map_err(|e| AnalysisError::file(template_path, e))?;

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let report = if self.config.populate_template {
            let values = self.placeholder_values(
                &analyzer,
                &artifacts,
                &statistics,
                &generated_at,
                source,
            );
            markdown::fill_placeholders(&template, &values)
        } else {
            template
        };

        let report_path = self.config.output_path.clone();
        fs::write(&report_path, report).map_err(|e| AnalysisError::file(&report_path, e))?;
        info!("Report saved: {}", report_path.display());

        let statistics_path = match &self.config.statistics_path {
            Some(stats_path) => {
                write_statistics_json(&statistics, stats_path)?;
                Some(stats_path.clone())
            }
            None => None,
        };

        Ok(ReportOutcome {
            source: source.to_path_buf(),
            artifacts,
            statistics,
            report_path,
            statistics_path,
            generated_at,
        })
    }

    fn placeholder_values(
        &self,
        analyzer: &DataAnalyzer,
        artifacts: &[ChartArtifact],
        statistics: &StatisticsBundle,
        generated_at: &str,
        source: &Path,
    ) -> HashMap<&'static str, String> {
        let report_dir = self
            .config
            .output_path
            .parent()
            .unwrap_or_else(|| Path::new(""));

        HashMap::from([
            ("source_file", source.display().to_string()),
            ("generated_at", generated_at.to_string()),
            ("row_count", analyzer.table().height().to_string()),
            ("column_count", analyzer.table().width().to_string()),
            ("summary_table", markdown::summary_table(&statistics.summary)),
            (
                "correlation_table",
                markdown::correlation_table(&statistics.correlations),
            ),
            (
                "missing_values_table",
                markdown::missing_values_table(&statistics.missing_values),
            ),
            ("charts", markdown::chart_list(artifacts, report_dir)),
        ])
    }
}

/// Write the statistics bundle as pretty-printed JSON.
pub fn write_statistics_json(statistics: &StatisticsBundle, path: &Path) -> Result<()> {
    let context = || format!("Writing statistics to {}", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(context())?;
    }
    let json = serde_json::to_string_pretty(statistics)?;
    fs::write(path, json).context(context())?;
    info!("Statistics saved: {}", path.display());
    Ok(())
}
