//! The analyzer: one loaded table plus the settings used to chart it.

use crate::charts::{self, ChartArtifact};
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::loader::Table;
use crate::statistics::StatisticsBundle;
use std::path::Path;
use tracing::info;

/// Loads a spreadsheet once and produces charts and statistics from it.
///
/// The table is read-only after construction, so the analyzer can be shared
/// across threads.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_report::DataAnalyzer;
///
/// let analyzer = DataAnalyzer::new("Opinion Data.xlsx")?;
/// let charts = analyzer.generate_all_charts()?;
/// let stats = analyzer.generate_statistics()?;
/// ```
#[derive(Debug, Clone)]
pub struct DataAnalyzer {
    table: Table,
    config: AnalyzerConfig,
}

static_assertions::assert_impl_all!(DataAnalyzer: Send, Sync);

impl DataAnalyzer {
    /// Load the first worksheet of `path` with the default configuration.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, AnalyzerConfig::default())
    }

    /// Load the first worksheet of `path` with a custom configuration.
    pub fn with_config(path: impl AsRef<Path>, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let table = Table::load(path)?;
        Ok(Self { table, config })
    }

    /// Analyze an already loaded table.
    pub fn from_table(table: Table, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Write the eleven chart images into the configured output directory.
    pub fn generate_all_charts(&self) -> Result<Vec<ChartArtifact>> {
        info!("Generating charts in {}", self.config.output_dir.display());
        charts::render_all(&self.table, &self.config)
    }

    /// Compute the summary, correlation matrix and missing-value counts.
    pub fn generate_statistics(&self) -> Result<StatisticsBundle> {
        info!("Computing statistics");
        StatisticsBundle::compute(&self.table)
    }
}
