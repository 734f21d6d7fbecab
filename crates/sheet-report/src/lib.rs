//! Spreadsheet Analysis and Reporting Library
//!
//! Loads the first worksheet of a workbook into a polars `DataFrame`, renders
//! a fixed set of eleven PNG charts, computes descriptive statistics and
//! writes a markdown report from a template.
//!
//! # Overview
//!
//! - **Loading**: `.xlsx`/`.xlsm`/`.xlsb`/`.xls`/`.ods` through calamine, `.csv`
//!   through polars, with per-column type inference
//! - **Charts**: bar, line, pie, area, scatter, column, bubble, histogram,
//!   box plot, funnel and waterfall, drawn with plotters
//! - **Statistics**: per-column summary, Pearson correlation matrix and
//!   missing-value counts
//! - **Reports**: template copy or placeholder population, plus an optional
//!   JSON dump of the statistics
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_report::{AnalyzerConfig, DataAnalyzer};
//!
//! let config = AnalyzerConfig::builder()
//!     .output_dir("visualizations")
//!     .build()?;
//!
//! let analyzer = DataAnalyzer::with_config("Opinion Data.xlsx", config)?;
//! for chart in analyzer.generate_all_charts()? {
//!     println!("{} -> {}", chart.kind, chart.path.display());
//! }
//!
//! let stats = analyzer.generate_statistics()?;
//! println!("{}", serde_json::to_string_pretty(&stats)?);
//! ```
//!
//! # Charts
//!
//! Each chart has a precondition (for example the scatter plot needs two
//! numeric columns). A chart whose precondition fails is still saved as a
//! blank figure and a warning is logged, so every run leaves the same files
//! in the output directory. See [`charts::CHARTS`].
//!
//! # Reports
//!
//! ```rust,ignore
//! use sheet_report::{ReportConfig, ReportGenerator};
//!
//! let outcome = ReportGenerator::new(ReportConfig::default())
//!     .generate_report("Opinion Data.xlsx")?;
//! ```

pub mod analyzer;
pub mod charts;
pub mod config;
pub mod error;
pub mod loader;
pub mod reporting;
pub mod statistics;
pub mod utils;

// Re-exports for convenience
pub use analyzer::DataAnalyzer;
pub use charts::{CHARTS, ChartArtifact, ChartKind, Precondition};
pub use config::{AnalyzerConfig, ChartStyle, ConfigValidationError, ReportConfig};
pub use error::{AnalysisError, Result, ResultExt};
pub use loader::{RowCount, Table};
pub use reporting::{ReportGenerator, ReportOutcome, write_statistics_json};
pub use statistics::{ColumnSummary, CorrelationMatrix, MissingValueCount, StatisticsBundle};
pub use utils::ColumnKind;
