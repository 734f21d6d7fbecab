//! Report generation.
//!
//! [`ReportGenerator`] runs the analyzer over one spreadsheet, writes the
//! charts, computes statistics and then produces the final markdown report
//! from a template. By default the template is copied unchanged; with
//! `populate_template` enabled, `{{placeholder}}` tokens are filled in:
//!
//! | Placeholder | Value |
//! |---|---|
//! | `source_file` | input path |
//! | `generated_at` | local timestamp of the run |
//! | `row_count`, `column_count` | table shape |
//! | `summary_table` | per-column summary as a markdown table |
//! | `correlation_table` | correlation matrix as a markdown table |
//! | `missing_values_table` | missing-value counts as a markdown table |
//! | `charts` | image links to every chart |
//!
//! Unknown placeholders are left as they are.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheet_report::{ReportConfig, ReportGenerator};
//!
//! let config = ReportConfig::builder()
//!     .populate_template(true)
//!     .statistics_path("stats.json")
//!     .build()?;
//! let outcome = ReportGenerator::new(config).generate_report("Opinion Data.xlsx")?;
//! println!("{}", outcome.report_path.display());
//! ```

mod generator;
mod markdown;

pub use generator::{ReportGenerator, ReportOutcome, write_statistics_json};
