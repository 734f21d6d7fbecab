//! Configuration types for chart rendering and report generation.
//!
//! All drawing parameters live in [`ChartStyle`], which is passed to every
//! renderer explicitly. Nothing about the look of a chart is global state.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default colour cycle (the classic ten-colour categorical palette).
pub const DEFAULT_PALETTE: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

/// Visual parameters shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Figure width in pixels. Default: 1000 (10in at 100dpi)
    pub width: u32,
    /// Figure height in pixels. Default: 600 (6in at 100dpi)
    pub height: u32,
    /// Background fill colour.
    pub background: [u8; 3],
    /// Colour cycle used for series, bars and slices.
    pub palette: Vec<[u8; 3]>,
    /// Font family for captions and labels.
    pub font_family: String,
    /// Caption font size in pixels.
    pub caption_size: u32,
    /// Axis and legend font size in pixels.
    pub label_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: [255, 255, 255],
            palette: DEFAULT_PALETTE.to_vec(),
            font_family: "sans-serif".to_string(),
            caption_size: 28,
            label_size: 14,
        }
    }
}

impl ChartStyle {
    /// Colour for the `index`-th series, cycling through the palette.
    pub fn color(&self, index: usize) -> [u8; 3] {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        self.palette[index % self.palette.len()]
    }
}

/// Configuration for [`DataAnalyzer`](crate::DataAnalyzer).
///
/// Use [`AnalyzerConfig::builder()`] for a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_report::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .output_dir("charts")
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory that receives the chart images.
    /// Default: "visualizations"
    pub output_dir: PathBuf,

    /// Name of the column that drives the line and area charts.
    /// Default: "date"
    pub date_column: String,

    /// Number of value counts shown by the bar and column charts.
    /// Default: 10
    pub bar_top_n: usize,

    /// Number of value counts shown by the pie chart.
    /// Default: 5
    pub pie_top_n: usize,

    /// Number of equal-width histogram bins.
    /// Default: 30
    pub histogram_bins: usize,

    /// Number of leading rows plotted by the waterfall chart.
    /// Default: 10
    pub waterfall_rows: usize,

    /// Multiplier applied to the third numeric column to get bubble area.
    /// Default: 100.0
    pub bubble_scale: f64,

    /// Figure style passed to every renderer.
    pub style: ChartStyle,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("visualizations"),
            date_column: "date".to_string(),
            bar_top_n: 10,
            pie_top_n: 5,
            histogram_bins: 30,
            waterfall_rows: 10,
            bubble_scale: 100.0,
            style: ChartStyle::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("bar_top_n", self.bar_top_n),
            ("pie_top_n", self.pie_top_n),
            ("histogram_bins", self.histogram_bins),
            ("waterfall_rows", self.waterfall_rows),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        if self.style.width == 0 || self.style.height == 0 {
            return Err(ConfigValidationError::InvalidFigureSize {
                width: self.style.width,
                height: self.style.height,
            });
        }

        if !self.bubble_scale.is_finite() || self.bubble_scale <= 0.0 {
            return Err(ConfigValidationError::InvalidBubbleScale(self.bubble_scale));
        }

        if self.date_column.is_empty() {
            return Err(ConfigValidationError::EmptyField("date_column".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),

    #[error("Invalid figure size {width}x{height}: both sides must be non-zero")]
    InvalidFigureSize { width: u32, height: u32 },

    #[error("Invalid bubble scale: {0} (must be a positive finite number)")]
    InvalidBubbleScale(f64),

    #[error("'{0}' must not be empty")]
    EmptyField(String),
}

impl From<ConfigValidationError> for AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalyzerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    output_dir: Option<PathBuf>,
    date_column: Option<String>,
    bar_top_n: Option<usize>,
    pie_top_n: Option<usize>,
    histogram_bins: Option<usize>,
    waterfall_rows: Option<usize>,
    bubble_scale: Option<f64>,
    style: Option<ChartStyle>,
}

impl AnalyzerConfigBuilder {
    /// Set the directory that receives chart images.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the column name used as the x axis of line and area charts.
    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = Some(name.into());
        self
    }

    /// Set how many value counts the bar and column charts show.
    pub fn bar_top_n(mut self, n: usize) -> Self {
        self.bar_top_n = Some(n);
        self
    }

    /// Set how many value counts the pie chart shows.
    pub fn pie_top_n(mut self, n: usize) -> Self {
        self.pie_top_n = Some(n);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of leading rows in the waterfall chart.
    pub fn waterfall_rows(mut self, rows: usize) -> Self {
        self.waterfall_rows = Some(rows);
        self
    }

    /// Set the bubble area multiplier.
    pub fn bubble_scale(mut self, scale: f64) -> Self {
        self.bubble_scale = Some(scale);
        self
    }

    /// Set the figure style.
    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalyzerConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigValidationError> {
        let defaults = AnalyzerConfig::default();
        let config = AnalyzerConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            date_column: self.date_column.unwrap_or(defaults.date_column),
            bar_top_n: self.bar_top_n.unwrap_or(defaults.bar_top_n),
            pie_top_n: self.pie_top_n.unwrap_or(defaults.pie_top_n),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            waterfall_rows: self.waterfall_rows.unwrap_or(defaults.waterfall_rows),
            bubble_scale: self.bubble_scale.unwrap_or(defaults.bubble_scale),
            style: self.style.unwrap_or(defaults.style),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for [`ReportGenerator`](crate::ReportGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Settings forwarded to the analyzer.
    pub analyzer: AnalyzerConfig,

    /// Markdown template read after charts and statistics are produced.
    /// Default: "analysis_report.md"
    pub template_path: PathBuf,

    /// Destination of the final report.
    /// Default: "final_report.md"
    pub output_path: PathBuf,

    /// Replace `{{placeholder}}` tokens in the template.
    /// When false the template is written out unchanged.
    /// Default: false
    pub populate_template: bool,

    /// Optional path for a JSON dump of the statistics bundle.
    /// Default: None
    pub statistics_path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            template_path: PathBuf::from("analysis_report.md"),
            output_path: PathBuf::from("final_report.md"),
            populate_template: false,
            statistics_path: None,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    analyzer: Option<AnalyzerConfig>,
    template_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    populate_template: Option<bool>,
    statistics_path: Option<PathBuf>,
}

impl ReportConfigBuilder {
    /// Set the analyzer configuration.
    pub fn analyzer(mut self, config: AnalyzerConfig) -> Self {
        self.analyzer = Some(config);
        self
    }

    /// Set the template path.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Set the final report path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable placeholder population.
    pub fn populate_template(mut self, populate: bool) -> Self {
        self.populate_template = Some(populate);
        self
    }

    /// Write the statistics bundle as JSON to `path`.
    pub fn statistics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.statistics_path = Some(path.into());
        self
    }

    /// Build the configuration, validating the nested analyzer settings.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            analyzer: self.analyzer.unwrap_or(defaults.analyzer),
            template_path: self.template_path.unwrap_or(defaults.template_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            populate_template: self.populate_template.unwrap_or(false),
            statistics_path: self.statistics_path,
        };

        config.analyzer.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("visualizations"));
        assert_eq!(config.date_column, "date");
        assert_eq!(config.bar_top_n, 10);
        assert_eq!(config.pie_top_n, 5);
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.waterfall_rows, 10);
        assert_eq!((config.style.width, config.style.height), (1000, 600));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalyzerConfig::builder()
            .output_dir("charts")
            .histogram_bins(12)
            .pie_top_n(3)
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.pie_top_n, 3);
        assert_eq!(config.bar_top_n, 10);
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = AnalyzerConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroCount(field) if field == "histogram_bins"
        ));
    }

    #[test]
    fn test_validation_figure_size() {
        let style = ChartStyle {
            width: 0,
            ..ChartStyle::default()
        };
        let result = AnalyzerConfig::builder().style(style).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidFigureSize { width: 0, .. }
        ));
    }

    #[test]
    fn test_validation_bubble_scale() {
        assert!(AnalyzerConfig::builder().bubble_scale(f64::NAN).build().is_err());
        assert!(AnalyzerConfig::builder().bubble_scale(-1.0).build().is_err());
    }

    #[test]
    fn test_palette_cycles() {
        let style = ChartStyle::default();
        assert_eq!(style.color(0), style.color(10));
        assert_ne!(style.color(0), style.color(1));

        let empty = ChartStyle {
            palette: Vec::new(),
            ..ChartStyle::default()
        };
        assert_eq!(empty.color(3), DEFAULT_PALETTE[3]);
    }

    #[test]
    fn test_report_config_defaults() {
        let config = ReportConfig::builder().build().unwrap();
        assert_eq!(config.template_path, PathBuf::from("analysis_report.md"));
        assert_eq!(config.output_path, PathBuf::from("final_report.md"));
        assert!(!config.populate_template);
        assert!(config.statistics_path.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "analyzer": {
                "output_dir": "out/charts",
                "date_column": "Date",
                "bar_top_n": 8,
                "pie_top_n": 4,
                "histogram_bins": 15,
                "waterfall_rows": 6,
                "bubble_scale": 50.0,
                "style": {
                    "width": 800,
                    "height": 480,
                    "background": [250, 250, 250],
                    "palette": [[0, 0, 0]],
                    "font_family": "serif",
                    "caption_size": 20,
                    "label_size": 12
                }
            },
            "template_path": "templates/report.md",
            "output_path": "out/report.md",
            "populate_template": true,
            "statistics_path": "out/stats.json"
        }"#;

        let config: ReportConfig = serde_json::from_str(json).expect("valid config JSON");
        assert_eq!(config.analyzer.date_column, "Date");
        assert_eq!(config.analyzer.style.width, 800);
        assert!(config.populate_template);
        assert_eq!(config.statistics_path, Some(PathBuf::from("out/stats.json")));
        assert!(config.analyzer.validate().is_ok());
    }
}
