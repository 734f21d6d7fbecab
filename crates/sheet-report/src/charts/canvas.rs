//! Drawing surface lifecycle and small plotting helpers.

use crate::config::ChartStyle;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Root drawing area of one PNG figure.
pub(crate) type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Longest category label printed under a bar or next to a slice.
const MAX_LABEL_CHARS: usize = 24;

/// Largest magnitude of an axis bound.
const AXIS_LIMIT: f64 = f64::MAX / 4.0;

/// Create a figure at `path`, let `draw` fill it, then encode and release it.
///
/// The surface is presented even when `draw` adds nothing, so a blank
/// figure is still written.
pub(crate) fn with_figure<F>(path: &Path, style: &ChartStyle, draw: F) -> Result<()>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&rgb(style.background))?;
    draw(&root)?;
    root.present()?;
    Ok(())
}

pub(crate) fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

pub(crate) fn caption_font(style: &ChartStyle) -> (&str, u32) {
    (style.font_family.as_str(), style.caption_size)
}

pub(crate) fn label_font(style: &ChartStyle) -> (&str, u32) {
    (style.font_family.as_str(), style.label_size)
}

/// Axis range covering `values` with 5% padding.
///
/// Falls back to `0..1` without finite values and widens a degenerate range.
/// Bounds are clamped to `±AXIS_LIMIT` so the width of the range stays finite.
pub(crate) fn padded_range(
    values: impl IntoIterator<Item = f64>,
    include_zero: bool,
) -> Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let (lo, hi) = (
        lo.clamp(-AXIS_LIMIT, AXIS_LIMIT),
        hi.clamp(-AXIS_LIMIT, AXIS_LIMIT),
    );
    if lo == hi {
        let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
        return (lo - pad)..(hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Shorten a category label for axis display.
pub(crate) fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{head}...")
    }
}

/// Label for an integer position on a float axis; blank between positions.
pub(crate) fn index_label(x: f64, labels: &[String]) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .map(|l| short_label(l))
        .unwrap_or_default()
}
