//! Charts over the numeric columns: scatter, bubble, histogram, box plot
//! and waterfall.

use super::canvas::{Canvas, caption_font, index_label, label_font, padded_range, rgb};
use crate::config::AnalyzerConfig;
use crate::loader::Table;
use crate::statistics::quantile;
use crate::utils::format_number;
use anyhow::{Result, bail};
use plotters::prelude::*;

/// Pixels per typographic point at 100 dpi.
const PX_PER_POINT: f64 = 100.0 / 72.0;

/// Largest bubble radius in pixels.
const MAX_BUBBLE_RADIUS: f64 = 80.0;

fn leading_numeric(table: &Table, n: usize) -> Result<Vec<(String, Vec<Option<f64>>)>> {
    let names = table.numeric_columns();
    if names.len() < n {
        bail!("need {n} numeric columns, found {}", names.len());
    }
    names
        .into_iter()
        .take(n)
        .map(|name| {
            let values = table.numeric_values(&name)?;
            Ok((name, values))
        })
        .collect()
}

/// First numeric column against the second.
pub(crate) fn render_scatter(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let columns = leading_numeric(table, 2)?;
    let (x_name, xs) = &columns[0];
    let (y_name, ys) = &columns[1];
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Correlation Scatter Plot", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.0), false),
            padded_range(points.iter().map(|p| p.1), false),
        )?;

    chart
        .configure_mesh()
        .x_desc(x_name.as_str())
        .y_desc(y_name.as_str())
        .label_style(label_font(style))
        .draw()?;

    let color = rgb(style.color(0));
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, color.mix(0.6).filled())),
    )?;

    Ok(())
}

/// First numeric column against the second, sized by the third.
pub(crate) fn render_bubble(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let columns = leading_numeric(table, 3)?;
    let (x_name, xs) = &columns[0];
    let (y_name, ys) = &columns[1];
    let (_, sizes) = &columns[2];

    let bubbles: Vec<(f64, f64, u32)> = xs
        .iter()
        .zip(ys)
        .zip(sizes)
        .filter_map(|((x, y), s)| {
            let radius = bubble_radius((*s)?, config.bubble_scale)?;
            Some(((*x)?, (*y)?, radius))
        })
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Bubble Chart", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(bubbles.iter().map(|b| b.0), false),
            padded_range(bubbles.iter().map(|b| b.1), false),
        )?;

    chart
        .configure_mesh()
        .x_desc(x_name.as_str())
        .y_desc(y_name.as_str())
        .label_style(label_font(style))
        .draw()?;

    let color = rgb(style.color(0));
    chart.draw_series(
        bubbles
            .iter()
            .map(|&(x, y, r)| Circle::new((x, y), r, color.mix(0.5).filled())),
    )?;

    Ok(())
}

/// Marker radius in pixels for a value whose marker area is `value * scale`
/// square points. Non-positive areas draw nothing.
fn bubble_radius(value: f64, scale: f64) -> Option<u32> {
    let area = value * scale;
    if !area.is_finite() || area <= 0.0 {
        return None;
    }
    let radius = (area.sqrt() / 2.0 * PX_PER_POINT).clamp(1.0, MAX_BUBBLE_RADIUS);
    Some(radius.round() as u32)
}

/// Equal-width histogram of the first numeric column.
pub(crate) fn render_histogram(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let columns = leading_numeric(table, 1)?;
    let (name, values) = &columns[0];
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let bins = histogram_bins(&present, config.histogram_bins);

    let x_range = padded_range(bins.iter().flat_map(|b| [b.start, b.end]), false);
    let y_range = padded_range(bins.iter().map(|b| b.count as f64), true);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Distribution of {name}"), caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0f64..y_range.end)?;

    chart
        .configure_mesh()
        .x_desc(name.as_str())
        .y_desc("count")
        .label_style(label_font(style))
        .draw()?;

    let color = rgb(style.color(0));
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.filled())
    }))?;
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLACK.stroke_width(1))
    }))?;

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct Bin {
    start: f64,
    end: f64,
    count: usize,
}

/// Split `values` into `n` equal-width bins over their range.
///
/// The last bin is closed on the right. A single distinct value is centred
/// in a range of width one.
fn histogram_bins(values: &[f64], n: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || n == 0 {
        return Vec::new();
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    // divide before subtracting so extreme spans do not overflow
    let width = hi / n as f64 - lo / n as f64;
    let mut bins: Vec<Bin> = (0..n)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = ((v / width - lo / width).floor() as usize).min(n - 1);
        bins[idx].count += 1;
    }
    bins
}

/// One box per numeric column.
pub(crate) fn render_box_plot(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let names = table.numeric_columns();
    let boxes = names
        .iter()
        .map(|name| {
            let values: Vec<f64> = table.numeric_values(name)?.into_iter().flatten().collect();
            Ok(BoxStats::from_values(&values))
        })
        .collect::<Result<Vec<_>>>()?;

    let y_range = padded_range(
        boxes
            .iter()
            .flatten()
            .flat_map(|b| b.fliers.iter().copied().chain([b.low, b.high])),
        false,
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Statistical Distribution", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..names.len() as f64 - 0.5, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&|x| index_label(*x, &names))
        .label_style(label_font(style))
        .draw()?;

    let color = rgb(style.color(0));
    for (i, stats) in boxes.iter().enumerate() {
        let Some(stats) = stats else {
            continue;
        };
        let x = i as f64;
        let (left, right) = (x - 0.25, x + 0.25);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            color.mix(0.3).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            BLACK.stroke_width(1),
        )))?;

        let segments = [
            [(left, stats.median), (right, stats.median)],
            [(x, stats.q3), (x, stats.high)],
            [(x, stats.q1), (x, stats.low)],
            [(x - 0.1, stats.high), (x + 0.1, stats.high)],
            [(x - 0.1, stats.low), (x + 0.1, stats.low)],
        ];
        chart.draw_series(
            segments
                .iter()
                .map(|seg| PathElement::new(seg.to_vec(), BLACK.stroke_width(1))),
        )?;
        chart.draw_series(
            stats
                .fliers
                .iter()
                .map(|&y| Circle::new((x, y), 3, BLACK.stroke_width(1))),
        )?;
    }

    Ok(())
}

/// Box-and-whisker summary of one column.
#[derive(Debug, Clone, PartialEq)]
struct BoxStats {
    q1: f64,
    median: f64,
    q3: f64,
    /// Lowest value within 1.5 IQR below `q1`.
    low: f64,
    /// Highest value within 1.5 IQR above `q3`.
    high: f64,
    fliers: Vec<f64>,
}

impl BoxStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let fences = lo_fence..=hi_fence;
        let (inside, fliers): (Vec<f64>, Vec<f64>) =
            sorted.iter().partition(|v| fences.contains(*v));
        let low = inside.first().copied().unwrap_or(q1).min(q1);
        let high = inside.last().copied().unwrap_or(q3).max(q3);

        Some(Self {
            q1,
            median,
            q3,
            low,
            high,
            fliers,
        })
    }
}

/// Leading values of the first numeric column as bars, with their running
/// total drawn as a red line.
pub(crate) fn render_waterfall(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let columns = leading_numeric(table, 1)?;
    let values: Vec<Option<f64>> = columns[0]
        .1
        .iter()
        .copied()
        .take(config.waterfall_rows)
        .collect();
    let totals = running_totals(&values);

    let y_range = padded_range(
        values.iter().flatten().chain(totals.iter().flatten()).copied(),
        true,
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Waterfall Chart", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..values.len() as f64 - 0.5, y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(values.len().max(1))
        .x_label_formatter(&|x| {
            if (x - x.round()).abs() < 1e-6 {
                format_number(x.round())
            } else {
                String::new()
            }
        })
        .label_style(label_font(style))
        .draw()?;

    let color = rgb(style.color(0));
    chart.draw_series(values.iter().enumerate().filter_map(|(i, v)| {
        let x = i as f64;
        v.map(|v| Rectangle::new([(x - 0.25, 0.0), (x + 0.25, v)], color.filled()))
    }))?;

    chart.draw_series(LineSeries::new(
        totals
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i as f64, t))),
        RED.stroke_width(2),
    ))?;

    Ok(())
}

/// Cumulative sum that skips missing values and stays missing at their rows.
fn running_totals(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut total = 0.0;
    values
        .iter()
        .map(|v| {
            v.map(|v| {
                total += v;
                total
            })
        })
        .collect()
}
