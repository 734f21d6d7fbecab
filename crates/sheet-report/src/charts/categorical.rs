//! Charts driven by full-row value counts: bar, column, pie and funnel.

use super::canvas::{Canvas, caption_font, label_font, padded_range, rgb, short_label};
use crate::config::AnalyzerConfig;
use crate::loader::{RowCount, Table};
use anyhow::Result;
use plotters::prelude::*;
use std::f64::consts::TAU;

pub(crate) fn render_bar(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let title = format!("Top {} Categories Distribution", config.bar_top_n);
    draw_count_bars(area, table, config, &title)
}

pub(crate) fn render_column(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    draw_count_bars(area, table, config, "Category Distribution")
}

fn draw_count_bars(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
    title: &str,
) -> Result<()> {
    let style = &config.style;
    let counts = top_counts(table, config.bar_top_n)?;
    let labels: Vec<String> = counts.iter().map(|c| short_label(&c.label)).collect();
    let y_range = padded_range(counts.iter().map(|c| c.count as f64), true);

    let mut chart = ChartBuilder::on(area)
        .caption(title, caption_font(style))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..counts.len() as u32).into_segmented(), 0f64..y_range.end)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_desc("count")
        .label_style(label_font(style))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(rgb(style.color(0)).filled())
            .margin(10)
            .data(
                counts
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as u32, c.count as f64)),
            ),
    )?;

    Ok(())
}

pub(crate) fn render_pie(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let counts = top_counts(table, config.pie_top_n)?;
    let total: f64 = counts.iter().map(|c| c.count as f64).sum();

    let title = format!("Top {} Categories Distribution", config.pie_top_n);
    let area = area.titled(&title, caption_font(style))?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.4;

    let mut start = 0.0;
    for (i, count) in counts.iter().enumerate() {
        let share = count.count as f64 / total;
        let sweep = share * TAU;
        let color = rgb(style.color(i));

        area.draw(&Polygon::new(
            wedge_points(center, radius, start, sweep),
            color.filled(),
        ))?;

        let mid = start + sweep / 2.0;
        area.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            polar(center, radius * 0.6, mid),
            label_font(style),
        ))?;
        area.draw(&Text::new(
            short_label(&count.label),
            polar(center, radius * 1.1, mid),
            label_font(style),
        ))?;

        start += sweep;
    }

    Ok(())
}

/// Ascending value counts drawn twice: as (count, rank) and as (rank, count).
pub(crate) fn render_funnel(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let mut counts: Vec<f64> = table
        .row_value_counts()?
        .iter()
        .map(|c| c.count as f64)
        .collect();
    counts.sort_by(f64::total_cmp);

    let ranks = (0..counts.len()).map(|i| i as f64);
    let range = padded_range(counts.iter().copied().chain(ranks), true);

    let mut chart = ChartBuilder::on(area)
        .caption("Funnel Chart", caption_font(style))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(range.clone(), range)?;

    chart.configure_mesh().label_style(label_font(style)).draw()?;

    let first = rgb(style.color(0));
    let second = rgb(style.color(1));
    chart.draw_series(LineSeries::new(
        counts.iter().enumerate().map(|(i, c)| (*c, i as f64)),
        first.stroke_width(2),
    ))?;
    chart.draw_series(LineSeries::new(
        counts.iter().enumerate().map(|(i, c)| (i as f64, *c)),
        second.stroke_width(2),
    ))?;

    Ok(())
}

fn top_counts(table: &Table, n: usize) -> Result<Vec<RowCount>> {
    Ok(table.row_value_counts()?.into_iter().take(n).collect())
}

fn segment_label(value: &SegmentValue<u32>, labels: &[String]) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    }
}

/// Pixel position at `radius` and `angle` (counterclockwise from 3 o'clock).
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Outline of a pie slice: the center followed by points along its arc.
fn wedge_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / TAU) * 180.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}
