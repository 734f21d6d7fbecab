//! Charts plotted against the date column: line and stacked area.

use super::canvas::{Canvas, caption_font, label_font, padded_range, rgb};
use crate::config::AnalyzerConfig;
use crate::loader::Table;
use crate::utils::{ColumnKind, format_millis_as_date, format_number};
use anyhow::Result;
use plotters::prelude::*;

/// Numeric columns other than the date column, with their values.
pub(crate) fn value_columns(
    table: &Table,
    date_column: &str,
) -> crate::error::Result<Vec<(String, Vec<Option<f64>>)>> {
    table
        .numeric_columns()
        .into_iter()
        .filter(|name| name != date_column)
        .map(|name| {
            let values = table.numeric_values(&name)?;
            Ok((name, values))
        })
        .collect()
}

struct DateAxis {
    values: Vec<Option<f64>>,
    temporal: bool,
}

impl DateAxis {
    fn read(table: &Table, name: &str) -> Result<Self> {
        Ok(Self {
            values: table.axis_values(name)?,
            temporal: table.kind_of(name)? == ColumnKind::Temporal,
        })
    }

    fn format(&self, x: f64) -> String {
        if self.temporal {
            format_millis_as_date(x)
        } else {
            format_number(x)
        }
    }
}

/// One line per value column against the date column.
pub(crate) fn render_line(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let axis = DateAxis::read(table, &config.date_column)?;
    let columns = value_columns(table, &config.date_column)?;

    let x_range = padded_range(axis.values.iter().flatten().copied(), false);
    let y_range = padded_range(
        columns.iter().flat_map(|(_, v)| v.iter().flatten().copied()),
        false,
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Trend Over Time", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(config.date_column.as_str())
        .x_label_formatter(&|x| axis.format(*x))
        .label_style(label_font(style))
        .draw()?;

    for (i, (name, values)) in columns.iter().enumerate() {
        let color = rgb(style.color(i));
        let points = paired_points(&axis.values, values);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(label_font(style))
        .draw()?;

    Ok(())
}

/// Value columns stacked on top of each other against the date column.
///
/// Missing values count as zero.
pub(crate) fn render_area(
    area: &Canvas<'_>,
    table: &Table,
    config: &AnalyzerConfig,
) -> Result<()> {
    let style = &config.style;
    let axis = DateAxis::read(table, &config.date_column)?;
    let columns = value_columns(table, &config.date_column)?;

    let mut order: Vec<usize> = (0..axis.values.len())
        .filter(|&row| axis.values[row].is_some())
        .collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (axis.values[a].unwrap_or_default(), axis.values[b].unwrap_or_default());
        a.total_cmp(&b)
    });
    let xs: Vec<f64> = order.iter().filter_map(|&row| axis.values[row]).collect();

    let raw: Vec<Vec<f64>> = columns
        .iter()
        .map(|(_, values)| {
            order
                .iter()
                .map(|&row| values[row].unwrap_or(0.0))
                .collect()
        })
        .collect();
    let layers = stack_layers(&raw);

    let x_range = padded_range(xs.iter().copied(), false);
    let y_range = padded_range(layers.iter().flatten().copied(), true);

    let mut chart = ChartBuilder::on(area)
        .caption("Cumulative Trends", caption_font(style))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(config.date_column.as_str())
        .x_label_formatter(&|x| axis.format(*x))
        .label_style(label_font(style))
        .draw()?;

    // top layer first so lower layers stay visible
    for (i, layer) in layers.iter().enumerate().rev() {
        let color = rgb(style.color(i));
        let name = columns[i].0.as_str();
        chart
            .draw_series(AreaSeries::new(
                xs.iter().copied().zip(layer.iter().copied()),
                0.0,
                color.mix(0.7),
            ))?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(label_font(style))
        .draw()?;

    Ok(())
}

/// Running totals across layers: layer `i` is the sum of series `0..=i`.
fn stack_layers(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut layers: Vec<Vec<f64>> = Vec::with_capacity(series.len());
    for values in series {
        let layer = match layers.last() {
            Some(below) => values.iter().zip(below).map(|(v, b)| v + b).collect(),
            None => values.clone(),
        };
        layers.push(layer);
    }
    layers
}

fn paired_points(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stack_layers() {
        let layers = stack_layers(&[vec![1.0, 2.0], vec![3.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(
            layers,
            vec![vec![1.0, 2.0], vec![4.0, 2.0], vec![5.0, 3.0]]
        );
    }

    #[test]
    fn test_paired_points_skip_missing_and_sort() {
        let xs = vec![Some(3.0), Some(1.0), None, Some(2.0)];
        let ys = vec![Some(30.0), Some(10.0), Some(99.0), None];
        assert_eq!(paired_points(&xs, &ys), vec![(1.0, 10.0), (3.0, 30.0)]);
    }

    #[test]
    fn test_value_columns_exclude_date() {
        let df = df!(
            "date" => &[1i64, 2],
            "sales" => &[5.0f64, 6.0],
            "label" => &["a", "b"]
        )
        .unwrap();
        let table = Table::from_dataframe(df);
        let columns = value_columns(&table, "date").unwrap();
        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["sales"]);
    }
}
