use plotters::prelude::*;
use thiserror::Error;

use crate::services::chart::{ChartBar, ChartSpec, MarkerStroke, ThemeColor};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("histogram data is empty")]
    EmptyHistogram,
    #[error("failed to render chart: {0}")]
    Render(String),
}

pub async fn write_chart_png(output_path: &str, chart: &ChartSpec) -> Result<(), ChartError> {
    if chart.bars.is_empty() {
        return Err(ChartError::EmptyHistogram);
    }
    let output_path = output_path.to_string();
    let chart = chart.clone();
    tokio::task::spawn_blocking(move || render_chart_png(&output_path, &chart))
        .await
        .map_err(|e| ChartError::Render(e.to_string()))??;
    Ok(())
}

fn theme_rgb(color: ThemeColor) -> RGBColor {
    match color {
        ThemeColor::Chart1 => RGBColor(30, 122, 204),
        ThemeColor::Chart2 => RGBColor(22, 163, 74),
        ThemeColor::Chart5 => RGBColor(217, 119, 6),
        ThemeColor::Destructive => RGBColor(220, 38, 38),
        ThemeColor::Foreground => RGBColor(15, 23, 42),
    }
}

/// Smallest positive gap between neighbouring bins; 1.0 for a single bin.
fn bar_width(bars: &[ChartBar]) -> f64 {
    bars.windows(2)
        .map(|pair| pair[1].bin - pair[0].bin)
        .filter(|gap| *gap > 0.0)
        .fold(None, |min: Option<f64>, gap| Some(min.map_or(gap, |m| m.min(gap))))
        .unwrap_or(1.0)
}

/// X range covering every bar and every marker, padded by one bar width.
fn x_range(chart: &ChartSpec, width: f64) -> (f64, f64) {
    let xs = chart
        .bars
        .iter()
        .flat_map(|bar| [bar.bin, bar.bin + width])
        .chain(chart.markers.iter().map(|marker| marker.x));
    let (min, max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    (min - width, max + width)
}

fn render_chart_png(output_path: &str, chart: &ChartSpec) -> Result<(), ChartError> {
    let width = bar_width(&chart.bars);
    let (x_min, x_max) = x_range(chart, width);
    let max_count = chart.bars.iter().map(|bar| bar.count).max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).max(1.0);

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Render(e.to_string()))?;

    let mut plot = ChartBuilder::on(&root)
        .margin(20)
        .caption(chart.title, ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(75)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| ChartError::Render(e.to_string()))?;

    plot.configure_mesh()
        .disable_x_mesh()
        .y_desc(chart.y_axis_label)
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .x_label_formatter(&|value| chart.x_tick_label(Some(*value)))
        .y_label_formatter(&|value| format!("{value:.0}"))
        .draw()
        .map_err(|e| ChartError::Render(e.to_string()))?;

    plot.draw_series(chart.bars.iter().map(|bar| {
        let style = theme_rgb(bar.color).mix(bar.opacity).filled();
        Rectangle::new([(bar.bin, 0.0), (bar.bin + width * 0.9, bar.count as f64)], style)
    }))
    .map_err(|e| ChartError::Render(e.to_string()))?;

    for marker in &chart.markers {
        let style = theme_rgb(marker.color).mix(marker.opacity).stroke_width(2);
        let segments = match marker.stroke {
            MarkerStroke::Solid => vec![(0.0, y_max)],
            MarkerStroke::Dashed => dash_segments(y_max, 40),
        };
        plot.draw_series(segments.into_iter().map(|(from, to)| {
            PathElement::new(vec![(marker.x, from), (marker.x, to)], style)
        }))
        .map_err(|e| ChartError::Render(e.to_string()))?;

        if let Some(label) = marker.label {
            let text_style = ("sans-serif", 16)
                .into_font()
                .color(&theme_rgb(marker.color));
            plot.draw_series(std::iter::once(Text::new(
                label.to_string(),
                (marker.x, y_max),
                text_style,
            )))
            .map_err(|e| ChartError::Render(e.to_string()))?;
        }
    }

    root.present()
        .map_err(|e| ChartError::Render(e.to_string()))?;
    Ok(())
}

/// Splits `0..height` into `dashes` drawn segments separated by equal gaps.
fn dash_segments(height: f64, dashes: usize) -> Vec<(f64, f64)> {
    let step = height / (dashes * 2) as f64;
    (0..dashes)
        .map(|idx| {
            let from = step * (idx * 2) as f64;
            (from, from + step)
        })
        .collect()
}
