//! Turns a simulation result into a renderable description of the profit
//! histogram. Pure: no state, no I/O.

use crate::domain::simulation::HistogramBin;
use crate::services::currency::{format_currency, format_optional_currency};

pub const CHART_TITLE: &str = "Profit Distribution (Monte Carlo)";
pub const Y_AXIS_LABEL: &str = "Frequency";
pub const TOOLTIP_SERIES_LABEL: &str = "Iterations";
pub const CHART_FOOTNOTE: &str = "* Red bars indicate outcomes at or below the 5th percentile (Value at Risk). The dashed line represents the mean outcome.";

/// Semantic theme colors; the concrete palette belongs to whoever draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeColor {
    Chart1,
    Chart2,
    Chart5,
    Destructive,
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCategory {
    AtRisk,
    Normal,
}

impl BucketCategory {
    /// At or below the value at risk is at risk. Every bucket gets exactly one
    /// category.
    pub fn classify(bin: f64, value_at_risk: f64) -> Self {
        if bin <= value_at_risk {
            BucketCategory::AtRisk
        } else {
            BucketCategory::Normal
        }
    }

    pub fn color(self) -> ThemeColor {
        match self {
            BucketCategory::AtRisk => ThemeColor::Destructive,
            BucketCategory::Normal => ThemeColor::Chart1,
        }
    }

    pub fn opacity(self) -> f64 {
        match self {
            BucketCategory::AtRisk => 1.0,
            BucketCategory::Normal => 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub bin: f64,
    pub count: u64,
    pub category: BucketCategory,
    pub color: ThemeColor,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStroke {
    Dashed,
    Solid,
}

/// Vertical line across the whole plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMarker {
    pub x: f64,
    pub label: Option<&'static str>,
    pub color: ThemeColor,
    pub stroke: MarkerStroke,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub y_axis_label: &'static str,
    pub bars: Vec<ChartBar>,
    /// Mean, VaR and the zero baseline, in that order.
    pub markers: Vec<ReferenceMarker>,
    pub footnote: &'static str,
}

impl ChartSpec {
    /// Axis tick text; a missing value reads as "$0".
    pub fn x_tick_label(&self, value: Option<f64>) -> String {
        format_optional_currency(value)
    }

    pub fn at_risk_count(&self) -> usize {
        self.bars
            .iter()
            .filter(|bar| bar.category == BucketCategory::AtRisk)
            .count()
    }
}

pub fn build_chart(
    histogram: &[HistogramBin],
    expected_profit: f64,
    value_at_risk: f64,
) -> ChartSpec {
    let bars = histogram
        .iter()
        .map(|bucket| {
            let category = BucketCategory::classify(bucket.bin, value_at_risk);
            ChartBar {
                bin: bucket.bin,
                count: bucket.count,
                category,
                color: category.color(),
                opacity: category.opacity(),
            }
        })
        .collect();

    let markers = vec![
        ReferenceMarker {
            x: expected_profit,
            label: Some("Mean"),
            color: ThemeColor::Chart2,
            stroke: MarkerStroke::Dashed,
            opacity: 1.0,
        },
        ReferenceMarker {
            x: value_at_risk,
            label: Some("VaR"),
            color: ThemeColor::Destructive,
            stroke: MarkerStroke::Dashed,
            opacity: 1.0,
        },
        ReferenceMarker {
            x: 0.0,
            label: None,
            color: ThemeColor::Foreground,
            stroke: MarkerStroke::Solid,
            opacity: 0.4,
        },
    ];

    ChartSpec {
        title: CHART_TITLE,
        y_axis_label: Y_AXIS_LABEL,
        bars,
        markers,
        footnote: CHART_FOOTNOTE,
    }
}

/// Value half of a tooltip entry. A missing value shows as "0".
pub fn tooltip_value(value: Option<f64>) -> (String, &'static str) {
    match value {
        Some(value) => (value.to_string(), TOOLTIP_SERIES_LABEL),
        None => ("0".to_string(), TOOLTIP_SERIES_LABEL),
    }
}

/// Heading of a tooltip, keyed by the hovered bucket's edge.
pub fn tooltip_label(bin: f64) -> String {
    format!("Profit Range: {}", format_currency(bin))
}
