//! Chart series built from an [`analyze::Report`]
//!
//! Drawing is somebody else's problem. This module produces finished,
//! order-correct series and hands them to a [`Renderer`].

use loadlens_capture::record::is_success;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::info;

use crate::{
    analyze,
    config::{BarChartOptions, Config, HistogramMode, LineChartOptions},
};

pub mod json;

/// Errors produced while rendering charts
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// JSON renderer errors
    #[error("JSON renderer error: {0}")]
    Json(#[from] json::Error),
    /// Failures of renderers outside this crate
    #[error("Renderer error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Latency of each request, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    /// Chart title
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// `(request index, latency in milliseconds)`
    pub points: Vec<(usize, f64)>,
}

/// Which status codes a [`Band`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    /// Every observed code
    All,
    /// Codes in 200..=299
    Success,
    /// Codes outside 200..=299
    Failure,
}

/// A run of bars drawn in one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Band {
    /// What the band holds
    pub kind: BandKind,
    /// `(status code, count)`, ascending by status code
    pub bars: Vec<(u16, u64)>,
}

/// Occurrences of each status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    /// Chart title
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// Bands in drawing order. Empty bands are omitted.
    pub bands: Vec<Band>,
}

impl BarChart {
    /// X axis labels, one per bar, in drawing order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.bands
            .iter()
            .flat_map(|band| band.bars.iter().map(|(code, _)| code.to_string()))
            .collect()
    }
}

/// The opaque sink charts are handed to.
pub trait Renderer {
    /// Render the latency line chart
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be rendered.
    fn render_line(&mut self, chart: &LineChart) -> Result<(), Error>;

    /// Render the status code bar chart
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be rendered.
    fn render_bar(&mut self, chart: &BarChart) -> Result<(), Error>;
}

/// Build the latency line chart for `report`.
#[must_use]
pub fn line_chart(report: &analyze::Report, options: &LineChartOptions) -> LineChart {
    LineChart {
        title: options.title.clone(),
        x_label: "Request Number".to_string(),
        y_label: "Latency (ms)".to_string(),
        points: report.latency_series.clone(),
    }
}

/// Build the status code bar chart for `histogram`.
#[must_use]
pub fn bar_chart(histogram: &FxHashMap<u16, u64>, options: &BarChartOptions) -> BarChart {
    let mut bars: Vec<(u16, u64)> = histogram
        .iter()
        .map(|(code, count)| (*code, *count))
        .collect();
    bars.sort_unstable_by_key(|(code, _)| *code);

    let bands = match options.histogram {
        HistogramMode::Unified => vec![Band {
            kind: BandKind::All,
            bars,
        }],
        HistogramMode::Partitioned => {
            let (success, failure): (Vec<_>, Vec<_>) =
                bars.into_iter().partition(|(code, _)| is_success(*code));
            vec![
                Band {
                    kind: BandKind::Success,
                    bars: success,
                },
                Band {
                    kind: BandKind::Failure,
                    bars: failure,
                },
            ]
        }
    };

    BarChart {
        title: options.title.clone(),
        x_label: "Status Code".to_string(),
        y_label: "Count".to_string(),
        bands: bands.into_iter().filter(|b| !b.bars.is_empty()).collect(),
    }
}

/// Build both charts for `report` and hand them to `renderer`.
///
/// # Errors
///
/// Returns an error if the renderer fails.
pub fn render<R: Renderer>(
    renderer: &mut R,
    report: &analyze::Report,
    config: &Config,
) -> Result<(), Error> {
    let line = line_chart(report, &config.line_chart);
    renderer.render_line(&line)?;

    let bar = bar_chart(&report.status_code_histogram, &config.bar_chart);
    info!(
        "rendering {bars} status code bars, {mode} layout",
        bars = bar.labels().len(),
        mode = config.bar_chart.histogram
    );
    renderer.render_bar(&bar)?;
    Ok(())
}
