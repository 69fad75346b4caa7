//! Interactive price/RSI/MACD page rendered from an Askama template.
//!
//! The page pulls ECharts from the CDN and embeds the data as JSON array
//! literals, so the file is self-contained apart from the library script.

use askama::Template;
use serde::Serialize;

use crate::domain::error::MarketError;
use crate::domain::indicator_frame::IndicatorRow;
use crate::domain::settings::ECHARTS_CDN_URL;

#[derive(Template)]
#[template(path = "indicator_chart.html")]
struct IndicatorChartTemplate<'a> {
    title: &'a str,
    echarts_url: &'a str,
    dates_json: String,
    closes_json: String,
    rsi_json: String,
    macd_json: String,
    signal_json: String,
    histogram_json: String,
    zoom_start: f64,
}

fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // folds -0.0 so tiny negative residues print as 0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn json_array<T: Serialize>(values: &[T]) -> Result<String, MarketError> {
    serde_json::to_string(values).map_err(|e| MarketError::Render {
        reason: format!("failed to serialize series: {}", e),
    })
}

fn rounded_series(
    rows: &[IndicatorRow],
    pick: impl Fn(&IndicatorRow) -> f64,
) -> Result<String, MarketError> {
    let values: Vec<f64> = rows.iter().map(|r| round2(pick(r))).collect();
    json_array(&values)
}

/// Render the indicator page for `rows`. `zoom_start_pct` is where the
/// initial zoom window begins; it always ends at the latest row.
pub fn render_indicator_html(
    rows: &[IndicatorRow],
    title: &str,
    zoom_start_pct: f64,
) -> Result<String, MarketError> {
    let dates: Vec<String> = rows
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();

    let template = IndicatorChartTemplate {
        title,
        echarts_url: ECHARTS_CDN_URL,
        dates_json: json_array(&dates)?,
        closes_json: rounded_series(rows, |r| r.close)?,
        rsi_json: rounded_series(rows, |r| r.rsi)?,
        macd_json: rounded_series(rows, |r| r.macd)?,
        signal_json: rounded_series(rows, |r| r.signal)?,
        histogram_json: rounded_series(rows, |r| r.histogram)?,
        zoom_start: zoom_start_pct,
    };

    template.render().map_err(|e| MarketError::Render {
        reason: e.to_string(),
    })
}
