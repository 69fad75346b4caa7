//! Yahoo Finance chart API data adapter.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::http_client::{build_client, preview, read_ok_body};
use crate::domain::error::MarketError;
use crate::domain::ohlcv::{sort_by_date, OhlcvBar};
use crate::domain::settings::IndicatorChartSettings;
use crate::ports::data_port::{DataPort, FetchWindow};

const PROVIDER: &str = "yahoo";

pub struct YahooChartAdapter {
    client: Client,
    base_url: String,
    adjusted: bool,
}

impl YahooChartAdapter {
    pub fn new(client: Client, base_url: impl Into<String>, adjusted: bool) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            adjusted,
        }
    }

    pub fn from_settings(settings: &IndicatorChartSettings) -> Result<Self, MarketError> {
        let client = build_client(settings.proxy.as_deref())?;
        Ok(Self::new(
            client,
            settings.endpoint.clone(),
            settings.adjusted,
        ))
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), symbol)
    }

    fn fetch_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, MarketError> {
        let url = self.chart_url(symbol);
        let period1 = midnight_utc_timestamp(start).to_string();
        let period2 = midnight_utc_timestamp(end + Duration::days(1)).to_string();

        debug!(url = %url, %start, %end, "requesting chart data");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .map_err(|e| MarketError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let body = read_ok_body(&url, response)?;
        debug!(raw = %preview(&body, 500), "raw chart response");
        parse_chart_response(symbol, &url, &body, self.adjusted)
    }
}

impl DataPort for YahooChartAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<OhlcvBar>, MarketError> {
        let mut bars = match window {
            FetchWindow::Range { start, end } => self.fetch_range(symbol, *start, *end)?,
            FetchWindow::Latest(n) => {
                let end = Local::now().date_naive();
                let start = end - Duration::days(lookback_days(*n));
                let mut bars = self.fetch_range(symbol, start, end)?;
                sort_by_date(&mut bars);
                let excess = bars.len().saturating_sub(*n);
                bars.drain(..excess);
                bars
            }
        };

        if let FetchWindow::Range { start, end } = window {
            bars.retain(|b| b.date >= *start && b.date <= *end);
        }

        info!(symbol, bars = bars.len(), "parsed chart bars");
        Ok(bars)
    }
}

/// Calendar days to request so that `n` trading days are covered.
fn lookback_days(n: usize) -> i64 {
    (n as i64) * 7 / 5 + 14
}

fn midnight_utc_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn value_at(series: &[Option<f64>], i: usize) -> Option<f64> {
    series.get(i).copied().flatten()
}

/// Parse a chart API body into daily bars in response order.
///
/// Bars with no close are skipped. With `adjusted`, the close comes from the
/// adjclose column and a bar whose adjusted value is null is skipped rather
/// than mixed with raw prices; when the column is absent altogether the whole
/// series uses raw closes. Dates are taken in the exchange's local time using
/// the reported `gmtoffset`.
pub fn parse_chart_response(
    symbol: &str,
    url: &str,
    body: &str,
    adjusted: bool,
) -> Result<Vec<OhlcvBar>, MarketError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| MarketError::MalformedResponse {
            provider: PROVIDER.into(),
            reason: e.to_string(),
        })?;

    if let Some(err) = envelope.chart.error {
        return Err(MarketError::Transport {
            url: url.to_string(),
            reason: format!("{}: {}", err.code, err.description),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| MarketError::NoData {
            symbol: symbol.to_string(),
        })?;

    let offset = result.meta.gmtoffset;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|series| !series.is_empty());
    if adjusted && adjclose.is_none() {
        debug!(symbol, "no adjusted closes in response, using raw closes");
    }

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let close = match &adjclose {
            Some(series) if adjusted => value_at(series, i),
            _ => value_at(&quote.close, i),
        };
        let Some(close) = close else {
            continue;
        };

        let date = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| MarketError::MalformedResponse {
                provider: PROVIDER.into(),
                reason: format!("timestamp {} out of range", ts),
            })?;

        bars.push(OhlcvBar {
            date,
            open: value_at(&quote.open, i).unwrap_or(close),
            high: value_at(&quote.high, i).unwrap_or(close),
            low: value_at(&quote.low, i).unwrap_or(close),
            close,
            volume: value_at(&quote.volume, i).unwrap_or(0.0),
        });
    }

    Ok(bars)
}
