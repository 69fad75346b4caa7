//! Sina Finance K-line data adapter.
//!
//! The endpoint answers with comma-less pseudo-JSON; the body goes through
//! [`repair_response`] before being parsed.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::http_client::{build_client, preview, read_ok_body};
use crate::domain::error::MarketError;
use crate::domain::ohlcv::{parse_bar_date, OhlcvBar};
use crate::domain::response_repair::repair_response;
use crate::domain::settings::IndexPlotSettings;
use crate::ports::data_port::{DataPort, FetchWindow};

const PROVIDER: &str = "sina";

pub struct SinaKlineAdapter {
    client: Client,
    endpoint: String,
    scale: u32,
    moving_average: bool,
}

impl SinaKlineAdapter {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            scale: 240,
            moving_average: false,
        }
    }

    pub fn from_settings(settings: &IndexPlotSettings) -> Result<Self, MarketError> {
        let mut adapter = Self::new(build_client(None)?, settings.endpoint.clone());
        adapter.scale = settings.scale;
        adapter.moving_average = settings.moving_average;
        Ok(adapter)
    }

    fn fetch_raw(&self, symbol: &str, data_length: usize) -> Result<String, MarketError> {
        let ma = if self.moving_average { "5" } else { "no" };
        let scale = self.scale.to_string();
        let datalen = data_length.to_string();

        debug!(
            url = %self.endpoint,
            symbol,
            scale = %scale,
            ma,
            datalen = %datalen,
            "requesting K-line data"
        );
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("symbol", symbol),
                ("scale", scale.as_str()),
                ("ma", ma),
                ("datalen", datalen.as_str()),
            ])
            .send()
            .map_err(|e| MarketError::Transport {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let body = read_ok_body(&self.endpoint, response)?;
        debug!(raw = %preview(&body, 500), "raw K-line response");
        Ok(body)
    }
}

impl DataPort for SinaKlineAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<Vec<OhlcvBar>, MarketError> {
        let data_length = match window {
            FetchWindow::Latest(n) => *n,
            FetchWindow::Range { start, end } => calendar_days(*start, *end),
        };

        let raw = self.fetch_raw(symbol, data_length)?;
        let mut bars = parse_kline_response(symbol, &raw)?;

        if let FetchWindow::Range { start, end } = window {
            bars.retain(|b| b.date >= *start && b.date <= *end);
        }

        info!(symbol, bars = bars.len(), "parsed K-line bars");
        Ok(bars)
    }
}

/// Calendar days in `start..=end`; always enough to cover the trading days.
fn calendar_days(start: NaiveDate, end: NaiveDate) -> usize {
    (end - start).num_days().max(0) as usize + 1
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn to_f64(&self, field: &str) -> Result<f64, MarketError> {
        match self {
            NumberField::Number(v) => Ok(*v),
            NumberField::Text(s) => s.trim().parse().map_err(|_| MarketError::MalformedResponse {
                provider: PROVIDER.into(),
                reason: format!("non-numeric {} value '{}'", field, s),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KlineCandle {
    day: String,
    open: NumberField,
    high: NumberField,
    low: NumberField,
    close: NumberField,
    volume: NumberField,
}

impl KlineCandle {
    fn into_bar(self) -> Result<OhlcvBar, MarketError> {
        Ok(OhlcvBar {
            date: parse_bar_date(&self.day)?,
            open: self.open.to_f64("open")?,
            high: self.high.to_f64("high")?,
            low: self.low.to_f64("low")?,
            close: self.close.to_f64("close")?,
            volume: self.volume.to_f64("volume")?,
        })
    }
}

/// Repair and parse a raw K-line body into bars in response order.
///
/// A `null` body is the endpoint's answer for an unknown symbol.
pub fn parse_kline_response(symbol: &str, raw: &str) -> Result<Vec<OhlcvBar>, MarketError> {
    let repaired = repair_response(raw);
    if repaired.is_empty() || repaired == "null" {
        return Err(MarketError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let candles: Vec<KlineCandle> =
        serde_json::from_str(&repaired).map_err(|e| MarketError::MalformedResponse {
            provider: PROVIDER.into(),
            reason: e.to_string(),
        })?;

    candles.into_iter().map(KlineCandle::into_bar).collect()
}
