//! Run settings for the two chart commands, with their built-in defaults.

use chrono::NaiveDate;

use crate::domain::indicator_frame::IndicatorParams;

pub const SINA_KLINE_URL: &str =
    "http://money.finance.sina.com.cn/quotes_service/api/json_v2.php/CN_MarketData.getKLineData";
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const ECHARTS_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// Settings for `index-plot`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPlotSettings {
    pub endpoint: String,
    pub symbol: String,
    /// Candle granularity in minutes; 240 is one trading day.
    pub scale: u32,
    pub moving_average: bool,
    /// Number of trailing bars to request.
    pub data_length: usize,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for IndexPlotSettings {
    fn default() -> Self {
        Self {
            endpoint: SINA_KLINE_URL.to_string(),
            symbol: "sh000001".to_string(),
            scale: 240,
            moving_average: false,
            data_length: 3250,
            title: "Shanghai Composite Index Closing Prices (Recent)".to_string(),
            width: 1200,
            height: 600,
        }
    }
}

/// Settings for `indicator-chart`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorChartSettings {
    pub endpoint: String,
    pub symbol: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub proxy: Option<String>,
    /// Use the split/dividend adjusted close.
    pub adjusted: bool,
    pub indicators: IndicatorParams,
    /// Percentage of the series hidden left of the initial zoom window.
    pub zoom_start_pct: f64,
    pub title: String,
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default()
}

impl IndicatorChartSettings {
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            endpoint: YAHOO_CHART_URL.to_string(),
            symbol: "TSLA".to_string(),
            start_date: default_start_date(),
            end_date: today,
            proxy: None,
            adjusted: true,
            indicators: IndicatorParams::default(),
            zoom_start_pct: 50.0,
            title: "Tesla Stock Price with RSI and MACD".to_string(),
        }
    }
}
