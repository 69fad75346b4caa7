//! Configuration validation.
//!
//! Every key is optional; present values are checked before any network call.

use chrono::NaiveDate;

use crate::domain::error::MarketError;
use crate::domain::indicator_frame::IndicatorParams;
use crate::domain::settings::{default_start_date, IndexPlotSettings};
use crate::ports::config_port::ConfigPort;

pub const INDEX_PLOT: &str = "index_plot";
pub const INDICATOR_CHART: &str = "indicator_chart";

pub fn validate_index_plot_config(config: &dyn ConfigPort) -> Result<(), MarketError> {
    let defaults = IndexPlotSettings::default();
    validate_non_empty(config, INDEX_PLOT, "symbol")?;
    validate_non_empty(config, INDEX_PLOT, "endpoint")?;
    positive_usize(config, INDEX_PLOT, "datalen", defaults.data_length)?;
    positive_u32(config, INDEX_PLOT, "scale", defaults.scale)?;
    positive_u32(config, INDEX_PLOT, "width", defaults.width)?;
    positive_u32(config, INDEX_PLOT, "height", defaults.height)?;
    Ok(())
}

pub fn validate_indicator_chart_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(), MarketError> {
    validate_non_empty(config, INDICATOR_CHART, "symbol")?;
    validate_non_empty(config, INDICATOR_CHART, "endpoint")?;
    validate_dates(config, today)?;
    validate_indicator_periods(config)?;
    validate_zoom(config)?;
    if let Some(proxy) = config.get_non_blank(INDICATOR_CHART, "proxy") {
        validate_proxy_url(&proxy)?;
    }
    Ok(())
}

/// Proxy URLs must carry an explicit scheme, e.g. `http://127.0.0.1:10809`.
pub fn validate_proxy_url(proxy: &str) -> Result<(), MarketError> {
    let proxy = proxy.trim();
    let has_scheme = ["http://", "https://", "socks5://", "socks5h://"]
        .iter()
        .any(|scheme| proxy.starts_with(scheme) && proxy.len() > scheme.len());
    if !has_scheme {
        return Err(MarketError::config_invalid(
            INDICATOR_CHART,
            "proxy",
            format!("'{}' must start with http://, https:// or socks5://", proxy),
        ));
    }
    Ok(())
}

/// Read an optional `YYYY-MM-DD` date key.
pub fn parse_config_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, MarketError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                MarketError::config_invalid(
                    section,
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

fn validate_dates(config: &dyn ConfigPort, today: NaiveDate) -> Result<(), MarketError> {
    let start = parse_config_date(config, INDICATOR_CHART, "start_date")?
        .unwrap_or_else(default_start_date);
    let end = parse_config_date(config, INDICATOR_CHART, "end_date")?.unwrap_or(today);
    if start > end {
        return Err(MarketError::config_invalid(
            INDICATOR_CHART,
            "start_date",
            format!("start_date {} is after end_date {}", start, end),
        ));
    }
    Ok(())
}

fn validate_indicator_periods(config: &dyn ConfigPort) -> Result<(), MarketError> {
    let defaults = IndicatorParams::default();
    positive_usize(config, INDICATOR_CHART, "rsi_window", defaults.rsi_window)?;
    let fast = positive_usize(config, INDICATOR_CHART, "macd_fast", defaults.macd_fast)?;
    let slow = positive_usize(config, INDICATOR_CHART, "macd_slow", defaults.macd_slow)?;
    positive_usize(config, INDICATOR_CHART, "macd_signal", defaults.macd_signal)?;
    if fast >= slow {
        return Err(MarketError::config_invalid(
            INDICATOR_CHART,
            "macd_fast",
            format!("macd_fast ({}) must be less than macd_slow ({})", fast, slow),
        ));
    }
    Ok(())
}

fn validate_zoom(config: &dyn ConfigPort) -> Result<(), MarketError> {
    let zoom = config.get_double(INDICATOR_CHART, "zoom_start", 50.0);
    if !(0.0..100.0).contains(&zoom) {
        return Err(MarketError::config_invalid(
            INDICATOR_CHART,
            "zoom_start",
            "zoom_start must be in [0, 100)",
        ));
    }
    Ok(())
}

/// Read a positive integer key that fits a `u32`.
pub fn positive_u32(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u32,
) -> Result<u32, MarketError> {
    let value = config.get_int(section, key, i64::from(default));
    if value < 1 {
        return Err(MarketError::config_invalid(
            section,
            key,
            format!("{} must be at least 1", key),
        ));
    }
    u32::try_from(value).map_err(|_| {
        MarketError::config_invalid(
            section,
            key,
            format!("{} must be at most {}", key, u32::MAX),
        )
    })
}

/// Same bounds as `positive_u32`, widened for lengths and window sizes.
pub fn positive_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, MarketError> {
    let default = u32::try_from(default).unwrap_or(u32::MAX);
    let value = positive_u32(config, section, key, default)?;
    usize::try_from(value).map_err(|_| {
        MarketError::config_invalid(section, key, format!("{} does not fit usize", key))
    })
}

fn validate_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), MarketError> {
    match config.get_string(section, key) {
        Some(s) if s.trim().is_empty() => Err(MarketError::config_invalid(
            section,
            key,
            format!("{} must not be empty", key),
        )),
        _ => Ok(()),
    }
}
