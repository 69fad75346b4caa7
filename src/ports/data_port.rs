//! Market data retrieval port trait.

use crate::domain::error::MarketError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Which bars to retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// The most recent `n` daily bars.
    Latest(usize),
    /// Every daily bar with `start <= date <= end`.
    Range { start: NaiveDate, end: NaiveDate },
}

pub trait DataPort {
    /// Fetch daily bars for `symbol`. Order is whatever the provider returns;
    /// callers sort before using the series.
    fn fetch_ohlcv(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<OhlcvBar>, MarketError>;
}
