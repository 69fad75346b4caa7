//! Joins bars with their RSI/MACD values and drops rows still in warm-up.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::rsi::DEFAULT_WINDOW;
use crate::domain::indicator::{calculate_macd, calculate_rsi, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_window: DEFAULT_WINDOW,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorParams {
    /// Leading rows that can never be fully valid. The recursive MACD has no
    /// warm-up, so the RSI window decides.
    pub fn warmup_rows(&self) -> usize {
        self.rsi_window.saturating_sub(1)
    }

    /// Bars needed for at least one complete row.
    pub fn minimum_bars(&self) -> usize {
        self.warmup_rows() + 1
    }
}

/// One fully computed row, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the indicators over `bars` (date-ordered) and keep only rows where
/// every value is defined.
pub fn build_indicator_rows(bars: &[OhlcvBar], params: &IndicatorParams) -> Vec<IndicatorRow> {
    let rsi = calculate_rsi(bars, params.rsi_window);
    let macd = calculate_macd(
        bars,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    );
    debug!(
        bars = bars.len(),
        rsi_valid = rsi.valid_count(),
        macd_valid = macd.valid_count(),
        "indicator series computed"
    );

    bars.iter()
        .zip(rsi.values.iter().zip(macd.values.iter()))
        .filter_map(|(bar, (rsi_point, macd_point))| {
            if !rsi_point.valid || !macd_point.valid || !bar.close.is_finite() {
                return None;
            }
            let rsi = match rsi_point.value {
                IndicatorValue::Simple(v) => v,
                _ => return None,
            };
            let (line, signal, histogram) = match macd_point.value {
                IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                } => (line, signal, histogram),
                _ => return None,
            };
            Some(IndicatorRow {
                date: bar.date,
                close: bar.close,
                rsi,
                macd: line,
                signal,
                histogram,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn default_params() {
        let params = IndicatorParams::default();
        assert_eq!(params.rsi_window, 14);
        assert_eq!(params.macd_fast, 12);
        assert_eq!(params.macd_slow, 26);
        assert_eq!(params.macd_signal, 9);
        assert_eq!(params.warmup_rows(), 13);
        assert_eq!(params.minimum_bars(), 14);
    }

    #[test]
    fn drops_exactly_the_warmup_rows() {
        for len in [14usize, 20, 30, 100] {
            let prices: Vec<f64> = (0..len).map(|i| 100.0 + (i % 9) as f64).collect();
            let rows = build_indicator_rows(&make_bars(&prices), &IndicatorParams::default());
            assert_eq!(rows.len(), len - 13, "length {}", len);
        }
    }

    #[test]
    fn first_row_is_first_valid_bar() {
        let bars = make_bars(&(0..20).map(|i| 50.0 + i as f64).collect::<Vec<_>>());
        let rows = build_indicator_rows(&bars, &IndicatorParams::default());
        assert_eq!(rows[0].date, bars[13].date);
        assert_eq!(rows.last().unwrap().date, bars[19].date);
    }

    #[test]
    fn too_short_series_yields_nothing() {
        let bars = make_bars(&[1.0; 13]);
        assert!(build_indicator_rows(&bars, &IndicatorParams::default()).is_empty());
        assert!(build_indicator_rows(&[], &IndicatorParams::default()).is_empty());
    }

    #[test]
    fn rows_have_no_undefined_values() {
        let prices: Vec<f64> = (0..80)
            .map(|i| 200.0 + ((i * 13) % 17) as f64 - 8.0)
            .collect();
        let rows = build_indicator_rows(&make_bars(&prices), &IndicatorParams::default());
        for row in &rows {
            assert!(row.rsi.is_finite());
            assert!(row.macd.is_finite());
            assert!(row.signal.is_finite());
            assert!(row.histogram.is_finite());
        }
    }

    #[test]
    fn increasing_series_rsi_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 10.0 + i as f64 * 0.5).collect();
        let rows = build_indicator_rows(&make_bars(&prices), &IndicatorParams::default());
        assert_eq!(rows.len(), 17);
        for row in &rows {
            assert_relative_eq!(row.rsi, 100.0);
        }
    }

    #[test]
    fn custom_window_changes_warmup() {
        let params = IndicatorParams {
            rsi_window: 5,
            ..IndicatorParams::default()
        };
        let rows = build_indicator_rows(&make_bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0]), &params);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn zero_macd_period_yields_nothing() {
        let params = IndicatorParams {
            macd_signal: 0,
            ..IndicatorParams::default()
        };
        let rows = build_indicator_rows(&make_bars(&[1.0; 30]), &params);
        assert!(rows.is_empty());
    }
}
