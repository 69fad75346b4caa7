//! RSI (Relative Strength Index) indicator.
//!
//! change[0] = 0, change[i] = C[i] - C[i-1]
//! gain = max(change, 0), loss = max(-change, 0)
//! avg_gain/avg_loss: bias-adjusted EWM with alpha = 1/n (center of mass n-1)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first (n-1) bars are invalid (the averages need n observations).

use crate::domain::indicator::{
    ewm_mean, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    if window == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(window),
            values: bars
                .iter()
                .map(|b| IndicatorPoint {
                    date: b.date,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                })
                .collect(),
        };
    }

    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { bar.close - bars[i - 1].close };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let alpha = 1.0 / window as f64;
    let avg_gains = ewm_mean(&gains, alpha, window);
    let avg_losses = ewm_mean(&losses, alpha, window);

    let values = bars
        .iter()
        .zip(avg_gains.iter().zip(avg_losses.iter()))
        .map(|(bar, averages)| match averages {
            (Some(avg_gain), Some(avg_loss)) => {
                let rsi = relative_strength_index(*avg_gain, *avg_loss);
                IndicatorPoint {
                    date: bar.date,
                    valid: rsi.is_finite(),
                    value: IndicatorValue::Simple(rsi),
                }
            }
            _ => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(window),
        values,
    }
}

pub fn calculate_rsi_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_rsi(bars, DEFAULT_WINDOW)
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
