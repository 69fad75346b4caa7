//! Exponential moving averages over raw value slices.
//!
//! Two forms are used:
//! - recursive ("adjust=false"): `ema[t] = x[t]*a + ema[t-1]*(1-a)`, `a = 2/(span+1)`,
//!   seeded with the first observation, valid from the first value;
//! - weighted ("adjust=true"): `sum((1-a)^i * x[t-i]) / sum((1-a)^i)`, valid once
//!   `min_periods` observations have been seen.

/// Recursive EMA with smoothing factor `2/(span+1)`.
///
/// Returns an empty vector for `span == 0`.
pub fn ema_recursive(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }

    out
}

/// Bias-adjusted exponentially weighted mean with smoothing factor `alpha`.
///
/// `None` marks positions with fewer than `min_periods` observations
/// (`min_periods` of 0 behaves as 1).
pub fn ewm_mean(values: &[f64], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let decay = 1.0 - alpha;
    let min_periods = min_periods.max(1);
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            weighted_sum = weighted_sum * decay + value;
            weight_total = weight_total * decay + 1.0;
            if i + 1 >= min_periods {
                Some(weighted_sum / weight_total)
            } else {
                None
            }
        })
        .collect()
}
