//! Close-to-close volatility.
//!
//! Sample standard deviation (N - 1) of the percentage change between
//! consecutive closes, expressed in percent. Changes from a zero close are
//! skipped.

/// Returns `None` when fewer than two usable changes exist.
pub fn pct_change_volatility(closes: &[f64]) -> Option<f64> {
    let changes: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if changes.len() < 2 {
        return None;
    }

    let n = changes.len() as f64;
    let mean = changes.iter().sum::<f64>() / n;
    let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * 100.0)
}
