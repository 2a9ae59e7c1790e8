//! Relative Strength Index (RSI).
//!
//! Simple average-gain / average-loss ratio over the `period` most recent
//! deltas (the original analyzer's non-smoothed formulation, not Wilder
//! recursion). Edge cases: no movement at all → neutral 50; avg loss == 0
//! with gains → 100; history shorter than period + 1 → neutral 50 rather
//! than an error.

use crate::domain::PriceBar;

/// RSI over a newest-first history. Always returns a value in [0, 100].
pub fn rsi(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return 50.0;
    }
    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 0..period {
        let delta = bars[i].close - bars[i + 1].close;
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }
    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 && avg_gain == 0.0 {
        return 50.0; // no movement
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
