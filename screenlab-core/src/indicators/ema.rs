//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the oldest `period` closes, then iterated forward
//! in time (oldest → newest) with smoothing factor k = 2 / (period + 1).
//! Returns `None` when history is shorter than `period`.

use crate::domain::PriceBar;

/// EMA over a newest-first history; the returned value is the EMA at the most
/// recent bar.
pub fn ema(bars: &[PriceBar], period: usize) -> Option<f64> {
    let n = bars.len();
    if period == 0 || n < period {
        return None;
    }

    // Seed: SMA of the oldest `period` closes (tail of the newest-first slice).
    let seed_sum: f64 = bars[n - period..].iter().map(|b| b.close).sum();
    let mut value = seed_sum / period as f64;

    let k = 2.0 / (period as f64 + 1.0);
    // Walk forward in time over the remaining bars: oldest of them last in
    // the slice, so iterate indices n-period-1 down to 0.
    for bar in bars[..n - period].iter().rev() {
        value = bar.close * k + value * (1.0 - k);
    }
    Some(value)
}
