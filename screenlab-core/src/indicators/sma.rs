//! Simple Moving Average (SMA).
//!
//! Mean of the `period` most recent closes. Returns `None` when fewer than
//! `period` bars exist.

use crate::domain::PriceBar;

/// SMA of the `period` most recent closes in a newest-first history.
pub fn sma(bars: &[PriceBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    Some(sum / period as f64)
}
