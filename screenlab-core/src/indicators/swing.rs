//! Swing high / swing low detection.
//!
//! A bar is a swing low (high) when its low (high) is strictly the minimum
//! (maximum) among the `window` bars on each side. Needs at least
//! 2 * window + 1 bars, else the empty vec. Results are returned
//! newest-first, matching the input ordering.

use crate::domain::PriceBar;

/// Swing lows (low prices) of a newest-first history, newest swing first.
pub fn swing_lows(bars: &[PriceBar], window: usize) -> Vec<f64> {
    swing_points(bars, window, |b| b.low, |candidate, other| candidate < other)
}

/// Swing highs (high prices) of a newest-first history, newest swing first.
pub fn swing_highs(bars: &[PriceBar], window: usize) -> Vec<f64> {
    swing_points(bars, window, |b| b.high, |candidate, other| candidate > other)
}

fn swing_points(
    bars: &[PriceBar],
    window: usize,
    value: impl Fn(&PriceBar) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<f64> {
    let n = bars.len();
    if window == 0 || n < 2 * window + 1 {
        return Vec::new();
    }
    let mut points = Vec::new();
    for i in window..n - window {
        let candidate = value(&bars[i]);
        let is_extreme = (i - window..=i + window)
            .filter(|&j| j != i)
            .all(|j| beats(candidate, value(&bars[j])));
        if is_extreme {
            points.push(candidate);
        }
    }
    points
}
