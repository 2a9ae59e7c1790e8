//! Indicator library — pure functions over a newest-first price history.
//!
//! Every function takes `&[PriceBar]` with index 0 as the most recent bar and
//! returns a scalar (or a small series for swing detection). Insufficient
//! history yields `None` (or the documented neutral default for RSI) rather
//! than an error: the objective solvers degrade gracefully on short listings.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod swing;

pub use atr::atr;
pub use ema::ema;
pub use rsi::rsi;
pub use sma::sma;
pub use swing::{swing_highs, swing_lows};

/// Create synthetic bars from close prices for testing.
///
/// Input closes are **newest-first**, matching the engine convention.
/// Generates plausible OHLC: open = next-older close (or close for the oldest
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes_newest_first: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let n = closes_newest_first.len();
    let base_date = chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
    closes_newest_first
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i + 1 < n {
                closes_newest_first[i + 1]
            } else {
                close
            };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            PriceBar {
                date: base_date - chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1_000,
                trading_value: close * 1_000.0,
                market_cap: 1.0e12,
                per: None,
                pbr: None,
                eps: None,
                bps: None,
                dividend_yield: None,
                roe: None,
                operating_margin: None,
                revenue: None,
                net_income: None,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
