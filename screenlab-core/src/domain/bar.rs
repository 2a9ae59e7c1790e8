//! PriceBar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single ticker, carrying the fundamental columns the
/// KRX daily file ships alongside prices.
///
/// Histories are ordered **newest-first** throughout the engine: index 0 is
/// the most recent trading day. Fundamental columns are optional because the
/// financial batch lags the price batch by up to a quarter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Total traded value for the day (KRW).
    pub trading_value: f64,
    /// Market capitalization at the close (KRW).
    pub market_cap: f64,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub eps: Option<f64>,
    pub bps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub roe: Option<f64>,
    pub operating_margin: Option<f64>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
}

impl PriceBar {
    /// Basic OHLC sanity check: high >= max(open, close, low),
    /// low <= min(open, close, high), positive open/close.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Candle body size (signed: positive on an up day).
    pub fn body(&self) -> f64 {
        self.close - self.open
    }

    /// Upper wick: distance from the close to the high on an up day.
    pub fn upper_wick(&self) -> f64 {
        self.high - self.close
    }
}
