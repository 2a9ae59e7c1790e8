//! Average True Range (ATR).
//!
//! Mean true range of the `period` most recent bars. The true range of bar i
//! uses the previous (older) close: TR = max(high - low, |high - prev_close|,
//! |low - prev_close|). Requires `period + 1` bars, else `None`.

use crate::domain::PriceBar;

/// ATR over a newest-first history.
pub fn atr(bars: &[PriceBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }
    let mut tr_sum = 0.0;
    for i in 0..period {
        let high = bars[i].high;
        let low = bars[i].low;
        let prev_close = bars[i + 1].close;
        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());
        tr_sum += tr;
    }
    Some(tr_sum / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn atr_constant_closes() {
        // make_bars gives each bar high = close + 1, low = close - 1 on a
        // flat series, so TR = 2.0 for every bar.
        let bars = make_bars(&[100.0; 20]);
        assert_approx(atr(&bars, 14).unwrap(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_requires_period_plus_one() {
        let bars = make_bars(&[100.0; 14]);
        assert!(atr(&bars, 14).is_none());
        let bars = make_bars(&[100.0; 15]);
        assert!(atr(&bars, 14).is_some());
    }

    #[test]
    fn atr_gap_uses_prev_close() {
        // Two bars, newest first. Older close = 100; newest bar gapped up:
        // high 121, low 118 → TR = max(3, |121-100|, |118-100|) = 21.
        let mut bars = make_bars(&[120.0, 100.0]);
        bars[0].high = 121.0;
        bars[0].low = 118.0;
        assert_approx(atr(&bars, 1).unwrap(), 21.0, DEFAULT_EPSILON);
    }
}
