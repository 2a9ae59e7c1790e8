//! Synthetic universe generator for demos, benches, and smoke tests.
//!
//! Seeded RNG → fully deterministic store: the same seed always produces the
//! same universe, so demo runs and benches are reproducible.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Market, PriceBar, SupplyBar, Ticker};

use super::MemoryStore;

/// Build a synthetic KRX-like universe: random-walk prices, plausible
/// fundamentals, and noisy investor flows.
pub fn synthetic_universe(seed: u64, n_tickers: usize, n_days: usize) -> MemoryStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = MemoryStore::new();
    let end = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

    for t in 0..n_tickers {
        let code = format!("{:06}", 100_000 + t);
        let market = if t % 3 == 0 {
            Market::Kosdaq
        } else {
            Market::Kospi
        };
        store.insert_ticker(Ticker {
            code: code.clone(),
            name: format!("Synthetic {t}"),
            market,
            is_active: true,
        });

        // Log-spaced market caps: a few giants, a long tail.
        let market_cap = 1.0e11 * 10f64.powf(rng.gen_range(0.0..2.5));
        let mut close = rng.gen_range(5_000.0..200_000.0_f64);
        let drift = rng.gen_range(-0.001..0.002);
        let shares = market_cap / close;

        let roe = rng.gen_range(-5.0..25.0_f64);
        let per = rng.gen_range(2.0..60.0_f64);
        let pbr = rng.gen_range(0.2..4.0_f64);
        let op_margin = rng.gen_range(-10.0..30.0_f64);
        let eps = close / per;

        let mut prices = Vec::with_capacity(n_days);
        let mut supply = Vec::with_capacity(n_days);
        for d in 0..n_days {
            let date = end - chrono::Duration::days(d as i64);
            let step: f64 = rng.gen_range(-0.025..0.025) + drift;
            let open = close * (1.0 + rng.gen_range(-0.01..0.01));
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.015));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.015));
            let volume = rng.gen_range(50_000..5_000_000);
            prices.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
                trading_value: close * volume as f64,
                market_cap: shares * close,
                per: Some(per),
                pbr: Some(pbr),
                eps: Some(eps),
                bps: Some(close / pbr),
                dividend_yield: Some(rng.gen_range(0.0..5.0)),
                roe: Some(roe),
                operating_margin: Some(op_margin),
                revenue: Some(market_cap * 0.5),
                net_income: Some(market_cap * roe / 100.0),
            });
            let flow_scale = market_cap * 1.0e-4;
            supply.push(SupplyBar {
                date,
                individual_net: rng.gen_range(-1.0..1.0) * flow_scale,
                foreigner_net: rng.gen_range(-1.0..1.5) * flow_scale,
                institution_net: rng.gen_range(-1.0..1.2) * flow_scale,
                pension_net: rng.gen_range(-0.3..0.3) * flow_scale,
            });
            // Walk backwards in time.
            close /= 1.0 + step;
        }
        store.insert_prices(code.clone(), prices);
        store.insert_supply(code, supply);
    }
    store
}
