//! Shared fixtures for strategy filter tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::ScreenConfig;
use crate::data::MemoryStore;
use crate::domain::{PriceBar, SnapshotRow, SupplyBar, UniverseSnapshot};

use super::{FilterContext, TechnicalStatus};

pub fn snapshot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
}

/// Bare price bar with the given close and market cap; fundamentals unset.
pub fn base_bar(close: f64, market_cap: f64) -> PriceBar {
    PriceBar {
        date: snapshot_date(),
        open: close,
        high: close + close * 0.01,
        low: close - close * 0.01,
        close,
        volume: 1_000_000,
        trading_value: close * 1.0e6,
        market_cap,
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
}

/// Snapshot row shaped for the value strategy's gates.
pub fn value_row(
    code: &str,
    market_cap: f64,
    eps: f64,
    per: f64,
    pbr: f64,
    roe: f64,
    operating_margin: f64,
) -> SnapshotRow {
    let mut bar = base_bar(50_000.0, market_cap);
    bar.eps = Some(eps);
    bar.per = Some(per);
    bar.pbr = Some(pbr);
    bar.roe = Some(roe);
    bar.operating_margin = Some(operating_margin);
    SnapshotRow {
        code: code.into(),
        bar,
        supply: None,
    }
}

/// Snapshot row with a same-date supply bar, for the flow strategies.
pub fn flow_row(
    code: &str,
    market_cap: f64,
    foreigner_net: f64,
    institution_net: f64,
) -> SnapshotRow {
    SnapshotRow {
        code: code.into(),
        bar: base_bar(50_000.0, market_cap),
        supply: Some(SupplyBar {
            date: snapshot_date(),
            individual_net: 0.0,
            foreigner_net,
            institution_net,
            pension_net: 0.0,
        }),
    }
}

/// Snapshot row with explicit candle geometry, for the trend strategy.
pub fn candle_row(
    code: &str,
    market_cap: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
) -> SnapshotRow {
    let mut bar = base_bar(close, market_cap);
    bar.open = open;
    bar.high = high;
    bar.low = low;
    bar.volume = volume;
    SnapshotRow {
        code: code.into(),
        bar,
        supply: None,
    }
}

pub fn snapshot_of(rows: Vec<SnapshotRow>) -> UniverseSnapshot {
    UniverseSnapshot {
        date: snapshot_date(),
        rows,
    }
}

/// Owns everything a `FilterContext` borrows.
pub struct ContextFixture {
    pub store: MemoryStore,
    pub config: ScreenConfig,
    pub floor: f64,
    pub tech: BTreeMap<String, TechnicalStatus>,
}

impl ContextFixture {
    pub fn with_floor(floor: f64) -> Self {
        Self {
            store: MemoryStore::new(),
            config: ScreenConfig::default(),
            floor,
            tech: BTreeMap::new(),
        }
    }

    pub fn set_tech(&mut self, code: &str, status: TechnicalStatus) {
        self.tech.insert(code.to_string(), status);
    }

    /// Seed a ticker's price history: `n` flat bars ending at the snapshot
    /// date, all at `close` with the given daily volume.
    pub fn seed_flat_history(&mut self, code: &str, n: usize, close: f64, volume: u64) {
        let bars: Vec<PriceBar> = (0..n)
            .map(|d| {
                let mut bar = base_bar(close, 5.0e11);
                bar.date = snapshot_date() - chrono::Duration::days(d as i64);
                bar.volume = volume;
                bar
            })
            .collect();
        self.store.insert_prices(code, bars);
    }

    /// Seed a ticker's supply history: `n` days of constant foreigner net.
    pub fn seed_supply(&mut self, code: &str, n: usize, foreigner_net: f64) {
        let bars: Vec<SupplyBar> = (0..n)
            .map(|d| SupplyBar {
                date: snapshot_date() - chrono::Duration::days(d as i64),
                individual_net: 0.0,
                foreigner_net,
                institution_net: 0.0,
                pension_net: 0.0,
            })
            .collect();
        self.store.insert_supply(code, bars);
    }

    pub fn context(&self) -> FilterContext<'_> {
        FilterContext {
            store: &self.store,
            config: &self.config,
            floor: self.floor,
            tech: &self.tech,
        }
    }
}
