//! In-memory market store.
//!
//! Histories are normalized to newest-first at insert time so every query is
//! a prefix slice. Snapshot assembly joins price and supply rows by date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{PriceBar, SnapshotRow, SupplyBar, Ticker, UniverseSnapshot};

use super::MarketStore;

/// BTreeMap-backed store; the standard fixture for tests and the target of
/// the CSV loader.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tickers: BTreeMap<String, Ticker>,
    prices: BTreeMap<String, Vec<PriceBar>>,
    supply: BTreeMap<String, Vec<SupplyBar>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ticker(&mut self, ticker: Ticker) {
        self.tickers.insert(ticker.code.clone(), ticker);
    }

    /// Insert a ticker's price history in any order; stored newest-first.
    pub fn insert_prices(&mut self, code: impl Into<String>, mut bars: Vec<PriceBar>) {
        bars.sort_by(|a, b| b.date.cmp(&a.date));
        self.prices.insert(code.into(), bars);
    }

    /// Insert a ticker's supply history in any order; stored newest-first.
    pub fn insert_supply(&mut self, code: impl Into<String>, mut bars: Vec<SupplyBar>) {
        bars.sort_by(|a, b| b.date.cmp(&a.date));
        self.supply.insert(code.into(), bars);
    }
}

impl MarketStore for MemoryStore {
    fn tickers(&self) -> Vec<Ticker> {
        self.tickers.values().cloned().collect()
    }

    fn latest_price_date(&self) -> Option<NaiveDate> {
        self.prices
            .values()
            .filter_map(|bars| bars.first().map(|b| b.date))
            .max()
    }

    fn latest_supply_date(&self) -> Option<NaiveDate> {
        self.supply
            .values()
            .filter_map(|bars| bars.first().map(|b| b.date))
            .max()
    }

    fn price_history(&self, code: &str, limit: usize) -> Vec<PriceBar> {
        self.prices
            .get(code)
            .map(|bars| bars.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    fn supply_history(&self, code: &str, limit: usize) -> Vec<SupplyBar> {
        self.supply
            .get(code)
            .map(|bars| bars.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    fn snapshot(&self, date: NaiveDate) -> UniverseSnapshot {
        let mut rows = Vec::new();
        for (code, ticker) in &self.tickers {
            if !ticker.is_active {
                continue;
            }
            let Some(bar) = self
                .prices
                .get(code)
                .and_then(|bars| bars.iter().find(|b| b.date == date))
            else {
                continue;
            };
            let supply = self
                .supply
                .get(code)
                .and_then(|bars| bars.iter().find(|s| s.date == date))
                .cloned();
            rows.push(SnapshotRow {
                code: code.clone(),
                bar: bar.clone(),
                supply,
            });
        }
        UniverseSnapshot { date, rows }
    }
}
