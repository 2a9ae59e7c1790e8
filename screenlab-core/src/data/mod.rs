//! Data access — store trait, in-memory store, CSV ingest, synthetic data.
//!
//! The `MarketStore` trait abstracts over how histories and snapshots are
//! materialized so the engine can run against production exports, fixture
//! vectors in tests, or a synthetic universe. Acquisition itself (how rows
//! got into a CSV export) is out of scope.

pub mod csv_store;
pub mod memory;
pub mod synthetic;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{PriceBar, SupplyBar, Ticker, UniverseSnapshot};

pub use memory::MemoryStore;
pub use synthetic::synthetic_universe;

/// Structured error types for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing data file: {path}")]
    MissingFile { path: String },

    #[error("bad date '{value}' in {path}")]
    BadDate { path: String, value: String },
}

/// Read-only access to per-ticker histories and per-date cross sections.
///
/// Histories are returned **newest-first**; snapshots contain active tickers
/// only. Implementations must be cheap to query repeatedly — the engine
/// looks histories up per candidate, memoizing only within a single run.
pub trait MarketStore: Send + Sync {
    /// All known tickers, active or not.
    fn tickers(&self) -> Vec<Ticker>;

    /// Most recent date with any price row.
    fn latest_price_date(&self) -> Option<NaiveDate>;

    /// Most recent date with any supply row.
    fn latest_supply_date(&self) -> Option<NaiveDate>;

    /// Up to `limit` most recent price bars for a ticker, newest-first.
    fn price_history(&self, code: &str, limit: usize) -> Vec<PriceBar>;

    /// Up to `limit` most recent supply bars for a ticker, newest-first.
    fn supply_history(&self, code: &str, limit: usize) -> Vec<SupplyBar>;

    /// Cross-section of all active tickers holding a price bar on `date`.
    fn snapshot(&self, date: NaiveDate) -> UniverseSnapshot;
}
