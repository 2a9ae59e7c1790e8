//! Universe screening — four candidate strategies plus confluence ranking.
//!
//! Each strategy is a pure function over the day's snapshot and per-ticker
//! history lookups, behind one uniform signature and collected in a fixed
//! order — no trait hierarchy. The engine runs them for a date, then the
//! confluence ranker merges their ranked lists.

pub mod accumulation;
pub mod confluence;
pub mod engine;
pub mod threshold;
pub mod trend;
pub mod twin_engines;
pub mod value;

#[cfg(test)]
pub(crate) mod testutil;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ScreenConfig, StrategyId};
use crate::data::MarketStore;
use crate::domain::UniverseSnapshot;
use crate::objective::ObjectiveStatus;

pub use confluence::ConfluenceEntry;
pub use engine::{Screener, ScreeningOutcome};
pub use threshold::dynamic_mcap_floor;

/// Mid-run technical verdict for a candidate. `Unknown` covers tickers with
/// too little history for a real solve (recent IPOs stay screenable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechnicalStatus {
    Active,
    Wait,
    Avoid,
    Unknown,
}

impl From<ObjectiveStatus> for TechnicalStatus {
    fn from(status: ObjectiveStatus) -> Self {
        match status {
            ObjectiveStatus::Active => TechnicalStatus::Active,
            ObjectiveStatus::Wait => TechnicalStatus::Wait,
            ObjectiveStatus::Avoid => TechnicalStatus::Avoid,
        }
    }
}

/// Stable multi-field ordering: three floats compared lexicographically with
/// total ordering. Descending fields are negated at construction, matching
/// how each strategy documents its sort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortKey([f64; 3]);

impl SortKey {
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self([first, second, third])
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// One strategy's qualified candidate, with the metrics that earned its rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub code: String,
    pub sort_key: SortKey,
    pub metrics: BTreeMap<String, f64>,
    pub technical_status: TechnicalStatus,
}

/// Per-strategy, per-reason reject counters. A diagnostic side-channel for
/// the run log, not part of the published payload contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    pub mcap: u32,
    pub net_income: u32,
    pub technical: u32,
    pub other: u32,
}

/// Shared per-run context handed to every strategy filter.
pub struct FilterContext<'a> {
    pub store: &'a dyn MarketStore,
    pub config: &'a ScreenConfig,
    /// Global dynamic market-cap floor for this run.
    pub floor: f64,
    /// Technical statuses precomputed once per run for the whole snapshot.
    pub tech: &'a BTreeMap<String, TechnicalStatus>,
}

impl<'a> FilterContext<'a> {
    /// Effective market-cap floor for a strategy: its override, or the
    /// global dynamic floor.
    pub fn mcap_floor(&self, id: StrategyId) -> f64 {
        self.config
            .meta(id)
            .and_then(|m| m.mcap_override)
            .unwrap_or(self.floor)
    }

    pub fn tech_status(&self, code: &str) -> TechnicalStatus {
        self.tech
            .get(code)
            .copied()
            .unwrap_or(TechnicalStatus::Unknown)
    }
}

/// Uniform strategy filter signature.
pub type StrategyFilter =
    fn(&UniverseSnapshot, &FilterContext<'_>, &mut FilterCounts) -> Vec<CandidateRecord>;

/// The strategies in run order.
pub fn strategy_filters() -> [(StrategyId, StrategyFilter); 4] {
    [
        (StrategyId::ValuePicks, value::run as StrategyFilter),
        (StrategyId::TwinEngines, twin_engines::run as StrategyFilter),
        (
            StrategyId::ForeignerAccumulation,
            accumulation::run as StrategyFilter,
        ),
        (StrategyId::TrendFollowing, trend::run as StrategyFilter),
    ]
}

/// Errors from a screening run.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The store holds no price data at all.
    #[error("store holds no price data; nothing to screen")]
    EmptyStore,

    /// No snapshot rows for the requested date — the run is a documented
    /// no-op, not a failure of the pipeline.
    #[error("no universe data for {date}; screening run skipped")]
    MissingUniverseData { date: chrono::NaiveDate },

    /// A required strategy id is absent from the configuration table.
    #[error("strategy {strategy} missing from configuration meta")]
    ConfigurationMismatch { strategy: StrategyId },
}
