//! Screening engine — runs the strategies for a date and merges the results.
//!
//! Per run: resolve the target date, compute the dynamic market-cap floor,
//! precompute technical statuses for the whole snapshot (per-ticker solves
//! are independent, so they fan out across cores), run the four filters in
//! declaration order, then the confluence ranker strictly afterwards.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ScreenConfig, StrategyId};
use crate::data::MarketStore;
use crate::domain::PriceBar;
use crate::objective::{ObjectiveOutcome, ObjectiveSolver};

use super::confluence::{self, ConfluenceEntry};
use super::threshold::dynamic_mcap_floor;
use super::{strategy_filters, CandidateRecord, FilterContext, FilterCounts, ScreenError, TechnicalStatus};

/// Everything a screening run produced, ready for the publishing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub date: NaiveDate,
    /// Identity of the configuration that produced this outcome.
    pub config_hash: String,
    pub mcap_floor: f64,
    pub universe_size: usize,
    pub per_strategy: BTreeMap<StrategyId, Vec<CandidateRecord>>,
    pub confluence: Vec<ConfluenceEntry>,
    /// Diagnostic reject counters; logged, not published.
    pub filter_counts: BTreeMap<StrategyId, FilterCounts>,
}

/// The screening entry point: a store, a config, and the configured solver.
pub struct Screener<'a> {
    store: &'a dyn MarketStore,
    config: ScreenConfig,
    solver: Box<dyn ObjectiveSolver>,
}

impl<'a> Screener<'a> {
    /// Build a screener, validating that every required strategy has a meta
    /// entry. Missing meta is fatal in debug builds and a logged degraded
    /// mode in release builds.
    pub fn new(store: &'a dyn MarketStore, config: ScreenConfig) -> Result<Self, ScreenError> {
        for id in StrategyId::ALL {
            if config.meta(id).is_none() {
                if cfg!(debug_assertions) {
                    return Err(ScreenError::ConfigurationMismatch { strategy: id });
                }
                tracing::warn!(strategy = %id, "strategy missing from configuration meta; it will not run");
            }
        }
        let solver = config.solver.build(config.full_history_bars);
        Ok(Self {
            store,
            config,
            solver,
        })
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Per-ticker objective computation with the configured solver. Used by
    /// the report assembler and exposed for single-ticker inspection.
    pub fn objectives(&self, current_price: f64, history: &[PriceBar]) -> ObjectiveOutcome {
        self.solver.solve(current_price, history)
    }

    /// Technical gate verdict for one ticker: the configured timeframe's
    /// status over the trailing lookback, `Unknown` below the full-history
    /// floor.
    pub fn technical_status(&self, code: &str) -> TechnicalStatus {
        let history = self
            .store
            .price_history(code, self.config.status_lookback_bars);
        if history.len() < self.config.full_history_bars {
            return TechnicalStatus::Unknown;
        }
        match self.solver.solve(history[0].close, &history) {
            ObjectiveOutcome::Ready(set) => set.get(self.config.gate_timeframe).status.into(),
            ObjectiveOutcome::InsufficientData { .. } => TechnicalStatus::Unknown,
        }
    }

    /// Run the full screening pass for `target_date` (default: the latest
    /// price date in the store).
    pub fn screen(&self, target_date: Option<NaiveDate>) -> Result<ScreeningOutcome, ScreenError> {
        let date = target_date
            .or_else(|| self.store.latest_price_date())
            .ok_or(ScreenError::EmptyStore)?;

        let snapshot = self.store.snapshot(date);
        if snapshot.is_empty() {
            return Err(ScreenError::MissingUniverseData { date });
        }

        let caps = snapshot.positive_market_caps();
        let universe_size = caps.len();
        let mcap_floor = dynamic_mcap_floor(caps, self.config.static_mcap_floor);
        tracing::info!(
            %date,
            universe = universe_size,
            floor = mcap_floor,
            "screening universe"
        );

        // One solve per ticker per run, fanned out across cores.
        let tech: BTreeMap<String, TechnicalStatus> = snapshot
            .rows
            .par_iter()
            .map(|row| (row.code.clone(), self.technical_status(&row.code)))
            .collect();

        let ctx = FilterContext {
            store: self.store,
            config: &self.config,
            floor: mcap_floor,
            tech: &tech,
        };

        let mut per_strategy = BTreeMap::new();
        let mut filter_counts = BTreeMap::new();
        for (id, filter) in strategy_filters() {
            if self.config.meta(id).is_none() {
                // Degraded mode: absence was already warned at construction.
                continue;
            }
            let mut counts = FilterCounts::default();
            let candidates = filter(&snapshot, &ctx, &mut counts);
            tracing::info!(
                strategy = %id,
                picked = candidates.len(),
                mcap = counts.mcap,
                net_income = counts.net_income,
                technical = counts.technical,
                other = counts.other,
                "strategy filtered"
            );
            if candidates.is_empty() {
                tracing::info!(strategy = %id, "no qualified candidates");
            }
            per_strategy.insert(id, candidates);
            filter_counts.insert(id, counts);
        }

        let confluence = confluence::rank(&per_strategy, &self.config);

        Ok(ScreeningOutcome {
            date,
            config_hash: self.config.config_hash(),
            mcap_floor,
            universe_size,
            per_strategy,
            confluence,
            filter_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{synthetic_universe, MemoryStore};

    #[test]
    fn empty_store_is_an_error() {
        let store = MemoryStore::new();
        let screener = Screener::new(&store, ScreenConfig::default()).unwrap();
        assert!(matches!(screener.screen(None), Err(ScreenError::EmptyStore)));
    }

    #[test]
    fn missing_date_is_a_skip_not_a_crash() {
        let store = synthetic_universe(11, 4, 150);
        let screener = Screener::new(&store, ScreenConfig::default()).unwrap();
        let holiday = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let err = screener.screen(Some(holiday)).unwrap_err();
        assert!(matches!(err, ScreenError::MissingUniverseData { date } if date == holiday));
    }

    #[test]
    fn missing_strategy_meta_fails_fast_in_debug() {
        let store = MemoryStore::new();
        let mut config = ScreenConfig::default();
        config.strategies.retain(|m| m.id != StrategyId::TrendFollowing);
        let result = Screener::new(&store, config);
        if cfg!(debug_assertions) {
            assert!(matches!(
                result,
                Err(ScreenError::ConfigurationMismatch {
                    strategy: StrategyId::TrendFollowing
                })
            ));
        } else {
            assert!(result.is_ok());
        }
    }

    #[test]
    fn technical_status_unknown_below_history_floor() {
        let store = synthetic_universe(5, 2, 60);
        let screener = Screener::new(&store, ScreenConfig::default()).unwrap();
        assert_eq!(screener.technical_status("100000"), TechnicalStatus::Unknown);
        assert_eq!(screener.technical_status("999999"), TechnicalStatus::Unknown);
    }

    #[test]
    fn screen_is_deterministic_for_a_seeded_universe() {
        let store = synthetic_universe(42, 12, 150);
        let screener = Screener::new(&store, ScreenConfig::default()).unwrap();
        let a = screener.screen(None).unwrap();
        let b = screener.screen(None).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.config_hash, screener.config().config_hash());
    }
}
