//! Trading objectives — per-timeframe status, score, and price levels.
//!
//! An objective is a pure function's output: the same `(current_price,
//! history)` input always produces the same set. Two solver generations exist
//! behind the `ObjectiveSolver` trait — a multi-factor scored model
//! (`ScoredSolver`) and a support/resistance selection model
//! (`SupportLevelSolver`) — selected by configuration, never by call site.

pub mod scored;
pub mod support;

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

pub use scored::ScoredSolver;
pub use support::SupportLevelSolver;

/// Trading horizon for one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Short,
    Mid,
    Long,
}

/// Actionability of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveStatus {
    Active,
    Wait,
    Avoid,
}

/// Which playbook the objective recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyTag {
    NoTrade,
    PullbackTrend,
    Breakout,
    MeanReversion,
}

/// Qualitative context flags attached to an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceFlag {
    UptrendConfirmed,
    BrokenTrend,
    TrendWeak,
    Overbought,
    Oversold,
    HighVolatility,
    LowConfidence,
}

/// One timeframe's trading objective.
///
/// `entry`/`stop`/`target` are populated only when `status` is `Active`;
/// a WAIT or AVOID recommendation never carries levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub status: ObjectiveStatus,
    pub score: u8,
    pub strategy: StrategyTag,
    #[serde(rename = "confidenceFlags")]
    pub flags: Vec<ConfidenceFlag>,
    pub reason: String,
    pub entry: Option<f64>,
    pub stop: Option<f64>,
    pub target: Option<f64>,
}

impl Objective {
    /// Low-confidence WAIT placeholder for listings with a short history
    /// (20..120 bars). Structurally valid so downstream aggregation never
    /// breaks on a fresh IPO.
    pub fn degraded(bars: usize) -> Self {
        Self {
            status: ObjectiveStatus::Wait,
            score: 50,
            strategy: StrategyTag::NoTrade,
            flags: vec![ConfidenceFlag::LowConfidence],
            reason: format!(
                "Holding zone (50). Only {bars} bars of history; waiting for a fuller picture."
            ),
            entry: None,
            stop: None,
            target: None,
        }
    }
}

/// The solver's full product: one objective per timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSet {
    pub short: Objective,
    pub mid: Objective,
    pub long: Objective,
}

impl ObjectiveSet {
    pub fn get(&self, timeframe: Timeframe) -> &Objective {
        match timeframe {
            Timeframe::Short => &self.short,
            Timeframe::Mid => &self.mid,
            Timeframe::Long => &self.long,
        }
    }

    /// True when every timeframe landed on AVOID.
    pub fn all_avoid(&self) -> bool {
        [&self.short, &self.mid, &self.long]
            .iter()
            .all(|o| o.status == ObjectiveStatus::Avoid)
    }
}

/// Outcome of a solve: either a full set or the insufficient-data sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveOutcome {
    Ready(ObjectiveSet),
    InsufficientData { bars: usize },
}

impl ObjectiveOutcome {
    pub fn as_ready(&self) -> Option<&ObjectiveSet> {
        match self {
            Self::Ready(set) => Some(set),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Trait for objective solvers.
///
/// Implementations must be deterministic: identical `(current_price,
/// history)` inputs yield identical outputs. History is newest-first.
pub trait ObjectiveSolver: Send + Sync {
    /// Human-readable name (e.g., "scored", "support_level").
    fn name(&self) -> &str;

    /// Minimum bars for a full-confidence solve.
    fn full_history_bars(&self) -> usize;

    fn solve(&self, current_price: f64, history: &[PriceBar]) -> ObjectiveOutcome;
}

/// History floor shared by both solver generations: the 120-bar minimum of
/// the v3 analyzer. Histories in [DEGRADED_HISTORY_BARS, FULL_HISTORY_BARS)
/// produce a low-confidence WAIT set instead of failing.
pub const FULL_HISTORY_BARS: usize = 120;
pub const DEGRADED_HISTORY_BARS: usize = 20;

/// Resolve the shared short-history policy. Returns `Some(outcome)` when the
/// history is too short for a real solve.
pub(crate) fn short_history_outcome(history: &[PriceBar], full: usize) -> Option<ObjectiveOutcome> {
    let n = history.len();
    if n < DEGRADED_HISTORY_BARS {
        return Some(ObjectiveOutcome::InsufficientData { bars: n });
    }
    if n < full {
        let degraded = Objective::degraded(n);
        return Some(ObjectiveOutcome::Ready(ObjectiveSet {
            short: degraded.clone(),
            mid: degraded.clone(),
            long: degraded,
        }));
    }
    None
}

/// Round a price level to the nearest 10 KRW (exchange tick convention of
/// the original analyzer's output).
pub(crate) fn round_to_ten(value: f64) -> f64 {
    (value / 10.0).round() * 10.0
}
