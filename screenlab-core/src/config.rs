//! Screening configuration — an explicit, immutable value passed into the
//! engine, never module-level state.
//!
//! `ScreenConfig::default()` reproduces the production v5 parameter set.
//! Configs round-trip through TOML and hash to a deterministic run identity
//! so a published outcome can always be traced back to its exact settings.

use serde::{Deserialize, Serialize};

use crate::objective::{
    ObjectiveSolver, ScoredSolver, SupportLevelSolver, Timeframe, FULL_HISTORY_BARS,
};

/// The four screening strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyId {
    #[serde(rename = "Value_Picks")]
    ValuePicks,
    #[serde(rename = "Twin_Engines")]
    TwinEngines,
    #[serde(rename = "Foreigner_Accumulation")]
    ForeignerAccumulation,
    #[serde(rename = "Trend_Following")]
    TrendFollowing,
}

impl StrategyId {
    pub const ALL: [StrategyId; 4] = [
        StrategyId::ValuePicks,
        StrategyId::TwinEngines,
        StrategyId::ForeignerAccumulation,
        StrategyId::TrendFollowing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::ValuePicks => "Value_Picks",
            StrategyId::TwinEngines => "Twin_Engines",
            StrategyId::ForeignerAccumulation => "Foreigner_Accumulation",
            StrategyId::TrendFollowing => "Trend_Following",
        }
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conceptual signal group a strategy belongs to. Confluence weighs distinct
/// groups, not raw appearance counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyGroup {
    Fundamental,
    Flow,
    Price,
}

/// Static per-strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMeta {
    pub id: StrategyId,
    pub group: StrategyGroup,
    /// Per-strategy market-cap floor overriding the dynamic global floor.
    pub mcap_override: Option<f64>,
    pub version: String,
}

/// Which objective solver generation drives technical status and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    Scored,
    SupportLevel,
}

impl SolverKind {
    /// Build the configured solver.
    pub fn build(self, full_history_bars: usize) -> Box<dyn ObjectiveSolver> {
        match self {
            SolverKind::Scored => Box::new(ScoredSolver::new(full_history_bars)),
            SolverKind::SupportLevel => Box::new(SupportLevelSolver::new(full_history_bars)),
        }
    }
}

/// Upper-wick rejection rule for the trend-breakout strategy. The two
/// generations disagreed; the strict rule is the production default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WickRule {
    /// Reject when the upper wick is as large as the body (wick < body passes).
    StrictBody,
    /// Reject only when the upper wick exceeds twice the body.
    LenientTwiceBody,
}

impl WickRule {
    pub fn passes(self, body: f64, upper_wick: f64) -> bool {
        match self {
            WickRule::StrictBody => upper_wick < body,
            WickRule::LenientTwiceBody => upper_wick <= 2.0 * body,
        }
    }
}

/// Confluence weight per signal group. All 1.0 in production: one vote per
/// distinct group, however many strategies inside it agree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupWeights {
    pub fundamental: f64,
    pub flow: f64,
    pub price: f64,
}

impl Default for GroupWeights {
    fn default() -> Self {
        Self {
            fundamental: 1.0,
            flow: 1.0,
            price: 1.0,
        }
    }
}

impl GroupWeights {
    pub fn get(&self, group: StrategyGroup) -> f64 {
        match group {
            StrategyGroup::Fundamental => self.fundamental,
            StrategyGroup::Flow => self.flow,
            StrategyGroup::Price => self.price,
        }
    }
}

/// Static market-cap floor: 300B KRW.
pub const STATIC_MCAP_FLOOR: f64 = 3.0e11;

/// Complete, immutable screening configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub strategies: Vec<StrategyMeta>,
    /// Confluence weight per group (defaults to 1.0 each).
    pub group_weights: GroupWeights,
    pub solver: SolverKind,
    pub wick_rule: WickRule,
    /// Which timeframe's objective status gates candidate exclusion.
    pub gate_timeframe: Timeframe,
    pub static_mcap_floor: f64,
    /// Candidates kept per strategy after sorting.
    pub strategy_cap: usize,
    /// Entries kept in the final confluence list.
    pub confluence_top: usize,
    /// Bars fetched per ticker for technical-status solves.
    pub status_lookback_bars: usize,
    /// Minimum bars for a full-confidence objective.
    pub full_history_bars: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        let strategies = vec![
            StrategyMeta {
                id: StrategyId::ValuePicks,
                group: StrategyGroup::Fundamental,
                mcap_override: None,
                version: "v5.0".into(),
            },
            StrategyMeta {
                id: StrategyId::TwinEngines,
                group: StrategyGroup::Flow,
                mcap_override: Some(STATIC_MCAP_FLOOR),
                version: "v5.0".into(),
            },
            StrategyMeta {
                id: StrategyId::ForeignerAccumulation,
                group: StrategyGroup::Flow,
                mcap_override: None,
                version: "v5.0".into(),
            },
            StrategyMeta {
                id: StrategyId::TrendFollowing,
                group: StrategyGroup::Price,
                mcap_override: None,
                version: "v5.0".into(),
            },
        ];
        Self {
            strategies,
            group_weights: GroupWeights::default(),
            solver: SolverKind::Scored,
            wick_rule: WickRule::StrictBody,
            gate_timeframe: Timeframe::Mid,
            static_mcap_floor: STATIC_MCAP_FLOOR,
            strategy_cap: 15,
            confluence_top: 5,
            status_lookback_bars: 150,
            full_history_bars: FULL_HISTORY_BARS,
        }
    }
}

impl ScreenConfig {
    /// Look up the meta entry for a strategy, if configured.
    pub fn meta(&self, id: StrategyId) -> Option<&StrategyMeta> {
        self.strategies.iter().find(|m| m.id == id)
    }

    /// Confluence weight for a group.
    pub fn group_weight(&self, group: StrategyGroup) -> f64 {
        self.group_weights.get(group)
    }

    /// Deterministic identity of this configuration, stamped into every
    /// screening outcome for reproducibility.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("ScreenConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Parse a config from TOML.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
