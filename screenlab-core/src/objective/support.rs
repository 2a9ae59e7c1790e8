//! Support-level solver — support/resistance selection model.
//!
//! Instead of a factor score, this generation picks the nearest support
//! shelf below price from a candidate set (fast EMAs, the previous bar's
//! low, the 10-bar low, recent swing lows) and grades the setup by trend
//! direction and the size of the gap down to that shelf. Profit targets come
//! from swing-high resistance with a separation rule; a close below every
//! candidate support is the panic-drop case and is graded by the nearest
//! recovery level instead.
//!
//! RSI extremes short-circuit before any geometry: above 75 the answer is
//! always "let it cool off", below 25 it is a mean-reversion avoid.

use crate::domain::PriceBar;
use crate::indicators::{ema, rsi, sma, swing_highs, swing_lows};

use super::{
    round_to_ten, short_history_outcome, ConfidenceFlag, Objective, ObjectiveOutcome,
    ObjectiveSet, ObjectiveSolver, ObjectiveStatus, StrategyTag, Timeframe, FULL_HISTORY_BARS,
};

/// Swing detection window for support/resistance candidates.
const SWING_WINDOW: usize = 3;

/// Minimum distance of a resistance target above price (2%).
const TARGET_MIN_GAP: f64 = 1.02;

/// Two targets must sit at least 3% apart.
const TARGET_SEPARATION: f64 = 1.03;

/// Representative scores keeping the shared score/status bands intact.
const SCORE_ACTIVE: u8 = 75;
const SCORE_WAIT: u8 = 55;
const SCORE_AVOID: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrendState {
    Up,
    Down,
    Sideways,
}

/// Support/resistance selection solver.
#[derive(Debug, Clone)]
pub struct SupportLevelSolver {
    full_history_bars: usize,
}

impl SupportLevelSolver {
    pub fn new(full_history_bars: usize) -> Self {
        Self { full_history_bars }
    }
}

impl Default for SupportLevelSolver {
    fn default() -> Self {
        Self::new(FULL_HISTORY_BARS)
    }
}

impl ObjectiveSolver for SupportLevelSolver {
    fn name(&self) -> &str {
        "support_level"
    }

    fn full_history_bars(&self) -> usize {
        self.full_history_bars
    }

    fn solve(&self, current_price: f64, history: &[PriceBar]) -> ObjectiveOutcome {
        if let Some(outcome) = short_history_outcome(history, self.full_history_bars) {
            return outcome;
        }
        let price = current_price;
        let current_rsi = rsi(history, 14);

        // RSI extremes: no geometry, uniform answer across timeframes.
        if current_rsi > 75.0 {
            return uniform(Objective {
                status: ObjectiveStatus::Wait,
                score: SCORE_WAIT,
                strategy: StrategyTag::NoTrade,
                flags: vec![ConfidenceFlag::Overbought],
                reason: format!(
                    "Overbought (RSI {current_rsi:.0}). Let the move cool off before an entry."
                ),
                entry: None,
                stop: None,
                target: None,
            });
        }
        if current_rsi < 25.0 {
            return uniform(Objective {
                status: ObjectiveStatus::Avoid,
                score: SCORE_AVOID,
                strategy: StrategyTag::MeanReversion,
                flags: vec![ConfidenceFlag::Oversold],
                reason: format!(
                    "Oversold (RSI {current_rsi:.0}). Falling-knife zone; only a rebound play once selling exhausts."
                ),
                entry: None,
                stop: None,
                target: None,
            });
        }

        let ema5 = ema(history, 5);
        let ema20 = ema(history, 20);
        let ma60 = sma(history, 60);

        let trend = match (ema20, ma60) {
            (Some(e20), Some(m60)) if e20 > m60 && price >= e20 => TrendState::Up,
            (Some(e20), Some(m60)) if e20 < m60 && price < e20 => TrendState::Down,
            _ => TrendState::Sideways,
        };

        // Candidate support shelf: fast averages, yesterday's low, the
        // 10-bar low, and the last two swing lows. Only levels strictly
        // below price qualify.
        let ten_bar_low = history[..10.min(history.len())]
            .iter()
            .map(|b| b.low)
            .fold(f64::MAX, f64::min);
        let mut supports: Vec<f64> = Vec::new();
        supports.extend(ema5);
        supports.extend(ema20);
        if let Some(prev) = history.get(1) {
            supports.push(prev.low);
        }
        supports.push(ten_bar_low);
        supports.extend(swing_lows(history, SWING_WINDOW).into_iter().take(2));
        supports.retain(|&s| s > 0.0 && s < price);

        // Panic drop: price closed below every candidate support.
        let Some(support) = supports.iter().copied().reduce(f64::max) else {
            let recovery = swing_highs(history, SWING_WINDOW)
                .into_iter()
                .filter(|&r| r > price)
                .reduce(f64::min)
                .or_else(|| {
                    let high20 = history[..20.min(history.len())]
                        .iter()
                        .map(|b| b.high)
                        .fold(f64::MIN, f64::max);
                    (high20 > price).then_some(high20)
                })
                .unwrap_or(price * 1.05);
            return uniform(Objective {
                status: ObjectiveStatus::Avoid,
                score: SCORE_AVOID,
                strategy: StrategyTag::NoTrade,
                flags: vec![ConfidenceFlag::BrokenTrend],
                reason: format!(
                    "No support left below price. Avoid until it reclaims the {:.0} recovery level.",
                    round_to_ten(recovery)
                ),
                entry: None,
                stop: None,
                target: None,
            });
        };

        let gap_pct = (price - support) / price * 100.0;

        // Resistance targets: swing highs at least 2% above price, with a 3%
        // separation rule so the two targets never cluster.
        let mut resistances: Vec<f64> = swing_highs(history, SWING_WINDOW)
            .into_iter()
            .filter(|&r| r >= price * TARGET_MIN_GAP)
            .collect();
        resistances.sort_by(|a, b| a.partial_cmp(b).expect("finite resistance levels"));
        let (t1, t2) = match resistances.first().copied() {
            Some(first) => {
                let second = resistances
                    .iter()
                    .copied()
                    .find(|&r| r >= first * TARGET_SEPARATION)
                    .unwrap_or((price * 1.20).max(first * TARGET_SEPARATION));
                (first, second)
            }
            None => (price * 1.10, price * 1.20),
        };

        let build = |timeframe: Timeframe| -> Objective {
            let target_level = match timeframe {
                Timeframe::Short | Timeframe::Mid => t1,
                Timeframe::Long => t2,
            };
            match trend {
                TrendState::Up if gap_pct < 3.0 => {
                    let entry = round_to_ten(support);
                    let stop = round_to_ten(support * 0.97);
                    let target = round_to_ten(target_level);
                    let mut status = ObjectiveStatus::Active;
                    if stop >= entry || target <= entry {
                        status = ObjectiveStatus::Wait;
                    }
                    let active = status == ObjectiveStatus::Active;
                    Objective {
                        status,
                        score: if active { SCORE_ACTIVE } else { SCORE_WAIT },
                        strategy: StrategyTag::PullbackTrend,
                        flags: vec![ConfidenceFlag::UptrendConfirmed],
                        reason: format!(
                            "Uptrend with support {:.0} only {gap_pct:.1}% below. Buy zone at the shelf; targets {:.0} / {:.0}.",
                            round_to_ten(support),
                            round_to_ten(t1),
                            round_to_ten(t2),
                        ),
                        entry: active.then_some(entry),
                        stop: active.then_some(stop),
                        target: active.then_some(target),
                    }
                }
                TrendState::Up => {
                    let band = if gap_pct < 5.0 {
                        "a minor pullback toward the shelf sets up the entry"
                    } else if gap_pct < 10.0 {
                        "price is stretched above its base, wait for a pullback"
                    } else if gap_pct < 15.0 {
                        "chasing this far above support has poor risk"
                    } else {
                        "severely extended, let the trend rebuild a nearby base"
                    };
                    wait_objective(
                        vec![ConfidenceFlag::UptrendConfirmed],
                        format!(
                            "Uptrend, support {:.0} is {gap_pct:.1}% below; {band}.",
                            round_to_ten(support)
                        ),
                    )
                }
                TrendState::Down if gap_pct < 3.0 => wait_objective(
                    vec![ConfidenceFlag::BrokenTrend],
                    format!(
                        "Downtrend holding just above support {:.0} ({gap_pct:.1}%). Wait for a base to form.",
                        round_to_ten(support)
                    ),
                ),
                TrendState::Down => Objective {
                    status: ObjectiveStatus::Avoid,
                    score: SCORE_AVOID,
                    strategy: StrategyTag::NoTrade,
                    flags: vec![ConfidenceFlag::BrokenTrend],
                    reason: format!(
                        "Downtrend {gap_pct:.1}% above support {:.0}. Avoid until the trend repairs.",
                        round_to_ten(support)
                    ),
                    entry: None,
                    stop: None,
                    target: None,
                },
                TrendState::Sideways => wait_objective(
                    vec![ConfidenceFlag::TrendWeak],
                    format!(
                        "Range-bound between support {:.0} and resistance {:.0}. Wait for a decisive break.",
                        round_to_ten(support),
                        round_to_ten(t1),
                    ),
                ),
            }
        };

        ObjectiveOutcome::Ready(ObjectiveSet {
            short: build(Timeframe::Short),
            mid: build(Timeframe::Mid),
            long: build(Timeframe::Long),
        })
    }
}

fn wait_objective(flags: Vec<ConfidenceFlag>, reason: String) -> Objective {
    Objective {
        status: ObjectiveStatus::Wait,
        score: SCORE_WAIT,
        strategy: StrategyTag::NoTrade,
        flags,
        reason,
        entry: None,
        stop: None,
        target: None,
    }
}

fn uniform(objective: Objective) -> ObjectiveOutcome {
    ObjectiveOutcome::Ready(ObjectiveSet {
        short: objective.clone(),
        mid: objective.clone(),
        long: objective,
    })
}
