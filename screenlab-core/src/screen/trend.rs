//! Trend following — volume-backed breakout candles.
//!
//! Gates: an up candle (close > open), the configured upper-wick rule, a
//! 20-day volume ratio of at least 1.5 (capped at 5.0), and a non-AVOID
//! technical status. Moving-average alignment feeds a trend-score tier and
//! today's high against the prior 20-bar high dates the breakout. Ranked by
//! volume power, then trend score, then breakout age.

use std::collections::BTreeMap;

use crate::config::StrategyId;
use crate::domain::UniverseSnapshot;
use crate::indicators::sma;

use super::{CandidateRecord, FilterContext, FilterCounts, SortKey, TechnicalStatus};

/// Minimum volume surge over the 20-day average.
const MIN_VOL_POWER: f64 = 1.5;

/// Volume power is capped so one halt-and-spike day cannot dominate the sort.
const MAX_VOL_POWER: f64 = 5.0;

/// Sort placeholder when today's high did not clear the prior 20-bar high.
const STALE_BREAKOUT_AGE: f64 = 99.0;

pub fn run(
    snapshot: &UniverseSnapshot,
    ctx: &FilterContext<'_>,
    counts: &mut FilterCounts,
) -> Vec<CandidateRecord> {
    let floor = ctx.mcap_floor(StrategyId::TrendFollowing);
    let mut candidates = Vec::new();

    for row in &snapshot.rows {
        let bar = &row.bar;
        // Up candle only.
        if bar.close <= bar.open {
            continue;
        }
        if bar.market_cap < floor {
            counts.mcap += 1;
            continue;
        }
        if !ctx.config.wick_rule.passes(bar.body(), bar.upper_wick()) {
            counts.other += 1;
            continue;
        }

        // Volume power against the 20 prior sessions (today excluded).
        let history = ctx.store.price_history(&row.code, 121);
        if history.len() < 21 {
            counts.other += 1;
            continue;
        }
        let avg_vol20 =
            history[1..21].iter().map(|b| b.volume as f64).sum::<f64>() / 20.0;
        let vol_power = if avg_vol20 > 0.0 {
            (bar.volume as f64 / avg_vol20).min(MAX_VOL_POWER)
        } else {
            0.0
        };
        if vol_power < MIN_VOL_POWER {
            counts.other += 1;
            continue;
        }

        let technical_status = ctx.tech_status(&row.code);
        if technical_status == TechnicalStatus::Avoid {
            counts.technical += 1;
            continue;
        }

        // Alignment tier: full stack beats a partial cross.
        let trend_score = match (sma(&history, 20), sma(&history, 60), sma(&history, 120)) {
            (Some(m20), Some(m60), Some(m120)) if m20 > m60 && m60 > m120 => 30.0,
            (Some(m20), Some(m60), _) if m20 > m60 => 20.0,
            _ => 0.0,
        };

        let prior_high20 = history[1..21].iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let breakout_age = if bar.high > prior_high20 {
            0.0
        } else {
            STALE_BREAKOUT_AGE
        };

        candidates.push(CandidateRecord {
            code: row.code.clone(),
            sort_key: SortKey::new(-vol_power, -trend_score, breakout_age),
            metrics: BTreeMap::from([
                ("vol_power".to_string(), vol_power),
                ("trend_score".to_string(), trend_score),
            ]),
            technical_status,
        });
    }

    candidates.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    candidates.truncate(ctx.config.strategy_cap);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WickRule;
    use crate::screen::testutil::{candle_row, snapshot_of, ContextFixture};

    /// An up candle with a small wick and a 3x volume surge.
    fn surging_row(code: &str) -> crate::domain::SnapshotRow {
        candle_row(code, 5.0e11, 50_000.0, 51_600.0, 49_800.0, 51_500.0, 3_000_000)
    }

    #[test]
    fn down_candle_is_skipped() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 130, 50_000.0, 1_000_000);
        let rows = vec![candle_row(
            "000001", 5.0e11, 51_000.0, 51_500.0, 49_000.0, 50_000.0, 3_000_000,
        )];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert!(picks.is_empty());
    }

    #[test]
    fn strict_wick_rule_rejects_heavy_upper_wick() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 130, 50_000.0, 1_000_000);
        // body 500, wick 700: strict rejects.
        let rows = vec![candle_row(
            "000001", 5.0e11, 50_000.0, 51_200.0, 49_800.0, 50_500.0, 3_000_000,
        )];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows.clone()), &fixture.context(), &mut counts);
        assert!(picks.is_empty());
        assert_eq!(counts.other, 1);

        // The lenient generation admits the same candle (wick <= 2x body).
        fixture.config.wick_rule = WickRule::LenientTwiceBody;
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert_eq!(picks.len(), 1);
    }

    #[test]
    fn volume_surge_required() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 130, 50_000.0, 1_000_000);
        // 1.2x average volume: under the 1.5 gate.
        let rows = vec![candle_row(
            "000001", 5.0e11, 50_000.0, 51_600.0, 49_800.0, 51_500.0, 1_200_000,
        )];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert!(picks.is_empty());
        assert_eq!(counts.other, 1);
    }

    #[test]
    fn vol_power_is_capped_at_five() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 130, 50_000.0, 1_000_000);
        // 50x surge still records vol_power 5.0.
        let rows = vec![candle_row(
            "000001", 5.0e11, 50_000.0, 51_600.0, 49_800.0, 51_500.0, 50_000_000,
        )];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert_eq!(picks[0].metrics["vol_power"], 5.0);
    }

    #[test]
    fn fresh_breakout_outranks_stale_on_equal_volume() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        // Flat history at 50k: prior 20-bar high ≈ 50_500 (base_bar +1%).
        fixture.seed_flat_history("000001", 130, 50_000.0, 1_000_000);
        fixture.seed_flat_history("000002", 130, 50_000.0, 1_000_000);
        let rows = vec![
            // High clears the prior high → breakout age 0.
            candle_row("000001", 5.0e11, 50_000.0, 51_600.0, 49_800.0, 51_500.0, 3_000_000),
            // Same candle shape but capped under the prior high.
            candle_row("000002", 5.0e11, 49_000.0, 50_400.0, 48_900.0, 50_300.0, 3_000_000),
        ];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].code, "000001");
    }

    #[test]
    fn insufficient_history_is_counted() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 10, 50_000.0, 1_000_000);
        let rows = vec![surging_row("000001")];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert!(picks.is_empty());
        assert_eq!(counts.other, 1);
    }
}
