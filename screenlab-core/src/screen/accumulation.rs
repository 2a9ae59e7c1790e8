//! Foreigner accumulation — quiet buying inside a tight box.
//!
//! Gates: positive 21-day foreigner net sum, 21-day close-to-close box range
//! of at most 12%, market cap at the floor, and a non-AVOID technical
//! status. Ranked by accumulation density (21-day sum over market cap),
//! then the raw sum, then the tighter box.

use std::collections::BTreeMap;

use crate::config::StrategyId;
use crate::domain::UniverseSnapshot;

use super::{CandidateRecord, FilterContext, FilterCounts, SortKey, TechnicalStatus};

/// Accumulation window in trading days.
const WINDOW: usize = 21;

/// Maximum box range: (high - low) / low over the window.
const MAX_BOX_RANGE: f64 = 0.12;

pub fn run(
    snapshot: &UniverseSnapshot,
    ctx: &FilterContext<'_>,
    counts: &mut FilterCounts,
) -> Vec<CandidateRecord> {
    let floor = ctx.mcap_floor(StrategyId::ForeignerAccumulation);
    let mut candidates = Vec::new();

    for row in &snapshot.rows {
        let supply = ctx.store.supply_history(&row.code, WINDOW);
        if supply.is_empty() {
            continue;
        }
        let f_sum: f64 = supply.iter().map(|s| s.foreigner_net).sum();
        if f_sum <= 0.0 {
            continue;
        }

        let mcap = row.bar.market_cap;
        if mcap <= 0.0 {
            counts.other += 1;
            continue;
        }
        if mcap < floor {
            counts.mcap += 1;
            continue;
        }

        // Box range over closes, matching the accumulation thesis: the
        // position builds while price goes nowhere.
        let window = ctx.store.price_history(&row.code, WINDOW);
        if window.is_empty() {
            counts.other += 1;
            continue;
        }
        let high = window.iter().map(|b| b.close).fold(f64::MIN, f64::max);
        let low = window.iter().map(|b| b.close).fold(f64::MAX, f64::min);
        let box_range = if low > 0.0 { (high - low) / low } else { 1.0 };
        if box_range > MAX_BOX_RANGE {
            counts.other += 1;
            continue;
        }

        let technical_status = ctx.tech_status(&row.code);
        if technical_status == TechnicalStatus::Avoid {
            counts.technical += 1;
            continue;
        }

        let density = f_sum / mcap * 100.0;
        candidates.push(CandidateRecord {
            code: row.code.clone(),
            sort_key: SortKey::new(-density, -f_sum, box_range),
            metrics: BTreeMap::from([
                ("acc_density".to_string(), density),
                ("acc_21d".to_string(), f_sum),
                ("box_range".to_string(), box_range),
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
    use crate::domain::SnapshotRow;
    use crate::screen::testutil::{base_bar, snapshot_of, ContextFixture};

    fn row(code: &str, market_cap: f64) -> SnapshotRow {
        SnapshotRow {
            code: code.into(),
            bar: base_bar(50_000.0, market_cap),
            supply: None,
        }
    }

    #[test]
    fn positive_21d_sum_required() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 30, 50_000.0, 1_000_000);
        fixture.seed_supply("000001", 30, -1.0e8); // net seller
        fixture.seed_flat_history("000002", 30, 50_000.0, 1_000_000);
        fixture.seed_supply("000002", 30, 1.0e8);

        let rows = vec![row("000001", 5.0e11), row("000002", 5.0e11)];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].code, "000002");
    }

    #[test]
    fn wide_box_is_rejected() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        // Flat box for the keeper.
        fixture.seed_flat_history("000001", 30, 50_000.0, 1_000_000);
        fixture.seed_supply("000001", 30, 1.0e8);
        // 20% range for the reject: half the window at 50k, half at 60k.
        let mut bars = Vec::new();
        for d in 0..30u32 {
            let close = if d < 10 { 60_000.0 } else { 50_000.0 };
            let mut bar = base_bar(close, 5.0e11);
            bar.date = crate::screen::testutil::snapshot_date() - chrono::Duration::days(d as i64);
            bars.push(bar);
        }
        fixture.store.insert_prices("000002", bars);
        fixture.seed_supply("000002", 30, 1.0e8);

        let rows = vec![row("000001", 5.0e11), row("000002", 5.0e11)];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].code, "000001");
        assert_eq!(counts.other, 1);
    }

    #[test]
    fn ranks_by_density() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        for code in ["000001", "000002"] {
            fixture.seed_flat_history(code, 30, 50_000.0, 1_000_000);
            fixture.seed_supply(code, 30, 1.0e8);
        }
        // Same 21d sum, half the market cap → double the density for 000002.
        let rows = vec![row("000001", 1.0e12), row("000002", 5.0e11)];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        let order: Vec<&str> = picks.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(order, vec!["000002", "000001"]);
    }

    #[test]
    fn avoid_status_excluded() {
        let mut fixture = ContextFixture::with_floor(3.0e11);
        fixture.seed_flat_history("000001", 30, 50_000.0, 1_000_000);
        fixture.seed_supply("000001", 30, 1.0e8);
        fixture.set_tech("000001", TechnicalStatus::Avoid);

        let rows = vec![row("000001", 5.0e11)];
        let mut counts = FilterCounts::default();
        let picks = run(&snapshot_of(rows), &fixture.context(), &mut counts);
        assert!(picks.is_empty());
        assert_eq!(counts.technical, 1);
    }
}
