//! Value picks — undervalued, profitable names.
//!
//! Gates: market cap at the floor, positive EPS, PER in (0, 30), PBR in
//! [0.3, 1.2), ROE >= 8. Ranked by profit quality (0.6·ROE + 0.4·operating
//! margin), ties broken by cheaper PER then PBR. Technical status is
//! recorded for display but never excludes a value candidate.

use std::collections::BTreeMap;

use crate::config::StrategyId;
use crate::domain::UniverseSnapshot;

use super::{CandidateRecord, FilterContext, FilterCounts, SortKey};

pub fn run(
    snapshot: &UniverseSnapshot,
    ctx: &FilterContext<'_>,
    counts: &mut FilterCounts,
) -> Vec<CandidateRecord> {
    let floor = ctx.mcap_floor(StrategyId::ValuePicks);
    let mut candidates = Vec::new();

    for row in &snapshot.rows {
        let bar = &row.bar;
        if bar.market_cap < floor {
            counts.mcap += 1;
            continue;
        }
        if bar.eps.unwrap_or(0.0) <= 0.0 {
            counts.net_income += 1;
            continue;
        }
        let (Some(per), Some(pbr)) = (bar.per, bar.pbr) else {
            counts.other += 1;
            continue;
        };
        let roe = bar.roe.unwrap_or(0.0);
        if !(per > 0.0 && per < 30.0 && (0.3..1.2).contains(&pbr) && roe >= 8.0) {
            counts.other += 1;
            continue;
        }

        let profit_quality = roe * 0.6 + bar.operating_margin.unwrap_or(0.0) * 0.4;

        candidates.push(CandidateRecord {
            code: row.code.clone(),
            sort_key: SortKey::new(-profit_quality, per, pbr),
            metrics: BTreeMap::from([
                ("profit_quality".to_string(), profit_quality),
                ("per".to_string(), per),
                ("pbr".to_string(), pbr),
            ]),
            technical_status: ctx.tech_status(&row.code),
        });
    }

    candidates.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    candidates.truncate(ctx.config.strategy_cap);
    candidates
}
