//! Twin engines — foreigner and institution buying the same name same day.
//!
//! Gates: both net flows positive on the snapshot date, market cap at the
//! strategy floor (300B override in production), demand power — combined
//! net buy normalized by market cap — at least 0.05%, and a non-AVOID
//! technical status. Ranked by demand power, then co-momentum (the smaller
//! of the two flows), then total buy.

use std::collections::BTreeMap;

use crate::config::StrategyId;
use crate::domain::UniverseSnapshot;

use super::{CandidateRecord, FilterContext, FilterCounts, SortKey, TechnicalStatus};

/// Minimum demand power in percent of market cap.
const MIN_DEMAND_POWER: f64 = 0.05;

pub fn run(
    snapshot: &UniverseSnapshot,
    ctx: &FilterContext<'_>,
    counts: &mut FilterCounts,
) -> Vec<CandidateRecord> {
    let floor = ctx.mcap_floor(StrategyId::TwinEngines);
    let mut candidates = Vec::new();

    for row in &snapshot.rows {
        // Both investor classes must be net buyers today.
        let Some(supply) = &row.supply else { continue };
        let (f_buy, i_buy) = (supply.foreigner_net, supply.institution_net);
        if f_buy <= 0.0 || i_buy <= 0.0 {
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

        let demand_power = (f_buy + i_buy) / mcap * 100.0;
        if demand_power < MIN_DEMAND_POWER {
            counts.other += 1;
            continue;
        }

        let technical_status = ctx.tech_status(&row.code);
        if technical_status == TechnicalStatus::Avoid {
            counts.technical += 1;
            continue;
        }

        let co_momentum = f_buy.min(i_buy);
        candidates.push(CandidateRecord {
            code: row.code.clone(),
            sort_key: SortKey::new(-demand_power, -co_momentum, -(f_buy + i_buy)),
            metrics: BTreeMap::from([
                ("demand_power".to_string(), demand_power),
                ("co_momentum".to_string(), co_momentum),
            ]),
            technical_status,
        });
    }

    candidates.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    candidates.truncate(ctx.config.strategy_cap);
    candidates
}
