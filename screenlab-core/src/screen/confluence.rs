//! Confluence ranking — cross-strategy agreement weighted by group diversity.
//!
//! A ticker surfaced by strategies spanning more distinct signal groups
//! (fundamental vs flow vs price action) outranks one appearing many times
//! within a single group. Ties fall to the best single-strategy rank, then
//! the average rank.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::{ScreenConfig, StrategyGroup, StrategyId};

use super::{CandidateRecord, TechnicalStatus};

/// One ticker's aggregated cross-strategy standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceEntry {
    pub code: String,
    pub weighted_group_score: f64,
    pub best_rank: u32,
    pub avg_rank: f64,
    pub groups: BTreeSet<StrategyGroup>,
    pub technical_status: TechnicalStatus,
}

/// Merge the per-strategy ranked lists into the final confluence ordering.
///
/// Ranks are 1-indexed within each strategy's list. The result is capped at
/// `config.confluence_top`.
pub fn rank(
    per_strategy: &BTreeMap<StrategyId, Vec<CandidateRecord>>,
    config: &ScreenConfig,
) -> Vec<ConfluenceEntry> {
    struct Stats {
        rank_sum: u32,
        count: u32,
        best_rank: u32,
        groups: BTreeSet<StrategyGroup>,
        technical_status: TechnicalStatus,
    }

    let mut by_code: BTreeMap<String, Stats> = BTreeMap::new();
    for (id, candidates) in per_strategy {
        let Some(meta) = config.meta(*id) else {
            continue;
        };
        for (index, candidate) in candidates.iter().enumerate() {
            let rank = index as u32 + 1;
            let stats = by_code.entry(candidate.code.clone()).or_insert(Stats {
                rank_sum: 0,
                count: 0,
                best_rank: u32::MAX,
                groups: BTreeSet::new(),
                technical_status: candidate.technical_status,
            });
            stats.rank_sum += rank;
            stats.count += 1;
            stats.best_rank = stats.best_rank.min(rank);
            stats.groups.insert(meta.group);
        }
    }

    let mut entries: Vec<ConfluenceEntry> = by_code
        .into_iter()
        .map(|(code, stats)| ConfluenceEntry {
            code,
            weighted_group_score: stats
                .groups
                .iter()
                .map(|&g| config.group_weight(g))
                .sum(),
            best_rank: stats.best_rank,
            avg_rank: f64::from(stats.rank_sum) / f64::from(stats.count),
            groups: stats.groups,
            technical_status: stats.technical_status,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.weighted_group_score
            .total_cmp(&a.weighted_group_score)
            .then(a.best_rank.cmp(&b.best_rank))
            .then(a.avg_rank.total_cmp(&b.avg_rank))
    });
    entries.truncate(config.confluence_top);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::SortKey;

    fn candidate(code: &str) -> CandidateRecord {
        CandidateRecord {
            code: code.into(),
            sort_key: SortKey::new(0.0, 0.0, 0.0),
            metrics: BTreeMap::new(),
            technical_status: TechnicalStatus::Wait,
        }
    }

    fn lists(
        entries: &[(StrategyId, &[&str])],
    ) -> BTreeMap<StrategyId, Vec<CandidateRecord>> {
        entries
            .iter()
            .map(|(id, codes)| (*id, codes.iter().map(|c| candidate(c)).collect()))
            .collect()
    }

    #[test]
    fn two_groups_outrank_one_group_at_rank_one() {
        let per_strategy = lists(&[
            // AAA: rank 1 in Fundamental + rank 1 in Price → 2 groups.
            (StrategyId::ValuePicks, &["AAAAAA"][..]),
            (StrategyId::TrendFollowing, &["AAAAAA"][..]),
            // BBB: rank 1 in two Flow strategies → 1 distinct group.
            (StrategyId::TwinEngines, &["BBBBBB"][..]),
            (StrategyId::ForeignerAccumulation, &["BBBBBB"][..]),
        ]);
        let config = ScreenConfig::default();
        let entries = rank(&per_strategy, &config);
        assert_eq!(entries[0].code, "AAAAAA");
        assert_eq!(entries[0].weighted_group_score, 2.0);
        assert_eq!(entries[1].code, "BBBBBB");
        assert_eq!(entries[1].weighted_group_score, 1.0);
    }

    #[test]
    fn ties_fall_to_best_rank_then_avg_rank() {
        let per_strategy = lists(&[
            // Both span one group; AAA's best rank is 1, BBB's is 2.
            (StrategyId::ValuePicks, &["AAAAAA", "BBBBBB"][..]),
            (StrategyId::TwinEngines, &["CCCCCC", "BBBBBB"][..]),
        ]);
        let config = ScreenConfig::default();
        let entries = rank(&per_strategy, &config);
        // BBB spans two groups (Fundamental + Flow) → first despite rank 2s.
        assert_eq!(entries[0].code, "BBBBBB");
        // AAA (rank 1) beats CCC (rank 1)? Both 1 group, best rank 1 each,
        // avg rank 1.0 each → stable order by code from the BTreeMap walk.
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn avg_rank_breaks_equal_best_rank() {
        let per_strategy = lists(&[
            (StrategyId::ValuePicks, &["AAAAAA", "BBBBBB"][..]),
            // AAA again at rank 2 (same group) worsens its avg rank.
            (StrategyId::TwinEngines, &["CCCCCC", "AAAAAA"][..]),
            (StrategyId::TrendFollowing, &["BBBBBB", "CCCCCC"][..]),
        ]);
        let config = ScreenConfig::default();
        let entries = rank(&per_strategy, &config);
        // AAA: groups {Fundamental, Flow}, best 1, avg 1.5
        // BBB: groups {Fundamental, Price}, best 1, avg 1.5
        // CCC: groups {Flow, Price}, best 1, avg 1.5 — full three-way tie on
        // every key; all three must still be present.
        assert_eq!(entries.len(), 3);
        for entry in &entries {
            assert_eq!(entry.weighted_group_score, 2.0);
            assert_eq!(entry.best_rank, 1);
            assert!((entry.avg_rank - 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn output_is_capped_at_top_n() {
        let codes: Vec<String> = (0..10).map(|i| format!("{:06}", i)).collect();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let per_strategy = lists(&[(StrategyId::ValuePicks, &refs[..])]);
        let config = ScreenConfig::default();
        let entries = rank(&per_strategy, &config);
        assert_eq!(entries.len(), 5);
        // Within one strategy, better list rank wins.
        assert_eq!(entries[0].code, "000000");
    }

    #[test]
    fn group_weights_scale_the_score() {
        let per_strategy = lists(&[
            (StrategyId::ValuePicks, &["AAAAAA"][..]),
            (StrategyId::TwinEngines, &["BBBBBB"][..]),
        ]);
        let mut config = ScreenConfig::default();
        config.group_weights.flow = 3.0;
        let entries = rank(&per_strategy, &config);
        assert_eq!(entries[0].code, "BBBBBB");
        assert_eq!(entries[0].weighted_group_score, 3.0);
    }
}
