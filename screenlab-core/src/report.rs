//! Report assembly — merge objectives, flow, and fundamentals per ticker.
//!
//! The downstream publisher consumes one payload per watch-listed ticker:
//! the solver's objective set, a headline summary lifted from the mid
//! timeframe, a 200-day supply chart joined with closes, short-window flow
//! sums, and a fundamentals snapshot. Persistence and delivery are the
//! caller's responsibility.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{PriceBar, SupplyBar};
use crate::objective::ObjectiveOutcome;
use crate::screen::TechnicalStatus;

/// Days of supply history charted alongside closes.
const CHART_DAYS: usize = 200;

/// Net-flow sums over the recent windows the UI headlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub foreigner_5d_net: f64,
    pub institution_5d_net: f64,
    pub foreigner_20d_net: f64,
    pub institution_20d_net: f64,
}

/// One point on the supply chart: flows with the same-date close when the
/// price axis has that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub date: NaiveDate,
    pub foreigner: f64,
    pub institution: f64,
    pub close: Option<f64>,
}

/// Fundamentals snapshot from the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub market_cap: f64,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
}

/// Complete per-ticker payload for the publishing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerReport {
    pub code: String,
    pub date: NaiveDate,
    pub objectives: ObjectiveOutcome,
    pub summary: String,
    pub trend: TechnicalStatus,
    pub technical_score: u8,
    pub supply_chart: Vec<SupplyPoint>,
    pub metrics: FlowMetrics,
    pub fundamentals: Fundamentals,
}

/// Assemble the report for one ticker. Returns `None` when there is no
/// price history at all — nothing to report on.
///
/// Histories are newest-first; the supply chart is emitted oldest-first for
/// charting.
pub fn assemble_report(
    code: &str,
    price_history: &[PriceBar],
    supply_history: &[SupplyBar],
    objectives: ObjectiveOutcome,
) -> Option<TickerReport> {
    let latest = price_history.first()?;

    // Headline fields come from the mid timeframe; a not-ready outcome
    // still publishes a minimal report so the ticker stays visible.
    let (summary, trend, technical_score) = match objectives.as_ready() {
        Some(set) => (
            set.mid.reason.clone(),
            set.mid.status.into(),
            set.mid.score,
        ),
        None => (
            "Analysis pending: not enough history yet.".to_string(),
            TechnicalStatus::Unknown,
            0,
        ),
    };

    let close_by_date: std::collections::BTreeMap<NaiveDate, f64> = price_history
        .iter()
        .take(CHART_DAYS)
        .map(|b| (b.date, b.close))
        .collect();
    let supply_chart: Vec<SupplyPoint> = supply_history
        .iter()
        .take(CHART_DAYS)
        .rev()
        .map(|s| SupplyPoint {
            date: s.date,
            foreigner: s.foreigner_net,
            institution: s.institution_net,
            close: close_by_date.get(&s.date).copied(),
        })
        .collect();

    let sum_over = |n: usize, f: fn(&SupplyBar) -> f64| -> f64 {
        supply_history.iter().take(n).map(f).sum()
    };
    let metrics = FlowMetrics {
        foreigner_5d_net: sum_over(5, |s| s.foreigner_net),
        institution_5d_net: sum_over(5, |s| s.institution_net),
        foreigner_20d_net: sum_over(20, |s| s.foreigner_net),
        institution_20d_net: sum_over(20, |s| s.institution_net),
    };

    Some(TickerReport {
        code: code.to_string(),
        date: latest.date,
        objectives,
        summary,
        trend,
        technical_score,
        supply_chart,
        metrics,
        fundamentals: Fundamentals {
            market_cap: latest.market_cap,
            per: latest.per,
            pbr: latest.pbr,
        },
    })
}
