//! Cross-sectional universe snapshot for one trading date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PriceBar, SupplyBar};

/// One active ticker's row in the cross-section: the day's price bar plus the
/// same-date supply bar when the supply feed has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub code: String,
    pub bar: PriceBar,
    pub supply: Option<SupplyBar>,
}

/// All active tickers' rows for a single trading date. Strategy filters
/// consume this as their primary input; per-ticker history comes from the
/// store on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseSnapshot {
    pub date: NaiveDate,
    pub rows: Vec<SnapshotRow>,
}

impl UniverseSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Market caps of rows with a positive market cap — the input to the
    /// dynamic threshold calculation.
    pub fn positive_market_caps(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.bar.market_cap)
            .filter(|&m| m > 0.0)
            .collect()
    }
}
