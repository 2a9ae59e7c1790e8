//! SupplyBar — daily net-purchase amounts by investor class.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Signed net-purchase amounts (KRW) for one ticker on one day.
///
/// Sourced independently of the price file: the supply axis may have gaps
/// relative to price history, so consumers join by date rather than by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyBar {
    pub date: NaiveDate,
    pub individual_net: f64,
    pub foreigner_net: f64,
    pub institution_net: f64,
    pub pension_net: f64,
}

impl SupplyBar {
    /// Combined foreigner + institution net purchase.
    pub fn dual_net(&self) -> f64 {
        self.foreigner_net + self.institution_net
    }
}
