//! Ticker — listed instrument identity and universe membership.

use serde::{Deserialize, Serialize};

/// KRX market segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Kospi,
    Kosdaq,
}

/// A listed instrument. Created and updated by an external sync process;
/// `is_active` gates universe membership for screening (delisted and
/// suspended names stay in the store but drop out of every run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub code: String,
    pub name: String,
    pub market: Market,
    pub is_active: bool,
}
