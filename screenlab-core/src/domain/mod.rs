//! Domain types for ScreenLab.

pub mod bar;
pub mod snapshot;
pub mod supply;
pub mod ticker;

pub use bar::PriceBar;
pub use snapshot::{SnapshotRow, UniverseSnapshot};
pub use supply::SupplyBar;
pub use ticker::{Market, Ticker};

/// Ticker code type alias (six-digit KRX code, e.g. "005930").
pub type Code = String;
