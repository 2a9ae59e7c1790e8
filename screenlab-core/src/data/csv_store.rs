//! CSV ingest — builds a `MemoryStore` from a directory of export files.
//!
//! Expected layout (headers required):
//! - `tickers.csv`: code,name,market,is_active
//! - `prices.csv`:  code,date,open,high,low,close,volume,trading_value,
//!   market_cap,per,pbr,eps,bps,dividend_yield,roe,operating_margin,
//!   revenue,net_income
//! - `supply.csv`:  code,date,individual_net,foreigner_net,institution_net,
//!   pension_net
//!
//! Dates are `YYYY-MM-DD`. Empty cells deserialize to `None` for the
//! optional fundamental columns.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{Market, PriceBar, SupplyBar, Ticker};

use super::{MemoryStore, StoreError};

#[derive(Debug, Deserialize)]
struct TickerRow {
    code: String,
    name: String,
    market: Market,
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    code: String,
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    trading_value: f64,
    market_cap: f64,
    per: Option<f64>,
    pbr: Option<f64>,
    eps: Option<f64>,
    bps: Option<f64>,
    dividend_yield: Option<f64>,
    roe: Option<f64>,
    operating_margin: Option<f64>,
    revenue: Option<f64>,
    net_income: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SupplyRow {
    code: String,
    date: String,
    individual_net: f64,
    foreigner_net: f64,
    institution_net: f64,
    pension_net: f64,
}

fn parse_date(value: &str, path: &Path) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| StoreError::BadDate {
        path: path.display().to_string(),
        value: value.to_string(),
    })
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, StoreError> {
    if !path.exists() {
        return Err(StoreError::MissingFile {
            path: path.display().to_string(),
        });
    }
    csv::Reader::from_path(path).map_err(|source| StoreError::Csv {
        path: path.display().to_string(),
        source,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> StoreError {
    StoreError::Csv {
        path: path.display().to_string(),
        source,
    }
}

impl MemoryStore {
    /// Load a full store from a directory of CSV exports.
    pub fn load_csv_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        let mut store = MemoryStore::new();

        let tickers_path = dir.join("tickers.csv");
        let mut rdr = reader(&tickers_path)?;
        for row in rdr.deserialize::<TickerRow>() {
            let row = row.map_err(|e| csv_error(&tickers_path, e))?;
            store.insert_ticker(Ticker {
                code: row.code,
                name: row.name,
                market: row.market,
                is_active: row.is_active,
            });
        }

        let prices_path = dir.join("prices.csv");
        let mut rdr = reader(&prices_path)?;
        let mut prices: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();
        for row in rdr.deserialize::<PriceRow>() {
            let row = row.map_err(|e| csv_error(&prices_path, e))?;
            let date = parse_date(&row.date, &prices_path)?;
            prices.entry(row.code).or_default().push(PriceBar {
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                trading_value: row.trading_value,
                market_cap: row.market_cap,
                per: row.per,
                pbr: row.pbr,
                eps: row.eps,
                bps: row.bps,
                dividend_yield: row.dividend_yield,
                roe: row.roe,
                operating_margin: row.operating_margin,
                revenue: row.revenue,
                net_income: row.net_income,
            });
        }
        for (code, bars) in prices {
            store.insert_prices(code, bars);
        }

        // supply.csv is optional: fresh exports may not carry flow data yet.
        let supply_path = dir.join("supply.csv");
        if supply_path.exists() {
            let mut rdr = reader(&supply_path)?;
            let mut supply: BTreeMap<String, Vec<SupplyBar>> = BTreeMap::new();
            for row in rdr.deserialize::<SupplyRow>() {
                let row = row.map_err(|e| csv_error(&supply_path, e))?;
                let date = parse_date(&row.date, &supply_path)?;
                supply.entry(row.code).or_default().push(SupplyBar {
                    date,
                    individual_net: row.individual_net,
                    foreigner_net: row.foreigner_net,
                    institution_net: row.institution_net,
                    pension_net: row.pension_net,
                });
            }
            for (code, bars) in supply {
                store.insert_supply(code, bars);
            }
        }

        Ok(store)
    }
}
