//! ScreenLab Core — daily KRX screening and technical-scoring engine.
//!
//! This crate contains the heart of the screening pipeline:
//! - Domain types (price bars, supply bars, tickers, universe snapshots)
//! - Indicator library over newest-first histories
//! - Two objective solver generations behind one trait
//! - Four strategy filters with a dynamic market-cap floor
//! - Cross-strategy confluence ranking
//! - Per-ticker report assembly for the publishing layer
//!
//! The engine is pure compute: histories and snapshots arrive through the
//! `MarketStore` trait, outputs are in-memory values. Persistence, network
//! acquisition, and notification delivery all live with the caller.

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod objective;
pub mod report;
pub mod screen;
