//! BarLab Core: domain types, signal generators, sizing, execution, replay loop.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, orders, fills, valuation records, the portfolio ledger)
//! - Signal generators (moving average crossover, z-score mean reversion)
//! - Target-weight order sizing and close-price execution
//! - The sequential replay engine and its reporter contract
//!
//! Everything here is pure and in-memory. File formats, configuration and
//! metrics live in `barlab-runner`.

pub mod components;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod sizers;
