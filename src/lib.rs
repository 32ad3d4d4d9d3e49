//! PokeProfit — trading-card search and grading-arbitrage advisor.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod catalog;
pub mod pricing;
pub mod strategy;
pub mod engine;
pub mod dashboard;
