//! Strategy — the grading-arbitrage recommendation rule.

pub mod advisor;

pub use advisor::{AdvisorConfig, GradingAdvisor};
