//! Core engine — the search → price → advise pipeline and session state.

pub mod analyzer;
pub mod portfolio;
pub mod session;
