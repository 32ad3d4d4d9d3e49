//! Card catalog integration.
//!
//! Defines the `CardCatalog` trait and provides:
//! - `pokemontcg` — the Pokémon TCG API client
//! - `pagination` — client-side fixed-size page slicing

pub mod pagination;
pub mod pokemontcg;

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::types::CardRecord;

/// Abstraction over card catalog services.
///
/// An empty vector is a normal "no matches" outcome; an `Err` means the
/// lookup itself failed.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Return every card whose name starts with `prefix`.
    async fn search(&self, prefix: &str) -> Result<Vec<CardRecord>>;

    /// Catalog name for logging.
    fn name(&self) -> &str;
}
