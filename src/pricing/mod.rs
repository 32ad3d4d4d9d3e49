//! Market price lookups.
//!
//! Defines the `PriceProvider` trait and provides:
//! - `justtcg` — the JustTCG variant-pricing client
//! - `selector` — picks one raw price per card with catalog fallback

pub mod justtcg;
pub mod selector;

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::types::PriceVariant;

/// Abstraction over variant-level pricing services.
///
/// An empty vector means the service had no data for the listing; an
/// `Err` means the lookup failed. Callers never see either as fatal.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch priced variants for a marketplace listing id.
    async fn price_variants(&self, listing_id: &str) -> Result<Vec<PriceVariant>>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
