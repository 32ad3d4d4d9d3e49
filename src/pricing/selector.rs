//! Raw price selection.
//!
//! Turns a card into one representative ungraded price:
//! 1. no listing id → zero, no call made
//! 2. pricing service variants → Near Mint if present, else the first
//! 3. catalog-embedded market prices in fixed finish order
//! 4. zero
//!
//! Lookup failures are captured in the returned `PriceLookupOutcome`
//! and never propagate.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use super::PriceProvider;
use crate::types::{CardRecord, Finish, PriceLookupOutcome, PriceSource, PriceVariant, RawPriceEstimate};

/// Pick the preferred variant: first whose condition contains `marker`
/// (case-insensitive), else the first variant.
pub fn select_variant<'a>(variants: &'a [PriceVariant], marker: &str) -> Option<&'a PriceVariant> {
    let marker = marker.to_lowercase();
    variants
        .iter()
        .find(|v| v.condition.to_lowercase().contains(&marker))
        .or_else(|| variants.first())
}

/// First positive embedded market price in fallback finish order.
pub fn catalog_fallback(card: &CardRecord) -> Option<(Finish, Decimal)> {
    Finish::FALLBACK_ORDER
        .iter()
        .find_map(|f| card.embedded_price(*f).map(|p| (*f, p)))
}

pub struct PriceSelector {
    provider: Arc<dyn PriceProvider>,
    near_mint_marker: String,
}

impl PriceSelector {
    pub fn new(provider: Arc<dyn PriceProvider>, near_mint_marker: &str) -> Self {
        Self {
            provider,
            near_mint_marker: near_mint_marker.to_string(),
        }
    }

    /// Produce a raw price estimate for `card`. Always returns a value.
    pub async fn select(&self, card: &CardRecord) -> RawPriceEstimate {
        let Some(listing_id) = card.listing_id.as_deref() else {
            debug!(card_id = %card.id, "No marketplace listing, skipping price lookup");
            return RawPriceEstimate::none(PriceLookupOutcome::NoListing);
        };

        let (lookup, variants) = match self.provider.price_variants(listing_id).await {
            Ok(v) if v.is_empty() => (PriceLookupOutcome::Empty, v),
            Ok(v) => (PriceLookupOutcome::Priced { variants: v.len() }, v),
            Err(e) => {
                warn!(
                    card_id = %card.id,
                    listing_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Price lookup failed, treating as no data"
                );
                (
                    PriceLookupOutcome::Failed {
                        reason: format!("{e:#}"),
                    },
                    Vec::new(),
                )
            }
        };

        if let Some(v) = select_variant(&variants, &self.near_mint_marker) {
            if v.price > Decimal::ZERO {
                debug!(card_id = %card.id, condition = %v.condition, price = %v.price, "Variant price selected");
                return RawPriceEstimate {
                    price: v.price,
                    source: PriceSource::Variant {
                        condition: v.condition.clone(),
                    },
                    lookup,
                };
            }
        }

        match catalog_fallback(card) {
            Some((finish, price)) => {
                debug!(card_id = %card.id, finish = %finish, price = %price, "Catalog fallback price used");
                RawPriceEstimate {
                    price,
                    source: PriceSource::CatalogFallback { finish },
                    lookup,
                }
            }
            None => RawPriceEstimate::none(lookup),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
