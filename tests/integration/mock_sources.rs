//! In-memory catalog and pricing sources for integration testing.
//!
//! Deterministic `CardCatalog` and `PriceProvider` implementations with
//! no network access. Call counts and failures are controllable from
//! test code.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pokeprofit::catalog::CardCatalog;
use pokeprofit::pricing::PriceProvider;
use pokeprofit::types::{CardRecord, FinishPrice, PriceVariant};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub struct MockCatalog {
    cards: Vec<CardRecord>,
    searches: Arc<Mutex<Vec<String>>>,
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockCatalog {
    pub fn with_cards(cards: Vec<CardRecord>) -> Self {
        Self {
            cards,
            searches: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Force all subsequent searches to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn searches(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.searches)
    }
}

#[async_trait]
impl CardCatalog for MockCatalog {
    async fn search(&self, prefix: &str) -> Result<Vec<CardRecord>> {
        self.searches.lock().unwrap().push(prefix.to_string());
        if let Some(msg) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!(msg.clone()));
        }
        let needle = prefix.to_lowercase();
        Ok(self
            .cards
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&needle))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "mock-catalog"
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

pub struct MockPricing {
    variants: HashMap<String, Vec<PriceVariant>>,
    failing: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPricing {
    pub fn new() -> Self {
        Self {
            variants: HashMap::new(),
            failing: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_variants(mut self, listing_id: &str, variants: Vec<PriceVariant>) -> Self {
        self.variants.insert(listing_id.to_string(), variants);
        self
    }

    pub fn failing_for(mut self, listing_id: &str) -> Self {
        self.failing.push(listing_id.to_string());
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PriceProvider for MockPricing {
    async fn price_variants(&self, listing_id: &str) -> Result<Vec<PriceVariant>> {
        self.calls.lock().unwrap().push(listing_id.to_string());
        if self.failing.iter().any(|id| id == listing_id) {
            return Err(anyhow!("simulated timeout for {listing_id}"));
        }
        Ok(self.variants.get(listing_id).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock-pricing"
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A card numbered `n` with an optional listing id and embedded prices.
pub fn card(name: &str, n: usize, listing_id: Option<&str>, embedded: Vec<FinishPrice>) -> CardRecord {
    CardRecord {
        id: format!("test-{n}"),
        name: name.to_string(),
        set_name: "Test Set".to_string(),
        number: n.to_string(),
        rarity: "Common".to_string(),
        image_small: format!("https://images.example/test-{n}.png"),
        image_large: format!("https://images.example/test-{n}_hires.png"),
        listing_id: listing_id.map(String::from),
        embedded_prices: embedded,
    }
}

/// 23 Pikachu cards (numbered 1..=23, listing id "L{n}") plus one Raichu.
/// Card 15 has no listing id.
pub fn pikachu_catalog() -> Vec<CardRecord> {
    let mut cards: Vec<CardRecord> = (1..=23)
        .map(|n| {
            if n == 15 {
                card("Pikachu", n, None, Vec::new())
            } else {
                card("Pikachu", n, Some(&format!("L{n}")), Vec::new())
            }
        })
        .collect();
    cards.push(card("Raichu", 99, Some("L99"), Vec::new()));
    cards
}

pub fn variant(condition: &str, price: Decimal) -> PriceVariant {
    PriceVariant::new(condition, price)
}
