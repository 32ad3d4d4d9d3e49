//! Pokémon TCG API catalog client.
//!
//! API docs: https://docs.pokemontcg.io
//! Base URL: https://api.pokemontcg.io/v2
//! Auth: `X-Api-Key: {key}` header.
//! Paging: `page` / `pageSize` (max 250). The client walks every upstream
//! page so callers always receive the full matching set.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::CardCatalog;
use crate::types::{CardRecord, Finish, FinishPrice, ProfitError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const CATALOG_NAME: &str = "pokemontcg";

/// Largest page the API will serve.
const UPSTREAM_PAGE_SIZE: u32 = 250;

/// Hard stop on upstream pages for a single search.
const MAX_UPSTREAM_PAGES: u32 = 40;

/// What the page walk does after a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkStep {
    Continue,
    Complete,
    /// More matches exist upstream but the page cap was reached.
    Capped,
}

fn walk_step(page: u32, batch: usize, collected: usize, total_count: u32) -> WalkStep {
    if batch == 0 || collected >= total_count as usize {
        WalkStep::Complete
    } else if page >= MAX_UPSTREAM_PAGES {
        WalkStep::Capped
    } else {
        WalkStep::Continue
    }
}

// ---------------------------------------------------------------------------
// API response types (Pokémon TCG JSON → Rust)
// ---------------------------------------------------------------------------

/// Envelope returned by `/v2/cards`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardsResponse {
    #[serde(default)]
    data: Vec<ApiCard>,
    #[serde(default)]
    total_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiCard {
    id: String,
    name: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    set: Option<ApiSet>,
    #[serde(default)]
    images: Option<ApiImages>,
    #[serde(default)]
    tcgplayer: Option<ApiTcgPlayer>,
}

#[derive(Debug, Deserialize)]
struct ApiSet {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiImages {
    #[serde(default)]
    small: String,
    #[serde(default)]
    large: String,
}

/// TCGplayer block. `id` may arrive as a number or a string, or not at all.
#[derive(Debug, Deserialize)]
struct ApiTcgPlayer {
    #[serde(default)]
    id: Option<serde_json::Value>,
    /// Finish key ("holofoil", "normal", ...) → price tier.
    #[serde(default)]
    prices: Option<HashMap<String, ApiPriceTier>>,
}

#[derive(Debug, Deserialize)]
struct ApiPriceTier {
    #[serde(default)]
    market: Option<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Pokémon TCG API catalog client.
pub struct PokemonTcgClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl PokemonTcgClient {
    pub fn new(api_key: SecretString, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("PokeProfit/0.1.0 (card-grading-advisor)")
            .build()
            .context("Failed to build HTTP client for Pokémon TCG API")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    // -- Internal helpers ------------------------------------------------

    /// Name-prefix wildcard filter. Quotes are stripped so the prefix
    /// cannot break out of the quoted term.
    fn name_filter(prefix: &str) -> String {
        let cleaned: String = prefix.trim().chars().filter(|c| *c != '"').collect();
        format!("name:\"{cleaned}*\"")
    }

    async fn fetch_page(&self, filter: &str, page: u32) -> Result<CardsResponse> {
        let url = format!(
            "{}/cards?q={}&page={}&pageSize={}",
            self.base_url,
            urlencoding::encode(filter),
            page,
            UPSTREAM_PAGE_SIZE,
        );

        debug!(url = %url, "Fetching catalog page");

        let resp = self
            .http
            .get(&url)
            .header("X-Api-Key", self.api_key.expose_secret().as_str())
            .send()
            .await
            .context("Pokémon TCG API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProfitError::Catalog(format!("Pokémon TCG API error {status}: {body}")).into());
        }

        resp.json()
            .await
            .context("Failed to parse Pokémon TCG cards response")
    }

    fn finish_from_key(key: &str) -> Option<Finish> {
        match key {
            "holofoil" => Some(Finish::Holofoil),
            "normal" => Some(Finish::Normal),
            "reverseHolofoil" => Some(Finish::ReverseHolofoil),
            "1stEditionHolofoil" => Some(Finish::FirstEditionHolofoil),
            "1stEditionNormal" => Some(Finish::FirstEditionNormal),
            "unlimitedHolofoil" => Some(Finish::UnlimitedHolofoil),
            _ => None,
        }
    }

    fn listing_id(raw: &serde_json::Value) -> Option<String> {
        match raw {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Convert an API card into a `CardRecord`, defaulting missing fields.
    fn to_card_record(c: ApiCard) -> CardRecord {
        let (listing_id, embedded_prices) = match c.tcgplayer {
            Some(tp) => {
                let id = tp.id.as_ref().and_then(Self::listing_id);
                let mut prices: Vec<FinishPrice> = tp
                    .prices
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(key, tier)| {
                        let finish = Self::finish_from_key(&key)?;
                        let market = Decimal::from_f64(tier.market?)?;
                        Some(FinishPrice { finish, market })
                    })
                    .collect();
                // HashMap order is arbitrary; keep output stable.
                prices.sort_by_key(|p| {
                    Finish::FALLBACK_ORDER
                        .iter()
                        .position(|f| *f == p.finish)
                        .unwrap_or(usize::MAX)
                });
                (id, prices)
            }
            None => (None, Vec::new()),
        };

        let (image_small, image_large) = c
            .images
            .map(|i| (i.small, i.large))
            .unwrap_or_default();

        CardRecord {
            id: c.id,
            name: c.name,
            set_name: c.set.map(|s| s.name).unwrap_or_else(|| "Unknown Set".to_string()),
            number: c.number,
            rarity: c.rarity.unwrap_or_else(|| "Common".to_string()),
            image_small,
            image_large,
            listing_id,
            embedded_prices,
        }
    }
}

// ---------------------------------------------------------------------------
// CardCatalog trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl CardCatalog for PokemonTcgClient {
    async fn search(&self, prefix: &str) -> Result<Vec<CardRecord>> {
        let filter = Self::name_filter(prefix);
        let mut cards = Vec::new();
        let mut page = 1;

        loop {
            let resp = self.fetch_page(&filter, page).await?;
            let batch = resp.data.len();
            let total = resp.total_count;
            cards.extend(resp.data.into_iter().map(Self::to_card_record));

            debug!(page, batch, collected = cards.len(), total, "Catalog page fetched");

            match walk_step(page, batch, cards.len(), total) {
                WalkStep::Continue => page += 1,
                WalkStep::Complete => break,
                WalkStep::Capped => {
                    warn!(
                        query = prefix,
                        pages = page,
                        collected = cards.len(),
                        total,
                        "Catalog page cap reached, results truncated"
                    );
                    break;
                }
            }
        }

        info!(query = prefix, found = cards.len(), "Catalog search complete");
        Ok(cards)
    }

    fn name(&self) -> &str {
        CATALOG_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
