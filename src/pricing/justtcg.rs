//! JustTCG pricing client.
//!
//! API: `GET https://api.justtcg.com/v1/cards?tcgplayerId={id}`
//! Auth: `x-api-key: {key}` header.
//! Only the first element of `data` is consulted; its `variants` array
//! is the price list.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::PriceProvider;
use crate::types::{PriceVariant, ProfitError};

const PROVIDER_NAME: &str = "justtcg";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CardsEnvelope {
    #[serde(default)]
    data: Vec<JustTcgCard>,
}

#[derive(Debug, Deserialize)]
struct JustTcgCard {
    #[serde(default)]
    variants: Vec<JustTcgVariant>,
}

#[derive(Debug, Deserialize)]
struct JustTcgVariant {
    #[serde(default)]
    condition: String,
    #[serde(default)]
    printing: Option<String>,
    #[serde(default)]
    price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct JustTcgClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl JustTcgClient {
    /// `timeout` bounds every lookup so one slow card cannot stall a page.
    pub fn new(api_key: SecretString, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("PokeProfit/0.1.0 (card-grading-advisor)")
            .build()
            .context("Failed to build HTTP client for JustTCG")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Flatten the envelope into variants. Variants with a missing or
    /// negative price are dropped.
    fn extract_variants(envelope: CardsEnvelope) -> Vec<PriceVariant> {
        envelope
            .data
            .into_iter()
            .next()
            .map(|card| card.variants)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| {
                let price = Decimal::from_f64(v.price?)?;
                if price.is_sign_negative() {
                    return None;
                }
                Some(PriceVariant {
                    condition: v.condition,
                    printing: v.printing,
                    price,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PriceProvider for JustTcgClient {
    async fn price_variants(&self, listing_id: &str) -> Result<Vec<PriceVariant>> {
        let url = format!(
            "{}/cards?tcgplayerId={}",
            self.base_url,
            urlencoding::encode(listing_id),
        );

        debug!(url = %url, "Fetching JustTCG variants");

        let resp = self
            .http
            .get(&url)
            .header("x-api-key", self.api_key.expose_secret().as_str())
            .send()
            .await
            .context("JustTCG request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProfitError::Pricing {
                listing_id: listing_id.to_string(),
                message: format!("JustTCG API error {status}: {body}"),
            }
            .into());
        }

        let envelope: CardsEnvelope = resp
            .json()
            .await
            .context("Failed to parse JustTCG cards response")?;

        Ok(Self::extract_variants(envelope))
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
