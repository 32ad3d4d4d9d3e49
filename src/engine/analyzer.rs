//! Card analyzer — query → catalog → page → price → advice.
//!
//! Price lookups for the visible page run one card at a time. A slow
//! or failing lookup degrades that card to NO_DATA and never aborts the
//! page.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::pagination::paginate;
use crate::catalog::CardCatalog;
use crate::pricing::selector::PriceSelector;
use crate::strategy::GradingAdvisor;
use crate::types::{CardRecord, PriceLookupOutcome, RawPriceEstimate, Recommendation, Tier};

/// Everything shown for one card.
#[derive(Debug, Clone, Serialize)]
pub struct CardReport {
    pub card: CardRecord,
    pub raw_price: RawPriceEstimate,
    /// Estimated top-grade value; absent when there is no raw price.
    pub graded_estimate: Option<Decimal>,
    pub recommendation: Recommendation,
}

/// One page of analyzed search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub total_found: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub cards: Vec<CardReport>,
}

impl SearchReport {
    fn empty(query: &str, page: usize, page_size: usize) -> Self {
        Self {
            query: query.to_string(),
            total_found: 0,
            page,
            page_count: 0,
            page_size,
            cards: Vec::new(),
        }
    }
}

pub struct CardAnalyzer {
    catalog: Arc<dyn CardCatalog>,
    selector: PriceSelector,
    advisor: GradingAdvisor,
    page_size: usize,
}

impl CardAnalyzer {
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        selector: PriceSelector,
        advisor: GradingAdvisor,
        page_size: usize,
    ) -> Self {
        Self {
            catalog,
            selector,
            advisor,
            page_size,
        }
    }

    /// Search the catalog and analyze the requested 1-based page.
    ///
    /// Double quotes are stripped first. A query left blank makes no
    /// lookup. An `Err` means the catalog lookup itself failed; zero
    /// matches is an `Ok` with no cards.
    pub async fn search(&self, query: &str, page: usize) -> Result<SearchReport> {
        let normalized = normalize_query(query);
        let query = normalized.as_str();
        if query.is_empty() {
            debug!("Blank query, skipping catalog lookup");
            return Ok(SearchReport::empty(query, page, self.page_size));
        }

        let all_cards = self
            .catalog
            .search(query)
            .await
            .with_context(|| format!("Catalog lookup failed for {query:?} ({})", self.catalog.name()))?;

        let slice = paginate(&all_cards, page, self.page_size);

        let mut cards = Vec::with_capacity(slice.items.len());
        for card in &slice.items {
            cards.push(self.analyze_card(card).await);
        }

        let no_data = cards
            .iter()
            .filter(|c| c.recommendation.tier == Tier::NoData)
            .count();
        let failed = cards
            .iter()
            .filter(|c| matches!(c.raw_price.lookup, PriceLookupOutcome::Failed { .. }))
            .count();

        info!(
            query,
            found = slice.total,
            page,
            pages = slice.page_count,
            shown = cards.len(),
            no_data,
            lookup_failures = failed,
            "Search analyzed"
        );

        Ok(SearchReport {
            query: query.to_string(),
            total_found: slice.total,
            page,
            page_count: slice.page_count,
            page_size: self.page_size,
            cards,
        })
    }

    /// Price and advise a single card.
    pub async fn analyze_card(&self, card: &CardRecord) -> CardReport {
        let raw_price = self.selector.select(card).await;
        let (graded_estimate, recommendation) = if raw_price.has_data() {
            let (graded, rec) = self.advisor.advise_raw(raw_price.price);
            (Some(graded), rec)
        } else {
            (None, self.advisor.advise(Decimal::ZERO, Decimal::ZERO))
        };

        CardReport {
            card: card.clone(),
            raw_price,
            graded_estimate,
            recommendation,
        }
    }
}

/// Strip double quotes and surrounding whitespace.
fn normalize_query(query: &str) -> String {
    query.replace('"', "").trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
