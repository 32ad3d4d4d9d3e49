//! Shared types for PokeProfit.
//!
//! These types form the data model used across all modules. Catalog,
//! pricing, strategy and engine modules depend on them without
//! depending on each other.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A card as returned by the catalog. Never created or mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    pub set_name: String,
    pub number: String,
    pub rarity: String,
    pub image_small: String,
    pub image_large: String,
    /// Marketplace (TCGplayer) listing id used by the pricing service.
    pub listing_id: Option<String>,
    /// Market prices embedded in the catalog record, keyed by finish.
    #[serde(default)]
    pub embedded_prices: Vec<FinishPrice>,
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) #{} [{}]",
            self.name, self.set_name, self.number, self.rarity
        )
    }
}

impl CardRecord {
    /// Embedded market price for a finish, if present and positive.
    pub fn embedded_price(&self, finish: Finish) -> Option<Decimal> {
        self.embedded_prices
            .iter()
            .find(|p| p.finish == finish)
            .map(|p| p.market)
            .filter(|m| *m > Decimal::ZERO)
    }
}

/// Print finish of a card, as used by the catalog's embedded price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Holofoil,
    Normal,
    ReverseHolofoil,
    FirstEditionHolofoil,
    FirstEditionNormal,
    UnlimitedHolofoil,
}

impl Finish {
    /// Fallback order when the pricing service has nothing usable.
    pub const FALLBACK_ORDER: [Finish; 6] = [
        Finish::Holofoil,
        Finish::Normal,
        Finish::ReverseHolofoil,
        Finish::FirstEditionHolofoil,
        Finish::FirstEditionNormal,
        Finish::UnlimitedHolofoil,
    ];
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finish::Holofoil => write!(f, "Holofoil"),
            Finish::Normal => write!(f, "Normal"),
            Finish::ReverseHolofoil => write!(f, "Reverse Holofoil"),
            Finish::FirstEditionHolofoil => write!(f, "1st Edition Holofoil"),
            Finish::FirstEditionNormal => write!(f, "1st Edition Normal"),
            Finish::UnlimitedHolofoil => write!(f, "Unlimited Holofoil"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishPrice {
    pub finish: Finish,
    pub market: Decimal,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// One priced condition/printing of a card from the pricing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceVariant {
    pub condition: String,
    pub printing: Option<String>,
    pub price: Decimal,
}

impl PriceVariant {
    pub fn new(condition: &str, price: Decimal) -> Self {
        Self {
            condition: condition.to_string(),
            printing: None,
            price,
        }
    }
}

impl fmt::Display for PriceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.printing {
            Some(p) => write!(f, "{} / {}: ${:.2}", self.condition, p, self.price),
            None => write!(f, "{}: ${:.2}", self.condition, self.price),
        }
    }
}

/// What happened when the pricing service was consulted for a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceLookupOutcome {
    /// Lookup succeeded and returned at least one variant.
    Priced { variants: usize },
    /// Lookup succeeded but returned no variants.
    Empty,
    /// Card had no marketplace listing id; no call was made.
    NoListing,
    /// Network, timeout or parse failure.
    Failed { reason: String },
}

/// Where a raw price estimate came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSource {
    Variant { condition: String },
    CatalogFallback { finish: Finish },
    None,
}

/// Single representative ungraded price for a card. Zero means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPriceEstimate {
    pub price: Decimal,
    pub source: PriceSource,
    pub lookup: PriceLookupOutcome,
}

impl RawPriceEstimate {
    pub fn none(lookup: PriceLookupOutcome) -> Self {
        Self {
            price: Decimal::ZERO,
            source: PriceSource::None,
            lookup,
        }
    }

    pub fn has_data(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    StrongBuy,
    Speculative,
    Hold,
    Avoid,
    NoData,
}

impl Tier {
    pub fn icon(&self) -> &'static str {
        match self {
            Tier::StrongBuy => "🔥",
            Tier::Speculative => "💎",
            Tier::Hold => "📊",
            Tier::Avoid => "🛑",
            Tier::NoData => "⚪",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::StrongBuy => write!(f, "STRONG BUY"),
            Tier::Speculative => write!(f, "SPECULATIVE"),
            Tier::Hold => write!(f, "HOLD"),
            Tier::Avoid => write!(f, "AVOID"),
            Tier::NoData => write!(f, "NO DATA"),
        }
    }
}

/// Advisor output for a single card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: Tier,
    pub icon: String,
    pub rationale: String,
    /// Estimated profit after the grading fee (absent for NO_DATA).
    pub profit: Option<Decimal>,
    /// ROI in percent (absent for NO_DATA).
    pub roi_pct: Option<Decimal>,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.icon, self.tier, self.rationale)
    }
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

/// A card the user chose to track, at the raw price shown when added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub name: String,
    pub set_name: String,
    pub buy_price: Decimal,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl PortfolioEntry {
    pub fn new(name: &str, set_name: &str, buy_price: Decimal) -> Self {
        Self {
            name: name.to_string(),
            set_name: set_name.to_string(),
            buy_price,
            added_at: Utc::now(),
        }
    }
}

impl fmt::Display for PortfolioEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ ${:.2}", self.name, self.set_name, self.buy_price)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PokeProfit.
#[derive(Debug, thiserror::Error)]
pub enum ProfitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing secret: environment variable {env} is not set or blank")]
    MissingSecret { env: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Pricing error ({listing_id}): {message}")]
    Pricing { listing_id: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
