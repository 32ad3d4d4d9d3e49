//! Grading-arbitrage advisor.
//!
//! Estimates a top-grade (PSA 10) resale value from the raw price,
//! subtracts the grading fee, and classifies the resulting ROI into a
//! recommendation tier. Pure and deterministic.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::debug;

use crate::types::{Recommendation, Tier};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Rule constants for the advisor. Revisions of the product disagree on
/// these numbers; the defaults below are one consistent set. Read
/// directly from the `[advisor]` table of `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Estimated cost to submit one card for grading.
    pub grading_fee: Decimal,
    /// ROI (percent) above which a card may be STRONG_BUY.
    pub strong_buy_roi_pct: Decimal,
    /// STRONG_BUY also requires a raw price above this floor.
    pub strong_buy_price_floor: Decimal,
    /// ROI (percent) above which a card is SPECULATIVE.
    pub speculative_roi_pct: Decimal,
    /// Raw price above which the graded estimate is multiplicative.
    pub graded_breakpoint: Decimal,
    pub graded_multiplier: Decimal,
    /// Flat premium added to the raw price at or below the breakpoint.
    pub graded_flat_premium: Decimal,
    /// Classify negative ROI as AVOID instead of HOLD.
    pub strict_avoid: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            grading_fee: dec!(25),
            strong_buy_roi_pct: dec!(120),
            strong_buy_price_floor: dec!(20),
            speculative_roi_pct: dec!(40),
            graded_breakpoint: dec!(10),
            graded_multiplier: dec!(4),
            graded_flat_premium: dec!(40),
            strict_avoid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

pub struct GradingAdvisor {
    config: AdvisorConfig,
}

impl GradingAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Estimated top-grade value for a raw price. Saturates at
    /// `Decimal::MAX` instead of overflowing.
    pub fn estimate_graded(&self, raw_price: Decimal) -> Decimal {
        if raw_price > self.config.graded_breakpoint {
            raw_price.saturating_mul(self.config.graded_multiplier)
        } else {
            raw_price.saturating_add(self.config.graded_flat_premium)
        }
    }

    /// Graded value minus raw price minus the grading fee, saturating.
    pub fn profit(&self, raw_price: Decimal, graded_price: Decimal) -> Decimal {
        graded_price
            .saturating_sub(raw_price)
            .saturating_sub(self.config.grading_fee)
    }

    /// ROI in percent, or `None` when there is no usable raw price.
    /// A ratio too large for `Decimal` clamps to `MAX` or `MIN` by sign,
    /// so any positive raw price yields a value.
    pub fn roi_pct(&self, raw_price: Decimal, graded_price: Decimal) -> Option<Decimal> {
        if raw_price <= Decimal::ZERO {
            return None;
        }
        let profit = self.profit(raw_price, graded_price);
        let clamp = if profit.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        };
        Some(
            profit
                .checked_div(raw_price)
                .and_then(|r| r.checked_mul(dec!(100)))
                .unwrap_or(clamp),
        )
    }

    /// Classify a (raw, graded) pair into a recommendation.
    pub fn advise(&self, raw_price: Decimal, graded_price: Decimal) -> Recommendation {
        let Some(roi) = self.roi_pct(raw_price, graded_price) else {
            return Recommendation {
                tier: Tier::NoData,
                icon: Tier::NoData.icon().to_string(),
                rationale: "Price not available for analysis.".to_string(),
                profit: None,
                roi_pct: None,
            };
        };
        let profit = self.profit(raw_price, graded_price);
        let c = &self.config;

        let (tier, rationale) = if roi > c.strong_buy_roi_pct && raw_price > c.strong_buy_price_floor {
            (
                Tier::StrongBuy,
                format!(
                    "High ROI potential ({:.0}%). Significant gap between Raw and PSA 10.",
                    roi.to_f64().unwrap_or(0.0)
                ),
            )
        } else if roi > c.speculative_roi_pct {
            (
                Tier::Speculative,
                "Healthy margins. Buy if card centering is perfect.".to_string(),
            )
        } else if roi < Decimal::ZERO && c.strict_avoid {
            (
                Tier::Avoid,
                "Grading costs exceed the expected graded premium.".to_string(),
            )
        } else {
            (
                Tier::Hold,
                "Raw price is too close to graded value. High risk flip.".to_string(),
            )
        };

        debug!(
            raw = %raw_price,
            graded = %graded_price,
            roi = %roi.round_dp(1),
            tier = %tier,
            "Recommendation computed"
        );

        Recommendation {
            tier,
            icon: tier.icon().to_string(),
            rationale,
            profit: Some(profit.round_dp(2)),
            roi_pct: Some(roi.round_dp(2)),
        }
    }

    /// Estimate the graded value and advise in one step.
    pub fn advise_raw(&self, raw_price: Decimal) -> (Decimal, Recommendation) {
        let graded = self.estimate_graded(raw_price);
        (graded, self.advise(raw_price, graded))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
