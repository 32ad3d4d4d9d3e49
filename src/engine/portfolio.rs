//! Portfolio accumulator — the user's running list of tracked cards.
//!
//! Append-only except for a bulk clear. No de-duplication: adding the
//! same card twice records two entries.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::types::PortfolioEntry;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Portfolio {
    entries: Vec<PortfolioEntry>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: PortfolioEntry) {
        info!(
            name = %entry.name,
            set = %entry.set_name,
            price = format!("${:.2}", entry.buy_price),
            "Added to portfolio"
        );
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        info!(removed = self.entries.len(), "Portfolio cleared");
        self.entries.clear();
    }

    /// Total investment: sum of buy prices, zero when empty.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.buy_price).sum()
    }

    pub fn entries(&self) -> &[PortfolioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
