//! End-to-end scenarios through `CardAnalyzer` and the session store.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use pokeprofit::engine::analyzer::CardAnalyzer;
use pokeprofit::engine::session::SessionStore;
use pokeprofit::pricing::selector::PriceSelector;
use pokeprofit::strategy::{AdvisorConfig, GradingAdvisor};
use pokeprofit::types::{
    Finish, FinishPrice, PortfolioEntry, PriceLookupOutcome, PriceSource, Tier,
};

use crate::mock_sources::{card, pikachu_catalog, variant, MockCatalog, MockPricing};

fn analyzer(catalog: MockCatalog, pricing: MockPricing) -> CardAnalyzer {
    CardAnalyzer::new(
        Arc::new(catalog),
        PriceSelector::new(Arc::new(pricing), "Near Mint"),
        GradingAdvisor::new(AdvisorConfig::default()),
        10,
    )
}

#[tokio::test]
async fn pikachu_three_pages_second_page_shows_items_11_to_20() {
    let catalog = MockCatalog::with_cards(pikachu_catalog());
    let pricing = MockPricing::new();
    let calls = pricing.calls();
    let analyzer = analyzer(catalog, pricing);

    let report = analyzer.search("Pikachu", 2).await.unwrap();

    assert_eq!(report.total_found, 23);
    assert_eq!(report.page_count, 3);
    assert_eq!(report.cards.len(), 10);
    let numbers: Vec<String> = report.cards.iter().map(|c| c.card.number.clone()).collect();
    let expected: Vec<String> = (11..=20).map(|n| n.to_string()).collect();
    assert_eq!(numbers, expected);

    // Only the nine visible cards with a listing id were priced
    assert_eq!(calls.lock().unwrap().len(), 9);

    // Card 15 has no listing → zero raw price → NO_DATA ⚪
    let no_listing = report.cards.iter().find(|c| c.card.number == "15").unwrap();
    assert_eq!(no_listing.raw_price.price, Decimal::ZERO);
    assert_eq!(no_listing.raw_price.lookup, PriceLookupOutcome::NoListing);
    assert_eq!(no_listing.recommendation.tier, Tier::NoData);
    assert_eq!(no_listing.recommendation.icon, "⚪");
}

#[tokio::test]
async fn page_past_end_is_empty_not_error() {
    let analyzer = analyzer(MockCatalog::with_cards(pikachu_catalog()), MockPricing::new());
    let report = analyzer.search("Pikachu", 4).await.unwrap();
    assert_eq!(report.total_found, 23);
    assert!(report.cards.is_empty());
}

#[tokio::test]
async fn mixed_price_sources_and_tiers() {
    let cards = vec![
        card("Pikachu", 1, Some("NM"), Vec::new()),
        card("Pikachu", 2, Some("DMG"), Vec::new()),
        card(
            "Pikachu",
            3,
            Some("DOWN"),
            vec![FinishPrice { finish: Finish::Normal, market: dec!(100) }],
        ),
        card("Pikachu", 4, Some("NONE"), Vec::new()),
    ];
    let pricing = MockPricing::new()
        .with_variants(
            "NM",
            vec![variant("Lightly Played", dec!(20)), variant("Near Mint", dec!(30))],
        )
        .with_variants("DMG", vec![variant("Damaged", dec!(3))])
        .failing_for("DOWN");
    let analyzer = analyzer(MockCatalog::with_cards(cards), pricing);

    let report = analyzer.search("pika", 1).await.unwrap();
    assert_eq!(report.cards.len(), 4);

    // Near Mint $30 → graded $120 → ROI ~217% → STRONG BUY
    let nm = &report.cards[0];
    assert_eq!(nm.raw_price.price, dec!(30));
    assert_eq!(nm.graded_estimate, Some(dec!(120)));
    assert_eq!(nm.recommendation.tier, Tier::StrongBuy);

    // Damaged $3 (first available) → graded $43 → ROI 500% but under floor
    let dmg = &report.cards[1];
    assert_eq!(dmg.raw_price.price, dec!(3));
    assert_eq!(dmg.recommendation.tier, Tier::Speculative);

    // Lookup failed → catalog fallback $100 → graded $400 → ROI 275% → STRONG BUY
    let down = &report.cards[2];
    assert!(matches!(down.raw_price.lookup, PriceLookupOutcome::Failed { .. }));
    assert_eq!(
        down.raw_price.source,
        PriceSource::CatalogFallback { finish: Finish::Normal }
    );
    assert_eq!(down.recommendation.tier, Tier::StrongBuy);

    // Lookup empty, no fallback → NO DATA
    let none = &report.cards[3];
    assert_eq!(none.raw_price.lookup, PriceLookupOutcome::Empty);
    assert_eq!(none.recommendation.tier, Tier::NoData);
}

#[tokio::test]
async fn catalog_failure_is_distinct_from_no_results() {
    let catalog = MockCatalog::with_cards(pikachu_catalog());
    catalog.set_error("catalog unavailable");
    let analyzer_err = analyzer(catalog, MockPricing::new());
    assert!(analyzer_err.search("Pikachu", 1).await.is_err());

    let catalog = MockCatalog::with_cards(pikachu_catalog());
    let searches = catalog.searches();
    let analyzer_empty = analyzer(catalog, MockPricing::new());
    let report = analyzer_empty.search("Mewtwo", 1).await.unwrap();
    assert_eq!(report.total_found, 0);
    assert_eq!(searches.lock().unwrap().as_slice(), ["Mewtwo".to_string()]);
}

#[tokio::test]
async fn selected_cards_accumulate_in_session_portfolio() {
    let pricing = MockPricing::new().with_variants("L1", vec![variant("Near Mint", dec!(12))]);
    let analyzer = analyzer(MockCatalog::with_cards(pikachu_catalog()), pricing);
    let sessions = SessionStore::new();
    let session = sessions.open().await;
    let other = sessions.open().await;

    let report = analyzer.search("Pikachu", 1).await.unwrap();
    let first = &report.cards[0];
    assert_eq!(first.raw_price.price, dec!(12));

    let entry = PortfolioEntry::new(&first.card.name, &first.card.set_name, first.raw_price.price);
    sessions.with_portfolio(session, |p| p.add(entry.clone())).await;
    sessions.with_portfolio(session, |p| p.add(entry)).await;

    assert_eq!(sessions.portfolio(session).await.unwrap().total(), dec!(24));
    assert!(sessions.portfolio(other).await.unwrap().is_empty());

    // add(a); add(b); clear(); add(c) → total == c
    sessions
        .with_portfolio(session, |p| {
            p.clear();
            p.add(PortfolioEntry::new("Raichu", "Test Set", dec!(7.77)));
        })
        .await;
    assert_eq!(sessions.portfolio(session).await.unwrap().total(), dec!(7.77));

    assert!(sessions.end(session).await);
    assert_eq!(sessions.len().await, 1);
}
