//! PokeProfit — trading-card search and grading-arbitrage advisor.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! resolves the two required API keys (fatal if missing), wires the
//! catalog, pricing and advisor components, and serves the dashboard
//! until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use pokeprofit::catalog::pokemontcg::PokemonTcgClient;
use pokeprofit::config;
use pokeprofit::dashboard;
use pokeprofit::dashboard::routes::DashboardState;
use pokeprofit::engine::analyzer::CardAnalyzer;
use pokeprofit::pricing::justtcg::JustTcgClient;
use pokeprofit::pricing::selector::PriceSelector;
use pokeprofit::strategy::GradingAdvisor;

const BANNER: &str = r#"
  ____       _        ____             __ _ _
 |  _ \ ___ | | _____|  _ \ _ __ ___  / _(_) |_
 | |_) / _ \| |/ / _ \ |_) | '__/ _ \| |_| | __|
 |  __/ (_) |   <  __/  __/| | | (_) |  _| | |_
 |_|   \___/|_|\_\___|_|   |_|  \___/|_| |_|\__|

  Search & Portfolio Advisor v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");

    // Both keys are required; there is no partial-functionality mode.
    let secrets = match cfg.secrets() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "⚠️ Setup Error");
            return Err(e.into());
        }
    };

    info!(
        name = %cfg.app.name,
        page_size = cfg.app.page_size,
        catalog = %cfg.catalog.base_url,
        pricing = %cfg.pricing.base_url,
        pricing_timeout_secs = cfg.pricing.timeout_secs,
        "PokeProfit starting up"
    );

    // -- Initialise components -------------------------------------------

    let catalog = PokemonTcgClient::new(
        secrets.catalog_api_key,
        &cfg.catalog.base_url,
        Duration::from_secs(cfg.catalog.timeout_secs),
    )?;

    let pricing = JustTcgClient::new(
        secrets.pricing_api_key,
        &cfg.pricing.base_url,
        Duration::from_secs(cfg.pricing.timeout_secs),
    )?;

    let advisor_config = cfg.advisor.clone();
    info!(
        grading_fee = %advisor_config.grading_fee,
        strong_buy_roi = %advisor_config.strong_buy_roi_pct,
        price_floor = %advisor_config.strong_buy_price_floor,
        speculative_roi = %advisor_config.speculative_roi_pct,
        strict_avoid = advisor_config.strict_avoid,
        "Advisor rule loaded"
    );

    let analyzer = CardAnalyzer::new(
        Arc::new(catalog),
        PriceSelector::new(Arc::new(pricing), &cfg.pricing.near_mint_marker),
        GradingAdvisor::new(advisor_config),
        cfg.app.page_size,
    );

    let state = Arc::new(DashboardState::new(analyzer));

    dashboard::serve(
        state,
        cfg.server.port,
        Duration::from_secs(cfg.server.session_idle_secs),
    )
    .await?;

    info!("PokeProfit shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pokeprofit=info"));

    let json_logging = std::env::var("POKEPROFIT_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
