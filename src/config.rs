//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default so a partial file is valid. Secrets (API
//! keys) are referenced by env-var name in the config and resolved at
//! startup; a missing or blank secret is fatal.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;

use crate::strategy::AdvisorConfig;
use crate::types::ProfitError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: GeneralConfig,
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub advisor: AdvisorConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub name: String,
    /// Cards shown per results page.
    pub page_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "PokeProfit".to_string(),
            page_size: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pokemontcg.io/v2".to_string(),
            api_key_env: "POKEMON_TCG_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Substring identifying the preferred condition variant.
    pub near_mint_marker: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.justtcg.com/v1".to_string(),
            api_key_env: "JUST_TCG_KEY".to_string(),
            timeout_secs: 5,
            near_mint_marker: "Near Mint".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Sessions untouched for this long are dropped.
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            session_idle_secs: 7200,
        }
    }
}

/// The two API keys required before anything else can run.
pub struct Secrets {
    pub catalog_api_key: SecretString,
    pub pricing_api_key: SecretString,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.app.page_size == 0 {
            return Err(ProfitError::Config("app.page_size must be at least 1".into()).into());
        }
        if config.server.session_idle_secs == 0 {
            return Err(
                ProfitError::Config("server.session_idle_secs must be at least 1".into()).into(),
            );
        }
        Ok(config)
    }

    /// Resolve an environment variable name to a trimmed, non-empty secret.
    pub fn resolve_secret(env_name: &str) -> Result<SecretString, ProfitError> {
        match std::env::var(env_name) {
            Ok(v) if !v.trim().is_empty() => Ok(SecretString::new(v.trim().to_string())),
            _ => Err(ProfitError::MissingSecret {
                env: env_name.to_string(),
            }),
        }
    }

    /// Resolve both API keys. Either one missing halts startup.
    pub fn secrets(&self) -> Result<Secrets, ProfitError> {
        Ok(Secrets {
            catalog_api_key: Self::resolve_secret(&self.catalog.api_key_env)?,
            pricing_api_key: Self::resolve_secret(&self.pricing.api_key_env)?,
        })
    }
}
