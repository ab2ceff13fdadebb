//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// CRM backend configuration.
    pub api: ApiConfig,
    /// Contract creation settings.
    #[serde(default)]
    pub contracts: ContractsConfig,
    /// Invoice submission settings.
    #[serde(default)]
    pub invoices: InvoicesConfig,
}

/// CRM backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://crm.example.kz`.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token. Falls back to `PROMETHEUS_TOKEN` when absent.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Contract creation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    /// Attempts made when the backend reports a duplicate contract number.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Fixed pause between attempts, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    400
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Invoice submission settings.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoicesConfig {
    /// Invoice amount above which a signed contract must be attached.
    #[serde(default = "default_contract_threshold")]
    pub contract_threshold: rust_decimal::Decimal,
}

fn default_contract_threshold() -> rust_decimal::Decimal {
    rust_decimal::Decimal::from(393_200)
}

impl Default for InvoicesConfig {
    fn default() -> Self {
        Self {
            contract_threshold: default_contract_threshold(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `PROMETHEUS__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROMETHEUS").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Bearer token from the config, or from `PROMETHEUS_TOKEN`.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.api
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var("PROMETHEUS_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }
}
