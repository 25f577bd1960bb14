//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
///
/// Every field has a default, so an empty environment still loads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Currency engine configuration.
    #[serde(default)]
    pub currency: CurrencySettings,
    /// Exchange rate configuration.
    #[serde(default)]
    pub rates: RateSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Currency engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySettings {
    /// Fee percentage applied when the caller does not pass one.
    #[serde(default = "default_fee_percentage")]
    pub default_fee_percentage: Decimal,
    /// Rounding mode used for precision rounding and formatting.
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            default_fee_percentage: default_fee_percentage(),
            rounding: RoundingMode::default(),
        }
    }
}

fn default_fee_percentage() -> Decimal {
    Decimal::new(25, 3) // 2.5%
}

/// Rounding applied at a midpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.345 -> 2.35, -2.345 -> -2.35
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: 2.345 -> 2.34, 2.355 -> 2.36
    HalfEven,
}

/// Exchange rate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSettings {
    /// Seed the rate table with the bundled mock pairs.
    #[serde(default = "default_include_mock_rates")]
    pub include_mock_rates: bool,
    /// Rates layered over the seeded table.
    #[serde(default)]
    pub overrides: Vec<RateOverride>,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            include_mock_rates: default_include_mock_rates(),
            overrides: Vec::new(),
        }
    }
}

fn default_include_mock_rates() -> bool {
    true
}

/// A single configured rate (1 `from` = `rate` `to`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateOverride {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Exchange rate.
    pub rate: Decimal,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "monetra=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MONETRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
