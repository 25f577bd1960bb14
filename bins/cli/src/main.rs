//! Monetra command-line tool.
//!
//! Usage:
//!   monetra list [--fiat | --crypto]       - List registered currencies
//!   monetra format <amount> <currency>     - Format an amount for display
//!   monetra parse <raw> <currency>         - Parse user input with bounds checks
//!   monetra validate <amount> <currency>   - Validate an amount (JSON result)
//!   monetra round <amount> <currency>      - Round to currency precision
//!   monetra fee <amount> <currency>        - Transaction fee
//!   monetra convert <amount> <from> <to>   - Convert between currencies
//!   monetra rates                          - Show the configured rate table

use std::fmt::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use monetra_core::currency::amount::parse_decimal;
use monetra_core::currency::{CurrencyConverter, CurrencyService, StaticRateTable};
use monetra_shared::config::LoggingConfig;
use monetra_shared::{AppConfig, AppError, AppResult};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "monetra")]
#[command(about = "Format, parse, validate and convert monetary amounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered currencies.
    List {
        /// Only fiat currencies.
        #[arg(long, conflicts_with = "crypto")]
        fiat: bool,
        /// Only crypto currencies.
        #[arg(long)]
        crypto: bool,
    },
    /// Format an amount for display.
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        currency: String,
    },
    /// Parse user input such as "$1,234.56".
    Parse {
        #[arg(allow_hyphen_values = true)]
        raw: String,
        currency: String,
    },
    /// Validate an amount without failing.
    Validate {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        currency: String,
    },
    /// Round an amount to currency precision.
    Round {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        currency: String,
    },
    /// Compute the transaction fee for an amount.
    Fee {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        currency: String,
        /// Fee percentage, e.g. 0.025 for 2.5%.
        #[arg(long, allow_negative_numbers = true)]
        percentage: Option<String>,
    },
    /// Convert an amount between currencies.
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: String,
        from: String,
        to: String,
        /// Round the result to the target currency's precision.
        #[arg(long)]
        round: bool,
    },
    /// Show the configured rate table.
    Rates,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    match run(cli.command, &config).await {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {err}", err.error_code());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

async fn run(command: Command, config: &AppConfig) -> AppResult<String> {
    let service = CurrencyService::from_settings(&config.currency)?;

    match command {
        Command::List { fiat, crypto } => {
            let registry = service.registry();
            let configs = if fiat {
                registry.list_fiat()
            } else if crypto {
                registry.list_crypto()
            } else {
                registry.list_all().iter().collect()
            };

            let mut output = String::new();
            for c in configs {
                let kind = if c.is_crypto { "crypto" } else { "fiat" };
                writeln!(
                    output,
                    "{:<5} {:<2} {:<14} {:>2}dp {:<6} [{}, {}]",
                    c.code.as_str(),
                    c.symbol,
                    c.name,
                    c.decimals,
                    kind,
                    c.min_amount,
                    c.max_amount
                )
                .map_err(|e| AppError::Internal(e.to_string()))?;
            }
            Ok(output.trim_end().to_string())
        }
        Command::Format { amount, currency } => Ok(service.format(amount.as_str(), &currency)?),
        Command::Parse { raw, currency } => Ok(service.parse(&raw, &currency)?.to_string()),
        Command::Validate { amount, currency } => {
            let result = service.validate(amount.as_str(), &currency);
            serde_json::to_string_pretty(&result).map_err(|e| AppError::Internal(e.to_string()))
        }
        Command::Round { amount, currency } => {
            let amount = parse_decimal(&amount)?;
            Ok(service.round(amount, &currency)?.to_string())
        }
        Command::Fee {
            amount,
            currency,
            percentage,
        } => {
            let amount = parse_decimal(&amount)?;
            let fee = match percentage {
                Some(percentage) => {
                    let percentage = parse_decimal(&percentage)?;
                    service.transaction_fee_with_percentage(amount, &currency, percentage)?
                }
                None => service.transaction_fee(amount, &currency)?,
            };
            Ok(fee.to_string())
        }
        Command::Convert {
            amount,
            from,
            to,
            round,
        } => {
            let amount = parse_decimal(&amount)?;
            let table = StaticRateTable::from_settings(&config.rates)?;
            let converter = CurrencyConverter::new(service.registry_handle(), Arc::new(table));
            let converted = if round {
                converter.convert_rounded(amount, &from, &to).await?
            } else {
                converter.convert(amount, &from, &to).await?
            };
            info!(%amount, %from, %to, %converted, "Conversion complete");
            Ok(converted.to_string())
        }
        Command::Rates => {
            let table = StaticRateTable::from_settings(&config.rates)?;
            Ok(table
                .rates()
                .iter()
                .map(|r| format!("{:<10} {}", r.pair_key(), r.rate))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
