mod catalog;
mod quote;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogCommands;
use crate::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(name = "rendercalc-cli")]
#[command(about = "Render system quoting calculator")]
struct Cli {
    /// Catalog file to use instead of `RENDERCALC_CATALOG_PATH`
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk a quote through the wizard and print the costed result
    Quote {
        /// Project type id, e.g. `retrofit`
        #[arg(long)]
        project_type: String,

        /// Substrate id, e.g. `brick`
        #[arg(long)]
        substrate: String,

        /// Wall area in square metres
        #[arg(long)]
        area: Decimal,

        /// System as `brand/system`; defaults to the recommended one
        #[arg(long, value_parser = parse_system)]
        system: Option<(String, String)>,

        /// Beading as `id=quantity`; repeatable
        #[arg(long = "beading", value_parser = parse_beading)]
        beading: Vec<(String, u32)>,

        /// Accessory id to include; repeatable
        #[arg(long = "accessory")]
        accessories: Vec<String>,

        /// Topcoat colour id
        #[arg(long)]
        color: Option<String>,

        /// Fetch live prices and colours from the storefront
        #[arg(long)]
        live: bool,

        /// Create a storefront cart for the quote and print its checkout URL
        #[arg(long, requires = "live")]
        checkout: bool,
    },
    /// Catalog inspection commands
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

fn parse_system(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('/') {
        Some((brand, system)) if !brand.is_empty() && !system.is_empty() => {
            Ok((brand.to_owned(), system.to_owned()))
        }
        _ => Err(format!("expected brand/system, got '{raw}'")),
    }
}

fn parse_beading(raw: &str) -> Result<(String, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected id=quantity, got '{raw}'"))?;
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity in '{raw}': {e}"))?;
    Ok((id.trim().to_owned(), quantity))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rendercalc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());

    match cli.command {
        Some(Commands::Quote {
            project_type,
            substrate,
            area,
            system,
            beading,
            accessories,
            color,
            live,
            checkout,
        }) => {
            let catalog = rendercalc_core::load_catalog(&catalog_path)?;
            let args = QuoteArgs {
                project_type,
                substrate,
                area,
                system,
                beading,
                accessories,
                color,
                checkout,
            };
            quote::run_quote(&catalog, &config, live, &args).await?;
        }
        Some(Commands::Catalog { command }) => catalog::run(&catalog_path, command)?,
        None => println!("rendercalc-cli: run with --help for commands"),
    }

    Ok(())
}
