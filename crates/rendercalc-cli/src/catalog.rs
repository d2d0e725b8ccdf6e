//! Catalog inspection commands.

use std::path::Path;

use clap::Subcommand;
use rendercalc_core::Catalog;
use rendercalc_quote::{format_money, rank_systems};
use rust_decimal::Decimal;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Load and validate the catalog file, then print a summary
    Check,
    /// List systems suitable for a substrate, best score first
    Systems {
        /// Substrate id, e.g. `brick`
        #[arg(long)]
        substrate: String,
    },
}

/// Runs a `catalog` sub-command against the file at `path`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub(crate) fn run(path: &Path, command: CatalogCommands) -> anyhow::Result<()> {
    let catalog = rendercalc_core::load_catalog(path)?;
    match command {
        CatalogCommands::Check => print_summary(path, &catalog),
        CatalogCommands::Systems { substrate } => print_systems(&catalog, &substrate),
    }
    Ok(())
}

fn print_summary(path: &Path, catalog: &Catalog) {
    let accessories: usize = catalog.accessories.iter().map(|c| c.items.len()).sum();
    let beading: usize = catalog.beading.values().map(Vec::len).sum();

    println!("catalog ok: {}", path.display());
    println!("  currency        {}", catalog.currency);
    println!("  brands          {}", catalog.brands.len());
    println!("  systems         {}", catalog.systems().count());
    println!("  project types   {}", catalog.project_types.len());
    println!("  beading items   {beading}");
    println!("  accessories     {accessories}");
    println!("  fallback colours {}", catalog.fallback_colors.len());
}

fn print_systems(catalog: &Catalog, substrate: &str) {
    let ranked = rank_systems(catalog, substrate);
    if ranked.is_empty() {
        println!("no system supports substrate '{substrate}'");
        return;
    }

    println!("{:<7}{:<28}{:<16}STATIC PER M2", "SCORE", "SYSTEM", "TYPE");
    for (brand, system, score) in ranked {
        let per_square_metre: Decimal = system
            .components
            .iter()
            .filter_map(|c| c.static_price.checked_div(c.coverage_per_unit))
            .sum();
        println!(
            "{:<7}{:<28}{:<16}{}",
            score,
            format!("{}/{}", brand.key, system.key),
            system.render_type.to_string(),
            format_money(per_square_metre, &catalog.currency)
        );
    }
}
