//! The `quote` command: drives a [`Wizard`] from command line choices.
//!
//! The wizard never does I/O itself. Its effects are carried out here against
//! the storefront (when `--live` is given) and fed back in as actions.

mod render;

use std::collections::VecDeque;

use anyhow::Context;
use rendercalc_core::{AppConfig, Catalog};
use rendercalc_quote::{checkout_lines, Action, CartItem, Effect, Step, Wizard};
use rendercalc_shopify::StorefrontClient;
use rust_decimal::Decimal;

/// Choices for one quote, already parsed from the command line.
#[derive(Debug, Clone)]
pub(crate) struct QuoteArgs {
    pub project_type: String,
    pub substrate: String,
    pub area: Decimal,
    pub system: Option<(String, String)>,
    pub beading: Vec<(String, u32)>,
    pub accessories: Vec<String>,
    pub color: Option<String>,
    pub checkout: bool,
}

/// A wizard plus the means to run its effects.
pub(crate) struct Session<'a> {
    catalog: &'a Catalog,
    storefront: Option<&'a StorefrontClient>,
    wizard: Wizard,
    ready: Option<CartItem>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(catalog: &'a Catalog, storefront: Option<&'a StorefrontClient>) -> Self {
        Self {
            catalog,
            storefront,
            wizard: Wizard::new(),
            ready: None,
        }
    }

    pub(crate) fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Applies `action` and every action its effects produce.
    pub(crate) async fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            for effect in self.wizard.dispatch(self.catalog, action)? {
                if let Some(follow_up) = self.perform(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
        Ok(())
    }

    /// Moves to the next step, failing with the wizard's field messages if
    /// the current step is incomplete.
    async fn next(&mut self) -> anyhow::Result<()> {
        let from = self.wizard.step();
        self.dispatch(Action::Next).await?;
        if self.wizard.step() == from {
            let messages: Vec<&str> = self.wizard.errors().values().copied().collect();
            anyhow::bail!("cannot leave step '{from}': {}", messages.join("; "));
        }
        Ok(())
    }

    async fn perform(&mut self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::FetchPrices { ticket, handles } => {
                let storefront = self.storefront?;
                Some(match storefront.products_by_handles(&handles).await {
                    Ok(products) => Action::PricesLoaded { ticket, products },
                    Err(e) => Action::PricesFailed {
                        ticket,
                        reason: e.to_string(),
                    },
                })
            }
            Effect::FetchColors { handle } => {
                let Some(storefront) = self.storefront else {
                    // Offline: an empty answer installs the fallback colours.
                    return Some(Action::ColorsLoaded {
                        handle,
                        colors: Vec::new(),
                    });
                };
                Some(match storefront.variants_by_handle(&handle).await {
                    Ok(Some(variants)) => Action::ColorsLoaded {
                        handle,
                        colors: variants.color_variants,
                    },
                    Ok(None) => Action::ColorsFailed {
                        handle,
                        reason: "product not found".to_owned(),
                    },
                    Err(e) => Action::ColorsFailed {
                        handle,
                        reason: e.to_string(),
                    },
                })
            }
            Effect::CartReady(item) => {
                self.ready = Some(item);
                None
            }
        }
    }

    /// Walks every step with `args` and stops at review.
    ///
    /// # Errors
    ///
    /// Returns an error if a choice is unknown to the catalog, no system fits
    /// the substrate, or a step's required fields are missing.
    pub(crate) async fn fill(&mut self, args: &QuoteArgs) -> anyhow::Result<()> {
        self.dispatch(Action::SelectProjectType(args.project_type.clone()))
            .await?;
        self.next().await?;

        self.dispatch(Action::SelectSubstrate(args.substrate.clone()))
            .await?;
        self.dispatch(Action::SetArea(args.area)).await?;
        self.next().await?;

        let (brand_key, system_key) = match &args.system {
            Some(choice) => choice.clone(),
            None => {
                let recommended = self.wizard.offers().first().with_context(|| {
                    format!("no compatible system for substrate '{}'", args.substrate)
                })?;
                (
                    recommended.brand_key.clone(),
                    recommended.system_key.clone(),
                )
            }
        };
        self.dispatch(Action::SelectSystem {
            brand_key,
            system_key,
        })
        .await?;
        self.next().await?;

        for (id, quantity) in &args.beading {
            self.dispatch(Action::SetBeading {
                id: id.clone(),
                quantity: *quantity,
            })
            .await?;
        }
        self.next().await?;

        for id in &args.accessories {
            self.dispatch(Action::SetAccessory {
                id: id.clone(),
                included: true,
            })
            .await?;
        }
        self.next().await?;

        if let Some(color) = &args.color {
            self.dispatch(Action::SelectColor(color.clone())).await?;
        }
        self.next().await?;

        debug_assert_eq!(self.wizard.step(), Step::Review);
        Ok(())
    }

    /// Adds the reviewed quote to the session cart and returns it.
    pub(crate) async fn add_to_cart(&mut self) -> anyhow::Result<CartItem> {
        self.dispatch(Action::AddToCart).await?;
        self.ready
            .take()
            .context("quote was not accepted into the cart")
    }
}

/// Runs the `quote` command end to end.
///
/// # Errors
///
/// Returns an error if `--live` is given without storefront credentials, the
/// wizard rejects a choice, or checkout fails.
pub(crate) async fn run_quote(
    catalog: &Catalog,
    config: &AppConfig,
    live: bool,
    args: &QuoteArgs,
) -> anyhow::Result<()> {
    let storefront = if live {
        Some(StorefrontClient::from_config(config)?.context(
            "--live needs SHOPIFY_STORE_DOMAIN and SHOPIFY_STOREFRONT_ACCESS_TOKEN",
        )?)
    } else {
        None
    };

    let mut session = Session::new(catalog, storefront.as_ref());
    session.fill(args).await?;
    render::print_quote(catalog, session.wizard());

    let item = session.add_to_cart().await?;
    if !args.checkout {
        return Ok(());
    }
    let Some(storefront) = storefront.as_ref() else {
        anyhow::bail!("--checkout needs --live");
    };

    let lines = checkout_lines(&item, session.wizard().live());
    if lines.is_empty() {
        anyhow::bail!("no product in this quote is available on the storefront");
    }
    let cart = storefront.create_cart(&lines).await?;
    println!();
    println!("Checkout: {}", cart.checkout_url);
    Ok(())
}

#[cfg(test)]
#[path = "quote_test.rs"]
mod tests;
