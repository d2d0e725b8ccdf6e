//! The quoting wizard as an explicit state value.
//!
//! [`Wizard::dispatch`] applies one [`Action`] and returns the [`Effect`]s the
//! caller should run. It never performs I/O and never blocks; live prices and
//! colours arrive later as actions. Validation failures are not errors: they
//! are recorded per [`Field`] and the step does not advance.

mod action;
mod step;
mod validation;

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use rendercalc_core::{AccessoryItem, BeadingItem, Catalog, ColorVariant, Substrate, TOPCOAT_KEY};
use rust_decimal::Decimal;
use uuid::Uuid;

pub use action::{Action, Effect};
pub use step::Step;
pub use validation::Field;

use crate::aggregate::{cost_breakdown, CostBreakdown};
use crate::bundler::optimal_quantity;
use crate::error::QuoteError;
use crate::estimate::price_per_square_metre;
use crate::live::{LivePriceTable, PriceFeed};
use crate::price::resolve_item_price;
use crate::scoring::{find_compatible_systems, RankedSystemOffer};
use crate::selection::{AccessoryLine, BeadingLine, CartItem, Selection};
use validation::validate_step;

#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    selection: Selection,
    offers: Vec<RankedSystemOffer>,
    feed: PriceFeed,
    colors: Vec<ColorVariant>,
    /// Handle whose colour variants are being fetched.
    colors_pending: Option<String>,
    errors: BTreeMap<Field, &'static str>,
    cart: Vec<CartItem>,
}

fn beading_line(item: &BeadingItem, quantity: u32, live: &LivePriceTable) -> BeadingLine {
    let unit_price = resolve_item_price(&item.product_handle, item.static_price, live, None);
    BeadingLine {
        id: item.id.clone(),
        name: item.name.clone(),
        product_handle: item.product_handle.clone(),
        quantity,
        unit_price,
        line_total: Decimal::from(quantity) * unit_price,
    }
}

fn accessory_line(
    item: &AccessoryItem,
    area: Decimal,
    live: &LivePriceTable,
) -> Result<AccessoryLine, QuoteError> {
    Ok(AccessoryLine {
        id: item.id.clone(),
        name: item.name.clone(),
        product_handle: item.product_handle.clone(),
        bundle_discount: item.discount(),
        bundle: optimal_quantity(item, area, live)?,
    })
}

fn same_system(a: &RankedSystemOffer, b: &RankedSystemOffer) -> bool {
    a.brand_key == b.brand_key && a.system_key == b.system_key
}

fn fallback_colors(catalog: &Catalog) -> Vec<ColorVariant> {
    catalog.fallback_colors.iter().map(ColorVariant::from).collect()
}

impl Wizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with live prices already known.
    #[must_use]
    pub fn with_prices(table: LivePriceTable) -> Self {
        Self {
            feed: PriceFeed::with_table(table),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn offers(&self) -> &[RankedSystemOffer] {
        &self.offers
    }

    #[must_use]
    pub fn colors(&self) -> &[ColorVariant] {
        &self.colors
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<Field, &'static str> {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    #[must_use]
    pub fn live(&self) -> &LivePriceTable {
        self.feed.table()
    }

    #[must_use]
    pub fn is_loading_prices(&self) -> bool {
        self.feed.is_pending()
    }

    #[must_use]
    pub fn is_loading_colors(&self) -> bool {
        self.colors_pending.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> Decimal {
        self.step.progress()
    }

    #[must_use]
    pub fn cost_breakdown(&self) -> CostBreakdown {
        cost_breakdown(&self.selection)
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cost_breakdown().total
    }

    /// Selected system's cost per square metre, zero before one is chosen.
    #[must_use]
    pub fn price_per_square_metre(&self) -> Decimal {
        match (&self.selection.selected_offer, self.selection.area) {
            (Some(offer), Some(area)) => price_per_square_metre(offer.total_cost, area),
            _ => Decimal::ZERO,
        }
    }

    /// Substrates offered for the chosen project type.
    #[must_use]
    pub fn substrate_options<'a>(&self, catalog: &'a Catalog) -> &'a [Substrate] {
        self.selection
            .project_type_id
            .as_deref()
            .map_or(&[], |id| catalog.substrates_for(id))
    }

    /// Beading table for the selected system's render type.
    #[must_use]
    pub fn beading_options<'a>(&self, catalog: &'a Catalog) -> &'a [BeadingItem] {
        self.selection
            .selected_offer
            .as_ref()
            .map_or(&[], |offer| catalog.beading_for(offer.render_type))
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError`] when the action names something that does not
    /// exist or is not allowed at the current step. The state is unchanged
    /// in that case.
    pub fn dispatch(
        &mut self,
        catalog: &Catalog,
        action: Action,
    ) -> Result<Vec<Effect>, QuoteError> {
        match action {
            Action::SelectProjectType(id) => {
                if catalog.project_type(&id).is_none() {
                    return Err(QuoteError::UnknownProjectType(id));
                }
                self.selection.project_type_id = Some(id);
                self.selection.substrate_id = None;
                self.errors.remove(&Field::ProjectType);
                Ok(Vec::new())
            }
            Action::SelectSubstrate(id) => {
                if !self.substrate_options(catalog).iter().any(|s| s.id == id) {
                    return Err(QuoteError::UnknownSubstrate {
                        project_type: self.selection.project_type_id.clone().unwrap_or_default(),
                        substrate: id,
                    });
                }
                self.selection.substrate_id = Some(id);
                self.errors.remove(&Field::Substrate);
                Ok(Vec::new())
            }
            Action::SetArea(area) => {
                if self.offers.is_empty() {
                    self.selection.area = Some(area);
                    self.errors.remove(&Field::Area);
                    return Ok(Vec::new());
                }
                // Offers are priced for the old area; re-estimate everything.
                if area <= Decimal::ZERO {
                    return Err(QuoteError::InvalidArea(area));
                }
                let previous = self.selection.area.replace(area);
                self.errors.remove(&Field::Area);
                if let Err(e) = self.reprice(catalog) {
                    self.selection.area = previous;
                    self.reprice(catalog)?;
                    return Err(e);
                }
                Ok(Vec::new())
            }
            Action::Next => self.advance(catalog),
            Action::Back => {
                if let Some(previous) = self.step.previous() {
                    self.step = previous;
                }
                Ok(Vec::new())
            }
            Action::SelectSystem {
                brand_key,
                system_key,
            } => self.select_system(catalog, &brand_key, &system_key),
            Action::SetBeading { id, quantity } => {
                self.set_beading(catalog, &id, quantity)?;
                Ok(Vec::new())
            }
            Action::SetAccessory { id, included } => {
                self.set_accessory(catalog, &id, included)?;
                Ok(Vec::new())
            }
            Action::SelectColor(id) => {
                let color = self
                    .colors
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or(QuoteError::UnknownColor(id))?;
                self.selection.color = Some(color);
                Ok(Vec::new())
            }
            Action::PricesLoaded { ticket, products } => {
                if self.feed.apply(ticket, products) {
                    self.reprice(catalog)?;
                }
                Ok(Vec::new())
            }
            Action::PricesFailed { ticket, reason } => {
                tracing::warn!(
                    %ticket,
                    %reason,
                    "live price fetch failed; keeping static prices"
                );
                Ok(Vec::new())
            }
            Action::ColorsLoaded { handle, colors } => {
                if self.take_pending_colors(&handle) {
                    self.colors = if colors.is_empty() {
                        fallback_colors(catalog)
                    } else {
                        colors
                    };
                }
                Ok(Vec::new())
            }
            Action::ColorsFailed { handle, reason } => {
                if self.take_pending_colors(&handle) {
                    tracing::warn!(%handle, %reason, "colour fetch failed; using fallback colours");
                    self.colors = fallback_colors(catalog);
                }
                Ok(Vec::new())
            }
            Action::AddToCart => self.add_to_cart(),
        }
    }

    fn advance(&mut self, catalog: &Catalog) -> Result<Vec<Effect>, QuoteError> {
        let missing = validate_step(self.step, &self.selection);
        if !missing.is_empty() {
            for field in missing {
                self.errors.insert(field, field.message());
            }
            return Ok(Vec::new());
        }
        let Some(next) = self.step.next() else {
            return Err(QuoteError::InvalidTransition {
                action: "next",
                step: self.step,
            });
        };

        let effects = if self.step == Step::SubstrateArea {
            self.recommend(catalog)?
        } else {
            Vec::new()
        };
        self.step = next;
        Ok(effects)
    }

    /// Rank systems for the current substrate and area, then ask for live
    /// prices covering every product the rest of the wizard may price.
    fn recommend(&mut self, catalog: &Catalog) -> Result<Vec<Effect>, QuoteError> {
        let (Some(project_type), Some(substrate), Some(area)) = (
            self.selection.project_type_id.as_deref(),
            self.selection.substrate_id.as_deref(),
            self.selection.area,
        ) else {
            return Ok(Vec::new());
        };

        self.offers =
            find_compatible_systems(catalog, project_type, substrate, area, self.feed.table())?;
        self.reprice(catalog)?;

        let handles: BTreeSet<String> = self
            .offers
            .iter()
            .flat_map(|offer| offer.components.iter())
            .map(|c| c.product_handle.clone())
            .chain(
                catalog
                    .beading
                    .values()
                    .flatten()
                    .map(|b| b.product_handle.clone()),
            )
            .chain(
                catalog
                    .accessories
                    .iter()
                    .flat_map(|category| category.items.iter())
                    .map(|a| a.product_handle.clone()),
            )
            .collect();
        if handles.is_empty() {
            return Ok(Vec::new());
        }

        let ticket = self.feed.issue();
        tracing::debug!(%ticket, handles = handles.len(), "requesting live prices");
        Ok(vec![Effect::FetchPrices {
            ticket,
            handles: handles.into_iter().collect(),
        }])
    }

    /// Bring every derived price in line with the live table and area.
    fn reprice(&mut self, catalog: &Catalog) -> Result<(), QuoteError> {
        let Some(area) = self.selection.area.filter(|a| *a > Decimal::ZERO) else {
            return Ok(());
        };
        let live = self.feed.table();

        for offer in &mut self.offers {
            offer.reestimate(catalog, area, live)?;
        }

        if let Some(selected) = self.selection.selected_offer.take() {
            self.selection.selected_offer = self
                .offers
                .iter()
                .find(|offer| same_system(offer, &selected))
                .cloned();
            if self.selection.selected_offer.is_none() {
                tracing::debug!(
                    system = %selected.system_key,
                    "selected system no longer offered; clearing dependent choices"
                );
                self.selection.beading.clear();
                self.selection.color = None;
                self.colors.clear();
                self.colors_pending = None;
            }
        }

        if let Some(offer) = &self.selection.selected_offer {
            for line in &mut self.selection.beading {
                if let Some(item) = catalog.beading_item(offer.render_type, &line.id) {
                    *line = beading_line(item, line.quantity, live);
                }
            }
        }

        for line in &mut self.selection.accessories {
            if let Some(item) = catalog.accessory(&line.id) {
                *line = accessory_line(item, area, live)?;
            }
        }
        Ok(())
    }

    fn select_system(
        &mut self,
        catalog: &Catalog,
        brand_key: &str,
        system_key: &str,
    ) -> Result<Vec<Effect>, QuoteError> {
        let offer = self
            .offers
            .iter()
            .find(|o| o.brand_key == brand_key && o.system_key == system_key)
            .cloned()
            .ok_or_else(|| QuoteError::UnknownSystem {
                brand: brand_key.to_string(),
                system: system_key.to_string(),
            })?;
        self.errors.remove(&Field::SelectedSystem);

        let unchanged = self
            .selection
            .selected_offer
            .as_ref()
            .is_some_and(|current| same_system(current, &offer));
        if unchanged {
            return Ok(Vec::new());
        }

        self.selection.beading.clear();
        self.selection.color = None;
        self.colors.clear();
        self.colors_pending = None;

        let color_handle = offer
            .component(TOPCOAT_KEY)
            .filter(|topcoat| topcoat.has_color_variants)
            .map(|topcoat| topcoat.product_handle.clone());
        self.selection.selected_offer = Some(offer);

        match color_handle {
            Some(handle) => {
                self.colors_pending = Some(handle.clone());
                Ok(vec![Effect::FetchColors { handle }])
            }
            None => {
                self.colors = fallback_colors(catalog);
                Ok(Vec::new())
            }
        }
    }

    fn set_beading(
        &mut self,
        catalog: &Catalog,
        id: &str,
        quantity: u32,
    ) -> Result<(), QuoteError> {
        let item = self
            .beading_options(catalog)
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| QuoteError::UnknownBeading(id.to_string()))?;

        let position = self.selection.beading.iter().position(|b| b.id == id);
        match (position, quantity) {
            (Some(i), 0) => {
                self.selection.beading.remove(i);
            }
            (None, 0) => {}
            (Some(i), _) => {
                self.selection.beading[i] = beading_line(item, quantity, self.feed.table());
            }
            (None, _) => {
                let line = beading_line(item, quantity, self.feed.table());
                self.selection.beading.push(line);
            }
        }
        Ok(())
    }

    fn set_accessory(
        &mut self,
        catalog: &Catalog,
        id: &str,
        included: bool,
    ) -> Result<(), QuoteError> {
        let item = catalog
            .accessory(id)
            .ok_or_else(|| QuoteError::UnknownAccessory(id.to_string()))?;
        let position = self.selection.accessories.iter().position(|a| a.id == id);

        if !included {
            if let Some(i) = position {
                self.selection.accessories.remove(i);
            }
            return Ok(());
        }

        let area = self.selection.area.unwrap_or(Decimal::ZERO);
        let line = accessory_line(item, area, self.feed.table())?;
        match position {
            Some(i) => self.selection.accessories[i] = line,
            None => self.selection.accessories.push(line),
        }
        Ok(())
    }

    /// `true` if `handle` is the colour request still outstanding.
    fn take_pending_colors(&mut self, handle: &str) -> bool {
        if self.colors_pending.as_deref() == Some(handle) {
            self.colors_pending = None;
            true
        } else {
            tracing::debug!(handle, "discarding colours for a system no longer selected");
            false
        }
    }

    fn add_to_cart(&mut self) -> Result<Vec<Effect>, QuoteError> {
        if self.step != Step::Review {
            return Err(QuoteError::InvalidTransition {
                action: "add to cart",
                step: self.step,
            });
        }
        if self.selection.selected_offer.is_none() {
            self.errors
                .insert(Field::SelectedSystem, Field::SelectedSystem.message());
            return Ok(Vec::new());
        }

        let item = CartItem {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total: self.total(),
            selection: std::mem::take(&mut self.selection),
        };
        tracing::info!(cart_item = %item.id, total = %item.total, "added quote to cart");
        self.cart.push(item.clone());
        self.reset();
        Ok(vec![Effect::CartReady(item)])
    }

    /// Back to the first step with nothing chosen. Live prices and the
    /// session cart are kept.
    pub fn reset(&mut self) {
        self.step = Step::default();
        self.selection = Selection::default();
        self.offers.clear();
        self.colors.clear();
        self.colors_pending = None;
        self.errors.clear();
    }
}

#[cfg(test)]
#[path = "wizard_test.rs"]
mod tests;
