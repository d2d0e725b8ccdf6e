//! Static product catalog: brands, render systems, components, project types,
//! beading and accessories.
//!
//! Loaded once from YAML and validated before use. Lists whose order matters
//! to callers (brands, systems, components, accessory categories) are kept as
//! ordered `Vec`s with an explicit key field; validation enforces key
//! uniqueness so every key maps to exactly one record.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Component key whose quantity scales the colour surcharge.
pub const TOPCOAT_KEY: &str = "topcoat";

/// Highest value any single performance axis may take.
pub const MAX_PERFORMANCE_RATING: u8 = 10;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RenderType {
    #[default]
    ThinCoat,
    ScratchRender,
}

impl std::fmt::Display for RenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderType::ThinCoat => write!(f, "thin_coat"),
            RenderType::ScratchRender => write!(f, "scratch_render"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// ISO 4217 code used when no live price supplies one.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub brands: Vec<Brand>,
    pub project_types: Vec<ProjectType>,
    #[serde(default)]
    pub beading: BTreeMap<RenderType, Vec<BeadingItem>>,
    #[serde(default)]
    pub accessories: Vec<AccessoryCategory>,
    #[serde(default = "default_fallback_colors")]
    pub fallback_colors: Vec<FallbackColor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub key: String,
    pub name: String,
    pub systems: Vec<System>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub render_type: RenderType,
    pub suitable_substrates: Vec<String>,
    pub performance: Performance,
    pub components: Vec<Component>,
}

impl System {
    #[must_use]
    pub fn supports_substrate(&self, substrate_id: &str) -> bool {
        self.suitable_substrates.iter().any(|s| s == substrate_id)
    }

    #[must_use]
    pub fn component(&self, key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.key == key)
    }
}

/// Ratings on a 0–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    pub durability: u8,
    pub ease_of_application: u8,
    pub cost_effectiveness: u8,
    pub weather_resistance: u8,
}

impl Performance {
    /// Unweighted sum of the four axes (0–40).
    #[must_use]
    pub fn score(&self) -> u32 {
        u32::from(self.durability)
            + u32::from(self.ease_of_application)
            + u32::from(self.cost_effectiveness)
            + u32::from(self.weather_resistance)
    }

    fn axes(&self) -> [(&'static str, u8); 4] {
        [
            ("durability", self.durability),
            ("ease_of_application", self.ease_of_application),
            ("cost_effectiveness", self.cost_effectiveness),
            ("weather_resistance", self.weather_resistance),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Role within the system, e.g. `"primer"`, `"basecoat"`, `"topcoat"`.
    pub key: String,
    pub name: String,
    #[serde(alias = "shopify_handle")]
    pub product_handle: String,
    #[serde(alias = "price")]
    pub static_price: Decimal,
    /// Square metres one packaged unit treats.
    pub coverage_per_unit: Decimal,
    pub unit: String,
    #[serde(default)]
    pub has_color_variants: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub substrates: Vec<Substrate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substrate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeadingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "shopify_handle")]
    pub product_handle: String,
    /// Length of one bead in metres.
    pub length: Decimal,
    #[serde(alias = "price")]
    pub static_price: Decimal,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub default_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryCategory {
    pub key: String,
    pub name: String,
    pub items: Vec<AccessoryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryItem {
    pub id: String,
    pub name: String,
    #[serde(alias = "shopify_handle")]
    pub product_handle: String,
    #[serde(alias = "price")]
    pub static_price: Decimal,
    /// Fraction in `[0, 1)` taken off when bundled with a system.
    #[serde(default)]
    pub bundle_discount: Option<Decimal>,
    #[serde(default)]
    pub area_based: bool,
    #[serde(default)]
    pub coverage_per_unit: Option<Decimal>,
    /// Size token looked for in live variant titles, e.g. `"kg"`.
    #[serde(default)]
    pub pack_unit: Option<String>,
    /// Pack size (in `pack_unit`) that `coverage_per_unit` refers to.
    #[serde(default)]
    pub base_pack_size: Option<Decimal>,
}

impl AccessoryItem {
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.bundle_discount.unwrap_or(Decimal::ZERO)
    }
}

/// Colour offered when live colour variants cannot be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackColor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hex: Option<String>,
}

fn default_currency() -> String {
    "GBP".to_string()
}

fn default_fallback_colors() -> Vec<FallbackColor> {
    [
        ("white", "Pure White", "#FFFFFF"),
        ("cream", "Cream", "#F3E9D2"),
        ("light-grey", "Light Grey", "#D3D3D3"),
    ]
    .into_iter()
    .map(|(id, name, hex)| FallbackColor {
        id: id.to_string(),
        name: name.to_string(),
        hex: Some(hex.to_string()),
    })
    .collect()
}

impl Catalog {
    /// Every `(brand, system)` pair in catalog order.
    pub fn systems(&self) -> impl Iterator<Item = (&Brand, &System)> {
        self.brands
            .iter()
            .flat_map(|brand| brand.systems.iter().map(move |system| (brand, system)))
    }

    #[must_use]
    pub fn system(&self, brand_key: &str, system_key: &str) -> Option<(&Brand, &System)> {
        self.systems()
            .find(|(brand, system)| brand.key == brand_key && system.key == system_key)
    }

    /// First component (brand → system → component order) sold under `handle`.
    #[must_use]
    pub fn component_by_handle(&self, handle: &str) -> Option<&Component> {
        self.systems()
            .flat_map(|(_, system)| system.components.iter())
            .find(|component| component.product_handle == handle)
    }

    #[must_use]
    pub fn project_type(&self, id: &str) -> Option<&ProjectType> {
        self.project_types.iter().find(|p| p.id == id)
    }

    /// Substrates offered for a project type; empty for unknown ids.
    #[must_use]
    pub fn substrates_for(&self, project_type_id: &str) -> &[Substrate] {
        self.project_type(project_type_id)
            .map_or(&[], |p| p.substrates.as_slice())
    }

    #[must_use]
    pub fn beading_for(&self, render_type: RenderType) -> &[BeadingItem] {
        self.beading.get(&render_type).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn beading_item(&self, render_type: RenderType, id: &str) -> Option<&BeadingItem> {
        self.beading_for(render_type).iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn accessory(&self, id: &str) -> Option<&AccessoryItem> {
        self.accessories
            .iter()
            .flat_map(|category| category.items.iter())
            .find(|item| item.id == id)
    }
}

/// Load and validate the catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_yaml::from_str(content).map_err(ConfigError::CatalogFileParse)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation(message)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    if catalog.brands.is_empty() {
        return Err(invalid("catalog must define at least one brand".to_string()));
    }
    if catalog.project_types.is_empty() {
        return Err(invalid(
            "catalog must define at least one project type".to_string(),
        ));
    }

    let mut seen_brands = HashSet::new();
    for brand in &catalog.brands {
        if brand.key.trim().is_empty() || brand.name.trim().is_empty() {
            return Err(invalid("brand key and name must be non-empty".to_string()));
        }
        if !seen_brands.insert(brand.key.to_lowercase()) {
            return Err(invalid(format!("duplicate brand key: '{}'", brand.key)));
        }

        let mut seen_systems = HashSet::new();
        for system in &brand.systems {
            if !seen_systems.insert(system.key.as_str()) {
                return Err(invalid(format!(
                    "brand '{}' has duplicate system key '{}'",
                    brand.key, system.key
                )));
            }
            validate_system(&brand.key, system)?;
        }
    }

    let mut seen_project_types = HashSet::new();
    for project_type in &catalog.project_types {
        if !seen_project_types.insert(project_type.id.as_str()) {
            return Err(invalid(format!(
                "duplicate project type id: '{}'",
                project_type.id
            )));
        }
        let mut seen_substrates = HashSet::new();
        for substrate in &project_type.substrates {
            if !seen_substrates.insert(substrate.id.as_str()) {
                return Err(invalid(format!(
                    "project type '{}' lists substrate '{}' twice",
                    project_type.id, substrate.id
                )));
            }
        }
    }

    for (render_type, items) in &catalog.beading {
        let mut seen = HashSet::new();
        for bead in items {
            if !seen.insert(bead.id.as_str()) {
                return Err(invalid(format!(
                    "duplicate beading id '{}' for {render_type}",
                    bead.id
                )));
            }
            if bead.static_price.is_sign_negative() {
                return Err(invalid(format!("beading '{}' has a negative price", bead.id)));
            }
            if bead.length <= Decimal::ZERO {
                return Err(invalid(format!(
                    "beading '{}' must have a positive length",
                    bead.id
                )));
            }
        }
    }

    let mut seen_accessories = HashSet::new();
    for category in &catalog.accessories {
        for item in &category.items {
            if !seen_accessories.insert(item.id.as_str()) {
                return Err(invalid(format!("duplicate accessory id: '{}'", item.id)));
            }
            validate_accessory(item)?;
        }
    }

    let mut seen_colors = HashSet::new();
    for color in &catalog.fallback_colors {
        if color.id.trim().is_empty() || !seen_colors.insert(color.id.as_str()) {
            return Err(invalid(format!(
                "fallback colour ids must be unique and non-empty (got '{}')",
                color.id
            )));
        }
    }

    Ok(())
}

fn validate_system(brand_key: &str, system: &System) -> Result<(), ConfigError> {
    let label = format!("{brand_key}/{}", system.key);

    if system.suitable_substrates.is_empty() {
        return Err(invalid(format!(
            "system '{label}' must list at least one suitable substrate"
        )));
    }

    for (axis, rating) in system.performance.axes() {
        if rating > MAX_PERFORMANCE_RATING {
            return Err(invalid(format!(
                "system '{label}' has {axis} {rating}; must be 0-{MAX_PERFORMANCE_RATING}"
            )));
        }
    }

    if system.components.is_empty() {
        return Err(invalid(format!("system '{label}' has no components")));
    }

    let mut seen = HashSet::new();
    for component in &system.components {
        if !seen.insert(component.key.as_str()) {
            return Err(invalid(format!(
                "system '{label}' has duplicate component key '{}'",
                component.key
            )));
        }
        if component.product_handle.trim().is_empty() {
            return Err(invalid(format!(
                "component '{label}/{}' has an empty product handle",
                component.key
            )));
        }
        if component.static_price.is_sign_negative() {
            return Err(invalid(format!(
                "component '{label}/{}' has a negative price",
                component.key
            )));
        }
        if component.coverage_per_unit <= Decimal::ZERO {
            return Err(invalid(format!(
                "component '{label}/{}' must have a positive coverage_per_unit",
                component.key
            )));
        }
    }

    Ok(())
}

fn validate_accessory(item: &AccessoryItem) -> Result<(), ConfigError> {
    if item.static_price.is_sign_negative() {
        return Err(invalid(format!(
            "accessory '{}' has a negative price",
            item.id
        )));
    }

    if let Some(discount) = item.bundle_discount {
        if discount.is_sign_negative() || discount >= Decimal::ONE {
            return Err(invalid(format!(
                "accessory '{}' has bundle_discount {discount}; must be in [0, 1)",
                item.id
            )));
        }
    }

    if item.area_based && !item.coverage_per_unit.is_some_and(|c| c > Decimal::ZERO) {
        return Err(invalid(format!(
            "area-based accessory '{}' needs a positive coverage_per_unit",
            item.id
        )));
    }

    if item.base_pack_size.is_some_and(|s| s <= Decimal::ZERO) {
        return Err(invalid(format!(
            "accessory '{}' must have a positive base_pack_size",
            item.id
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
