use rust_decimal::Decimal;
use serde::Serialize;

use super::Step;
use crate::selection::Selection;

/// A user-editable field that can block forward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ProjectType,
    Substrate,
    Area,
    SelectedSystem,
}

impl Field {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Field::ProjectType => "Please select a project type",
            Field::Substrate => "Please select a substrate type",
            Field::Area => "Please enter a valid area greater than 0",
            Field::SelectedSystem => "Please select a system to proceed",
        }
    }
}

/// Fields that must be fixed before leaving `step`.
pub(crate) fn validate_step(step: Step, selection: &Selection) -> Vec<Field> {
    let mut missing = Vec::new();
    match step {
        Step::ProjectType => {
            if selection.project_type_id.is_none() {
                missing.push(Field::ProjectType);
            }
        }
        Step::SubstrateArea => {
            if selection.substrate_id.is_none() {
                missing.push(Field::Substrate);
            }
            if !selection.area.is_some_and(|a| a > Decimal::ZERO) {
                missing.push(Field::Area);
            }
        }
        Step::SystemChoice => {
            if selection.selected_offer.is_none() {
                missing.push(Field::SelectedSystem);
            }
        }
        Step::Beading | Step::Accessories | Step::Color | Step::Review => {}
    }
    missing
}
