use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    ProjectType,
    SubstrateArea,
    SystemChoice,
    Beading,
    Accessories,
    Color,
    Review,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::ProjectType,
        Step::SubstrateArea,
        Step::SystemChoice,
        Step::Beading,
        Step::Accessories,
        Step::Color,
        Step::Review,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self.index() + 1).copied()
    }

    #[must_use]
    pub fn previous(self) -> Option<Step> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Fraction of the wizard reached, `(index + 1) / 7`.
    #[must_use]
    pub fn progress(self) -> Decimal {
        Decimal::from(self.index() + 1) / Decimal::from(Self::ALL.len())
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Step::ProjectType => "Project type",
            Step::SubstrateArea => "Substrate & area",
            Step::SystemChoice => "System",
            Step::Beading => "Beading",
            Step::Accessories => "Accessories",
            Step::Color => "Colour",
            Step::Review => "Review",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
