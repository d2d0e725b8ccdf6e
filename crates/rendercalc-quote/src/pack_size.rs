//! Pack-size extraction from storefront variant titles such as `"25kg"`,
//! `"Bucket - 10 kg"` or `"5L"`.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Units tried, in order, when an accessory does not name its own.
pub const DEFAULT_PACK_UNITS: [&str; 4] = ["kg", "ltr", "l", "m2"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSize {
    pub amount: Decimal,
    pub unit: String,
}

impl std::fmt::Display for PackSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount.normalize(), self.unit)
    }
}

/// First `<number><unit>` token in `title` for any of `units`. Whitespace
/// between number and unit is allowed; the unit must end at a word boundary.
#[must_use]
pub fn parse_pack_size(title: &str, units: &[&str]) -> Option<PackSize> {
    let lower = title.to_lowercase();
    units.iter().find_map(|unit| {
        let unit = unit.to_lowercase();
        scan_size_unit(&lower, &unit).map(|amount| PackSize { amount, unit })
    })
}

/// Byte scanner over a pre-lowercased string.
fn scan_size_unit(lower: &str, unit: &str) -> Option<Decimal> {
    let bytes = lower.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    while i < len {
        let starts_number = bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit());
        let after_word = i == 0 || !bytes[i - 1].is_ascii_alphabetic();
        if !(starts_number && after_word) {
            i += 1;
            continue;
        }

        let num_start = i;
        let mut has_dot = false;
        while i < len && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !has_dot)) {
            if bytes[i] == b'.' {
                has_dot = true;
            }
            i += 1;
        }
        let num_str = &lower[num_start..i];

        let mut j = i;
        while j < len && bytes[j] == b' ' {
            j += 1;
        }

        if lower[j..].starts_with(unit) {
            let end = j + unit.len();
            let at_boundary = end >= len || !bytes[end].is_ascii_alphanumeric();
            if at_boundary {
                if let Ok(amount) = Decimal::from_str(num_str.trim_end_matches('.')) {
                    if amount > Decimal::ZERO {
                        return Some(amount);
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(title: &str, units: &[&str]) -> Option<String> {
        parse_pack_size(title, units).map(|p| p.to_string())
    }

    #[test]
    fn parses_compact_and_spaced_sizes() {
        assert_eq!(size("25kg", &["kg"]).as_deref(), Some("25kg"));
        assert_eq!(size("Bag - 10 KG", &["kg"]).as_deref(), Some("10kg"));
        assert_eq!(size("2.5kg tub", &["kg"]).as_deref(), Some("2.5kg"));
    }

    #[test]
    fn unit_must_end_at_word_boundary() {
        assert_eq!(size("6mm bead", &["m"]), None);
        assert_eq!(size("10 kgs", &["kg"]), None);
        assert_eq!(size("3m length", &["m"]).as_deref(), Some("3m"));
    }

    #[test]
    fn skips_numbers_not_followed_by_unit() {
        assert_eq!(size("Pack of 3 - 20kg", &["kg"]).as_deref(), Some("20kg"));
    }

    #[test]
    fn ignores_digits_glued_to_words() {
        assert_eq!(size("x5kg", &["kg"]), None);
    }

    #[test]
    fn default_units_tried_in_order() {
        assert_eq!(size("15L", &DEFAULT_PACK_UNITS).as_deref(), Some("15l"));
        assert_eq!(size("Default Title", &DEFAULT_PACK_UNITS), None);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert_eq!(size("0kg", &["kg"]), None);
    }
}
