//! # Quantity Parser
//!
//! Extracts the leading quantity and weight unit from a free-text food description.
//!
//! ## Features
//!
//! - Anchored gram patterns: "300g", "300 gm", "250 grams"
//! - Anchored kilogram patterns, normalized to grams: "1.5kg" -> 1500 g
//! - Generic leading numbers, decimals and simple fractions: "2 rotis", "1/2 cup dal"
//! - Descriptions without a number default to a quantity of 1
//!
//! Only the leading number is read. Quantities in the middle of a sentence
//! ("... with 100g rice") are handled by the multi-component matcher in
//! [`crate::mock_recognition`].
//!
//! ## Usage
//!
//! ```rust
//! use meal_recognition::food_model::Unit;
//! use meal_recognition::quantity_parser::parse_quantity;
//!
//! let parsed = parse_quantity("300g chicken biryani");
//! assert_eq!(parsed.quantity, 300.0);
//! assert_eq!(parsed.unit, Some(Unit::Grams));
//! assert_eq!(parsed.remainder, "chicken biryani");
//! ```

use crate::food_model::{ParsedQuantity, Unit};
use crate::measurement_patterns::{
    parse_number, GRAMS_REGEX, KILOGRAMS_REGEX, LEADING_NUMBER_REGEX,
};
use tracing::trace;

/// Parse the leading quantity of a food description
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    // Try gram tokens first
    if let Some(captures) = GRAMS_REGEX.captures(text) {
        if let Some(quantity) = parse_number(&captures[1]) {
            trace!(text, quantity, "Matched gram quantity");
            return ParsedQuantity {
                quantity,
                unit: Some(Unit::Grams),
                remainder: captures[2].trim().to_string(),
                explicit: true,
            };
        }
    }

    // Kilograms are normalized to grams so downstream code sees one weight unit
    if let Some(captures) = KILOGRAMS_REGEX.captures(text) {
        if let Some(quantity) = parse_number(&captures[1]) {
            trace!(text, quantity, "Matched kilogram quantity");
            return ParsedQuantity {
                quantity: quantity * 1000.0,
                unit: Some(Unit::Grams),
                remainder: captures[2].trim().to_string(),
                explicit: true,
            };
        }
    }

    if let Some(captures) = LEADING_NUMBER_REGEX.captures(text) {
        if let Some(quantity) = parse_number(&captures[1]) {
            trace!(text, quantity, "Matched leading number");
            return ParsedQuantity {
                quantity,
                unit: None,
                remainder: captures[2].trim().to_string(),
                explicit: true,
            };
        }
    }

    trace!(text, "No leading quantity, defaulting to 1");
    ParsedQuantity::implicit(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grams() {
        let parsed = parse_quantity("300g chicken biryani");
        assert_eq!(parsed.quantity, 300.0);
        assert_eq!(parsed.unit, Some(Unit::Grams));
        assert_eq!(parsed.remainder, "chicken biryani");
        assert!(parsed.explicit);

        let parsed = parse_quantity("150 gm paneer");
        assert_eq!(parsed.quantity, 150.0);
        assert_eq!(parsed.unit, Some(Unit::Grams));

        let parsed = parse_quantity("250 grams of oats");
        assert_eq!(parsed.quantity, 250.0);
        assert_eq!(parsed.remainder, "of oats");
    }

    #[test]
    fn test_parse_kilograms() {
        let parsed = parse_quantity("1.5kg mutton curry");
        assert_eq!(parsed.quantity, 1500.0);
        assert_eq!(parsed.unit, Some(Unit::Grams));
        assert_eq!(parsed.remainder, "mutton curry");

        let parsed = parse_quantity("2 kilograms rice");
        assert_eq!(parsed.quantity, 2000.0);
    }

    #[test]
    fn test_parse_generic_number() {
        let parsed = parse_quantity("2 rotis");
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.remainder, "rotis");

        let parsed = parse_quantity("1.5 cups rice");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.remainder, "cups rice");
    }

    #[test]
    fn test_parse_fraction() {
        let parsed = parse_quantity("1/2 cup dal");
        assert_eq!(parsed.quantity, 0.5);
        assert_eq!(parsed.remainder, "cup dal");
    }

    #[test]
    fn test_parse_no_number() {
        let parsed = parse_quantity("chicken biryani");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.remainder, "chicken biryani");
        assert!(!parsed.explicit);
    }

    #[test]
    fn test_only_leading_number_is_read() {
        let parsed = parse_quantity("chicken breast with 100g rice");
        assert_eq!(parsed.quantity, 1.0);
        assert!(!parsed.explicit);

        let parsed = parse_quantity("2 eggs and 3 toasts");
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.remainder, "eggs and 3 toasts");
    }

    #[test]
    fn test_negative_numbers_are_not_quantities() {
        let parsed = parse_quantity("-5 g sugar");
        assert_eq!(parsed.quantity, 1.0);
        assert!(!parsed.explicit);
        assert_eq!(parsed.remainder, "-5 g sugar");
    }

    #[test]
    fn test_zero_denominator_falls_back() {
        let parsed = parse_quantity("1/0 cup rice");
        assert_eq!(parsed.quantity, 1.0);
        assert!(!parsed.explicit);
    }

    #[test]
    fn test_weight_units_resolve_exactly() {
        for n in [0.0, 1.0, 2.5, 75.0, 300.0, 1250.0] {
            let grams = parse_quantity(&format!("{}g food", n));
            assert_eq!(grams.quantity, n);

            let gram_word = parse_quantity(&format!("{} gram food", n));
            assert_eq!(gram_word.quantity, n);

            let kilos = parse_quantity(&format!("{}kg food", n));
            assert_eq!(kilos.quantity, n * 1000.0);
        }
    }
}
