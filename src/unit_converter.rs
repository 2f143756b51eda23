//! # Unit Converter
//!
//! Resolves a parsed quantity into an edible weight in grams, or into a count of
//! pieces when the unit is countable.
//!
//! One gram-equivalent table is used everywhere in the crate: a cup is 150 g,
//! a tablespoon 15 g, a teaspoon 5 g, an ounce 28 g and a pound 454 g. Pieces and
//! slices are counts; they carry a gram weight only when the food has a known
//! piece weight (a roti is 40 g).

use crate::food_model::{sanitize_amount, Conversion, ParsedQuantity, Portion, Unit};
use crate::measurement_patterns::{
    CUP_REGEX, OUNCE_REGEX, PIECE_REGEX, POUND_REGEX, SERVING_REGEX, SLICE_REGEX,
    TABLESPOON_REGEX, TEASPOON_REGEX,
};
use crate::nutrition_tables::{is_countable, piece_weight};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;
pub const GRAMS_PER_CUP: f64 = 150.0;
pub const GRAMS_PER_TABLESPOON: f64 = 15.0;
pub const GRAMS_PER_TEASPOON: f64 = 5.0;
pub const GRAMS_PER_OUNCE: f64 = 28.0;
pub const GRAMS_PER_POUND: f64 = 454.0;

/// Unit keywords checked in the remainder text, in priority order
static UNIT_KEYWORDS: LazyLock<Vec<(&'static Regex, Unit)>> = LazyLock::new(|| {
    vec![
        (&*CUP_REGEX, Unit::Cups),
        (&*TABLESPOON_REGEX, Unit::Tablespoons),
        (&*TEASPOON_REGEX, Unit::Teaspoons),
        (&*OUNCE_REGEX, Unit::Ounces),
        (&*POUND_REGEX, Unit::Pounds),
        (&*SLICE_REGEX, Unit::Slices),
        (&*PIECE_REGEX, Unit::Pieces),
        (&*SERVING_REGEX, Unit::Pieces),
    ]
});

/// Unit tokens as written by users or returned by the AI provider
///
/// Count and volume tokens here are also found by [`detect_unit`] in free text.
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, Unit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Weight units
    map.insert("g", Unit::Grams);
    map.insert("gm", Unit::Grams);
    map.insert("gms", Unit::Grams);
    map.insert("gram", Unit::Grams);
    map.insert("grams", Unit::Grams);
    map.insert("kg", Unit::Kilograms);
    map.insert("kgs", Unit::Kilograms);
    map.insert("kilogram", Unit::Kilograms);
    map.insert("kilograms", Unit::Kilograms);
    map.insert("oz", Unit::Ounces);
    map.insert("ounce", Unit::Ounces);
    map.insert("ounces", Unit::Ounces);
    map.insert("lb", Unit::Pounds);
    map.insert("lbs", Unit::Pounds);
    map.insert("pound", Unit::Pounds);
    map.insert("pounds", Unit::Pounds);

    // Volume units
    map.insert("cup", Unit::Cups);
    map.insert("cups", Unit::Cups);
    map.insert("tbsp", Unit::Tablespoons);
    map.insert("tablespoon", Unit::Tablespoons);
    map.insert("tablespoons", Unit::Tablespoons);
    map.insert("tsp", Unit::Teaspoons);
    map.insert("teaspoon", Unit::Teaspoons);
    map.insert("teaspoons", Unit::Teaspoons);

    // Count units
    map.insert("piece", Unit::Pieces);
    map.insert("pieces", Unit::Pieces);
    map.insert("pc", Unit::Pieces);
    map.insert("pcs", Unit::Pieces);
    map.insert("item", Unit::Pieces);
    map.insert("items", Unit::Pieces);
    map.insert("serving", Unit::Pieces);
    map.insert("servings", Unit::Pieces);
    map.insert("bowl", Unit::Pieces);
    map.insert("bowls", Unit::Pieces);
    map.insert("plate", Unit::Pieces);
    map.insert("plates", Unit::Pieces);
    map.insert("slice", Unit::Slices);
    map.insert("slices", Unit::Slices);

    map
});

/// Parse a unit token such as "grams", "Cup" or "pcs"
pub fn parse_unit(token: &str) -> Option<Unit> {
    let token = token.trim().trim_end_matches('.').to_lowercase();
    UNIT_MAPPINGS.get(token.as_str()).copied()
}

/// Gram equivalent of one unit, for weight and volume units
pub fn grams_per_unit(unit: Unit) -> Option<f64> {
    match unit {
        Unit::Grams => Some(1.0),
        Unit::Kilograms => Some(GRAMS_PER_KILOGRAM),
        Unit::Ounces => Some(GRAMS_PER_OUNCE),
        Unit::Pounds => Some(GRAMS_PER_POUND),
        Unit::Cups => Some(GRAMS_PER_CUP),
        Unit::Tablespoons => Some(GRAMS_PER_TABLESPOON),
        Unit::Teaspoons => Some(GRAMS_PER_TEASPOON),
        Unit::Pieces | Unit::Slices => None,
    }
}

/// Find the first unit keyword named in the remainder text
pub fn detect_unit(remainder: &str) -> Option<Unit> {
    UNIT_KEYWORDS
        .iter()
        .find(|(regex, _)| regex.is_match(remainder))
        .map(|(_, unit)| *unit)
}

/// Infer a unit for a bare number
///
/// A single item is a piece, a fraction of one is grams, and larger numbers are
/// pieces only for foods that are usually counted.
pub fn infer_unit(quantity: f64, remainder: &str) -> Unit {
    if quantity == 1.0 {
        Unit::Pieces
    } else if quantity > 0.0 && quantity < 1.0 {
        Unit::Grams
    } else if is_countable(remainder) {
        Unit::Pieces
    } else {
        Unit::Grams
    }
}

/// Convert a quantity into a portion
///
/// A weight `candidate` converts directly; otherwise the remainder is searched
/// for a unit keyword and, failing that, the unit is inferred. Never fails:
/// negative or non-finite quantities are treated as 0.
pub fn convert(quantity: f64, remainder: &str, candidate: Option<Unit>) -> Conversion {
    let quantity = sanitize_amount(quantity);
    let unit = candidate
        .or_else(|| detect_unit(remainder))
        .unwrap_or_else(|| infer_unit(quantity, remainder));

    let portion = match grams_per_unit(unit) {
        Some(factor) => Portion::Grams(quantity * factor),
        None => Portion::Count {
            count: quantity,
            grams_per_unit: piece_weight(remainder),
        },
    };

    debug!(quantity, unit = unit.display_name(), ?portion, "Converted quantity");

    Conversion {
        portion,
        unit,
        quantity,
    }
}

/// Convert the output of [`crate::quantity_parser::parse_quantity`]
pub fn convert_parsed(parsed: &ParsedQuantity) -> Conversion {
    convert(parsed.quantity, &parsed.remainder, parsed.unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity_parser::parse_quantity;

    #[test]
    fn test_weight_candidate_converts_directly() {
        let conversion = convert(300.0, "chicken biryani", Some(Unit::Grams));
        assert_eq!(conversion.portion, Portion::Grams(300.0));
        assert_eq!(conversion.unit, Unit::Grams);

        let conversion = convert(1.5, "rice", Some(Unit::Kilograms));
        assert_eq!(conversion.portion, Portion::Grams(1500.0));
        assert_eq!(conversion.quantity, 1.5);
    }

    #[test]
    fn test_volume_keywords() {
        assert_eq!(convert(2.0, "cups rice", None).portion, Portion::Grams(300.0));
        assert_eq!(convert(2.0, "tbsp ghee", None).portion, Portion::Grams(30.0));
        assert_eq!(convert(3.0, "tsp sugar", None).portion, Portion::Grams(15.0));
        assert_eq!(convert(4.0, "oz steak", None).portion, Portion::Grams(112.0));
        assert_eq!(convert(1.0, "lb chicken", None).portion, Portion::Grams(454.0));
    }

    #[test]
    fn test_cup_outranks_later_keywords() {
        let conversion = convert(1.0, "cup of dal with 2 pieces", None);
        assert_eq!(conversion.unit, Unit::Cups);
    }

    #[test]
    fn test_count_keywords() {
        let conversion = convert(2.0, "slices bread", None);
        assert_eq!(conversion.unit, Unit::Slices);
        assert_eq!(
            conversion.portion,
            Portion::Count {
                count: 2.0,
                grams_per_unit: Some(30.0)
            }
        );

        let conversion = convert(3.0, "pieces paneer tikka", None);
        assert_eq!(conversion.unit, Unit::Pieces);
        assert_eq!(conversion.portion.grams(), None);
    }

    #[test]
    fn test_serving_keywords_are_counts() {
        let conversion = convert(2.0, "bowls poha", None);
        assert_eq!(conversion.unit, Unit::Pieces);
        assert_eq!(
            conversion.portion,
            Portion::Count {
                count: 2.0,
                grams_per_unit: None
            }
        );

        for (text, token) in [
            ("servings dal", "servings"),
            ("plates biryani", "plates"),
            ("pcs samosa", "pcs"),
            ("items", "items"),
        ] {
            assert_eq!(detect_unit(text), parse_unit(token), "{text}");
        }
    }

    #[test]
    fn test_unit_inference() {
        assert_eq!(infer_unit(1.0, "biryani"), Unit::Pieces);
        assert_eq!(infer_unit(0.5, "apple"), Unit::Grams);
        assert_eq!(infer_unit(3.0, "eggs"), Unit::Pieces);
        assert_eq!(infer_unit(3.0, "chicken"), Unit::Pieces);
        assert_eq!(infer_unit(200.0, "rice"), Unit::Grams);
    }

    #[test]
    fn test_two_rotis_weigh_eighty_grams() {
        let conversion = convert_parsed(&parse_quantity("2 rotis"));
        assert_eq!(conversion.unit, Unit::Pieces);
        assert_eq!(conversion.quantity, 2.0);
        assert_eq!(conversion.portion.grams(), Some(80.0));

        let conversion = convert_parsed(&parse_quantity("4 rotis"));
        assert_eq!(conversion.portion.grams(), Some(160.0));
    }

    #[test]
    fn test_invalid_quantities_become_zero() {
        let conversion = convert(-2.0, "cups rice", None);
        assert_eq!(conversion.portion, Portion::Grams(0.0));

        let conversion = convert(f64::NAN, "rice", Some(Unit::Grams));
        assert_eq!(conversion.portion, Portion::Grams(0.0));
    }

    #[test]
    fn test_parse_unit_tokens() {
        assert_eq!(parse_unit("Grams"), Some(Unit::Grams));
        assert_eq!(parse_unit("tbsp."), Some(Unit::Tablespoons));
        assert_eq!(parse_unit("serving"), Some(Unit::Pieces));
        assert_eq!(parse_unit("slices"), Some(Unit::Slices));
        assert_eq!(parse_unit("handful"), None);
    }
}
