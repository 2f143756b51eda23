//! # Measurement Patterns Module
//!
//! This module contains the regex patterns used to pull quantities and units
//! out of free-text food descriptions.

use lazy_static::lazy_static;
use regex::Regex;

/// Number forms accepted at the start of a description: integers, decimals and simple fractions
pub const NUMBER_PATTERN: &str = r"\d+/\d+|\d*\.\d+|\d+";

/// Leading number immediately followed by a gram token ("300g", "300 gm", "300 grams")
pub const GRAMS_PATTERN: &str = r"(?i)^\s*(\d*\.\d+|\d+)\s*(?:grams?|gms?|g)\b\s*(.*)$";

/// Leading number immediately followed by a kilogram token ("1.5kg", "2 kilograms")
pub const KILOGRAMS_PATTERN: &str = r"(?i)^\s*(\d*\.\d+|\d+)\s*(?:kilograms?|kgs?)\b\s*(.*)$";

/// Any leading number, with the rest of the text as remainder
pub const LEADING_NUMBER_PATTERN: &str = r"(?is)^\s*(\d+/\d+|\d*\.\d+|\d+)\s*(.*)$";

// Unit keywords looked up in the remainder, in priority order
pub const CUP_PATTERN: &str = r"(?i)\bcups?\b";
pub const TABLESPOON_PATTERN: &str = r"(?i)\b(?:tbsp|tbs|tablespoons?)\b";
pub const TEASPOON_PATTERN: &str = r"(?i)\b(?:tsp|teaspoons?)\b";
pub const OUNCE_PATTERN: &str = r"(?i)\b(?:oz|ounces?)\b";
pub const POUND_PATTERN: &str = r"(?i)\b(?:lbs?|pounds?)\b";
pub const SLICE_PATTERN: &str = r"(?i)\bslices?\b";
pub const PIECE_PATTERN: &str = r"(?i)\b(?:pieces?|pcs?)\b";
pub const SERVING_PATTERN: &str = r"(?i)\b(?:servings?|bowls?|plates?|items?)\b";

/// Quantity written in front of a component inside a longer sentence ("with 100 g rice")
///
/// `{keyword}` is replaced with the component's keyword alternation.
pub const COMPONENT_QUANTITY_TEMPLATE: &str = r"(?i)(?:(\d+/\d+|\d*\.\d+|\d+)\s*(grams?|gms?|g|kgs?|cups?|tbsp|tsp|pieces?|slices?)?\s+(?:of\s+)?)?(?:[a-z]+\s+)?\b(?:{keyword})\b";

// Lazy static regexes to avoid recompilation
lazy_static! {
    pub static ref GRAMS_REGEX: Regex =
        Regex::new(GRAMS_PATTERN).expect("Grams pattern should be valid");
    pub static ref KILOGRAMS_REGEX: Regex =
        Regex::new(KILOGRAMS_PATTERN).expect("Kilograms pattern should be valid");
    pub static ref LEADING_NUMBER_REGEX: Regex =
        Regex::new(LEADING_NUMBER_PATTERN).expect("Leading number pattern should be valid");
    pub static ref CUP_REGEX: Regex = Regex::new(CUP_PATTERN).expect("Cup pattern should be valid");
    pub static ref TABLESPOON_REGEX: Regex =
        Regex::new(TABLESPOON_PATTERN).expect("Tablespoon pattern should be valid");
    pub static ref TEASPOON_REGEX: Regex =
        Regex::new(TEASPOON_PATTERN).expect("Teaspoon pattern should be valid");
    pub static ref OUNCE_REGEX: Regex =
        Regex::new(OUNCE_PATTERN).expect("Ounce pattern should be valid");
    pub static ref POUND_REGEX: Regex =
        Regex::new(POUND_PATTERN).expect("Pound pattern should be valid");
    pub static ref SLICE_REGEX: Regex =
        Regex::new(SLICE_PATTERN).expect("Slice pattern should be valid");
    pub static ref PIECE_REGEX: Regex =
        Regex::new(PIECE_PATTERN).expect("Piece pattern should be valid");
    pub static ref SERVING_REGEX: Regex =
        Regex::new(SERVING_PATTERN).expect("Serving pattern should be valid");
}

/// Build the regex matching a component keyword together with the quantity in front of it
pub fn component_regex(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&COMPONENT_QUANTITY_TEMPLATE.replace("{keyword}", keyword))
}

/// Parse a number in one of the forms of [`NUMBER_PATTERN`]
///
/// Fractions with a zero denominator yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Some((numerator, denominator)) = text.split_once('/') {
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }
    text.parse().ok()
}
