//! # Nutrition Reference Tables
//!
//! Process-wide constant data consulted by the pipeline:
//!
//! - canonical per-100g values for well-known dishes, which take precedence over AI estimates
//! - gram weights of one piece for countable foods
//! - the smaller keyword table used by local recognition when no AI answer is available
//! - the component table used to split two-item meals ("chicken with rice")
//!
//! Canonical lookup is a case-insensitive substring match, so table order decides
//! between overlapping names ("cheeseburger" before "burger"). The other tables match
//! on word boundaries with an optional plural suffix, so "2 Rotis" finds "roti" while
//! "pineapple" does not find "apple".

use crate::food_model::NutritionProfile;
use crate::measurement_patterns::component_regex;
use regex::Regex;
use std::sync::LazyLock;

/// A named food with a reference nutrition profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodEntry {
    pub name: &'static str,
    pub profile: NutritionProfile,
}

/// Weight of one piece of a countable food
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceWeight {
    pub name: &'static str,
    pub grams: f64,
}

/// A meal component recognized inside longer descriptions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentFood {
    /// Stable key used by the two-component patterns
    pub key: &'static str,
    /// Regex alternation matching the component in text
    pub keyword: &'static str,
    /// Display name
    pub name: &'static str,
    /// Per-100g values
    pub profile: NutritionProfile,
}

/// Generic values returned when nothing else matches: 100 kcal, 5 g protein, 15 g carbs, 3 g fat
pub const PLACEHOLDER_PROFILE: NutritionProfile = NutritionProfile::per_unit(100.0, 5.0, 15.0, 3.0);

/// Canonical per-100g values, most specific names first
pub static CANONICAL_FOODS: &[FoodEntry] = &[
    FoodEntry {
        name: "margherita pizza",
        profile: NutritionProfile::per_100g(266.0, 11.4, 33.0, 10.0),
    },
    FoodEntry {
        name: "pepperoni pizza",
        profile: NutritionProfile::per_100g(298.0, 12.0, 34.0, 13.0),
    },
    FoodEntry {
        name: "pizza",
        profile: NutritionProfile::per_100g(270.0, 11.0, 33.0, 10.5),
    },
    FoodEntry {
        name: "chicken biryani",
        profile: NutritionProfile::per_100g(200.0, 9.0, 24.0, 7.5),
    },
    FoodEntry {
        name: "veg biryani",
        profile: NutritionProfile::per_100g(160.0, 3.5, 25.0, 5.0),
    },
    FoodEntry {
        name: "biryani",
        profile: NutritionProfile::per_100g(190.0, 8.0, 24.5, 6.5),
    },
    FoodEntry {
        name: "chicken breast",
        profile: NutritionProfile::per_100g(165.0, 31.0, 0.0, 3.6),
    },
    FoodEntry {
        name: "butter chicken",
        profile: NutritionProfile::per_100g(150.0, 12.0, 5.0, 9.0),
    },
    FoodEntry {
        name: "chicken curry",
        profile: NutritionProfile::per_100g(145.0, 13.0, 5.0, 8.0),
    },
    FoodEntry {
        name: "fried rice",
        profile: NutritionProfile::per_100g(165.0, 4.0, 28.0, 4.5),
    },
    FoodEntry {
        name: "brown rice",
        profile: NutritionProfile::per_100g(112.0, 2.3, 23.5, 0.8),
    },
    FoodEntry {
        name: "white rice",
        profile: NutritionProfile::per_100g(130.0, 2.7, 28.0, 0.3),
    },
    FoodEntry {
        name: "rice",
        profile: NutritionProfile::per_100g(130.0, 2.7, 28.0, 0.3),
    },
    FoodEntry {
        name: "roti",
        profile: NutritionProfile::per_100g(300.0, 9.8, 46.0, 8.5),
    },
    FoodEntry {
        name: "chapati",
        profile: NutritionProfile::per_100g(300.0, 9.8, 46.0, 8.5),
    },
    FoodEntry {
        name: "naan",
        profile: NutritionProfile::per_100g(290.0, 9.0, 50.0, 5.5),
    },
    FoodEntry {
        name: "paneer butter masala",
        profile: NutritionProfile::per_100g(230.0, 9.0, 8.0, 18.0),
    },
    FoodEntry {
        name: "paneer",
        profile: NutritionProfile::per_100g(265.0, 18.3, 1.2, 20.8),
    },
    FoodEntry {
        name: "dal",
        profile: NutritionProfile::per_100g(116.0, 9.0, 20.0, 0.4),
    },
    FoodEntry {
        name: "rajma",
        profile: NutritionProfile::per_100g(140.0, 8.5, 22.0, 2.0),
    },
    FoodEntry {
        name: "masala dosa",
        profile: NutritionProfile::per_100g(185.0, 4.5, 27.0, 6.5),
    },
    FoodEntry {
        name: "dosa",
        profile: NutritionProfile::per_100g(168.0, 3.9, 29.0, 3.7),
    },
    FoodEntry {
        name: "idli",
        profile: NutritionProfile::per_100g(145.0, 4.5, 30.0, 0.5),
    },
    FoodEntry {
        name: "samosa",
        profile: NutritionProfile::per_100g(262.0, 4.7, 32.0, 13.0),
    },
    FoodEntry {
        name: "cheeseburger",
        profile: NutritionProfile::per_100g(265.0, 14.0, 26.0, 12.0),
    },
    FoodEntry {
        name: "burger",
        profile: NutritionProfile::per_100g(255.0, 13.0, 27.0, 10.5),
    },
    FoodEntry {
        name: "french fries",
        profile: NutritionProfile::per_100g(312.0, 3.4, 41.0, 15.0),
    },
    FoodEntry {
        name: "pasta",
        profile: NutritionProfile::per_100g(158.0, 5.8, 31.0, 0.9),
    },
    FoodEntry {
        name: "oatmeal",
        profile: NutritionProfile::per_100g(71.0, 2.5, 12.0, 1.5),
    },
    FoodEntry {
        name: "greek yogurt",
        profile: NutritionProfile::per_100g(59.0, 10.0, 3.6, 0.4),
    },
    FoodEntry {
        name: "boiled egg",
        profile: NutritionProfile::per_100g(155.0, 13.0, 1.1, 11.0),
    },
    FoodEntry {
        name: "egg",
        profile: NutritionProfile::per_100g(143.0, 12.6, 0.7, 9.5),
    },
    FoodEntry {
        name: "salmon",
        profile: NutritionProfile::per_100g(208.0, 20.0, 0.0, 13.0),
    },
    FoodEntry {
        name: "banana",
        profile: NutritionProfile::per_100g(89.0, 1.1, 23.0, 0.3),
    },
    FoodEntry {
        name: "apple",
        profile: NutritionProfile::per_100g(52.0, 0.3, 14.0, 0.2),
    },
];

/// Gram weight of one piece, most specific names first
pub static PIECE_WEIGHTS: &[PieceWeight] = &[
    PieceWeight { name: "chicken breast", grams: 170.0 },
    PieceWeight { name: "masala dosa", grams: 150.0 },
    PieceWeight { name: "boiled egg", grams: 50.0 },
    PieceWeight { name: "roti", grams: 40.0 },
    PieceWeight { name: "chapati", grams: 40.0 },
    PieceWeight { name: "naan", grams: 90.0 },
    PieceWeight { name: "idli", grams: 40.0 },
    PieceWeight { name: "dosa", grams: 100.0 },
    PieceWeight { name: "samosa", grams: 100.0 },
    PieceWeight { name: "egg", grams: 50.0 },
    PieceWeight { name: "banana", grams: 120.0 },
    PieceWeight { name: "apple", grams: 180.0 },
    PieceWeight { name: "orange", grams: 130.0 },
    PieceWeight { name: "potato", grams: 150.0 },
    PieceWeight { name: "tomato", grams: 120.0 },
    PieceWeight { name: "onion", grams: 110.0 },
    PieceWeight { name: "toast", grams: 30.0 },
    PieceWeight { name: "bread", grams: 30.0 },
    PieceWeight { name: "pizza", grams: 110.0 },
    PieceWeight { name: "burger", grams: 150.0 },
];

/// Nouns that make a bare number mean a count of pieces ("3 eggs")
pub static COUNTABLE_FOODS: &[&str] = &[
    "apple", "banana", "orange", "egg", "bread", "potato", "tomato", "onion", "chicken", "fish",
    "beef",
];

/// Keyword table for local recognition without an AI answer
///
/// Per-100g like the canonical table; countable foods get their piece weight
/// from [`PIECE_WEIGHTS`].
pub static MOCK_FOODS: &[FoodEntry] = &[
    FoodEntry {
        name: "apple",
        profile: NutritionProfile::per_100g(52.8, 0.3, 13.9, 0.2),
    },
    FoodEntry {
        name: "banana",
        profile: NutritionProfile::per_100g(87.5, 1.1, 22.5, 0.3),
    },
    FoodEntry {
        name: "egg",
        profile: NutritionProfile::per_100g(156.0, 12.6, 1.2, 10.6),
    },
    FoodEntry {
        name: "bread",
        profile: NutritionProfile::per_100g(266.0, 9.0, 47.0, 3.3),
    },
    FoodEntry {
        name: "pizza",
        profile: NutritionProfile::per_100g(260.0, 11.0, 33.0, 9.0),
    },
    FoodEntry {
        name: "burger",
        profile: NutritionProfile::per_100g(236.0, 11.3, 19.3, 11.3),
    },
    FoodEntry {
        name: "samosa",
        profile: NutritionProfile::per_100g(262.0, 4.7, 32.0, 13.0),
    },
    FoodEntry {
        name: "roti",
        profile: NutritionProfile::per_100g(300.0, 9.8, 46.0, 8.5),
    },
    FoodEntry {
        name: "rice",
        profile: NutritionProfile::per_100g(130.0, 2.7, 28.0, 0.3),
    },
    FoodEntry {
        name: "dal",
        profile: NutritionProfile::per_100g(116.0, 9.0, 20.0, 0.4),
    },
    FoodEntry {
        name: "chicken",
        profile: NutritionProfile::per_100g(165.0, 31.0, 0.0, 3.6),
    },
    FoodEntry {
        name: "salad",
        profile: NutritionProfile::per_100g(20.0, 1.2, 3.5, 0.2),
    },
    FoodEntry {
        name: "oats",
        profile: NutritionProfile::per_100g(389.0, 16.9, 66.3, 6.9),
    },
    FoodEntry {
        name: "milk",
        profile: NutritionProfile::per_100g(61.0, 3.2, 4.8, 3.3),
    },
];

/// Components of two-item meals
pub static COMPONENT_FOODS: &[ComponentFood] = &[
    ComponentFood {
        key: "chicken",
        keyword: r"chicken(?:\s+breast)?",
        name: "chicken breast",
        profile: NutritionProfile::per_100g(165.0, 31.0, 0.0, 3.6),
    },
    ComponentFood {
        key: "rice",
        keyword: r"rice",
        name: "rice",
        profile: NutritionProfile::per_100g(130.0, 2.7, 28.0, 0.3),
    },
    ComponentFood {
        key: "dal",
        keyword: r"dal|daal|lentils?",
        name: "dal",
        profile: NutritionProfile::per_100g(116.0, 9.0, 20.0, 0.4),
    },
    ComponentFood {
        key: "rajma",
        keyword: r"rajma|kidney\s+beans",
        name: "rajma",
        profile: NutritionProfile::per_100g(140.0, 8.5, 22.0, 2.0),
    },
    ComponentFood {
        key: "roti",
        keyword: r"rotis?|chapatis?",
        name: "roti",
        profile: NutritionProfile::per_100g(300.0, 9.8, 46.0, 8.5),
    },
    ComponentFood {
        key: "paneer",
        keyword: r"paneer",
        name: "paneer",
        profile: NutritionProfile::per_100g(265.0, 18.3, 1.2, 20.8),
    },
    ComponentFood {
        key: "egg",
        keyword: r"eggs?",
        name: "egg",
        profile: NutritionProfile::per_100g(143.0, 12.6, 0.7, 9.5),
    },
    ComponentFood {
        key: "toast",
        keyword: r"toast|bread",
        name: "toast",
        profile: NutritionProfile::per_100g(265.0, 9.0, 49.0, 3.2),
    },
];

/// Two-component meals recognized locally, by component key
pub static TWO_COMPONENT_MEALS: &[(&str, &str)] = &[
    ("chicken", "rice"),
    ("dal", "rice"),
    ("rajma", "rice"),
    ("dal", "roti"),
    ("paneer", "roti"),
    ("egg", "toast"),
];

/// Compiled component regexes, in the order of [`COMPONENT_FOODS`]
pub static COMPONENT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    COMPONENT_FOODS
        .iter()
        .map(|component| {
            component_regex(component.keyword).expect("Component keyword pattern should be valid")
        })
        .collect()
});

/// Check whether `name` occurs in `text` as a whole word, allowing a plural suffix
///
/// `text` must already be lowercase.
pub fn contains_food_name(text: &str, name: &str) -> bool {
    text.match_indices(name).any(|(start, matched)| {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());

        let rest = &text[start + matched.len()..];
        let rest = rest
            .strip_prefix("es")
            .or_else(|| rest.strip_prefix('s'))
            .unwrap_or(rest);
        let after_ok = rest.chars().next().map_or(true, |c| !c.is_alphanumeric());

        before_ok && after_ok
    })
}

/// Find the first canonical entry whose name occurs anywhere in `text`
pub fn find_canonical(text: &str) -> Option<&'static FoodEntry> {
    let lower = text.to_lowercase();
    CANONICAL_FOODS
        .iter()
        .find(|entry| lower.contains(entry.name))
}

/// Find the first mock-table entry named in `text`
pub fn find_mock_food(text: &str) -> Option<&'static FoodEntry> {
    let lower = text.to_lowercase();
    MOCK_FOODS
        .iter()
        .find(|entry| contains_food_name(&lower, entry.name))
}

/// Weight of one piece of the food named in `text`, if known
pub fn piece_weight(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    PIECE_WEIGHTS
        .iter()
        .find(|entry| contains_food_name(&lower, entry.name))
        .map(|entry| entry.grams)
}

/// Check whether `text` names a food usually counted in pieces
pub fn is_countable(text: &str) -> bool {
    let lower = text.to_lowercase();
    COUNTABLE_FOODS
        .iter()
        .any(|name| contains_food_name(&lower, name))
        || piece_weight(&lower).is_some()
}

/// Look up a component by its key
pub fn component(key: &str) -> Option<(usize, &'static ComponentFood)> {
    COMPONENT_FOODS
        .iter()
        .enumerate()
        .find(|(_, component)| component.key == key)
}
