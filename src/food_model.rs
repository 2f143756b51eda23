//! # Food and Nutrition Data Model
//!
//! This module defines the data structures flowing through the recognition
//! pipeline: parsed quantities, resolved portions, per-100g or per-unit
//! nutrition profiles, scaled nutrition and the final recognition record.
//!
//! ## Core Concepts
//!
//! - **ParsedQuantity**: the leading number and unit pulled out of a food description
//! - **Portion**: a resolved amount, either a weight in grams or a count of pieces
//! - **NutritionProfile**: calories and macros on an explicit [`Basis`]
//! - **RecognitionResult**: what the meal-logging caller receives
//!
//! ## Usage
//!
//! ```rust
//! use meal_recognition::food_model::{NutritionProfile, Portion, RecognitionResult, Source};
//! use meal_recognition::nutrition_scaler::scale;
//!
//! let rice = NutritionProfile::per_100g(130.0, 2.7, 28.0, 0.3);
//! let nutrition = scale(&rice, &Portion::Grams(200.0));
//!
//! let result = RecognitionResult::new("rice", nutrition, Source::MockSingle)
//!     .with_quantity(200.0, "g")
//!     .with_confidence(60);
//! assert_eq!(result.calories, 260);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Measurement units understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    // Weight units
    /// Grams
    Grams,
    /// Kilograms
    Kilograms,
    /// Ounces
    Ounces,
    /// Pounds
    Pounds,

    // Volume units, converted with fixed gram equivalents
    /// Cups
    Cups,
    /// Tablespoons
    Tablespoons,
    /// Teaspoons
    Teaspoons,

    // Count units
    /// Individual pieces/items
    Pieces,
    /// Slices
    Slices,
}

/// Quantity extracted from the start of a food description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    /// Leading numeric quantity, already normalized to grams for kilogram tokens
    pub quantity: f64,

    /// Unit matched directly after the number, if any
    pub unit: Option<Unit>,

    /// Everything after the quantity (or the whole text when no number was found)
    pub remainder: String,

    /// Whether the quantity was written by the user rather than defaulted
    pub explicit: bool,
}

/// A resolved amount of food
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Portion {
    /// Edible weight in grams
    Grams(f64),

    /// Countable items, with the weight of one item when it is known
    Count {
        /// Number of items
        count: f64,
        /// Weight of one item in grams
        grams_per_unit: Option<f64>,
    },
}

/// Output of the unit converter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Resolved amount used for scaling
    pub portion: Portion,

    /// User-facing unit for display
    pub unit: Unit,

    /// User-facing quantity expressed in `unit`
    pub quantity: f64,
}

/// Reference amount a nutrition profile is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Values describe 100 grams of the food
    PerHundredGrams,
    /// Values describe one piece of the food
    PerUnit,
}

/// Calories and macronutrients on an explicit basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionProfile {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// What the values are measured against
    pub basis: Basis,
}

/// Absolute nutrition for a logged portion
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaledNutrition {
    /// Energy in whole kcal
    pub calories: i64,
    /// Protein in grams, one decimal
    pub protein: f64,
    /// Carbohydrates in grams, one decimal
    pub carbs: f64,
    /// Fat in grams, one decimal
    pub fat: f64,
}

/// Provenance of a recognition result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// New AI schema carrying a backcompat block
    StructuredAi,
    /// Older flat AI schema
    LegacyAi,
    /// Local two-component pattern match
    MockMultiComponent,
    /// Local single-item keyword match
    MockSingle,
    /// Generic placeholder
    Fallback,
}

/// One component of a multi-item meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedComponent {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Record handed back to the meal-logging caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Display name of the food
    pub name: String,
    /// Energy in whole kcal
    pub calories: i64,
    /// Protein in grams, one decimal
    pub protein: f64,
    /// Carbohydrates in grams, one decimal
    pub carbs: f64,
    /// Fat in grams, one decimal
    pub fat: f64,
    /// Logged quantity expressed in `unit`
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: String,
    /// Confidence from 0 to 100
    pub confidence: u8,
    /// Which strategy produced this record
    pub source: Source,
    /// Per-item breakdown for meals with several components
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<RecognizedComponent>,
}

/// Round to one decimal place
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp a quantity to a finite, non-negative number
///
/// Negative, NaN and infinite values become 0 so they never reach the scaler.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl Unit {
    /// Get the short label used in results
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Ounces => "oz",
            Unit::Pounds => "lb",
            Unit::Cups => "cup",
            Unit::Tablespoons => "tbsp",
            Unit::Teaspoons => "tsp",
            Unit::Pieces => "piece",
            Unit::Slices => "slice",
        }
    }

    /// Check if this is a weight unit
    pub fn is_weight(&self) -> bool {
        matches!(
            self,
            Unit::Grams | Unit::Kilograms | Unit::Ounces | Unit::Pounds
        )
    }

    /// Check if this is a volume unit
    pub fn is_volume(&self) -> bool {
        matches!(self, Unit::Cups | Unit::Tablespoons | Unit::Teaspoons)
    }

    /// Check if this is a count unit
    pub fn is_count(&self) -> bool {
        matches!(self, Unit::Pieces | Unit::Slices)
    }
}

impl ParsedQuantity {
    /// Quantity the user did not write: one of the whole text
    pub fn implicit(text: &str) -> Self {
        Self {
            quantity: 1.0,
            unit: None,
            remainder: text.to_string(),
            explicit: false,
        }
    }
}

impl Portion {
    /// Weight in grams, if it can be known
    pub fn grams(&self) -> Option<f64> {
        match self {
            Portion::Grams(grams) => Some(*grams),
            Portion::Count {
                count,
                grams_per_unit,
            } => grams_per_unit.map(|per_unit| count * per_unit),
        }
    }

    /// Check if this portion is a count of items
    pub fn is_count(&self) -> bool {
        matches!(self, Portion::Count { .. })
    }
}

impl NutritionProfile {
    /// Create a profile describing 100 grams of food
    pub const fn per_100g(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            basis: Basis::PerHundredGrams,
        }
    }

    /// Create a profile describing one piece of food
    pub const fn per_unit(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            basis: Basis::PerUnit,
        }
    }

    /// Replace negative or non-finite values with 0
    pub fn sanitized(self) -> Self {
        Self {
            calories: sanitize_amount(self.calories),
            protein_g: sanitize_amount(self.protein_g),
            carbs_g: sanitize_amount(self.carbs_g),
            fat_g: sanitize_amount(self.fat_g),
            basis: self.basis,
        }
    }

    /// Energy implied by the macros (4/4/9 kcal per gram)
    ///
    /// Upstream AI output should land close to `calories`; this is never enforced.
    pub fn macro_calories(&self) -> f64 {
        4.0 * self.protein_g + 4.0 * self.carbs_g + 9.0 * self.fat_g
    }
}

impl ScaledNutrition {
    /// Build from raw values, applying the output rounding
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories: sanitize_amount(calories).round() as i64,
            protein: round_tenth(sanitize_amount(protein)),
            carbs: round_tenth(sanitize_amount(carbs)),
            fat: round_tenth(sanitize_amount(fat)),
        }
    }
}

impl Add for ScaledNutrition {
    type Output = ScaledNutrition;

    fn add(self, other: ScaledNutrition) -> ScaledNutrition {
        ScaledNutrition {
            calories: self.calories + other.calories,
            protein: round_tenth(self.protein + other.protein),
            carbs: round_tenth(self.carbs + other.carbs),
            fat: round_tenth(self.fat + other.fat),
        }
    }
}

impl std::iter::Sum for ScaledNutrition {
    fn sum<I: Iterator<Item = ScaledNutrition>>(iter: I) -> Self {
        iter.fold(ScaledNutrition::default(), |acc, item| acc + item)
    }
}

impl RecognitionResult {
    /// Create a result for one portion of food
    pub fn new(name: &str, nutrition: ScaledNutrition, source: Source) -> Self {
        Self {
            name: name.to_string(),
            calories: nutrition.calories,
            protein: nutrition.protein,
            carbs: nutrition.carbs,
            fat: nutrition.fat,
            quantity: 1.0,
            unit: Unit::Pieces.display_name().to_string(),
            confidence: 0,
            source,
            components: Vec::new(),
        }
    }

    /// Set the logged quantity and its unit
    pub fn with_quantity(mut self, quantity: f64, unit: &str) -> Self {
        self.quantity = round_tenth(sanitize_amount(quantity));
        self.unit = unit.to_string();
        self
    }

    /// Set the confidence, capped at 100
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }

    /// Attach a per-item breakdown
    pub fn with_components(mut self, components: Vec<RecognizedComponent>) -> Self {
        self.components = components;
        self
    }

    /// Nutrition values of this result
    pub fn nutrition(&self) -> ScaledNutrition {
        ScaledNutrition {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Source::StructuredAi => "structured_ai",
            Source::LegacyAi => "legacy_ai",
            Source::MockMultiComponent => "mock_multi_component",
            Source::MockSingle => "mock_single",
            Source::Fallback => "fallback",
        };
        write!(f, "{}", tag)
    }
}

impl fmt::Display for ScaledNutrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} kcal, {}g protein, {}g carbs, {}g fat",
            self.calories, self.protein, self.carbs, self.fat
        )
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {} ({}% confidence, {})",
            self.quantity,
            self.unit,
            self.name,
            self.nutrition(),
            self.confidence,
            self.source
        )
    }
}
