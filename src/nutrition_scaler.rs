//! # Nutrition Scaler
//!
//! Scales a nutrition profile to a resolved portion. The factor depends on the
//! profile's [`Basis`] and the kind of [`Portion`]:
//!
//! | basis    | portion                     | factor       |
//! |----------|-----------------------------|--------------|
//! | per 100g | grams (or count with weight)| grams / 100  |
//! | per 100g | count, weight unknown       | count        |
//! | per unit | count                       | count        |
//! | per unit | grams                       | grams / 100  |
//!
//! A count without a known piece weight against a per-100g profile treats one
//! piece as one 100 g reference serving; the reverse case treats one unit as
//! 100 g. Calories round to whole kcal and macros to one decimal.

use crate::food_model::{Basis, NutritionProfile, Portion, ScaledNutrition};
use tracing::debug;

/// Multiplier applied to `profile` for `portion`
pub fn scale_factor(basis: Basis, portion: &Portion) -> f64 {
    match (basis, portion) {
        (Basis::PerUnit, Portion::Count { count, .. }) => *count,
        (Basis::PerUnit, Portion::Grams(grams)) => grams / 100.0,
        (Basis::PerHundredGrams, Portion::Grams(grams)) => grams / 100.0,
        (
            Basis::PerHundredGrams,
            Portion::Count {
                count,
                grams_per_unit,
            },
        ) => match grams_per_unit {
            Some(per_unit) => count * per_unit / 100.0,
            None => {
                debug!(count, "No piece weight known, scaling per-100g values per piece");
                *count
            }
        },
    }
}

/// Multiply every field of `profile` by `factor`
pub fn scale_by(profile: &NutritionProfile, factor: f64) -> ScaledNutrition {
    ScaledNutrition::new(
        profile.calories * factor,
        profile.protein_g * factor,
        profile.carbs_g * factor,
        profile.fat_g * factor,
    )
}

/// Scale `profile` to `portion`
pub fn scale(profile: &NutritionProfile, portion: &Portion) -> ScaledNutrition {
    scale_by(profile, scale_factor(profile.basis, portion))
}

/// Scale a per-100g profile to a weight in grams
pub fn scale_grams(profile: &NutritionProfile, grams: f64) -> ScaledNutrition {
    scale(profile, &Portion::Grams(grams))
}
