//! # Nutrition Normalizer
//!
//! Resolves the per-100g profile used for a recognized food. Canonical reference
//! values win over anything the AI returned, so the same dish logs the same
//! calories across sessions. Unknown foods keep the AI values, rounded to
//! 5 kcal and 0.5 g.

use crate::food_model::{Basis, NutritionProfile};
use crate::nutrition_tables::find_canonical;
use tracing::debug;

/// Where a normalized profile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOrigin {
    /// Fixed reference table entry
    Canonical(&'static str),
    /// AI-supplied values after rounding
    Rounded,
}

/// A resolved per-100g profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub profile: NutritionProfile,
    pub origin: ProfileOrigin,
}

/// Round to the nearest multiple of `step`
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Round AI-supplied values to the reference granularity
pub fn round_profile(raw: &NutritionProfile) -> NutritionProfile {
    let raw = raw.sanitized();
    NutritionProfile {
        calories: round_to_step(raw.calories, 5.0),
        protein_g: round_to_step(raw.protein_g, 0.5),
        carbs_g: round_to_step(raw.carbs_g, 0.5),
        fat_g: round_to_step(raw.fat_g, 0.5),
        basis: raw.basis,
    }
}

/// Resolve the profile for `food_name`
///
/// Returns `None` when the name is not canonical and no raw profile was supplied;
/// the caller then falls back to local recognition.
pub fn normalize(food_name: &str, raw_profile: Option<&NutritionProfile>) -> Option<Normalized> {
    if let Some(entry) = find_canonical(food_name) {
        debug!(food_name, canonical = entry.name, "Using canonical nutrition values");
        return Some(Normalized {
            profile: entry.profile,
            origin: ProfileOrigin::Canonical(entry.name),
        });
    }

    raw_profile.map(|raw| {
        let profile = round_profile(raw);
        debug!(food_name, ?profile, "Using rounded AI nutrition values");
        Normalized {
            profile: NutritionProfile {
                basis: Basis::PerHundredGrams,
                ..profile
            },
            origin: ProfileOrigin::Rounded,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_values_ignore_ai_profile() {
        let ai = NutritionProfile::per_100g(312.0, 14.2, 40.1, 9.9);
        let normalized = normalize("Margherita Pizza", Some(&ai)).unwrap();

        assert_eq!(normalized.origin, ProfileOrigin::Canonical("margherita pizza"));
        assert_eq!(normalized.profile, NutritionProfile::per_100g(266.0, 11.4, 33.0, 10.0));

        let without_ai = normalize("margherita pizza", None).unwrap();
        assert_eq!(without_ai.profile, normalized.profile);
    }

    #[test]
    fn test_canonical_name_inside_longer_word() {
        let ai = NutritionProfile::per_100g(500.0, 20.0, 40.0, 30.0);
        let normalized = normalize("hamburger", Some(&ai)).unwrap();

        assert_eq!(normalized.origin, ProfileOrigin::Canonical("burger"));
        assert_eq!(normalized.profile.calories, 255.0);

        let cheese = normalize("Cheeseburger", Some(&ai)).unwrap();
        assert_eq!(cheese.origin, ProfileOrigin::Canonical("cheeseburger"));
    }

    #[test]
    fn test_unknown_food_rounds_ai_values() {
        let ai = NutritionProfile::per_100g(347.0, 12.3, 40.8, 17.74);
        let normalized = normalize("jalebi", Some(&ai)).unwrap();

        assert_eq!(normalized.origin, ProfileOrigin::Rounded);
        assert_eq!(normalized.profile.calories, 345.0);
        assert_eq!(normalized.profile.protein_g, 12.5);
        assert_eq!(normalized.profile.carbs_g, 41.0);
        assert_eq!(normalized.profile.fat_g, 17.5);
    }

    #[test]
    fn test_negative_ai_values_are_clamped() {
        let ai = NutritionProfile::per_100g(-40.0, -1.0, f64::NAN, 2.2);
        let normalized = normalize("mystery stew", Some(&ai)).unwrap();

        assert_eq!(normalized.profile.calories, 0.0);
        assert_eq!(normalized.profile.protein_g, 0.0);
        assert_eq!(normalized.profile.carbs_g, 0.0);
        assert_eq!(normalized.profile.fat_g, 2.0);
    }

    #[test]
    fn test_no_match_and_no_profile() {
        assert!(normalize("xyzfood", None).is_none());
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(162.4, 5.0), 160.0);
        assert_eq!(round_to_step(162.5, 5.0), 165.0);
        assert_eq!(round_to_step(3.74, 0.5), 3.5);
        assert_eq!(round_to_step(3.75, 0.5), 4.0);
    }
}
