//! # Local Recognition
//!
//! Keyword-based recognition used when the AI provider is unavailable, returned
//! nothing usable, or no API key is configured. Strategies run in order:
//!
//! 1. two-component meals ("100 g chicken breast with 100 g rice"), each component
//!    with its own quantity read from anywhere in the sentence
//! 2. a single food from the mock keyword table, with the leading quantity
//! 3. a generic placeholder tagged [`Source::Fallback`]
//!
//! Every path produces a result. Photo recognition without an API key picks a
//! random food from the mock table; pass a seeded RNG to make it reproducible.

use crate::food_model::{
    Conversion, Portion, RecognitionResult, RecognizedComponent, ScaledNutrition, Source, Unit,
};
use crate::measurement_patterns::parse_number;
use crate::nutrition_scaler::scale;
use crate::nutrition_tables::{
    component, find_mock_food, piece_weight, ComponentFood, COMPONENT_REGEXES, MOCK_FOODS,
    PLACEHOLDER_PROFILE, TWO_COMPONENT_MEALS,
};
use crate::quantity_parser::parse_quantity;
use crate::unit_converter::{convert, convert_parsed, parse_unit};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

pub const MULTI_COMPONENT_CONFIDENCE: u8 = 70;
pub const SINGLE_ITEM_CONFIDENCE: u8 = 60;
pub const FALLBACK_CONFIDENCE: u8 = 30;

/// Weight assumed for a component mentioned without a quantity
pub const DEFAULT_COMPONENT_GRAMS: f64 = 100.0;

/// Weight assumed for an uncounted food picked by the photo mock
pub const DEFAULT_PHOTO_GRAMS: f64 = 150.0;

/// One component found inside a description
struct ComponentMatch {
    position: usize,
    conversion: Conversion,
    nutrition: ScaledNutrition,
    food: &'static ComponentFood,
}

/// Recognize a description without any AI input
pub fn recognize_locally(description: &str) -> RecognitionResult {
    if let Some(result) = match_multi_component(description) {
        return result;
    }

    if let Some(result) = match_single_item(description) {
        return result;
    }

    placeholder(description)
}

/// Try the two-component meal patterns
pub fn match_multi_component(description: &str) -> Option<RecognitionResult> {
    for (first_key, second_key) in TWO_COMPONENT_MEALS {
        let (Some(first), Some(second)) = (component(first_key), component(second_key)) else {
            continue;
        };

        let Some(first) = match_component(description, first.0, first.1) else {
            continue;
        };
        let Some(second) = match_component(description, second.0, second.1) else {
            continue;
        };

        let mut parts = vec![first, second];
        parts.sort_by_key(|part| part.position);

        let total: ScaledNutrition = parts.iter().map(|part| part.nutrition).sum();
        let total_grams: f64 = parts
            .iter()
            .map(|part| {
                part.conversion
                    .portion
                    .grams()
                    .unwrap_or(DEFAULT_COMPONENT_GRAMS * part.conversion.quantity)
            })
            .sum();
        let name = format!("{} with {}", parts[0].food.name, parts[1].food.name);

        info!(
            description,
            meal = %name,
            calories = total.calories,
            "Matched two-component meal"
        );

        let components = parts
            .iter()
            .map(|part| RecognizedComponent {
                name: part.food.name.to_string(),
                quantity: part.conversion.quantity,
                unit: part.conversion.unit.display_name().to_string(),
                calories: part.nutrition.calories,
                protein: part.nutrition.protein,
                carbs: part.nutrition.carbs,
                fat: part.nutrition.fat,
            })
            .collect();

        return Some(
            RecognitionResult::new(&name, total, Source::MockMultiComponent)
                .with_quantity(total_grams, Unit::Grams.display_name())
                .with_confidence(MULTI_COMPONENT_CONFIDENCE)
                .with_components(components),
        );
    }

    None
}

/// Find one component and the quantity written in front of it
fn match_component(
    description: &str,
    index: usize,
    food: &'static ComponentFood,
) -> Option<ComponentMatch> {
    let captures = COMPONENT_REGEXES.get(index)?.captures(description)?;
    let position = captures.get(0)?.start();

    let quantity = captures.get(1).and_then(|m| parse_number(m.as_str()));
    let unit = captures.get(2).and_then(|m| parse_unit(m.as_str()));

    let conversion = match quantity {
        Some(quantity) => convert(quantity, food.name, unit),
        None if piece_weight(food.name).is_some() => convert(1.0, food.name, Some(Unit::Pieces)),
        None => convert(DEFAULT_COMPONENT_GRAMS, food.name, Some(Unit::Grams)),
    };
    let nutrition = scale(&food.profile, &conversion.portion);

    debug!(
        component = food.name,
        quantity = conversion.quantity,
        unit = conversion.unit.display_name(),
        calories = nutrition.calories,
        "Matched meal component"
    );

    Some(ComponentMatch {
        position,
        conversion,
        nutrition,
        food,
    })
}

/// Try the single-item keyword table
pub fn match_single_item(description: &str) -> Option<RecognitionResult> {
    let entry = find_mock_food(description)?;
    let conversion = convert_parsed(&parse_quantity(description));
    let nutrition = scale(&entry.profile, &conversion.portion);

    info!(
        description,
        food = entry.name,
        calories = nutrition.calories,
        "Matched single food keyword"
    );

    Some(
        RecognitionResult::new(entry.name, nutrition, Source::MockSingle)
            .with_quantity(conversion.quantity, conversion.unit.display_name())
            .with_confidence(SINGLE_ITEM_CONFIDENCE),
    )
}

/// Generic result for food nothing else recognized
pub fn placeholder(description: &str) -> RecognitionResult {
    let name = description.trim();
    let name = if name.is_empty() { "Unknown food" } else { name };

    info!(description, "No local match, returning placeholder nutrition");

    let nutrition = scale(
        &PLACEHOLDER_PROFILE,
        &Portion::Count {
            count: 1.0,
            grams_per_unit: None,
        },
    );

    RecognitionResult::new(name, nutrition, Source::Fallback)
        .with_quantity(1.0, "serving")
        .with_confidence(FALLBACK_CONFIDENCE)
}

/// Recognize a meal photo without an AI provider
///
/// Picks a random food from the mock table with a random confidence.
pub fn mock_image_recognition<R: Rng + ?Sized>(rng: &mut R) -> RecognitionResult {
    let Some(entry) = MOCK_FOODS.choose(rng) else {
        return placeholder("meal photo");
    };

    let (portion, quantity, unit) = match piece_weight(entry.name) {
        Some(grams) => (
            Portion::Count {
                count: 1.0,
                grams_per_unit: Some(grams),
            },
            1.0,
            Unit::Pieces,
        ),
        None => (
            Portion::Grams(DEFAULT_PHOTO_GRAMS),
            DEFAULT_PHOTO_GRAMS,
            Unit::Grams,
        ),
    };
    let nutrition = scale(&entry.profile, &portion);
    let confidence = rng.gen_range(60..=80);

    info!(food = entry.name, confidence, "Mock photo recognition");

    RecognitionResult::new(entry.name, nutrition, Source::MockSingle)
        .with_quantity(quantity, unit.display_name())
        .with_confidence(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_chicken_and_rice_components_are_summed() {
        let result = recognize_locally("100 g chicken breast with 100 g rice");

        assert_eq!(result.source, Source::MockMultiComponent);
        assert_eq!(result.calories, 295);
        assert_eq!(result.protein, 33.7);
        assert_eq!(result.carbs, 28.0);
        assert_eq!(result.fat, 3.9);
        assert_eq!(result.quantity, 200.0);
        assert_eq!(result.unit, "g");
        assert_eq!(result.components.len(), 2);
        assert_eq!(result.components[0].name, "chicken breast");
        assert_eq!(result.components[1].name, "rice");
    }

    #[test]
    fn test_component_quantities_are_independent() {
        let result = recognize_locally("200g chicken and 1 cup rice");

        assert_eq!(result.source, Source::MockMultiComponent);
        // 200 g chicken (330 kcal) + 150 g rice (195 kcal)
        assert_eq!(result.calories, 525);
        assert_eq!(result.components[1].unit, "cup");
    }

    #[test]
    fn test_components_without_quantities_use_defaults() {
        let result = recognize_locally("dal with 2 rotis");

        assert_eq!(result.source, Source::MockMultiComponent);
        assert_eq!(result.name, "dal with roti");
        // 100 g dal (116 kcal) + 2 rotis of 40 g (240 kcal)
        assert_eq!(result.calories, 356);
        assert_eq!(result.components[1].quantity, 2.0);
        assert_eq!(result.components[1].unit, "piece");
    }

    #[test]
    fn test_single_item_keyword() {
        let result = recognize_locally("2 rotis");

        assert_eq!(result.source, Source::MockSingle);
        assert_eq!(result.name, "roti");
        assert_eq!(result.quantity, 2.0);
        assert_eq!(result.unit, "piece");
        assert_eq!(result.calories, 240);

        let doubled = recognize_locally("4 rotis");
        assert_eq!(doubled.calories, result.calories * 2);
    }

    #[test]
    fn test_single_item_counted_food() {
        let result = recognize_locally("3 eggs");
        assert_eq!(result.source, Source::MockSingle);
        assert_eq!(result.calories, 234);
        assert_eq!(result.protein, 18.9);
        assert_eq!(result.confidence, SINGLE_ITEM_CONFIDENCE);
    }

    #[test]
    fn test_weighed_and_counted_portions_agree() {
        let weighed = recognize_locally("200 g egg");
        let counted = recognize_locally("4 eggs");
        assert_eq!(weighed.calories, 312);
        assert_eq!(counted.calories, weighed.calories);
        assert_eq!(counted.protein, weighed.protein);

        // one apple is 180 g
        assert_eq!(recognize_locally("1 apple").calories, 95);
        assert_eq!(recognize_locally("360 g apple").calories, 190);
        assert_eq!(recognize_locally("500 g apple").calories, 264);
    }

    #[test]
    fn test_placeholder() {
        let result = recognize_locally("xyzfood");

        assert_eq!(result.source, Source::Fallback);
        assert_eq!(result.name, "xyzfood");
        assert_eq!(result.calories, 100);
        assert_eq!(result.protein, 5.0);
        assert_eq!(result.carbs, 15.0);
        assert_eq!(result.fat, 3.0);

        assert_eq!(placeholder("   ").name, "Unknown food");
    }

    #[test]
    fn test_mock_image_recognition_is_reproducible_with_seed() {
        let first = mock_image_recognition(&mut StdRng::seed_from_u64(42));
        let second = mock_image_recognition(&mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
        assert_eq!(first.source, Source::MockSingle);
        assert!(MOCK_FOODS.iter().any(|entry| entry.name == first.name));
        assert!((60..=80).contains(&first.confidence));

        for seed in 0..32 {
            let result = mock_image_recognition(&mut StdRng::seed_from_u64(seed));
            let expected_unit = match piece_weight(&result.name) {
                Some(_) => "piece",
                None => "g",
            };
            assert_eq!(result.unit, expected_unit, "{}", result.name);
        }
    }
}
