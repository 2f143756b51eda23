//! # Daily Summary
//!
//! Totals of the meals logged on one date, compared against the user's target.

use crate::calorie_target::{
    CalorieTarget, KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use crate::food_model::{round_tenth, RecognitionResult, ScaledNutrition, Source};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub name: String,
    pub nutrition: ScaledNutrition,
    pub source: Source,
    pub logged_at: DateTime<Utc>,
}

impl MealEntry {
    /// Log a recognition result at `logged_at`
    pub fn from_result(result: &RecognitionResult, logged_at: DateTime<Utc>) -> Self {
        Self {
            name: result.name.clone(),
            nutrition: result.nutrition(),
            source: result.source,
            logged_at,
        }
    }
}

/// Share of energy from each macro, in percent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroPercentages {
    pub fn from_nutrition(nutrition: &ScaledNutrition) -> Self {
        let protein = nutrition.protein * KCAL_PER_GRAM_PROTEIN;
        let carbs = nutrition.carbs * KCAL_PER_GRAM_CARBS;
        let fat = nutrition.fat * KCAL_PER_GRAM_FAT;
        let total = protein + carbs + fat;

        if total <= 0.0 {
            return Self::default();
        }

        Self {
            protein: round_tenth(protein / total * 100.0),
            carbs: round_tenth(carbs / total * 100.0),
            fat: round_tenth(fat / total * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub totals: ScaledNutrition,
    /// Target calories, when the user has a profile
    pub target_calories: Option<i64>,
    /// Target minus eaten; negative once over target
    pub remaining_calories: Option<i64>,
    pub macro_percentages: MacroPercentages,
}

/// Summarize the meals logged on `date`
///
/// Meals from other dates (in UTC) are ignored.
pub fn summarize(
    meals: &[MealEntry],
    date: NaiveDate,
    target: Option<&CalorieTarget>,
) -> DailySummary {
    let todays: Vec<&MealEntry> = meals
        .iter()
        .filter(|meal| meal.logged_at.date_naive() == date)
        .collect();

    let totals: ScaledNutrition = todays.iter().map(|meal| meal.nutrition).sum();
    let target_calories = target.map(|target| target.daily_calories);

    debug!(
        %date,
        meals = todays.len(),
        calories = totals.calories,
        "Summarized daily intake"
    );

    DailySummary {
        date,
        meal_count: todays.len(),
        totals,
        target_calories,
        remaining_calories: target_calories.map(|target| target - totals.calories),
        macro_percentages: MacroPercentages::from_nutrition(&totals),
    }
}
