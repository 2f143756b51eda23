//! Prompts for food recognition and coach chat

use crate::calorie_target::CalorieTarget;
use crate::daily_summary::DailySummary;

const RECOGNITION_INSTRUCTIONS: &str = "You are a nutrition assistant for a diet tracker. \
Identify the food and estimate its nutrition for the portion described. \
Resolve the quantity yourself: if the user gives an amount, use it; otherwise estimate a typical serving.";

const RECOGNITION_SCHEMA: &str = r#"Respond with JSON only, no prose, in exactly this shape:
{
  "items": [{"name": "...", "quantity": 0, "unit": "g", "calories": 0, "protein": 0, "carbs": 0, "fat": 0}],
  "totals": {"calories": 0, "protein": 0, "carbs": 0, "fat": 0},
  "per_100g": {"calories": 0, "protein": 0, "carbs": 0, "fat": 0},
  "backcompat": {
    "name": "...",
    "calories_per_100g": 0,
    "protein_per_100g": 0,
    "carbs_per_100g": 0,
    "fat_per_100g": 0,
    "estimated_quantity": 0,
    "unit": "g",
    "confidence": 0.0
  }
}
Totals are for the whole portion. Macros are in grams. Confidence is between 0 and 1."#;

const IMAGE_INSTRUCTIONS: &str = "You are a nutrition assistant for a diet tracker. \
Identify the food in this photo and estimate the portion size visible on the plate.";

const COACH_INSTRUCTIONS: &str = "You are a friendly diet coach. Give short, practical advice \
based on the user's targets and what they have eaten today. Do not give medical diagnoses.";

/// Builds prompts for the AI provider
pub struct PromptBuilder {
    description: Option<String>,
}

impl PromptBuilder {
    /// Prompt for a text description
    pub fn for_description(description: &str) -> Self {
        Self {
            description: Some(description.trim().to_string()),
        }
    }

    /// Prompt for a meal photo
    pub fn for_image() -> Self {
        Self { description: None }
    }

    /// Build the complete recognition prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        match &self.description {
            Some(description) => {
                prompt.push_str(RECOGNITION_INSTRUCTIONS);
                prompt.push_str("\n\nFood description:\n---\n");
                prompt.push_str(description);
                prompt.push_str("\n---\n\n");
            }
            None => {
                prompt.push_str(IMAGE_INSTRUCTIONS);
                prompt.push_str("\n\n");
            }
        }

        prompt.push_str(RECOGNITION_SCHEMA);
        prompt
    }
}

/// System prompt for coach chat
pub fn coach_system_prompt(target: Option<&CalorieTarget>, today: Option<&DailySummary>) -> String {
    let mut prompt = String::from(COACH_INSTRUCTIONS);

    if let Some(target) = target {
        prompt.push_str(&format!(
            "\n\nDaily target: {} kcal (protein {} g, carbs {} g, fat {} g).",
            target.daily_calories, target.protein_g, target.carbs_g, target.fat_g
        ));
    }

    if let Some(today) = today {
        prompt.push_str(&format!(
            "\nEaten today ({} meals): {} kcal, protein {} g, carbs {} g, fat {} g.",
            today.meal_count,
            today.totals.calories,
            today.totals.protein,
            today.totals.carbs,
            today.totals.fat
        ));
        if let Some(remaining) = today.remaining_calories {
            prompt.push_str(&format!(" Remaining: {remaining} kcal."));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily_summary::summarize;
    use chrono::NaiveDate;

    #[test]
    fn test_description_prompt() {
        let prompt = PromptBuilder::for_description("  2 rotis with dal ").build();
        assert!(prompt.contains("---\n2 rotis with dal\n---"));
        assert!(prompt.contains("\"backcompat\""));
        assert!(prompt.contains("estimated_quantity"));
    }

    #[test]
    fn test_image_prompt() {
        let prompt = PromptBuilder::for_image().build();
        assert!(prompt.contains("photo"));
        assert!(prompt.contains("\"totals\""));
        assert!(!prompt.contains("Food description"));
    }

    #[test]
    fn test_coach_prompt_includes_target_and_day() {
        let target = CalorieTarget {
            bmr: 1648.8,
            tdee: 2555.6,
            daily_calories: 2056,
            protein_g: 154.2,
            carbs_g: 205.6,
            fat_g: 68.5,
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let today = summarize(&[], date, Some(&target));

        let prompt = coach_system_prompt(Some(&target), Some(&today));
        assert!(prompt.contains("Daily target: 2056 kcal"));
        assert!(prompt.contains("Remaining: 2056 kcal."));

        assert_eq!(coach_system_prompt(None, None), COACH_INSTRUCTIONS);
    }
}
