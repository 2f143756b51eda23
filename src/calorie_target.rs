//! # Calorie Target
//!
//! Daily calorie and macro targets from a user's body profile.
//!
//! BMR uses the Mifflin-St Jeor equation:
//! `10 x weight_kg + 6.25 x height_cm - 5 x age + 5` for men, `- 161` for women.
//! TDEE multiplies BMR by an activity factor from 1.2 to 1.9, the goal then
//! shifts it (lose -500 kcal, gain +300 kcal) and the result never drops
//! below 1200 kcal.

use crate::food_model::round_tenth;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MINIMUM_DAILY_CALORIES: f64 = 1200.0;
pub const LOSE_WEIGHT_ADJUSTMENT: f64 = -500.0;
pub const GAIN_WEIGHT_ADJUSTMENT: f64 = 300.0;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days a week
    Light,
    /// Exercise 3-5 days a week
    Moderate,
    /// Exercise 6-7 days a week
    Active,
    /// Hard training or a physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    /// Daily calorie adjustment applied to TDEE
    pub fn adjustment(&self) -> f64 {
        match self {
            Goal::Lose => LOSE_WEIGHT_ADJUSTMENT,
            Goal::Maintain => 0.0,
            Goal::Gain => GAIN_WEIGHT_ADJUSTMENT,
        }
    }

    /// Share of calories from protein, carbs and fat
    pub fn macro_split(&self) -> (f64, f64, f64) {
        match self {
            Goal::Lose => (0.30, 0.40, 0.30),
            Goal::Maintain => (0.25, 0.50, 0.25),
            Goal::Gain => (0.25, 0.50, 0.25),
        }
    }
}

/// Body profile used for targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

/// Daily targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieTarget {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calories: i64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Basal metabolic rate in kcal/day
pub fn bmr(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Compute daily targets for `profile`
///
/// # Errors
///
/// Returns an error when weight, height or age are outside plausible ranges.
pub fn calculate_target(profile: &UserProfile) -> Result<CalorieTarget> {
    if !(profile.weight_kg > 0.0 && profile.weight_kg <= 400.0) {
        return Err(anyhow::anyhow!(
            "Weight must be between 0 and 400 kg, got {}",
            profile.weight_kg
        ));
    }
    if !(profile.height_cm > 0.0 && profile.height_cm <= 280.0) {
        return Err(anyhow::anyhow!(
            "Height must be between 0 and 280 cm, got {}",
            profile.height_cm
        ));
    }
    if !(10..=120).contains(&profile.age) {
        return Err(anyhow::anyhow!(
            "Age must be between 10 and 120 years, got {}",
            profile.age
        ));
    }

    let bmr = bmr(profile);
    let tdee = bmr * profile.activity.multiplier();
    let daily = (tdee + profile.goal.adjustment())
        .max(MINIMUM_DAILY_CALORIES)
        .round();

    let (protein_share, carbs_share, fat_share) = profile.goal.macro_split();

    debug!(bmr, tdee, daily, goal = ?profile.goal, "Calculated calorie target");

    Ok(CalorieTarget {
        bmr: round_tenth(bmr),
        tdee: round_tenth(tdee),
        daily_calories: daily as i64,
        protein_g: round_tenth(daily * protein_share / KCAL_PER_GRAM_PROTEIN),
        carbs_g: round_tenth(daily * carbs_share / KCAL_PER_GRAM_CARBS),
        fat_g: round_tenth(daily * fat_share / KCAL_PER_GRAM_FAT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, activity: ActivityLevel, goal: Goal) -> UserProfile {
        UserProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex,
            activity,
            goal,
        }
    }

    #[test]
    fn test_mifflin_st_jeor() {
        assert_eq!(bmr(&profile(Sex::Male, ActivityLevel::Sedentary, Goal::Maintain)), 1648.75);
        assert_eq!(bmr(&profile(Sex::Female, ActivityLevel::Sedentary, Goal::Maintain)), 1482.75);
    }

    #[test]
    fn test_goal_adjustments() {
        let target_for = |goal| {
            calculate_target(&profile(Sex::Male, ActivityLevel::Moderate, goal)).unwrap()
        };
        let maintain = target_for(Goal::Maintain);
        let lose = target_for(Goal::Lose);
        let gain = target_for(Goal::Gain);

        assert_eq!(maintain.daily_calories, 2556);
        assert_eq!(lose.daily_calories, 2056);
        assert_eq!(gain.daily_calories, 2856);
    }

    #[test]
    fn test_minimum_calories() {
        let small = UserProfile {
            weight_kg: 50.0,
            height_cm: 160.0,
            age: 60,
            sex: Sex::Female,
            activity: ActivityLevel::Sedentary,
            goal: Goal::Lose,
        };
        let target = calculate_target(&small).unwrap();
        assert_eq!(target.daily_calories, 1200);
        assert_eq!(target.protein_g, 90.0);
        assert_eq!(target.carbs_g, 120.0);
        assert_eq!(target.fat_g, 40.0);
    }

    #[test]
    fn test_invalid_profiles() {
        let mut bad = profile(Sex::Male, ActivityLevel::Light, Goal::Maintain);
        bad.weight_kg = -3.0;
        assert!(calculate_target(&bad).is_err());

        let mut bad = profile(Sex::Male, ActivityLevel::Light, Goal::Maintain);
        bad.age = 7;
        assert!(calculate_target(&bad).is_err());

        let mut bad = profile(Sex::Male, ActivityLevel::Light, Goal::Maintain);
        bad.height_cm = f64::NAN;
        assert!(calculate_target(&bad).is_err());
    }
}
