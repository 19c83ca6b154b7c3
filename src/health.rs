use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::nutrients::NutrientVector;
use crate::weight::WeightLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Inputs for the daily energy target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sex: Sex,
    /// 1 (sedentary) through 5 (extra active)
    pub activity_level: u8,
}

impl BodyProfile {
    /// Take the weight from the newest weight log entry, if any.
    pub fn with_current_weight(mut self, log: &WeightLog) -> Self {
        if let Some(latest) = log.latest() {
            self.weight_kg = latest.weight;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmr: f64,
    pub calories_maintain: f64,
    pub calories_mild_loss: f64,
    pub calories_weight_loss: f64,
    pub calories_extreme_loss: f64,
}

/// Activity multiplier for TDEE. Unknown levels count as sedentary.
pub fn activity_multiplier(level: u8) -> f64 {
    match level {
        2 => 1.375,
        3 => 1.55,
        4 => 1.725,
        5 => 1.9,
        _ => 1.2,
    }
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
pub fn bmr(profile: &BodyProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// BMI and maintenance / deficit calorie targets.
pub fn calculate(profile: &BodyProfile) -> Result<HealthMetrics> {
    if profile.age == 0 {
        return Err(Error::invalid("age must be positive"));
    }
    if !(profile.height_cm.is_finite() && profile.height_cm > 0.0) {
        return Err(Error::invalid("height must be a positive number"));
    }
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        return Err(Error::invalid("weight must be a positive number"));
    }

    let bmr = bmr(profile);
    let tdee = bmr * activity_multiplier(profile.activity_level);
    let height_m = profile.height_cm / 100.0;
    let bmi = profile.weight_kg / (height_m * height_m);

    Ok(HealthMetrics {
        bmi: (bmi * 10.0).round() / 10.0,
        bmr: bmr.round(),
        calories_maintain: tdee.round(),
        calories_mild_loss: (tdee - 250.0).round(),
        calories_weight_loss: (tdee - 500.0).round(),
        calories_extreme_loss: (tdee - 750.0).round(),
    })
}

/// Today's intake against a calorie target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub consumed: f64,
    pub target: f64,
    /// Negative once the target is exceeded
    pub remaining: f64,
    pub percent: f64,
}

pub fn progress(summary: &NutrientVector, target_calories: f64) -> DailyProgress {
    let consumed = summary.calories;
    let percent = if target_calories > 0.0 {
        (consumed / target_calories * 1000.0).round() / 10.0
    } else {
        0.0
    };
    DailyProgress {
        consumed,
        target: target_calories,
        remaining: target_calories - consumed,
        percent,
    }
}
