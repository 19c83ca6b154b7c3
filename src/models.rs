use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::nutrients::NutrientVector;

/// Parse a `YYYY-MM-DD` date key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid(format!("bad date key {:?}: {}", key, e)))
}

/// Where a logged meal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Picked from a recipe suggestion
    Recipe,
    /// Typed in or looked up by name
    Manual,
}

/// An immutable record of one logged meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    pub name: String,
    /// Calories at the time of logging (kcal)
    pub calories: f64,
    pub source: SourceKind,
    pub logged_at: DateTime<Utc>,
    pub date: NaiveDate,
}

/// A body weight observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLogEntry {
    pub date: NaiveDate,
    /// Weight in kg
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MealTypePreference {
    #[default]
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    Vegetarian,
    Eggetarian,
    Vegan,
}

impl std::str::FromStr for MealTypePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "nonvegetarian" | "nonveg" => Ok(Self::NonVegetarian),
            "vegetarian" | "veg" => Ok(Self::Vegetarian),
            "eggetarian" => Ok(Self::Eggetarian),
            "vegan" => Ok(Self::Vegan),
            _ => Err(Error::invalid(format!("unknown meal type {:?}", s))),
        }
    }
}

/// Diet settings that drive recipe filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryProfile {
    pub meal_type: MealTypePreference,
    /// Ingredient categories to keep out of results (e.g. "fish", "sugar")
    #[serde(default)]
    pub exclusion_tags: Vec<String>,
}

/// Output of restriction resolution, ready for the recipe query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRestrictions {
    pub exclude_ingredients: String,
    pub diet: String,
}

/// Request payload for the recipe search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeQuery {
    /// Comma-joined ingredients
    pub ingredients: String,
    /// Comma-joined exclusions
    pub exclude_ingredients: String,
    pub diet: String,
    pub result_count: u32,
    pub ranking: String,
}

/// A recipe search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    /// Calories (kcal), 0 when the search result carries no nutrition
    pub calories: i64,
}

/// Full recipe information including nutrition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub nutrients: NutrientVector,
}

/// A named food with nutrition per serving (100 g for service lookups).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    pub nutrients: NutrientVector,
}
