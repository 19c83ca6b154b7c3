use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::FoodRecord;
use crate::nutrients::{coerce_amount, NutrientKey, NutrientVector};

/// Column names of the bundled food dataset.
const NAME_COLUMN: &str = "Dish Name";
const COLUMNS: &[(&str, NutrientKey)] = &[
    ("Calories (kcal)", NutrientKey::Calories),
    ("Carbohydrates (g)", NutrientKey::CarbohydrateContent),
    ("Protein (g)", NutrientKey::ProteinContent),
    ("Fats (g)", NutrientKey::FatContent),
    ("Free Sugar (g)", NutrientKey::SugarContent),
    ("Fibre (g)", NutrientKey::FiberContent),
    ("Sodium (mg)", NutrientKey::SodiumContent),
    ("Calcium (mg)", NutrientKey::CalciumContent),
    ("Iron (mg)", NutrientKey::IronContent),
    ("Vitamin C (mg)", NutrientKey::VitaminCContent),
    ("Folate (µg)", NutrientKey::FolateContent),
];

/// In-memory food table consulted before the recipe service.
#[derive(Debug, Clone, Default)]
pub struct FoodDatabase {
    records: Vec<FoodRecord>,
}

impl FoodDatabase {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("reading {}: {}", path.display(), e)))?;
        let db = Self::from_json_str(&raw)?;
        info!(path = %path.display(), records = db.len(), "food dataset loaded");
        Ok(db)
    }

    /// Parse a JSON array of dataset rows. Missing or blank columns are 0 and
    /// calories are rounded to whole kcal. Rows without a name are skipped.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_str(raw)?;
        let records = rows
            .iter()
            .filter_map(|row| {
                let name = row
                    .get(NAME_COLUMN)
                    .and_then(|v| {
                        v.as_str()
                            .map(String::from)
                            .or_else(|| v.as_i64().map(|n| n.to_string()))
                    })
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())?;

                let mut nutrients = NutrientVector::zero();
                for (column, key) in COLUMNS {
                    nutrients.set(*key, coerce_amount(row.get(*column)));
                }
                nutrients.calories = nutrients.calories.round();

                Some(FoodRecord { name, nutrients })
            })
            .collect();
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive exact name match first, then substring match.
    pub fn lookup(&self, name: &str) -> Option<&FoodRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let hit = self
            .records
            .iter()
            .find(|r| r.name.to_lowercase() == needle)
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.name.to_lowercase().contains(&needle))
            });
        debug!(query = name, found = hit.is_some(), "local food lookup");
        hit
    }
}
