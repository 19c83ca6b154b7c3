use tracing::info;

use crate::client::RecipeService;
use crate::error::{Error, Result};
use crate::foods::FoodDatabase;
use crate::models::FoodRecord;

/// Nutrition for a single food name: the local dataset first, then the
/// recipe service.
pub async fn lookup_nutrition<S>(
    name: &str,
    local: Option<&FoodDatabase>,
    service: &S,
) -> Result<FoodRecord>
where
    S: RecipeService + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("food name is required"));
    }

    if let Some(record) = local.and_then(|db| db.lookup(name)) {
        info!(food = name, "nutrition from local dataset");
        return Ok(record.clone());
    }

    match service.lookup_ingredient(name).await? {
        Some(record) => {
            info!(food = name, "nutrition from recipe service");
            Ok(record)
        }
        None => Err(Error::NotFound(format!(
            "food item {:?} not found locally or via the recipe service",
            name
        ))),
    }
}
