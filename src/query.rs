use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RecipeQuery, ResolvedRestrictions};

/// Candidates requested per search.
pub const RESULT_COUNT: u32 = 6;
/// Prefer recipes that use the most of the supplied ingredients.
pub const RANKING_MAXIMIZE_USED: &str = "maximize-used";

/// Compose the recipe search request. Must be called, and succeed, before any
/// network request is made.
pub fn build(ingredients: &[String], restrictions: &ResolvedRestrictions) -> Result<RecipeQuery> {
    build_with_count(ingredients, restrictions, RESULT_COUNT)
}

pub fn build_with_count(
    ingredients: &[String],
    restrictions: &ResolvedRestrictions,
    result_count: u32,
) -> Result<RecipeQuery> {
    let ingredients: Vec<&str> = ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(Error::EmptyIngredients);
    }

    let query = RecipeQuery {
        ingredients: ingredients.join(","),
        exclude_ingredients: restrictions.exclude_ingredients.clone(),
        diet: restrictions.diet.clone(),
        result_count,
        ranking: RANKING_MAXIMIZE_USED.to_string(),
    };
    debug!(
        ingredients = %query.ingredients,
        exclude = %query.exclude_ingredients,
        diet = %query.diet,
        "recipe query built"
    );
    Ok(query)
}
