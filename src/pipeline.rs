use tracing::info;

use crate::client::RecipeService;
use crate::error::{Error, Result};
use crate::ingredients;
use crate::models::{DietaryProfile, RecipeQuery, RecipeSummary};
use crate::ocr::OcrService;
use crate::{query, restrictions};

/// Raw text to recipe query: extract, clean up OCR typos, resolve diet.
///
/// Fails with `EmptyIngredients` when nothing usable is left.
pub fn prepare_query(
    raw_text: &str,
    profile: &DietaryProfile,
    result_count: u32,
) -> Result<RecipeQuery> {
    let extracted = ingredients::extract(raw_text);
    if extracted.is_empty() {
        return Err(Error::EmptyIngredients);
    }
    let cleaned = ingredients::correct_ocr_typos(&extracted);
    let resolved = restrictions::resolve(profile);
    query::build_with_count(&cleaned, &resolved, result_count)
}

/// Suggest recipes for typed or recognized ingredient text. No request is
/// made when the text yields no ingredients.
pub async fn suggest_recipes<S>(
    raw_text: &str,
    profile: &DietaryProfile,
    service: &S,
) -> Result<Vec<RecipeSummary>>
where
    S: RecipeService + ?Sized,
{
    let query = prepare_query(raw_text, profile, query::RESULT_COUNT)?;
    service.search_recipes(&query).await
}

/// Photograph-to-recipes: OCR the image, then [`suggest_recipes`].
pub async fn scan_and_suggest<O, S>(
    image: &[u8],
    ocr: &O,
    profile: &DietaryProfile,
    service: &S,
) -> Result<Vec<RecipeSummary>>
where
    O: OcrService + ?Sized,
    S: RecipeService + ?Sized,
{
    if image.is_empty() {
        return Err(Error::invalid("image is empty"));
    }
    let text = ocr.recognize(image).await?;
    info!(chars = text.len(), "image recognized");
    suggest_recipes(&text, profile, service).await
}
