use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{FoodRecord, RecipeDetails, RecipeQuery, RecipeSummary};
use crate::nutrients::{NutrientVector, ServiceNutrient};
use crate::query::RANKING_MAXIMIZE_USED;

const SERVICE: &str = "recipe service";
const NO_INSTRUCTIONS: &str = "Instructions not available.";

/// The external recipe search and nutrition collaborator.
///
/// Nothing here retries; callers own retry policy.
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn search_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeSummary>>;

    async fn recipe_details(&self, id: i64) -> Result<RecipeDetails>;

    /// Nutrition per 100 g for the best match of `name`, or `None` when the
    /// service has no such ingredient.
    async fn lookup_ingredient(&self, name: &str) -> Result<Option<FoodRecord>>;
}

/// Spoonacular-backed [`RecipeService`].
#[derive(Clone)]
pub struct SpoonacularClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, crate::config::DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_base_url(config.api_key.clone(), config.base_url.clone())
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let resp = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| Error::external(SERVICE, format!("GET {}: {}", path, e)))?;

        check_status(path, resp)
            .await?
            .json()
            .await
            .map_err(|e| Error::external(SERVICE, format!("decoding {}: {}", path, e)))
    }
}

async fn check_status(path: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    warn!(path, %status, "recipe service request failed");
    let message = if matches!(status.as_u16(), 401 | 402 | 403) {
        format!("API key invalid or quota exceeded ({})", status)
    } else {
        format!("GET {} failed: {} - {}", path, status, body)
    };
    Err(Error::external(SERVICE, message))
}

#[async_trait]
impl RecipeService for SpoonacularClient {
    /// `complexSearch` restricted to the query's ingredients and exclusions.
    async fn search_recipes(&self, query: &RecipeQuery) -> Result<Vec<RecipeSummary>> {
        let mut params = vec![
            ("includeIngredients", query.ingredients.clone()),
            ("excludeIngredients", query.exclude_ingredients.clone()),
            ("diet", query.diet.clone()),
            ("number", query.result_count.to_string()),
            ("addRecipeInformation", "true".to_string()),
        ];
        if query.ranking == RANKING_MAXIMIZE_USED {
            params.push(("ranking", "1".to_string()));
            params.push(("sort", "min-missing-ingredients".to_string()));
        }

        let data = self.get_json("/recipes/complexSearch", &params).await?;
        let results: Vec<RecipeSummary> = data
            .get("results")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(parse_recipe_summary).collect())
            .unwrap_or_default();

        info!(
            ingredients = %query.ingredients,
            results = results.len(),
            "recipe search complete"
        );
        Ok(results)
    }

    async fn recipe_details(&self, id: i64) -> Result<RecipeDetails> {
        let path = format!("/recipes/{}/information", id);
        let data = self
            .get_json(&path, &[("includeNutrition", "true".to_string())])
            .await?;
        parse_recipe_details(&data)
            .ok_or_else(|| Error::external(SERVICE, format!("malformed recipe {}", id)))
    }

    async fn lookup_ingredient(&self, name: &str) -> Result<Option<FoodRecord>> {
        let search = self
            .get_json(
                "/food/ingredients/search",
                &[("query", name.to_string()), ("number", "1".to_string())],
            )
            .await?;

        let Some(id) = search
            .get("results")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|r| r.get("id"))
            .and_then(|v| v.as_i64())
        else {
            return Ok(None);
        };

        let path = format!("/food/ingredients/{}/information", id);
        let info = self
            .get_json(
                &path,
                &[("amount", "100".to_string()), ("unit", "grams".to_string())],
            )
            .await?;

        let nutrients = service_nutrients(&info);
        if nutrients.is_empty() {
            return Err(Error::NotFound(format!(
                "found {:?} but no nutrition data is available",
                name
            )));
        }

        let mut vector = NutrientVector::from_service_nutrients(&nutrients);
        vector.calories = vector.calories.trunc();
        Ok(Some(FoodRecord {
            name: info
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string(),
            nutrients: vector,
        }))
    }
}

fn service_nutrients(doc: &Value) -> Vec<ServiceNutrient> {
    doc.get("nutrition")
        .and_then(|n| n.get("nutrients"))
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Parse one `complexSearch` result.
pub fn parse_recipe_summary(doc: &Value) -> Option<RecipeSummary> {
    let id = doc.get("id").and_then(|v| v.as_i64())?;
    let title = doc.get("title").and_then(|v| v.as_str())?.to_string();
    let image = doc
        .get("image")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);

    // search results only carry nutrition when asked; the first entry is calories
    let calories = doc
        .get("nutrition")
        .and_then(|n| n.get("nutrients"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|n| n.get("amount"))
        .and_then(|v| v.as_f64())
        .filter(|c| c.is_finite() && *c > 0.0)
        .map(|c| c.trunc() as i64)
        .unwrap_or(0);

    Some(RecipeSummary {
        id,
        title,
        image,
        calories,
    })
}

/// Parse a recipe information document with nutrition.
pub fn parse_recipe_details(doc: &Value) -> Option<RecipeDetails> {
    let id = doc.get("id").and_then(|v| v.as_i64())?;
    let title = doc.get("title").and_then(|v| v.as_str())?.to_string();

    let ingredients = doc
        .get("extendedIngredients")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|i| i.get("original").and_then(|v| v.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let mut nutrients = NutrientVector::from_service_nutrients(&service_nutrients(doc));
    nutrients.calories = nutrients.calories.trunc();

    Some(RecipeDetails {
        id,
        title,
        image: doc.get("image").and_then(|v| v.as_str()).map(String::from),
        ingredients,
        instructions: doc
            .get("instructions")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_INSTRUCTIONS)
            .to_string(),
        nutrients,
    })
}
