use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::query::RESULT_COUNT;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Optional local food dataset consulted before the recipe service
    pub foods_json: Option<PathBuf>,
    /// Root for the JSON file store
    pub data_dir: PathBuf,
    pub recipe_count: u32,
}

impl Config {
    /// Load settings; `SPOONACULAR_API_KEY` is required.
    pub fn from_env() -> Result<Self> {
        let config = Self::offline_from_env()?;
        if config.api_key.is_empty() {
            return Err(anyhow!("SPOONACULAR_API_KEY is not set"));
        }
        Ok(config)
    }

    /// Same as [`Config::from_env`] but tolerates a missing API key, for
    /// commands that never reach the network.
    pub fn offline_from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let recipe_count = match std::env::var("NUTRI_RECIPE_COUNT") {
            Ok(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|e| anyhow!("NUTRI_RECIPE_COUNT={:?}: {}", v, e))?,
            Err(_) => RESULT_COUNT,
        };
        if recipe_count == 0 {
            return Err(anyhow!("NUTRI_RECIPE_COUNT must be greater than 0"));
        }

        Ok(Self {
            api_key: std::env::var("SPOONACULAR_API_KEY")
                .map(|k| k.trim().to_string())
                .unwrap_or_default(),
            base_url: std::env::var("SPOONACULAR_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            foods_json: std::env::var("NUTRI_FOODS_JSON").ok().map(PathBuf::from),
            data_dir: std::env::var("NUTRI_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            recipe_count,
        })
    }
}
