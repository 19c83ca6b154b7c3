//! Daily nutrition ledger, weight log, and an ingredient-to-recipe pipeline.
//!
//! The ledger and weight log are plain owned data, one per identity, that a
//! [`session::Session`] writes through to a [`store::LedgerStore`]. The recipe
//! side turns receipt or typed text into a [`models::RecipeQuery`] and hands it
//! to a [`client::RecipeService`].

pub mod client;
pub mod config;
pub mod error;
pub mod foods;
pub mod health;
pub mod ingredients;
pub mod ledger;
pub mod lookup;
pub mod models;
pub mod nutrients;
pub mod ocr;
pub mod pipeline;
pub mod query;
pub mod restrictions;
pub mod session;
pub mod store;
pub mod weight;

pub use error::{Error, Result};
pub use ledger::{DailyLedger, RolloverResult};
pub use nutrients::{NutrientKey, NutrientVector};
pub use weight::WeightLog;
