//! Recipe import and ingredient reconciliation.
//!
//! * [`extract_recipe`] turns the JSON-LD `Recipe` embedded in a web page into
//!   a [`RecipeDraft`].
//! * [`scale_ingredient_line`] rescales the leading quantity of an ingredient
//!   line for a different serving count.
//! * [`fuzzy_match`] and [`IngredientMatches`] cross-reference ingredients
//!   with shopping list and pantry entries.

pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod matching;
pub mod model;
pub mod pipelines;
pub mod quantity;
pub mod scaling;

pub use builder::{ImportResponse, RecipeImporter, RecipeImporterBuilder};
pub use config::ImportConfig;
pub use error::ImportError;
pub use extractors::extract_recipe;
pub use fetchers::{Fetcher, RequestFetcher};
pub use matching::{find_matches, fuzzy_match, significant_words, IngredientMatches, MatchCandidate};
pub use model::{DraftIngredient, DraftStep, InventoryItem, RecipeDraft, ShoppingItem};
pub use quantity::{format_minutes, format_quantity, parse_duration_minutes, parse_quantity_token};
pub use scaling::{scale_factor, scale_ingredient_line};

/// Fetch `url` and extract its recipe using configuration from
/// `recipe-import.toml` and `RECIPE_IMPORT__*` environment variables.
pub async fn fetch_recipe(url: &str) -> Result<RecipeDraft, ImportError> {
    let config = ImportConfig::load()?;
    RecipeImporter::builder()
        .config(config)
        .build()?
        .import(url)
        .await
}
