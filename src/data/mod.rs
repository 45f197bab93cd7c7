//! Recipe data model and the external collaborators that produce it
//!
//! Recipes arrive from the recipe-search service as JSON. This module owns the
//! record types, the response parser, and the traits the rest of the crate
//! uses to reach the network and the text recognizer.

pub mod recognition;
pub mod spoonacular;

pub use recognition::{RecognitionError, TextRecognizer, TranscriptRecognizer};
pub use spoonacular::{SpoonacularClient, DEFAULT_RESULT_COUNT, NO_INSTRUCTIONS};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier assigned to a recipe by the recipe-search service
pub type RecipeId = u64;

/// A recipe returned by the recipe-search service
///
/// Field names follow the service's camelCase JSON so that a stored raw
/// response and a stored favorites list share one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Stable identifier from the service
    pub id: RecipeId,
    /// Display title
    pub title: String,
    /// Image URL, if the service has one
    #[serde(default)]
    pub image: Option<String>,
    /// Ingredients the recipe needs that were not in the query
    #[serde(default, deserialize_with = "null_as_empty")]
    pub missed_ingredients: Vec<MissedIngredient>,
}

/// An ingredient a recipe needs that the user did not list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedIngredient {
    /// Normalized ingredient name (e.g. "milk")
    pub name: String,
    /// Ingredient line as written in the recipe (e.g. "1 cup milk")
    pub original: String,
}

/// The two response shapes the service has used
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeResponse {
    Bare(Vec<Recipe>),
    Wrapped { results: Vec<Recipe> },
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a raw recipe-search response
///
/// Accepts both a bare JSON array of recipes and an object wrapping the array
/// in a `results` field.
pub fn parse_recipes(raw: &str) -> Result<Vec<Recipe>, serde_json::Error> {
    let response: RecipeResponse = serde_json::from_str(raw)?;
    Ok(match response {
        RecipeResponse::Bare(recipes) => recipes,
        RecipeResponse::Wrapped { results } => results,
    })
}

/// Errors that can occur when talking to the recipe-search service
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Recipe service returned status {0}")]
    Status(u16),

    /// The response body was not the JSON document expected
    #[error("Malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No API key was configured
    #[error("No API key configured; pass --api-key or set SPOONACULAR_API_KEY")]
    MissingApiKey,
}

/// Network collaborator that turns an ingredient list into a raw response
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Searches for recipes using the given ingredients, returning the body unparsed
    async fn find_by_ingredients(&self, ingredients: &[String]) -> Result<String, FetchError>;
}

/// Network collaborator that looks up cooking steps for one recipe
#[async_trait]
pub trait InstructionSource: Send + Sync {
    /// Returns the recipe's steps as numbered lines
    async fn fetch_instructions(&self, recipe_id: RecipeId) -> Result<String, FetchError>;
}
