//! Spoonacular recipe API client
//!
//! Searches recipes by ingredient list and fetches cooking instructions for a
//! single recipe.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{FetchError, InstructionSource, RecipeId, RecipeSource};

/// Base URL for the Spoonacular API
const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// Number of recipes requested per search unless configured otherwise
pub const DEFAULT_RESULT_COUNT: u32 = 50;

/// Shown when a recipe carries no analyzed instructions
pub const NO_INSTRUCTIONS: &str = "No instructions available.";

/// Subset of `/recipes/{id}/information` we read
#[derive(Debug, Deserialize)]
struct RecipeInformation {
    #[serde(default, rename = "analyzedInstructions")]
    analyzed_instructions: Option<Vec<InstructionSet>>,
}

#[derive(Debug, Deserialize)]
struct InstructionSet {
    #[serde(default)]
    steps: Option<Vec<InstructionStep>>,
}

#[derive(Debug, Deserialize)]
struct InstructionStep {
    step: String,
}

/// Client for the Spoonacular recipe API
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    result_count: u32,
}

impl SpoonacularClient {
    /// Create a new client; requests fail with `MissingApiKey` when `api_key` is `None`
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: SPOONACULAR_BASE_URL.to_string(),
            result_count: DEFAULT_RESULT_COUNT,
        }
    }

    /// Point the client at a different host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set how many recipes a search asks for
    pub fn with_result_count(mut self, result_count: u32) -> Self {
        self.result_count = result_count;
        self
    }

    fn api_key(&self) -> Result<&str, FetchError> {
        self.api_key.as_deref().ok_or(FetchError::MissingApiKey)
    }

    /// Issue a GET and return the body of a successful response
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn find_by_ingredients(&self, ingredients: &[String]) -> Result<String, FetchError> {
        let api_key = self.api_key()?;
        let joined = ingredients
            .iter()
            .map(|item| item.trim())
            .collect::<Vec<_>>()
            .join(",");
        let number = self.result_count.to_string();

        tracing::debug!(ingredients = %joined, number = %number, "Searching recipes");

        self.get_text(
            "/recipes/findByIngredients",
            &[("apiKey", api_key), ("ingredients", &joined), ("number", &number)],
        )
        .await
    }
}

#[async_trait]
impl InstructionSource for SpoonacularClient {
    /// Fetch the step-by-step instructions for a recipe
    ///
    /// # Returns
    /// * `Ok(String)` - Numbered steps, one per line, or a placeholder when the
    ///   recipe has none
    /// * `Err(FetchError)` - If the request fails or the body is not JSON
    async fn fetch_instructions(&self, recipe_id: RecipeId) -> Result<String, FetchError> {
        let api_key = self.api_key()?;
        let path = format!("/recipes/{}/information", recipe_id);
        let text = self.get_text(&path, &[("apiKey", api_key)]).await?;
        let info: RecipeInformation = serde_json::from_str(&text)?;

        Ok(format_instructions(&info))
    }
}

/// Render the first instruction set as numbered lines
fn format_instructions(info: &RecipeInformation) -> String {
    let steps = info
        .analyzed_instructions
        .as_ref()
        .and_then(|sets| sets.first())
        .and_then(|set| set.steps.as_ref())
        .filter(|steps| !steps.is_empty());

    match steps {
        Some(steps) => steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.step))
            .collect::<Vec<_>>()
            .join("\n"),
        None => NO_INSTRUCTIONS.to_string(),
    }
}
