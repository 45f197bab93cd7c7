//! Query cache guard
//!
//! Decides whether a stored search response can be reused and keeps the
//! stored slot in step with successful fetches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

use crate::data::{parse_recipes, FetchError, Recipe, RecipeSource};
use crate::storage::{read_json, write_json, SharedStore, LAST_QUERY_KEY};

/// The single cached (ingredients, response) pair as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuery {
    /// Ingredient list the response was fetched for
    pub ingredients: Vec<String>,
    /// Response body exactly as the service returned it
    pub response: String,
    /// When the response was fetched
    pub cached_at: DateTime<Utc>,
}

/// Recipes produced by a search, with where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeList {
    pub recipes: Vec<Recipe>,
    /// True when the recipes were served from the cached response
    pub from_cache: bool,
}

/// Errors a search can surface to the user
#[derive(Debug, Error)]
pub enum SearchError {
    /// The network collaborator failed
    #[error("Fetching recipes failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// A freshly fetched response did not match the expected shape
    #[error("Recipe response could not be parsed: {0}")]
    ParseFailed(#[source] serde_json::Error),
}

/// Whether a stored response may stand in for a new fetch
///
/// True only when a non-empty response is stored and `current` matches
/// `stored` item for item, in order, with exact text.
pub fn should_use_cache(current: &[String], stored: &[String], stored_response: Option<&str>) -> bool {
    match stored_response {
        Some(response) if !response.is_empty() => current == stored,
        _ => false,
    }
}

/// Owns the cached query slot and decides between cache and network
///
/// The in-memory slot is authoritative for this process. Every change is
/// written through to the store; if the store fails, the slot keeps working
/// for the rest of the session.
#[derive(Debug)]
pub struct QueryCacheGuard {
    store: SharedStore,
    slot: RwLock<Option<CachedQuery>>,
}

impl QueryCacheGuard {
    /// Creates a guard, loading any previously stored query
    ///
    /// An unreadable or undecodable record starts the guard empty.
    pub fn new(store: SharedStore) -> Self {
        let slot = match read_json::<CachedQuery>(store.as_ref(), LAST_QUERY_KEY) {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!(error = %e, "Cached query unavailable, starting empty");
                None
            }
        };

        Self {
            store,
            slot: RwLock::new(slot),
        }
    }

    /// Returns a copy of the cached query, if any
    pub fn cached(&self) -> Option<CachedQuery> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replaces the cached slot with a new (ingredients, response) pair
    ///
    /// The response is stored as-is; its shape is checked by whoever reads it.
    pub fn record_query(&self, ingredients: &[String], raw_response: &str) {
        let entry = CachedQuery {
            ingredients: ingredients.to_vec(),
            response: raw_response.to_string(),
            cached_at: Utc::now(),
        };

        // Held across the write so memory and store commit in the same order.
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = write_json(self.store.as_ref(), LAST_QUERY_KEY, &entry) {
            tracing::warn!(error = %e, "Could not persist cached query, keeping it in memory");
        }
        *slot = Some(entry);

        tracing::info!(ingredients = ingredients.len(), "Recorded recipe query");
    }

    /// Recipes from the cached response regardless of the ingredient list
    ///
    /// Returns `None` if nothing is cached or the cached body does not parse.
    pub fn cached_recipes(&self) -> Option<Vec<Recipe>> {
        let entry = self.cached()?;
        parse_recipes(&entry.response).ok()
    }

    /// Recipes from the cache if it is valid for `current`
    ///
    /// A cached body that fails to parse counts as a miss.
    pub fn serve_cached(&self, current: &[String]) -> Option<Vec<Recipe>> {
        let entry = self.cached();
        let (stored, response) = match &entry {
            Some(entry) => (entry.ingredients.as_slice(), Some(entry.response.as_str())),
            None => (&[][..], None),
        };

        if !should_use_cache(current, stored, response) {
            tracing::debug!("Cache miss");
            return None;
        }

        match parse_recipes(response.unwrap_or_default()) {
            Ok(recipes) => {
                tracing::debug!(count = recipes.len(), "Cache hit");
                Some(recipes)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached response is corrupt, refetching");
                None
            }
        }
    }

    /// Serves `current` from the cache, or fetches it and records the result
    ///
    /// # Returns
    /// * `Ok(RecipeList)` - Recipes from the cache or a fresh fetch
    /// * `Err(SearchError::FetchFailed)` - The fetch failed; the cache is untouched
    /// * `Err(SearchError::ParseFailed)` - The fresh body was malformed; the cache is untouched
    pub async fn fetch_or_serve<S>(&self, current: &[String], source: &S) -> Result<RecipeList, SearchError>
    where
        S: RecipeSource + ?Sized,
    {
        if let Some(recipes) = self.serve_cached(current) {
            return Ok(RecipeList {
                recipes,
                from_cache: true,
            });
        }

        let raw = source.find_by_ingredients(current).await?;
        let recipes = parse_recipes(&raw).map_err(SearchError::ParseFailed)?;
        self.record_query(current, &raw);

        Ok(RecipeList {
            recipes,
            from_cache: false,
        })
    }
}
