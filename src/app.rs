//! Application state shared by every command
//!
//! `App` wires the pantry, the query cache and the favorites store to one
//! storage backend and to the recipe service. Each command maps onto one
//! method here; `main` only parses arguments and prints results.

use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{QueryCacheGuard, RecipeList, SearchError};
use crate::data::{
    FetchError, InstructionSource, Recipe, RecipeId, RecipeSource, RecognitionError,
    TextRecognizer,
};
use crate::favorites::FavoritesStore;
use crate::pantry::Pantry;
use crate::search::SearchHandle;
use crate::storage::SharedStore;

/// Shown in place of instructions that could not be fetched
const INSTRUCTIONS_ERROR: &str = "Error fetching instructions.";

/// Errors a command can report to the user
#[derive(Debug, Error)]
pub enum AppError {
    /// Search was requested with nothing in the pantry
    #[error("Please add ingredients first")]
    NoIngredients,

    /// A 1-based list position past the end of the list
    #[error("No ingredient at position {0}")]
    NoSuchPosition(usize),

    /// The recipe is not among the last search results
    #[error("Recipe {0} is not in the last search results; run `pantrychef search` first")]
    NotInResults(RecipeId),

    /// The recipe is not a favorite
    #[error("Recipe {0} is not a favorite")]
    NotFavorite(RecipeId),

    /// The background search ended without a result
    #[error("Search was interrupted")]
    SearchInterrupted,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Result of starring a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorited {
    pub recipe: Recipe,
    /// False if the recipe was already a favorite
    pub newly_added: bool,
}

/// All state one run of the program works with
pub struct App {
    pantry: Pantry,
    guard: Arc<QueryCacheGuard>,
    favorites: FavoritesStore,
    recipes: Arc<dyn RecipeSource>,
    instructions: Arc<dyn InstructionSource>,
}

impl App {
    /// Creates an App over `store`, reaching the network through the given sources
    pub fn new(
        store: SharedStore,
        recipes: Arc<dyn RecipeSource>,
        instructions: Arc<dyn InstructionSource>,
    ) -> Self {
        Self {
            pantry: Pantry::new(store.clone()),
            guard: Arc::new(QueryCacheGuard::new(store.clone())),
            favorites: FavoritesStore::new(store),
            recipes,
            instructions,
        }
    }

    /// Adds typed ingredients, returning the ones actually stored
    pub fn add_ingredients(&self, ingredients: &[String]) -> Vec<String> {
        ingredients
            .iter()
            .filter_map(|text| self.pantry.add(text))
            .collect()
    }

    /// Removes the ingredient at a 1-based position
    pub fn remove_ingredient(&self, position: usize) -> Result<String, AppError> {
        position
            .checked_sub(1)
            .and_then(|index| self.pantry.remove(index))
            .ok_or(AppError::NoSuchPosition(position))
    }

    pub fn ingredients(&self) -> Vec<String> {
        self.pantry.items()
    }

    /// Appends every recognized word from `input` to the pantry
    pub fn scan(&self, recognizer: &dyn TextRecognizer, input: &Path) -> Result<Vec<String>, AppError> {
        let words = recognizer.recognize(input)?;
        self.pantry.extend_recognized(words.clone());
        Ok(words)
    }

    /// Finds recipes for the pantry, from cache when the list is unchanged
    pub async fn search(&self) -> Result<RecipeList, AppError> {
        let ingredients = self.pantry.items();
        if ingredients.is_empty() {
            return Err(AppError::NoIngredients);
        }

        let handle = SearchHandle::spawn(self.guard.clone(), self.recipes.clone(), ingredients);
        match handle.outcome().await {
            Some(outcome) => Ok(outcome?),
            None => Err(AppError::SearchInterrupted),
        }
    }

    /// Stars a recipe from the last search results
    pub fn favorite(&self, id: RecipeId) -> Result<Favorited, AppError> {
        let recipe = self
            .guard
            .cached_recipes()
            .unwrap_or_default()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(AppError::NotInResults(id))?;

        let newly_added = self.favorites.add(recipe.clone());
        Ok(Favorited { recipe, newly_added })
    }

    /// Unstars a recipe
    pub fn unfavorite(&self, id: RecipeId) -> Result<Recipe, AppError> {
        self.favorites.remove(id).ok_or(AppError::NotFavorite(id))
    }

    pub fn is_favorite(&self, id: RecipeId) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn favorites(&self) -> Vec<Recipe> {
        self.favorites.list()
    }

    /// Favorites paired with their instructions, fetched concurrently
    ///
    /// A failed lookup yields a placeholder for that recipe only.
    pub async fn favorites_with_instructions(&self) -> Vec<(Recipe, String)> {
        let favorites = self.favorites.list();
        let lookups = favorites
            .iter()
            .map(|recipe| self.instructions.fetch_instructions(recipe.id));
        let results = join_all(lookups).await;

        favorites
            .into_iter()
            .zip(results)
            .map(|(recipe, result)| {
                let text = result.unwrap_or_else(|e| {
                    tracing::warn!(id = recipe.id, error = %e, "Failed to fetch instructions");
                    INSTRUCTIONS_ERROR.to_string()
                });
                (recipe, text)
            })
            .collect()
    }

    /// Cooking instructions for one recipe
    pub async fn instructions(&self, id: RecipeId) -> Result<String, AppError> {
        Ok(self.instructions.fetch_instructions(id).await?)
    }
}

/// One recipe as printed in listings
pub fn render_recipe(recipe: &Recipe, is_favorite: bool) -> String {
    let star = if is_favorite { "*" } else { " " };
    let mut out = format!("{} {:>8}  {}", star, recipe.id, recipe.title);
    if let Some(image) = &recipe.image {
        out.push_str(&format!("\n            {}", image));
    }
    if !recipe.missed_ingredients.is_empty() {
        let missing: Vec<&str> = recipe
            .missed_ingredients
            .iter()
            .map(|m| m.original.as_str())
            .collect();
        out.push_str(&format!("\n            missing: {}", missing.join("; ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MissedIngredient, TranscriptRecognizer};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const RESULTS: &str = r#"[
        {"id": 1, "title": "Pancakes", "image": "https://img/1.jpg",
         "missedIngredients": [{"name": "milk", "original": "1 cup milk"}]},
        {"id": 7, "title": "Shakshuka", "image": null, "missedIngredients": []}
    ]"#;

    #[derive(Default)]
    struct FakeService {
        searches: AtomicUsize,
    }

    #[async_trait]
    impl RecipeSource for FakeService {
        async fn find_by_ingredients(&self, _ingredients: &[String]) -> Result<String, FetchError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(RESULTS.to_string())
        }
    }

    #[async_trait]
    impl InstructionSource for FakeService {
        async fn fetch_instructions(&self, recipe_id: RecipeId) -> Result<String, FetchError> {
            if recipe_id == 7 {
                Err(FetchError::Status(404))
            } else {
                Ok(format!("1. Cook recipe {}.", recipe_id))
            }
        }
    }

    fn app() -> (App, Arc<FakeService>, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let service = Arc::new(FakeService::default());
        let app = App::new(store.clone(), service.clone(), service.clone());
        (app, service, store)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_search_requires_ingredients() {
        let (app, service, _store) = app();

        let result = app.search().await;

        assert!(matches!(result, Err(AppError::NoIngredients)));
        assert_eq!(service.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeat_search_uses_cache_until_list_changes() {
        let (app, service, _store) = app();
        app.add_ingredients(&strings(&["egg", "flour"]));

        assert!(!app.search().await.unwrap().from_cache);
        assert!(app.search().await.unwrap().from_cache);
        assert_eq!(service.searches.load(Ordering::SeqCst), 1);

        app.add_ingredients(&strings(&["milk"]));
        assert!(!app.search().await.unwrap().from_cache);
        assert_eq!(service.searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_favorite_from_last_results() {
        let (app, _service, store) = app();
        app.add_ingredients(&strings(&["egg"]));
        app.search().await.unwrap();

        let first = app.favorite(7).unwrap();
        let again = app.favorite(7).unwrap();

        assert!(first.newly_added);
        assert!(!again.newly_added);
        assert_eq!(first.recipe.title, "Shakshuka");

        let reopened = App::new(store, Arc::new(FakeService::default()), Arc::new(FakeService::default()));
        assert!(reopened.is_favorite(7));
    }

    #[test]
    fn test_favorite_unknown_recipe() {
        let (app, _service, _store) = app();
        assert!(matches!(app.favorite(99), Err(AppError::NotInResults(99))));
    }

    #[tokio::test]
    async fn test_unfavorite() {
        let (app, _service, _store) = app();
        app.add_ingredients(&strings(&["egg"]));
        app.search().await.unwrap();
        app.favorite(1).unwrap();

        assert_eq!(app.unfavorite(1).unwrap().id, 1);
        assert!(matches!(app.unfavorite(1), Err(AppError::NotFavorite(1))));
        assert!(app.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_favorites_with_instructions_tolerates_failures() {
        let (app, _service, _store) = app();
        app.add_ingredients(&strings(&["egg"]));
        app.search().await.unwrap();
        app.favorite(1).unwrap();
        app.favorite(7).unwrap();

        let listed = app.favorites_with_instructions().await;

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].1, "1. Cook recipe 1.");
        assert_eq!(listed[1].1, INSTRUCTIONS_ERROR);
    }

    #[test]
    fn test_add_and_remove_ingredients() {
        let (app, _service, _store) = app();

        let added = app.add_ingredients(&strings(&[" egg ", "", "flour"]));
        assert_eq!(added, strings(&["egg", "flour"]));

        assert_eq!(app.remove_ingredient(1).unwrap(), "egg");
        assert!(matches!(app.remove_ingredient(0), Err(AppError::NoSuchPosition(0))));
        assert!(matches!(app.remove_ingredient(5), Err(AppError::NoSuchPosition(5))));
        assert_eq!(app.ingredients(), strings(&["flour"]));
    }

    #[test]
    fn test_scan_appends_words() {
        let (app, _service, _store) = app();
        let dir = TempDir::new().unwrap();
        let transcript = dir.path().join("shelf.txt");
        std::fs::write(&transcript, "Rice Beans\nSalsa").unwrap();
        app.add_ingredients(&strings(&["egg"]));

        let words = app.scan(&TranscriptRecognizer, &transcript).unwrap();

        assert_eq!(words, strings(&["Rice", "Beans", "Salsa"]));
        assert_eq!(app.ingredients(), strings(&["egg", "Rice", "Beans", "Salsa"]));
    }

    #[test]
    fn test_render_recipe() {
        let recipe = Recipe {
            id: 1,
            title: "Pancakes".to_string(),
            image: None,
            missed_ingredients: vec![MissedIngredient {
                name: "milk".to_string(),
                original: "1 cup milk".to_string(),
            }],
        };

        let line = render_recipe(&recipe, true);
        assert!(line.starts_with("*"));
        assert!(line.contains("Pancakes"));
        assert!(line.contains("missing: 1 cup milk"));
        assert!(!render_recipe(&recipe, false).starts_with("*"));
    }
}
