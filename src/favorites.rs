//! Favorite recipes that survive restarts
//!
//! Favorites are keyed by recipe id: two fetches of the same recipe may differ
//! in incidental fields such as the missing-ingredient list, and they still
//! refer to one favorite. The list keeps insertion order.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::data::{Recipe, RecipeId};
use crate::storage::{read_json, write_json, SharedStore, FAVORITES_KEY};

/// Durable, id-keyed collection of starred recipes
///
/// Every instance built over the same store sees the favorites written by the
/// others before it was constructed. Mutations update memory first and then
/// write the whole list through; a failing store leaves the in-memory list in
/// charge for the rest of the session.
#[derive(Debug)]
pub struct FavoritesStore {
    store: SharedStore,
    favorites: RwLock<Vec<Recipe>>,
}

impl FavoritesStore {
    /// Loads the favorites list from `store`
    pub fn new(store: SharedStore) -> Self {
        let favorites = match read_json::<Vec<Recipe>>(store.as_ref(), FAVORITES_KEY) {
            Ok(Some(stored)) => dedup_by_id(stored),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Favorites unavailable, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            favorites: RwLock::new(favorites),
        }
    }

    /// Adds `recipe` unless a favorite with the same id exists
    ///
    /// Returns `true` if the recipe was added.
    pub fn add(&self, recipe: Recipe) -> bool {
        let mut favorites = self.favorites.write().unwrap_or_else(|e| e.into_inner());
        if favorites.iter().any(|f| f.id == recipe.id) {
            return false;
        }

        tracing::info!(id = recipe.id, title = %recipe.title, "Added favorite");
        favorites.push(recipe);
        self.persist(&favorites);
        true
    }

    /// Removes the favorite with the given id
    ///
    /// Returns the removed recipe, or `None` if it was not a favorite.
    pub fn remove(&self, id: RecipeId) -> Option<Recipe> {
        let mut favorites = self.favorites.write().unwrap_or_else(|e| e.into_inner());
        let position = favorites.iter().position(|f| f.id == id)?;
        let removed = favorites.remove(position);

        tracing::info!(id, "Removed favorite");
        self.persist(&favorites);
        Some(removed)
    }

    pub fn is_favorite(&self, id: RecipeId) -> bool {
        self.favorites
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|f| f.id == id)
    }

    /// Favorites in the order they were added
    pub fn list(&self) -> Vec<Recipe> {
        self.favorites.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn persist(&self, favorites: &[Recipe]) {
        if let Err(e) = write_json(self.store.as_ref(), FAVORITES_KEY, favorites) {
            tracing::warn!(error = %e, "Could not persist favorites, keeping them in memory");
        }
    }
}

/// Keeps the first occurrence of each id
fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes.into_iter().filter(|r| seen.insert(r.id)).collect()
}
