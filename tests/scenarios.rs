//! End-to-end scenarios for the cache guard and favorites store
//!
//! Exercises the public library API with an on-disk store and a stub recipe
//! source, the way separate screens of the app share state.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use pantrychef::cache::QueryCacheGuard;
use pantrychef::data::{FetchError, Recipe, RecipeSource};
use pantrychef::favorites::FavoritesStore;
use pantrychef::storage::{FileStore, SharedStore};

struct StubSource {
    body: &'static str,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSource for StubSource {
    async fn find_by_ingredients(&self, _ingredients: &[String]) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.to_string())
    }
}

fn file_store(dir: &TempDir) -> SharedStore {
    Arc::new(FileStore::with_dir(dir.path().to_path_buf()))
}

fn ingredients(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn recipe(id: u64) -> Recipe {
    Recipe {
        id,
        title: format!("Recipe {}", id),
        image: None,
        missed_ingredients: vec![],
    }
}

#[tokio::test]
async fn test_unchanged_ingredients_skip_the_network_across_restarts() {
    let dir = TempDir::new().unwrap();
    let source = StubSource::new(r#"[{"id": 1, "title": "Egg bread", "image": null}]"#);

    let guard = QueryCacheGuard::new(file_store(&dir));
    let first = guard
        .fetch_or_serve(&ingredients(&["egg", "flour"]), &source)
        .await
        .unwrap();
    assert_eq!(first.recipes[0].id, 1);

    // A fresh guard simulates reopening the app.
    let guard = QueryCacheGuard::new(file_store(&dir));
    let second = guard
        .fetch_or_serve(&ingredients(&["egg", "flour"]), &source)
        .await
        .unwrap();

    assert!(second.from_cache);
    assert_eq!(second.recipes[0].id, 1);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_added_ingredient_calls_the_network() {
    let dir = TempDir::new().unwrap();
    let source = StubSource::new(r#"{"results": [{"id": 2, "title": "Crepes"}]}"#);
    let guard = QueryCacheGuard::new(file_store(&dir));

    guard
        .fetch_or_serve(&ingredients(&["egg", "flour"]), &source)
        .await
        .unwrap();
    let changed = guard
        .fetch_or_serve(&ingredients(&["egg", "flour", "milk"]), &source)
        .await
        .unwrap();

    assert!(!changed.from_cache);
    assert_eq!(changed.recipes[0].title, "Crepes");
    assert_eq!(source.calls(), 2);
}

#[test]
fn test_favorite_added_on_one_screen_is_seen_by_the_next() {
    let dir = TempDir::new().unwrap();

    let screen_a = FavoritesStore::new(file_store(&dir));
    screen_a.add(recipe(7));

    let screen_b = FavoritesStore::new(file_store(&dir));
    assert!(screen_b.is_favorite(7));
}

#[test]
fn test_removing_missing_favorite_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let favorites = FavoritesStore::new(file_store(&dir));
    favorites.add(recipe(1));
    favorites.add(recipe(2));

    assert!(favorites.remove(7).is_none());

    let reloaded = FavoritesStore::new(file_store(&dir));
    assert_eq!(reloaded.list(), vec![recipe(1), recipe(2)]);
}
