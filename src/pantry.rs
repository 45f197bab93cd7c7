//! The user's current ingredient list
//!
//! Entries are kept in the order they were added. Typed entries are trimmed
//! and blank ones dropped; recognized words are appended verbatim. The list is
//! written through to storage after every change.

use std::sync::RwLock;

use crate::storage::{read_json, write_json, SharedStore, INGREDIENTS_KEY};

/// Persisted, ordered list of ingredient names
#[derive(Debug)]
pub struct Pantry {
    store: SharedStore,
    items: RwLock<Vec<String>>,
}

impl Pantry {
    /// Loads the ingredient list from `store`
    pub fn new(store: SharedStore) -> Self {
        let items = match read_json::<Vec<String>>(store.as_ref(), INGREDIENTS_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ingredient list unavailable, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            items: RwLock::new(items),
        }
    }

    /// Adds a typed ingredient
    ///
    /// Returns the stored text, or `None` if the input was blank.
    pub fn add(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.mutate(|items| items.push(trimmed.to_string()));
        Some(trimmed.to_string())
    }

    /// Appends words from text recognition exactly as recognized
    pub fn extend_recognized<I>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let words: Vec<String> = words.into_iter().collect();
        let count = words.len();
        if count > 0 {
            self.mutate(|items| items.extend(words));
        }
        count
    }

    /// Removes the entry at `index` (zero-based)
    ///
    /// Returns the removed entry, or `None` if `index` is out of range.
    pub fn remove(&self, index: usize) -> Option<String> {
        let mut removed = None;
        self.mutate(|items| {
            if index < items.len() {
                removed = Some(items.remove(index));
            }
        });
        removed
    }

    /// Snapshot of the list in order
    pub fn items(&self) -> Vec<String> {
        self.items.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut Vec<String>),
    {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        let before = items.len();
        change(&mut *items);
        if items.len() == before {
            return;
        }

        if let Err(e) = write_json(self.store.as_ref(), INGREDIENTS_KEY, items.as_slice()) {
            tracing::warn!(error = %e, "Could not persist ingredient list, keeping it in memory");
        }
    }
}
