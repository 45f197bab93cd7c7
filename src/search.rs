//! Background recipe search
//!
//! Runs a cache-or-network search on a tokio task and reports back over a
//! channel, so the caller stays responsive while the request is in flight.
//! If the caller goes away before the search finishes, the result is dropped
//! and the cache is still updated.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::{QueryCacheGuard, RecipeList, SearchError};
use crate::data::RecipeSource;

/// Messages sent from a background search to its caller
#[derive(Debug)]
pub enum SearchMessage {
    /// The search task has started
    Started,
    /// The search finished, from cache or network
    Completed(Result<RecipeList, SearchError>),
}

/// Handle to one in-flight search
#[derive(Debug)]
pub struct SearchHandle {
    /// Channel for receiving search progress
    pub receiver: mpsc::Receiver<SearchMessage>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Spawns a search for `ingredients`
    ///
    /// Searches are not deduplicated: two handles for the same list both run,
    /// and the last successful fetch is the one left in the cache.
    pub fn spawn(
        guard: Arc<QueryCacheGuard>,
        source: Arc<dyn RecipeSource>,
        ingredients: Vec<String>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(4);

        let task = tokio::spawn(async move {
            let _ = tx.send(SearchMessage::Started).await;

            let outcome = guard.fetch_or_serve(&ingredients, source.as_ref()).await;
            if let Err(e) = &outcome {
                tracing::warn!(error = %e, "Recipe search failed");
            }

            if tx.send(SearchMessage::Completed(outcome)).await.is_err() {
                tracing::debug!("Search result dropped, receiver is gone");
            }
        });

        Self { receiver: rx, task }
    }

    /// Waits for the search to finish and returns its outcome
    ///
    /// Returns `None` if the task ended without reporting.
    pub async fn outcome(mut self) -> Option<Result<RecipeList, SearchError>> {
        while let Some(message) = self.receiver.recv().await {
            if let SearchMessage::Completed(outcome) = message {
                return Some(outcome);
            }
        }
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Search task ended abnormally");
        }
        None
    }
}
