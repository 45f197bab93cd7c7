//! Cache for the most recent recipe search
//!
//! Holds a single slot with the last ingredient list that reached the network
//! and the raw response it produced. Re-running a search with an identical
//! list is served from that slot; any change to the list goes to the network.
//! The slot never expires on its own and is only replaced by a newer
//! successful fetch.

mod guard;

pub use guard::{should_use_cache, CachedQuery, QueryCacheGuard, RecipeList, SearchError};
