use async_trait::async_trait;

use super::watchlist_model::{NewWatchlistEntry, UserWatchlist, WatchlistEntry};
use crate::errors::Result;

/// Trait defining the contract for watchlist persistence.
///
/// Implementations must preserve entry insertion order and uniqueness exactly
/// as written; deduplication is the service's job, never the store's.
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    fn find_by_user(&self, user_id: &str) -> Result<Option<UserWatchlist>>;
    async fn save(&self, watchlist: &UserWatchlist) -> Result<UserWatchlist>;
}

/// Trait defining the contract for watchlist service operations.
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    async fn add_entry(
        &self,
        user_id: &str,
        new_entry: NewWatchlistEntry,
    ) -> Result<UserWatchlist>;
    async fn remove_entry(&self, user_id: &str, symbol: &str) -> Result<Vec<WatchlistEntry>>;
    async fn get_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistEntry>>;
}
