use thiserror::Error;

/// Custom error type for watchlist-related operations
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Already in watchlist: {0}")]
    AlreadyExists(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
