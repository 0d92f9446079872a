//! Watchlist aggregation and enrichment.
//!
//! The aggregate is one watchlist record per user holding an ordered,
//! uniqueness-enforced list of instruments. Mutations (`add_entry`,
//! `remove_entry`) go through a load-validate-mutate-save sequence against
//! the repository; reads (`get_watchlist`) fan out one live-quote lookup per
//! held symbol and merge the settled results into the stored entries without
//! writing anything back.

pub(crate) mod watchlist_errors;
pub(crate) mod watchlist_model;
pub(crate) mod watchlist_repository;
pub(crate) mod watchlist_service;
pub(crate) mod watchlist_traits;


// Re-export the public interface
pub use watchlist_model::{NewWatchlistEntry, UserWatchlist, WatchlistEntry};
pub use watchlist_repository::WatchlistRepository;
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};

// Re-export error types for convenience
pub use watchlist_errors::WatchlistError;
