use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;

use super::watchlist_model::{NewWatchlistEntry, UserWatchlist, WatchlistEntry};
use super::watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::market_data::MarketDataProvider;
use crate::watchlist::WatchlistError;

/// Service owning the watchlist aggregate.
///
/// Membership checks always run against the freshly loaded record, and every
/// mutation goes through a single load-validate-mutate-save sequence.
pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    market_data: Arc<dyn MarketDataProvider>,
}

impl WatchlistService {
    /// Creates a new WatchlistService instance
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        market_data: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            repository,
            market_data,
        }
    }
}

#[async_trait]
impl WatchlistServiceTrait for WatchlistService {
    async fn add_entry(
        &self,
        user_id: &str,
        new_entry: NewWatchlistEntry,
    ) -> Result<UserWatchlist> {
        if user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        new_entry.validate()?;

        let mut watchlist = match self.repository.find_by_user(user_id)? {
            Some(watchlist) => watchlist,
            None => UserWatchlist::new(user_id),
        };

        if watchlist.contains_symbol(&new_entry.symbol) {
            return Err(Error::Watchlist(WatchlistError::AlreadyExists(
                new_entry.symbol,
            )));
        }

        let entry = new_entry.into_entry(Utc::now().naive_utc());
        debug!("Adding {} to watchlist for user {}", entry.symbol, user_id);

        watchlist.watchlist.push(entry);
        self.repository.save(&watchlist).await
    }

    async fn remove_entry(&self, user_id: &str, symbol: &str) -> Result<Vec<WatchlistEntry>> {
        if user_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "userId".to_string(),
            )));
        }
        if symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }

        let mut watchlist = match self.repository.find_by_user(user_id)? {
            Some(watchlist) => watchlist,
            None => {
                return Err(Error::Watchlist(WatchlistError::NotFound(format!(
                    "Watchlist for user {} not found",
                    user_id
                ))))
            }
        };

        let initial_len = watchlist.watchlist.len();
        watchlist.watchlist.retain(|entry| entry.symbol != symbol);

        if watchlist.watchlist.len() == initial_len {
            return Err(Error::Watchlist(WatchlistError::NotFound(format!(
                "{} is not in the watchlist",
                symbol
            ))));
        }

        debug!("Removing {} from watchlist for user {}", symbol, user_id);
        let saved = self.repository.save(&watchlist).await?;
        Ok(saved.watchlist)
    }

    async fn get_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistEntry>> {
        if user_id.trim().is_empty() {
            warn!("get_watchlist called without a userId");
        }

        let watchlist = match self.repository.find_by_user(user_id)? {
            Some(watchlist) => watchlist,
            None => return Ok(Vec::new()),
        };

        if watchlist.watchlist.is_empty() {
            return Ok(Vec::new());
        }

        // One lookup per held symbol; each settles on its own so a failing
        // symbol cannot abort its siblings.
        let lookups: Vec<_> = watchlist
            .watchlist
            .iter()
            .map(|entry| {
                let symbol = entry.symbol.clone();
                async move { self.market_data.get_latest_quote(&symbol).await }
            })
            .collect();

        let outcomes = join_all(lookups).await;
        let now = Utc::now().naive_utc();

        let enriched = watchlist
            .watchlist
            .into_iter()
            .zip(outcomes)
            .map(|(mut entry, outcome)| {
                match outcome {
                    Ok(quote) => {
                        // A null provider field falls back to the stored value
                        entry.current_price = quote.price.or(entry.current_price);
                        entry.price_change = quote.change.or(entry.price_change);
                        entry.percent_change = quote.change_percent.or(entry.percent_change);
                    }
                    Err(e) => {
                        warn!("Failed fetching quote for {}: {}", entry.symbol, e);
                    }
                }
                // The read is recorded as attempted even when the data is stale
                entry.last_updated = Some(now);
                entry
            })
            .collect();

        Ok(enriched)
    }
}
