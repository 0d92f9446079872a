use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Domain model representing one instrument held in a user's watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub logo_url: Option<String>,
    pub price_at_add: f64,
    pub current_price: Option<f64>,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
    pub added_at: NaiveDateTime,
}

/// Input model for adding an instrument to a watchlist.
///
/// `current_price`/`price_change`/`percent_change` may carry the quote
/// snapshot the caller had on screen when the instrument was added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistEntry {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub logo_url: Option<String>,
    pub price_at_add: Option<f64>,
    pub current_price: Option<f64>,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
}

impl NewWatchlistEntry {
    /// Validates the new entry data
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }
        match self.price_at_add {
            None => {
                return Err(Error::Validation(ValidationError::MissingField(
                    "priceAtAdd".to_string(),
                )))
            }
            Some(price) if !price.is_finite() => {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "priceAtAdd must be a finite number".to_string(),
                )))
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Converts the validated input into a stored entry, stamping `added_at`.
    pub fn into_entry(self, added_at: NaiveDateTime) -> WatchlistEntry {
        WatchlistEntry {
            symbol: self.symbol,
            name: self.name,
            exchange: self.exchange,
            sector: self.sector,
            logo_url: self.logo_url,
            price_at_add: self.price_at_add.unwrap_or_default(),
            current_price: self.current_price,
            price_change: self.price_change,
            percent_change: self.percent_change,
            last_updated: self.last_updated,
            added_at,
        }
    }
}

/// Aggregate root: the single watchlist record owned by one user.
///
/// Entry order is insertion order and doubles as display order; no two
/// entries share a symbol (case-sensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWatchlist {
    pub user_id: String,
    pub watchlist: Vec<WatchlistEntry>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserWatchlist {
    /// Creates an empty watchlist for a user, stamped with the current time.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            user_id: user_id.into(),
            watchlist: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.watchlist.iter().any(|entry| entry.symbol == symbol)
    }
}

/// Database model for the watchlist aggregate row
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::watchlists)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistDB {
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for one watchlist entry row
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::watchlist_items)]
#[diesel(primary_key(user_id, symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistEntryDB {
    pub user_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub logo_url: Option<String>,
    pub price_at_add: f64,
    pub current_price: Option<f64>,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
    pub added_at: NaiveDateTime,
    pub position: i32,
}

impl WatchlistEntryDB {
    /// Flattens a domain entry into a row, keyed and ordered for its owner.
    pub fn from_entry(user_id: &str, entry: &WatchlistEntry, position: i32) -> Self {
        Self {
            user_id: user_id.to_string(),
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            exchange: entry.exchange.clone(),
            sector: entry.sector.clone(),
            logo_url: entry.logo_url.clone(),
            price_at_add: entry.price_at_add,
            current_price: entry.current_price,
            price_change: entry.price_change,
            percent_change: entry.percent_change,
            last_updated: entry.last_updated,
            added_at: entry.added_at,
            position,
        }
    }
}

impl From<WatchlistEntryDB> for WatchlistEntry {
    fn from(db: WatchlistEntryDB) -> Self {
        Self {
            symbol: db.symbol,
            name: db.name,
            exchange: db.exchange,
            sector: db.sector,
            logo_url: db.logo_url,
            price_at_add: db.price_at_add,
            current_price: db.current_price,
            price_change: db.price_change,
            percent_change: db.percent_change,
            last_updated: db.last_updated,
            added_at: db.added_at,
        }
    }
}
