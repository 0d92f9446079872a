use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use super::watchlist_model::{UserWatchlist, WatchlistDB, WatchlistEntryDB};
use super::watchlist_traits::WatchlistRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::{watchlist_items, watchlists};

/// Repository persisting the watchlist aggregate in SQLite.
///
/// The aggregate is stored as one `watchlists` row plus its ordered
/// `watchlist_items` rows; `save` replaces the item rows in a single
/// transaction so a reader never observes a partially written list.
pub struct WatchlistRepository {
    pool: Arc<DbPool>,
}

impl WatchlistRepository {
    /// Creates a new WatchlistRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    fn find_by_user(&self, user_id: &str) -> Result<Option<UserWatchlist>> {
        let mut conn = get_connection(&self.pool)?;

        let parent = watchlists::table
            .find(user_id)
            .first::<WatchlistDB>(&mut conn)
            .optional()?;

        let parent = match parent {
            Some(parent) => parent,
            None => return Ok(None),
        };

        let items = watchlist_items::table
            .filter(watchlist_items::user_id.eq(user_id))
            .order(watchlist_items::position.asc())
            .load::<WatchlistEntryDB>(&mut conn)?;

        Ok(Some(UserWatchlist {
            user_id: parent.user_id,
            watchlist: items.into_iter().map(Into::into).collect(),
            created_at: parent.created_at,
            updated_at: parent.updated_at,
        }))
    }

    async fn save(&self, watchlist: &UserWatchlist) -> Result<UserWatchlist> {
        let mut conn = get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, Error, _>(|conn| {
            let updated = diesel::update(watchlists::table.find(&watchlist.user_id))
                .set(watchlists::updated_at.eq(now))
                .execute(conn)?;

            if updated == 0 {
                diesel::insert_into(watchlists::table)
                    .values(WatchlistDB {
                        user_id: watchlist.user_id.clone(),
                        created_at: watchlist.created_at,
                        updated_at: now,
                    })
                    .execute(conn)?;
            }

            diesel::delete(
                watchlist_items::table.filter(watchlist_items::user_id.eq(&watchlist.user_id)),
            )
            .execute(conn)?;

            let rows: Vec<WatchlistEntryDB> = watchlist
                .watchlist
                .iter()
                .enumerate()
                .map(|(position, entry)| {
                    WatchlistEntryDB::from_entry(&watchlist.user_id, entry, position as i32)
                })
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(watchlist_items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(())
        })?;

        Ok(UserWatchlist {
            updated_at: now,
            ..watchlist.clone()
        })
    }
}
