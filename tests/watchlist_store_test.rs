use chrono::NaiveDate;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use stockwatch_core::db;
use stockwatch_core::watchlist::{
    NewWatchlistEntry, UserWatchlist, WatchlistRepository, WatchlistRepositoryTrait,
};

fn setup_repository() -> WatchlistRepository {
    // A single-connection pool keeps the in-memory database alive for the test
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to build test pool");

    db::run_migrations(&pool).expect("Failed to run migrations");

    WatchlistRepository::new(Arc::new(pool))
}

fn entry(symbol: &str, price_at_add: f64) -> NewWatchlistEntry {
    NewWatchlistEntry {
        symbol: symbol.to_string(),
        price_at_add: Some(price_at_add),
        ..Default::default()
    }
}

fn added_at(second: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 7)
        .unwrap()
        .and_hms_opt(12, 0, second)
        .unwrap()
}

#[tokio::test]
async fn save_and_find_round_trip_preserves_entries() {
    let repository = setup_repository();

    let mut watchlist = UserWatchlist::new("u1");
    let mut apple = entry("AAPL", 150.0);
    apple.name = Some("Apple Inc.".to_string());
    apple.exchange = Some("NASDAQ".to_string());
    apple.current_price = Some(152.0);
    watchlist.watchlist.push(apple.into_entry(added_at(0)));
    watchlist.watchlist.push(entry("MSFT", 300.0).into_entry(added_at(1)));

    repository.save(&watchlist).await.unwrap();

    let loaded = repository.find_by_user("u1").unwrap().unwrap();
    assert_eq!(loaded.user_id, "u1");
    assert_eq!(loaded.watchlist.len(), 2);

    let apple = &loaded.watchlist[0];
    assert_eq!(apple.symbol, "AAPL");
    assert_eq!(apple.name.as_deref(), Some("Apple Inc."));
    assert_eq!(apple.exchange.as_deref(), Some("NASDAQ"));
    assert_eq!(apple.price_at_add, 150.0);
    assert_eq!(apple.current_price, Some(152.0));
    assert_eq!(apple.last_updated, None);
    assert_eq!(apple.added_at, added_at(0));

    assert_eq!(loaded.watchlist[1].symbol, "MSFT");
}

#[tokio::test]
async fn find_for_unknown_user_returns_none() {
    let repository = setup_repository();
    assert!(repository.find_by_user("nobody").unwrap().is_none());
}

#[tokio::test]
async fn save_preserves_insertion_order() {
    let repository = setup_repository();

    let mut watchlist = UserWatchlist::new("u1");
    for (i, symbol) in ["GOOGL", "AAPL", "MSFT"].into_iter().enumerate() {
        watchlist
            .watchlist
            .push(entry(symbol, 100.0).into_entry(added_at(i as u32)));
    }
    repository.save(&watchlist).await.unwrap();

    let loaded = repository.find_by_user("u1").unwrap().unwrap();
    let symbols: Vec<&str> = loaded.watchlist.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["GOOGL", "AAPL", "MSFT"]);
}

#[tokio::test]
async fn save_replaces_items_and_keeps_the_parent_row() {
    let repository = setup_repository();

    let mut watchlist = UserWatchlist::new("u1");
    watchlist.watchlist.push(entry("AAPL", 150.0).into_entry(added_at(0)));
    watchlist.watchlist.push(entry("MSFT", 300.0).into_entry(added_at(1)));
    let saved = repository.save(&watchlist).await.unwrap();

    // Drop one entry and save the reduced aggregate
    let mut reduced = saved.clone();
    reduced.watchlist.retain(|e| e.symbol != "AAPL");
    repository.save(&reduced).await.unwrap();

    let loaded = repository.find_by_user("u1").unwrap().unwrap();
    assert_eq!(loaded.watchlist.len(), 1);
    assert_eq!(loaded.watchlist[0].symbol, "MSFT");

    // Empty the list entirely; the aggregate row must survive
    let mut empty = loaded.clone();
    empty.watchlist.clear();
    repository.save(&empty).await.unwrap();

    let loaded = repository.find_by_user("u1").unwrap().unwrap();
    assert!(loaded.watchlist.is_empty());
}

#[tokio::test]
async fn aggregates_are_isolated_per_user() {
    let repository = setup_repository();

    let mut first = UserWatchlist::new("u1");
    first.watchlist.push(entry("AAPL", 150.0).into_entry(added_at(0)));
    repository.save(&first).await.unwrap();

    let mut second = UserWatchlist::new("u2");
    second.watchlist.push(entry("AAPL", 151.0).into_entry(added_at(1)));
    second.watchlist.push(entry("MSFT", 300.0).into_entry(added_at(2)));
    repository.save(&second).await.unwrap();

    assert_eq!(repository.find_by_user("u1").unwrap().unwrap().watchlist.len(), 1);
    assert_eq!(repository.find_by_user("u2").unwrap().unwrap().watchlist.len(), 2);
}
