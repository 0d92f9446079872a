diesel::table! {
    watchlists (user_id) {
        user_id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    watchlist_items (user_id, symbol) {
        user_id -> Text,
        symbol -> Text,
        name -> Nullable<Text>,
        exchange -> Nullable<Text>,
        sector -> Nullable<Text>,
        logo_url -> Nullable<Text>,
        price_at_add -> Double,
        current_price -> Nullable<Double>,
        price_change -> Nullable<Double>,
        percent_change -> Nullable<Double>,
        last_updated -> Nullable<Timestamp>,
        added_at -> Timestamp,
        position -> Integer,
    }
}

diesel::joinable!(watchlist_items -> watchlists (user_id));

diesel::allow_tables_to_appear_in_same_query!(watchlists, watchlist_items);
