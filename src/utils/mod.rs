pub mod watchlist_serde;
