pub mod price_fetcher;
