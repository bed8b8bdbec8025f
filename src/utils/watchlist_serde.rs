use crate::models::watch_item::WatchItem;
use serde::{self, Deserialize, Deserializer};

const ENTRY_SEPARATOR: char = ',';
const PRICE_SEPARATOR: char = ':';

/// Deserialize a "TICKER:PRICE,TICKER:PRICE" string into an ordered watchlist.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<WatchItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_watchlist(&s).map_err(serde::de::Error::custom)
}

/// Parse the watchlist format, keeping entry order.
///
/// Blank entries (e.g. a trailing comma) are ignored. The price is split off
/// the last `:` so exchange-prefixed tickers such as `HKG:0700` still work.
pub fn parse_watchlist(s: &str) -> Result<Vec<WatchItem>, String> {
    s.split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Result<WatchItem, String> {
    let (ticker, price) = entry
        .rsplit_once(PRICE_SEPARATOR)
        .ok_or_else(|| format!("watchlist entry `{entry}` must look like TICKER:PRICE"))?;

    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(format!("watchlist entry `{entry}` has an empty ticker"));
    }

    let reference_price = price
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("watchlist entry `{entry}` has an invalid price: {e}"))?;

    Ok(WatchItem::new(ticker, reference_price))
}
