//! # Quote Page Price Fetcher
//!
//! Scrapes the current price of a ticker from its public quote page.
//!
//! One GET per call, a fixed desktop-browser identity and a bounded timeout.
//! There is no retry and no caching: every failure is returned to the caller
//! so the watch loop can decide what to do with it.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::errors::watch_error::WatchError;

//
// ----------- Constants -----------
//

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/71.0.3578.98 Safari/537.36";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Class signature of the large live-price `span` on the quote page.
pub const PRICE_CLASS: &str = "Trsdu(0.3s) Fw(b) Fz(36px) Mb(-4px) D(ib)";

static PRICE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("span[class=\"{PRICE_CLASS}\"]"))
        .expect("price selector is a valid CSS selector")
});

//
// ----------- Abstractions -----------
//

/// Anything able to produce the current price of a ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, ticker: &str) -> Result<f64, WatchError>;
}

//
// ----------- Quote page client -----------
//

#[derive(Debug, Clone)]
pub struct QuotePageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl QuotePageFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WatchError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn quote_url(&self, ticker: &str) -> String {
        format!("{}/quote/{}", self.base_url, ticker)
    }

    async fn fetch_page(&self, ticker: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(self.quote_url(ticker))
            .query(&[("p", ticker), (".tsrc", "fin-srch")])
            .send()
            .await?
            .text()
            .await
    }
}

#[async_trait]
impl PriceSource for QuotePageFetcher {
    #[instrument(skip(self))]
    async fn fetch_price(&self, ticker: &str) -> Result<f64, WatchError> {
        let page = self
            .fetch_page(ticker)
            .await
            .map_err(|source| WatchError::Transport {
                ticker: ticker.to_string(),
                source,
            })?;

        let price = parse_price(ticker, &page)?;
        debug!(ticker = %ticker, price = %price, "Fetched quote.");
        Ok(price)
    }
}

//
// ----------- Parsing -----------
//

/// Extracts the live price from quote page markup.
///
/// # Errors
/// - `MissingElement` when the price `span` is absent (layout change, unknown
///   ticker, or a blocked request served some other page).
/// - `InvalidPrice` when the element text is not a finite number.
pub fn parse_price(ticker: &str, html: &str) -> Result<f64, WatchError> {
    let document = Html::parse_document(html);

    let text: String = document
        .select(&PRICE_SELECTOR)
        .next()
        .ok_or_else(|| WatchError::MissingElement {
            ticker: ticker.to_string(),
        })?
        .text()
        .collect();

    let invalid = || WatchError::InvalidPrice {
        ticker: ticker.to_string(),
        text: text.clone(),
    };

    let price = text
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| invalid())?;

    if !price.is_finite() {
        return Err(invalid());
    }

    Ok(price)
}

//
// ----------- Tests -----------
//
