use thiserror::Error;

/// Everything that can abort a watch run.
///
/// Fetch-side failures carry the ticker so the final log line names the
/// symbol that broke the cycle.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] envy::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to fetch quote page for {ticker}: {source}")]
    Transport {
        ticker: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("price element not found on quote page for {ticker}")]
    MissingElement { ticker: String },

    #[error("price text {text:?} for {ticker} is not a number")]
    InvalidPrice { ticker: String, text: String },

    #[error("failed to build notification email: {0}")]
    InvalidMessage(String),

    #[error("failed to set up SMTP relay {host}: {source}")]
    RelaySetup {
        host: String,
        #[source]
        source: lettre::transport::smtp::Error,
    },

    #[error("failed to deliver notification for {ticker}: {source}")]
    Delivery {
        ticker: String,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

impl WatchError {
    /// True for errors raised while fetching or parsing a quote.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            WatchError::Transport { .. }
                | WatchError::MissingElement { .. }
                | WatchError::InvalidPrice { .. }
        )
    }

    /// True when the quote page was reached but its content was unusable.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            WatchError::MissingElement { .. } | WatchError::InvalidPrice { .. }
        )
    }
}
