use std::fmt;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::background::market_clock::MarketSession;
use crate::models::trigger_rule::TriggerRule;
use crate::models::watch_item::WatchItem;
use crate::utils::watchlist_serde;

const DEFAULT_QUOTE_BASE_URL: &str = "https://hk.finance.yahoo.com";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_OPEN_HOUR: u32 = 9;
const DEFAULT_CLOSE_HOUR: u32 = 16;

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    #[serde(with = "watchlist_serde")]
    pub watchlist: Vec<WatchItem>,
    pub notify_email_address: String,
    pub notify_email_password: String,
    pub market_timezone: Tz,
    #[serde(default = "default_open_hour")]
    pub market_open_hour: u32,
    #[serde(default = "default_close_hour")]
    pub market_close_hour: u32,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_quote_base_url")]
    pub quote_base_url: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_rise_factor")]
    pub rise_factor: f64,
    #[serde(default = "default_drop_factor")]
    pub drop_factor: f64,
    #[serde(default)]
    pub isolate_fetch_errors: bool,
}

fn default_open_hour() -> u32 {
    DEFAULT_OPEN_HOUR
}

fn default_close_hour() -> u32 {
    DEFAULT_CLOSE_HOUR
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_quote_base_url() -> String {
    DEFAULT_QUOTE_BASE_URL.to_string()
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_rise_factor() -> f64 {
    TriggerRule::default().rise_factor
}

fn default_drop_factor() -> f64 {
    TriggerRule::default().drop_factor
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Load from explicit key/value pairs instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, AppConfig>(vars)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), envy::Error> {
        if self.watchlist.is_empty() {
            return Err(custom("WATCHLIST must contain at least one TICKER:PRICE entry."));
        }

        if let Some(item) = self
            .watchlist
            .iter()
            .find(|item| !item.reference_price.is_finite() || item.reference_price <= 0.0)
        {
            return Err(custom(&format!(
                "WATCHLIST reference price for {} must be positive.",
                item.ticker
            )));
        }

        if self.notify_email_address.trim().is_empty() {
            return Err(custom("NOTIFY_EMAIL_ADDRESS cannot be empty."));
        }

        if self.notify_email_password.is_empty() {
            return Err(custom("NOTIFY_EMAIL_PASSWORD cannot be empty."));
        }

        if self.market_close_hour > 23 || self.market_open_hour > self.market_close_hour {
            return Err(custom(
                "MARKET_OPEN_HOUR and MARKET_CLOSE_HOUR must satisfy open <= close <= 23.",
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(custom("POLL_INTERVAL_SECS must be greater than zero."));
        }

        if self.quote_base_url.trim().is_empty() {
            return Err(custom("QUOTE_BASE_URL cannot be empty."));
        }

        if self.smtp_host.trim().is_empty() {
            return Err(custom("SMTP_HOST cannot be empty."));
        }

        if !self.rise_factor.is_finite() || self.rise_factor <= 1.0 {
            return Err(custom("RISE_FACTOR must be greater than 1.0."));
        }

        if !self.drop_factor.is_finite() || self.drop_factor <= 0.0 || self.drop_factor >= 1.0 {
            return Err(custom("DROP_FACTOR must be between 0.0 and 1.0."));
        }

        Ok(())
    }

    pub fn market_session(&self) -> MarketSession {
        MarketSession::new(
            self.market_timezone,
            self.market_open_hour,
            self.market_close_hour,
        )
    }

    pub fn trigger_rule(&self) -> TriggerRule {
        TriggerRule::new(self.rise_factor, self.drop_factor)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn custom(message: &str) -> envy::Error {
    envy::Error::Custom(message.to_string())
}

// Hand-written so the mail password never reaches a log line.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("watchlist", &self.watchlist)
            .field("notify_email_address", &self.notify_email_address)
            .field("notify_email_password", &"<redacted>")
            .field("market_timezone", &self.market_timezone)
            .field("market_open_hour", &self.market_open_hour)
            .field("market_close_hour", &self.market_close_hour)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("quote_base_url", &self.quote_base_url)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("rise_factor", &self.rise_factor)
            .field("drop_factor", &self.drop_factor)
            .field("isolate_fetch_errors", &self.isolate_fetch_errors)
            .finish()
    }
}
