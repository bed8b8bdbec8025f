use tracing::{error, info, instrument, warn};

use crate::background::market_clock::{Clock, IntervalTicker, MarketSession, SystemClock, Ticker};
use crate::config::{AppConfig, DEFAULT_POLL_INTERVAL_SECS};
use crate::errors::watch_error::WatchError;
use crate::fetchers::price_fetcher::{PriceSource, QuotePageFetcher};
use crate::models::trigger_rule::{Trend, TriggerRule};
use crate::models::watch_item::WatchItem;
use crate::notifiers::email_notifier::{EmailNotifier, Notifier};

/// What happened to a single watch item during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Notified(Trend),
    NoUpdate,
    /// Fetch failed and per-item isolation is on.
    Skipped,
}

/// Summary returned once the market closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub cycles: u64,
    pub notifications: u64,
}

/// Polls every watch item once per tick while the market is open.
pub struct PriceWatcher {
    items: Vec<WatchItem>,
    rule: TriggerRule,
    session: MarketSession,
    isolate_fetch_errors: bool,
    source: Box<dyn PriceSource>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    ticker: Box<dyn Ticker>,
}

impl PriceWatcher {
    /// Create a watcher on the wall clock, waiting the default poll interval
    /// between cycles.
    pub fn new(
        items: Vec<WatchItem>,
        rule: TriggerRule,
        session: MarketSession,
        source: Box<dyn PriceSource>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            items,
            rule,
            session,
            isolate_fetch_errors: false,
            source,
            notifier,
            clock: Box::new(SystemClock),
            ticker: Box::new(IntervalTicker::new(std::time::Duration::from_secs(
                DEFAULT_POLL_INTERVAL_SECS,
            ))),
        }
    }

    /// Wire the real quote page fetcher and email notifier from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, WatchError> {
        let source = QuotePageFetcher::new(config.quote_base_url.clone())?;
        let notifier = EmailNotifier::from_config(config)?;

        Ok(Self::new(
            config.watchlist.clone(),
            config.trigger_rule(),
            config.market_session(),
            Box::new(source),
            Box::new(notifier),
        )
        .with_ticker(Box::new(IntervalTicker::new(config.poll_interval())))
        .isolate_fetch_errors(config.isolate_fetch_errors))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ticker(mut self, ticker: Box<dyn Ticker>) -> Self {
        self.ticker = ticker;
        self
    }

    /// When enabled a failed fetch skips the item instead of aborting the run.
    pub fn isolate_fetch_errors(mut self, enabled: bool) -> Self {
        self.isolate_fetch_errors = enabled;
        self
    }

    /// Run cycles until the local hour leaves the market window.
    ///
    /// Returns immediately, without fetching anything, when the market is
    /// already closed. Any error not isolated by configuration ends the run.
    pub async fn run(&mut self) -> Result<SessionReport, WatchError> {
        let mut report = SessionReport::default();

        while self.session.is_open(self.clock.now()) {
            let outcomes = self.run_cycle().await?;

            report.cycles += 1;
            report.notifications += outcomes
                .iter()
                .filter(|outcome| matches!(outcome, ItemOutcome::Notified(_)))
                .count() as u64;

            self.ticker.tick().await;
        }

        info!(
            cycles = report.cycles,
            notifications = report.notifications,
            "Stock market closed."
        );
        Ok(report)
    }

    /// Check every item once, in configured order.
    pub async fn run_cycle(&self) -> Result<Vec<ItemOutcome>, WatchError> {
        let mut outcomes = Vec::with_capacity(self.items.len());
        for item in &self.items {
            outcomes.push(self.check_item(item).await?);
        }
        Ok(outcomes)
    }

    #[instrument(skip(self, item), fields(ticker = %item.ticker))]
    async fn check_item(&self, item: &WatchItem) -> Result<ItemOutcome, WatchError> {
        let price = match self.source.fetch_price(&item.ticker).await {
            Ok(price) => price,
            Err(e) if self.isolate_fetch_errors && e.is_fetch_error() => {
                error!(ticker = %item.ticker, error = %e, "Failed to fetch price, skipping.");
                return Ok(ItemOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        match self.rule.evaluate(price, item.reference_price) {
            Some(trend) => {
                warn!(
                    ticker = %item.ticker,
                    price = %price,
                    reference_price = %item.reference_price,
                    trend = %trend,
                    "Price crossed threshold."
                );
                self.notifier
                    .notify(&item.ticker, price, item.reference_price)
                    .await?;
                Ok(ItemOutcome::Notified(trend))
            }
            None => {
                info!(
                    ticker = %item.ticker,
                    price = %price,
                    reference_price = %item.reference_price,
                    "No update."
                );
                Ok(ItemOutcome::NoUpdate)
            }
        }
    }
}
