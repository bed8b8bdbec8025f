//! Time sources for the watch loop.
//!
//! The loop never reads the wall clock or sleeps directly; it goes through
//! [`Clock`] and [`Ticker`] so tests can drive open/closed transitions
//! without waiting.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Waits between two watch cycles.
#[async_trait]
pub trait Ticker: Send + Sync {
    async fn tick(&mut self);
}

/// Sleeps a fixed period on every tick.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    period: Duration,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        tokio::time::sleep(self.period).await;
    }
}

/// Trading hours of the watched market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSession {
    pub timezone: Tz,
    /// First local hour considered open.
    pub open_hour: u32,
    /// Last local hour considered open (inclusive).
    pub close_hour: u32,
}

impl MarketSession {
    pub fn new(timezone: Tz, open_hour: u32, close_hour: u32) -> Self {
        Self {
            timezone,
            open_hour,
            close_hour,
        }
    }

    pub fn local_hour(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.timezone).hour()
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let hour = self.local_hour(now);
        hour >= self.open_hour && hour <= self.close_hour
    }
}
