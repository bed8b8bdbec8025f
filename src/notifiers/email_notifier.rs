//! Self-addressed email reminders sent over an authenticated STARTTLS relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::errors::watch_error::WatchError;
use crate::models::trigger_rule::Trend;

/// Delivers one reminder about a triggered price move.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, ticker: &str, price: f64, reference_price: f64)
        -> Result<(), WatchError>;
}

/// Subject and plain-text body of a reminder.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub subject: String,
    pub body: String,
}

impl Reminder {
    pub fn new(ticker: &str, price: f64, reference_price: f64) -> Self {
        let trend = Trend::between(price, reference_price);
        let subject = format!("Price of {ticker} {trend} from purchased price {reference_price}");
        let body = format!("{subject}\nCurrent price: {price}\n");
        Self { subject, body }
    }
}

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    mailbox: Mailbox,
}

impl EmailNotifier {
    /// Builds the relay transport. Nothing is sent or connected until the
    /// first reminder goes out.
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        account_address: &str,
        account_secret: &str,
    ) -> Result<Self, WatchError> {
        let mailbox = account_address
            .parse::<Mailbox>()
            .map_err(|e| WatchError::InvalidMessage(format!("{account_address}: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
            .map_err(|source| WatchError::RelaySetup {
                host: smtp_host.to_string(),
                source,
            })?
            .port(smtp_port)
            .credentials(Credentials::new(
                account_address.to_string(),
                account_secret.to_string(),
            ))
            .build();

        Ok(Self { transport, mailbox })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, WatchError> {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            &config.notify_email_address,
            &config.notify_email_password,
        )
    }

    pub fn build_message(&self, reminder: Reminder) -> Result<Message, WatchError> {
        Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(reminder.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(reminder.body)
            .map_err(|e| WatchError::InvalidMessage(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self))]
    async fn notify(
        &self,
        ticker: &str,
        price: f64,
        reference_price: f64,
    ) -> Result<(), WatchError> {
        let message = self.build_message(Reminder::new(ticker, price, reference_price))?;

        self.transport
            .send(message)
            .await
            .map_err(|source| WatchError::Delivery {
                ticker: ticker.to_string(),
                source,
            })?;

        info!(ticker = %ticker, "Email reminder sent.");
        Ok(())
    }
}
