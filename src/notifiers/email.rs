use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use super::{compose_body, Notifier};
use crate::config::EmailConfig;
use crate::models::PriceMatch;
use crate::utils::error::DeliveryError;

/// Sends the match summary to a single recipient over authenticated
/// STARTTLS SMTP.
pub struct EmailNotifier {
    config: EmailConfig,
    subject: String,
    currency_symbol: String,
    timeout: Duration,
}

impl EmailNotifier {
    pub fn new(
        config: EmailConfig,
        subject: impl Into<String>,
        currency_symbol: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            subject: subject.into(),
            currency_symbol: currency_symbol.into(),
            timeout,
        }
    }

    pub fn build_message(&self, matches: &[PriceMatch]) -> Result<Message, DeliveryError> {
        let body = compose_body(matches, &self.currency_symbol);

        let message = Message::builder()
            .from(self.config.sender.parse()?)
            .to(self.config.recipient.parse()?)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;
        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let credentials = Credentials::new(self.config.sender.clone(), self.config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .credentials(credentials)
            .timeout(Some(self.timeout))
            .build();
        Ok(mailer)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, matches: &[PriceMatch]) -> Result<(), DeliveryError> {
        if matches.is_empty() {
            return Err(DeliveryError::Message("no matches to send".to_string()));
        }

        let message = self.build_message(matches)?;
        let mailer = self.transport()?;

        let response = mailer.send(message).await?;
        tracing::info!(
            "Sent alert for {} books to {} (SMTP {})",
            matches.len(),
            self.config.recipient,
            response.code()
        );
        Ok(())
    }
}
