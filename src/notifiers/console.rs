use async_trait::async_trait;

use super::{compose_body, Notifier};
use crate::models::PriceMatch;
use crate::utils::error::DeliveryError;

/// Writes the message to the log instead of mailing it. Used for dry runs.
pub struct ConsoleNotifier {
    subject: String,
    currency_symbol: String,
}

impl ConsoleNotifier {
    pub fn new(subject: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            currency_symbol: currency_symbol.into(),
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, matches: &[PriceMatch]) -> Result<(), DeliveryError> {
        if matches.is_empty() {
            return Err(DeliveryError::Message("no matches to send".to_string()));
        }

        let body = compose_body(matches, &self.currency_symbol);
        tracing::info!("[dry run] {}\n{}", self.subject, body);
        Ok(())
    }
}
