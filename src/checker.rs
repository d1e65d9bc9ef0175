use chrono::Utc;
use std::time::Duration;

use crate::models::{CheckReport, FetchFailurePolicy, PageSnapshot, PriceMatch};
use crate::notifiers::Notifier;
use crate::scraper::{product_url, PageFetcher};
use crate::utils::error::{DeliveryError, FetchError};
use crate::watchlist::Watchlist;
use crate::Result;

/// Per-cycle settings for [`PriceChecker`].
#[derive(Debug, Clone)]
pub struct CheckerOptions {
    pub base_url: String,
    pub fetch_timeout: Duration,
    pub send_timeout: Duration,
    pub on_fetch_error: FetchFailurePolicy,
}

impl CheckerOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fetch_timeout: Duration::from_secs(30),
            send_timeout: Duration::from_secs(60),
            on_fetch_error: FetchFailurePolicy::default(),
        }
    }
}

/// Runs check cycles: validate, fetch every item, filter, notify once.
pub struct PriceChecker {
    watchlist: Watchlist,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
    options: CheckerOptions,
}

impl PriceChecker {
    pub fn new(
        watchlist: Watchlist,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn Notifier>,
        options: CheckerOptions,
    ) -> Self {
        Self {
            watchlist,
            fetcher,
            notifier,
            options,
        }
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    async fn fetch_with_timeout(&self, url: &str) -> std::result::Result<PageSnapshot, FetchError> {
        let timeout = self.options.fetch_timeout;
        match tokio::time::timeout(timeout, self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            }),
        }
    }

    async fn send_with_timeout(&self, matches: &[PriceMatch]) -> std::result::Result<(), DeliveryError> {
        let timeout = self.options.send_timeout;
        match tokio::time::timeout(timeout, self.notifier.send(matches)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout {
                seconds: timeout.as_secs(),
            }),
        }
    }

    /// One full cycle. A validation error, or any error under
    /// [`FetchFailurePolicy::Abort`], ends the cycle before anything is sent.
    pub async fn check(&self) -> Result<CheckReport> {
        let started_at = Utc::now();
        let items = self.watchlist.validate()?;

        let mut matches = Vec::new();
        let mut items_checked = 0;
        let mut items_skipped = 0;

        for item in &items {
            let url = product_url(&self.options.base_url, &item.slug);

            let snapshot = match self.fetch_with_timeout(&url).await {
                Ok(snapshot) => snapshot,
                Err(e) => match self.options.on_fetch_error {
                    FetchFailurePolicy::Abort => {
                        tracing::error!("Fetching {} failed, aborting cycle: {}", url, e);
                        return Err(e.into());
                    }
                    FetchFailurePolicy::Skip => {
                        tracing::warn!("Skipping {}: {}", url, e);
                        items_skipped += 1;
                        continue;
                    }
                },
            };
            items_checked += 1;

            tracing::debug!(
                "{}: {} (asking {}, in stock: {})",
                snapshot.title,
                snapshot.price,
                item.asking_price,
                snapshot.in_stock
            );

            if let Some(found) = PriceMatch::evaluate(item, snapshot, url) {
                matches.push(found);
            }
        }

        if !matches.is_empty() {
            self.send_with_timeout(&matches).await?;
            tracing::info!("Found {} books below asking price", matches.len());
        }

        Ok(CheckReport {
            started_at,
            items_checked,
            items_skipped,
            matches_found: matches.len(),
        })
    }
}
