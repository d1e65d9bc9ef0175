use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;

use crate::config::ScraperConfig;
use crate::models::PageSnapshot;
use crate::utils::error::FetchError;

/// Retrieves a product page and reduces it to a [`PageSnapshot`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageSnapshot, FetchError>;
}

/// Full product URL. Plain concatenation, no escaping or normalisation.
pub fn product_url(base_url: &str, slug: &str) -> String {
    format!("{}{}", base_url, slug)
}

/// Compiled selectors for the three fields read from a product page.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    title: Selector,
    price: Selector,
    availability: Selector,
}

impl PageSelectors {
    pub fn new(title: &str, price: &str, availability: &str) -> Result<Self, FetchError> {
        Ok(Self {
            title: parse_selector(title)?,
            price: parse_selector(price)?,
            availability: parse_selector(availability)?,
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.title_selector,
            &config.price_selector,
            &config.availability_selector,
        )
    }
}

fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector)
        .map_err(|e| FetchError::Parse(format!("Invalid CSS selector '{}': {:?}", selector, e)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses price text such as `£51.77`: the first character is taken to be
/// the currency symbol and dropped.
pub fn parse_price(text: &str) -> Result<Decimal, FetchError> {
    let mut chars = text.trim().chars();
    if chars.next().is_none() {
        return Err(FetchError::Parse("price text is empty".to_string()));
    }

    let amount = chars.as_str().trim();
    Decimal::from_str(amount)
        .map_err(|_| FetchError::Parse(format!("price text is not numeric: '{}'", text.trim())))
}

/// Extracts a snapshot from product page HTML.
pub fn parse_product_page(html: &str, selectors: &PageSelectors) -> Result<PageSnapshot, FetchError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(element_text)
        .ok_or_else(|| FetchError::Parse("title element not found".to_string()))?;

    let price_text = document
        .select(&selectors.price)
        .next()
        .map(element_text)
        .ok_or_else(|| FetchError::Parse("price element not found".to_string()))?;
    let price = parse_price(&price_text)?;

    let in_stock = document
        .select(&selectors.availability)
        .next()
        .map(element_text)
        .is_some_and(|text| text.to_lowercase().contains("in stock"));

    Ok(PageSnapshot { title, price, in_stock })
}

/// Fetches pages over HTTP with a bounded request time.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    selectors: PageSelectors,
}

impl HttpPageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            selectors: PageSelectors::from_config(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<PageSnapshot, FetchError> {
        let start_time = std::time::Instant::now();

        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let snapshot = parse_product_page(&html, &self.selectors)?;
        tracing::debug!(
            "Fetched {} in {}ms: price {} in_stock {}",
            url,
            start_time.elapsed().as_millis(),
            snapshot.price,
            snapshot.in_stock
        );
        Ok(snapshot)
    }
}
