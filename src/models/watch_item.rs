use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::error::ValidationError;

/// A watchlist record as read from a source file. Fields are optional here;
/// [`WatchEntry::to_item`] enforces presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchEntry {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub asking_price: Option<Decimal>,
}

/// A validated item: non-empty slug, positive asking price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchItem {
    pub slug: String,
    pub asking_price: Decimal,
}

impl WatchEntry {
    pub fn new(slug: impl Into<String>, asking_price: Decimal) -> Self {
        Self {
            slug: Some(slug.into()),
            asking_price: Some(asking_price),
        }
    }

    /// Checks this entry, found at `index` in its watchlist.
    pub fn to_item(&self, index: usize) -> Result<WatchItem, ValidationError> {
        let slug = self
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ValidationError::MissingField { index, field: "slug" })?;

        let asking_price = self
            .asking_price
            .ok_or(ValidationError::MissingField { index, field: "asking_price" })?;

        if asking_price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice { index, price: asking_price });
        }

        Ok(WatchItem {
            slug: slug.to_string(),
            asking_price,
        })
    }
}
