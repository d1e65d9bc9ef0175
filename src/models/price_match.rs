use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PageSnapshot, WatchItem};

/// A watched item that is in stock at or below its asking price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceMatch {
    pub title: String,
    pub price: Decimal,
    pub asking_price: Decimal,
    pub url: String,
}

impl PriceMatch {
    /// Joins an item with its snapshot, returning `None` unless the snapshot
    /// is in stock and priced at or below the asking price.
    pub fn evaluate(item: &WatchItem, snapshot: PageSnapshot, url: String) -> Option<Self> {
        if !snapshot.in_stock || snapshot.price > item.asking_price {
            return None;
        }

        Some(PriceMatch {
            title: snapshot.title,
            price: snapshot.price,
            asking_price: item.asking_price,
            url,
        })
    }

    /// How far below the asking price the current price is.
    pub fn difference(&self) -> Decimal {
        self.asking_price - self.price
    }
}

/// Sum of [`PriceMatch::difference`] across a batch.
pub fn total_savings(matches: &[PriceMatch]) -> Decimal {
    matches.iter().map(PriceMatch::difference).sum()
}
