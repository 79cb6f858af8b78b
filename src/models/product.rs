use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved product page
///
/// Owned by the storage layer; the engine reads `url`/`id` and refreshes
/// `price` (the last known display text) when a check finds a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, assigned when the product is saved
    pub id: String,

    /// Page title at save time
    pub title: String,

    /// Product page URL
    pub url: String,

    /// Last known price display text, as shown on the page
    pub price: String,

    /// When the product was saved
    pub date_added: DateTime<Utc>,
}

impl Product {
    pub fn new(id: String, title: String, url: String, price: String) -> Self {
        Self {
            id,
            title,
            url,
            price,
            date_added: Utc::now(),
        }
    }
}
