//! Page price extraction
//!
//! The engine only needs three things from a page: open it, ask it for
//! raw price text, close it. The trait keeps that boundary; the shipped
//! implementation fetches the page over HTTP and sweeps common price
//! selectors. A page with no recognizable price node yields `Ok(None)` -
//! that is data ("no price"), not an error.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tracing::debug;

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Price nodes, most specific first; the first non-empty match wins
const PRICE_SELECTORS: &[&str] = &[
    "[itemprop='price']",
    ".a-price .a-offscreen",
    "#priceblock_ourprice",
    ".price-current",
    ".product-price",
    ".price",
    "[class*='price']",
];

/// Meta tags consulted when no visible price node matches
const PRICE_META_SELECTORS: &[&str] = &[
    "meta[property='product:price:amount']",
    "meta[property='og:price:amount']",
    "meta[itemprop='price']",
];

/// Live handle on an opened page
pub struct PageHandle {
    pub url: String,
    html: String,
}

impl PageHandle {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Ephemeral page lifecycle + raw price text extraction
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Obtain a live render of the target page
    async fn open(&self, url: &str) -> Result<PageHandle>;

    /// Raw price display text, or None when the page has no price node
    async fn extract(&self, page: &PageHandle) -> Result<Option<String>>;

    /// Release the page handle
    async fn close(&self, page: PageHandle);
}

/// HTTP + HTML-parsing substitution for a rendered browser tab
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn open(&self, url: &str) -> Result<PageHandle> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_UA)
            .send()
            .await
            .map_err(|e| Error::Network(format!("failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ExtractionUnavailable(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read body of {}: {}", url, e)))?;

        Ok(PageHandle::new(url, html))
    }

    async fn extract(&self, page: &PageHandle) -> Result<Option<String>> {
        let text = extract_price_text(&page.html);
        if text.is_none() {
            debug!(url = %page.url, "No price node matched");
        }
        Ok(text)
    }

    async fn close(&self, page: PageHandle) {
        drop(page);
    }
}

/// Sweep the selector lists over the document, first non-empty text wins.
fn extract_price_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector_str in PRICE_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            let text: String = element.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    for selector_str in PRICE_META_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            if let Some(content) = element.value().attr("content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }

    None
}
