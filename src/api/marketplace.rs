use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::core::error::EstimateError;

/// eBay renders each sold price in one of these spans.
pub const PRICE_SELECTOR: &str = ".s-item__price";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValueEstimator: Send + Sync {
    /// Mean sold price for `term`, or an error when there is no usable signal.
    async fn estimate(&self, term: &str) -> Result<u64, EstimateError>;
}

/// Scrapes the sold + completed listings view of an eBay search page.
pub struct SoldListingsEstimator {
    client: Client,
    search_url: Url,
}

impl SoldListingsEstimator {
    /// Fails when `search_url` does not parse, so a bad base URL stops startup.
    pub fn new(search_url: &str, timeout: Duration) -> Result<Self, EstimateError> {
        let search_url = Url::parse(search_url).map_err(|source| EstimateError::InvalidUrl {
            url: search_url.to_string(),
            source,
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(EstimateError::Client)?;

        Ok(Self { client, search_url })
    }

    pub fn search_url_for(&self, term: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("_nkw", term)
            .append_pair("LH_Sold", "1")
            .append_pair("LH_Complete", "1");
        url
    }
}

#[async_trait]
impl ValueEstimator for SoldListingsEstimator {
    async fn estimate(&self, term: &str) -> Result<u64, EstimateError> {
        let response = self.client.get(self.search_url_for(term)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EstimateError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let prices = parse_sold_prices(&body);
        tracing::debug!("Found {} sold prices for \"{}\"", prices.len(), term);

        mean_price(&prices).ok_or_else(|| EstimateError::NoData {
            term: term.to_string(),
        })
    }
}

/// Digits of every price element, concatenated; elements without digits are ignored.
///
/// "12,50 EUR" reads as 1250 and a range reads as both ends glued together.
pub fn parse_sold_prices(html: &str) -> Vec<u64> {
    let Ok(selector) = Selector::parse(PRICE_SELECTOR) else {
        return vec![];
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| {
            let digits: String = element
                .text()
                .flat_map(str::chars)
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse::<u64>().ok()
        })
        .collect()
}

/// Floor of the arithmetic mean.
pub fn mean_price(prices: &[u64]) -> Option<u64> {
    if prices.is_empty() {
        return None;
    }
    let total: u128 = prices.iter().map(|&p| p as u128).sum();
    Some((total / prices.len() as u128) as u64)
}
