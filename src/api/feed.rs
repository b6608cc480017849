use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::Listing;
use crate::core::error::FeedError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Entries of one feed, in feed order.
    async fn fetch(&self, url: &str) -> Result<Vec<Listing>, FeedError>;
}

pub struct RssFeedClient {
    client: Client,
}

impl RssFeedClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brocante-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for RssFeedClient {
    async fn fetch(&self, url: &str) -> Result<Vec<Listing>, FeedError> {
        let request_error = |source| FeedError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        parse_feed(url, &body)
    }
}

/// Parses an RSS document. Items without a title or link are dropped.
pub fn parse_feed(url: &str, body: &[u8]) -> Result<Vec<Listing>, FeedError> {
    let channel = rss::Channel::read_from(body).map_err(|source| FeedError::Parse {
        url: url.to_string(),
        source,
    })?;

    let listings: Vec<Listing> = channel
        .items()
        .iter()
        .filter_map(|item| match (item.title(), item.link()) {
            (Some(title), Some(link)) => Some(Listing::new(
                title,
                item.description().unwrap_or_default(),
                link,
            )),
            _ => {
                tracing::debug!("Dropping feed item without title or link in {}", url);
                None
            }
        })
        .collect();

    tracing::debug!("Parsed {} entries from {}", listings.len(), url);
    Ok(listings)
}
