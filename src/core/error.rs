use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Feed {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Feed {url} is not valid RSS: {source}")]
    Parse {
        url: String,
        #[source]
        source: rss::Error,
    },
}

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Marketplace request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Marketplace returned HTTP {status}")]
    Status { status: u16 },

    #[error("No sold prices found for \"{term}\"")]
    NoData { term: String },

    #[error("Invalid marketplace search URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build marketplace client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telegram rejected message: HTTP {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write seen store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize seen store: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("Failed to load keyword tables from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("Keyword table is empty")]
    Empty,
}
