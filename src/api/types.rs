use serde::{Deserialize, Serialize};

use super::price::extract_price;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub description: String,
    pub link: String,
    pub price: Option<u64>,
}

impl Listing {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let price = extract_price(&description);

        Self {
            title: title.into(),
            description,
            link: link.into(),
            price,
        }
    }
}

/// A listing that cleared every filter and is worth a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub title: String,
    pub price: u64,
    pub estimate: u64,
    pub ratio: f64,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingCredential {
    BotToken,
    ChatId,
}

impl MissingCredential {
    pub fn env_var(&self) -> &'static str {
        match self {
            MissingCredential::BotToken => "TELEGRAM_BOT_TOKEN",
            MissingCredential::ChatId => "TELEGRAM_CHAT_ID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Skipped(MissingCredential),
}
