use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{Alert, Delivery, MissingCredential};
use crate::core::config::TelegramConfig;
use crate::core::error::NotifyError;

pub const STARTUP_MESSAGE: &str = "🤖 Bot Chasseur de Trésors lancé ! Scan toutes les 20 sec.";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// One delivery attempt; never retried.
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError>;
}

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.trim().to_string(),
            chat_id: config.chat_id.trim().to_string(),
        })
    }

    pub fn missing_credential(&self) -> Option<MissingCredential> {
        if self.bot_token.is_empty() {
            Some(MissingCredential::BotToken)
        } else if self.chat_id.is_empty() {
            Some(MissingCredential::ChatId)
        } else {
            None
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        if let Some(missing) = self.missing_credential() {
            tracing::warn!(
                "Telegram notification skipped: {} is not set",
                missing.env_var()
            );
            return Ok(Delivery::Skipped(missing));
        }

        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "Markdown"),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Delivery::Sent)
    }
}

pub fn format_alert(alert: &Alert) -> String {
    format!(
        "🔥 *PÉPITE DÉTECTÉE !*\n\
         *Titre* : {}\n\
         *Prix* : {} €\n\
         *Valeur estimée* : {} €\n\
         *Multiplicateur* : x{:.1}\n\
         {}",
        alert.title, alert.price, alert.estimate, alert.ratio, alert.link
    )
}
