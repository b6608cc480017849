use anyhow::{Context as _, Result};
use std::sync::Arc;

use crate::api::{
    FeedSource, Notifier, RssFeedClient, SoldListingsEstimator, TelegramNotifier, ValueEstimator,
};
use crate::core::config::ScanConfig;
use crate::core::{Config, HealthChecker, ScanMetrics};
use crate::scoring::{KeywordScorer, KeywordTables};
use crate::store::SeenStore;

/// Everything a scan needs, built once at startup.
pub struct ScoutContext {
    pub scan: ScanConfig,
    pub scorer: KeywordScorer,
    pub seen: SeenStore,
    pub feeds: Arc<dyn FeedSource>,
    pub estimator: Arc<dyn ValueEstimator>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: Arc<ScanMetrics>,
    pub health: HealthChecker,
}

impl ScoutContext {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.scan.http_timeout();

        let tables = match &config.storage.keywords_file {
            Some(path) => KeywordTables::from_file(path)?,
            None => KeywordTables::default(),
        };

        let feeds = RssFeedClient::new(timeout).context("Failed to build feed client")?;
        let estimator = SoldListingsEstimator::new(&config.scan.marketplace_url, timeout)
            .context("Failed to set up marketplace estimator")?;
        let notifier = TelegramNotifier::new(&config.telegram, timeout)
            .context("Failed to build Telegram client")?;

        if let Some(missing) = notifier.missing_credential() {
            tracing::warn!(
                "⚠️  {} is empty, notifications will be skipped",
                missing.env_var()
            );
        }

        let seen = SeenStore::load(&config.storage.seen_file).await;
        let metrics = Arc::new(ScanMetrics::new());

        Ok(Self {
            scan: config.scan.clone(),
            scorer: KeywordScorer::new(tables, config.scan.score_threshold),
            seen,
            feeds: Arc::new(feeds),
            estimator: Arc::new(estimator),
            notifier: Arc::new(notifier),
            health: HealthChecker::new(metrics.clone()),
            metrics,
        })
    }
}
