use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::context::ScoutContext;
use crate::api::telegram::format_alert;
use crate::api::{Alert, Delivery, Listing};
use crate::core::error::EstimateError;
use crate::scoring::Verdict;

/// What happened to a single feed entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    AlreadySeen,
    Excluded(String),
    BelowThreshold(i64),
    NoPrice,
    NoEstimate,
    BelowRatio { ratio: f64 },
    Notified { ratio: f64, delivered: bool },
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub entries: usize,
    pub notified: Vec<String>,
    pub cancelled: bool,
}

/// One pass over every configured feed, in order.
///
/// The token is checked between feeds and between entries, never inside one.
pub async fn scan_once(ctx: &mut ScoutContext, shutdown: &CancellationToken) -> CycleReport {
    let mut report = CycleReport::default();
    let feeds = ctx.scan.feeds.clone();

    for url in &feeds {
        let delay = Duration::from_millis(fastrand::u64(ctx.scan.feed_delay_ms()));
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                report.cancelled = true;
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let listings = match ctx.feeds.fetch(url).await {
            Ok(listings) => {
                report.feeds_ok += 1;
                listings
            }
            Err(e) => {
                tracing::warn!("Skipping feed: {}", e);
                ctx.metrics.increment_feeds_failed();
                report.feeds_failed += 1;
                continue;
            }
        };

        tracing::debug!("📥 {} entries from {}", listings.len(), url);

        for listing in &listings {
            if shutdown.is_cancelled() {
                report.cancelled = true;
                break;
            }

            report.entries += 1;
            if let EntryOutcome::Notified { .. } = process_listing(ctx, listing).await {
                report.notified.push(listing.link.clone());
            }
        }

        if report.cancelled {
            break;
        }
    }

    if !report.cancelled {
        ctx.metrics.increment_cycles();
    }
    ctx.health
        .update_component("feeds", report.feeds_ok > 0)
        .await;
    ctx.health.record_cycle().await;

    report
}

/// Runs one entry through the filter chain, notifying and recording it on a match.
pub async fn process_listing(ctx: &mut ScoutContext, listing: &Listing) -> EntryOutcome {
    ctx.metrics.increment_entries_examined();

    if ctx.seen.contains(&listing.link) {
        ctx.metrics.increment_already_seen();
        return EntryOutcome::AlreadySeen;
    }

    let score = match ctx.scorer.evaluate(&listing.title, &listing.description) {
        Verdict::Passed(score) => score,
        Verdict::Excluded(phrase) => {
            tracing::debug!("Excluded \"{}\" ({})", listing.title, phrase);
            ctx.metrics.increment_keyword_rejects();
            return EntryOutcome::Excluded(phrase);
        }
        Verdict::BelowThreshold(score) => {
            ctx.metrics.increment_keyword_rejects();
            return EntryOutcome::BelowThreshold(score);
        }
    };

    let price = match listing.price {
        Some(price) if price > 0 => price,
        _ => {
            tracing::debug!("No price in \"{}\"", listing.title);
            ctx.metrics.increment_price_missing();
            return EntryOutcome::NoPrice;
        }
    };

    let estimate = match ctx.estimator.estimate(&listing.title).await {
        Ok(estimate) if estimate > 0 => {
            ctx.health.update_component("marketplace", true).await;
            estimate
        }
        Ok(_) | Err(EstimateError::NoData { .. }) => {
            ctx.health.update_component("marketplace", true).await;
            ctx.metrics.increment_estimate_misses();
            return EntryOutcome::NoEstimate;
        }
        Err(e) => {
            tracing::warn!("Estimate failed for \"{}\": {}", listing.title, e);
            ctx.health.update_component("marketplace", false).await;
            ctx.metrics.increment_estimate_misses();
            return EntryOutcome::NoEstimate;
        }
    };

    let ratio = estimate as f64 / price as f64;
    if ratio < ctx.scan.ratio_threshold {
        tracing::debug!(
            "\"{}\" scored {} but ratio x{:.1} is too low",
            listing.title,
            score,
            ratio
        );
        ctx.metrics.increment_below_ratio();
        return EntryOutcome::BelowRatio { ratio };
    }

    tracing::info!(
        "💎 Match: \"{}\" {} € vs {} € (x{:.1}, score {})",
        listing.title,
        price,
        estimate,
        ratio,
        score
    );

    let alert = Alert {
        title: listing.title.clone(),
        price,
        estimate,
        ratio,
        link: listing.link.clone(),
    };

    let delivered = match ctx.notifier.send(&format_alert(&alert)).await {
        Ok(Delivery::Sent) => {
            ctx.health.update_component("telegram", true).await;
            ctx.metrics.increment_notifications_sent();
            true
        }
        Ok(Delivery::Skipped(_)) => {
            ctx.health.update_component("telegram", false).await;
            false
        }
        Err(e) => {
            tracing::warn!("Notification for {} was lost: {}", listing.link, e);
            ctx.health.update_component("telegram", false).await;
            ctx.metrics.increment_notification_failures();
            false
        }
    };

    // Marked seen whatever the delivery result; there are no retries.
    match ctx.seen.add(&listing.link).await {
        Ok(_) => ctx.health.update_component("seen_store", true).await,
        Err(e) => {
            tracing::error!("❌ Failed to persist seen store: {}", e);
            ctx.health.update_component("seen_store", false).await;
        }
    }

    EntryOutcome::Notified { ratio, delivered }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::feed::MockFeedSource;
    use crate::api::marketplace::MockValueEstimator;
    use crate::api::telegram::MockNotifier;
    use crate::core::config::ScanConfig;
    use crate::core::error::{FeedError, NotifyError};
    use crate::core::{HealthChecker, ScanMetrics};
    use crate::scoring::KeywordScorer;
    use crate::store::SeenStore;
    use mockall::predicate::eq;
    use std::sync::Arc;

    fn scan_config(feeds: &[&str]) -> ScanConfig {
        ScanConfig {
            feeds: feeds.iter().map(|f| f.to_string()).collect(),
            feed_delay_min_ms: 0,
            feed_delay_max_ms: 0,
            ..Default::default()
        }
    }

    async fn context(
        feeds: MockFeedSource,
        estimator: MockValueEstimator,
        notifier: MockNotifier,
        scan: ScanConfig,
    ) -> ScoutContext {
        let path = std::env::temp_dir().join(format!("seen-{}.json", uuid::Uuid::new_v4()));
        let metrics = Arc::new(ScanMetrics::new());
        ScoutContext {
            scan,
            scorer: KeywordScorer::default(),
            seen: SeenStore::load(path).await,
            feeds: Arc::new(feeds),
            estimator: Arc::new(estimator),
            notifier: Arc::new(notifier),
            health: HealthChecker::new(metrics.clone()),
            metrics,
        }
    }

    fn bronze(link: &str, description: &str) -> Listing {
        Listing::new("Statue bronze", description, link)
    }

    #[tokio::test]
    async fn test_high_ratio_notifies_and_marks_seen() {
        let mut estimator = MockValueEstimator::new();
        estimator
            .expect_estimate()
            .with(eq("Statue bronze"))
            .times(1)
            .returning(|_| Ok(600));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|text: &str| text.contains("*Multiplicateur* : x12.0"))
            .times(1)
            .returning(|_| Ok(Delivery::Sent));

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let listing = bronze("https://lbc/1", "50 €");

        let outcome = process_listing(&mut ctx, &listing).await;
        assert_eq!(
            outcome,
            EntryOutcome::Notified {
                ratio: 12.0,
                delivered: true
            }
        );
        assert!(ctx.seen.contains("https://lbc/1"));
        assert_eq!(ctx.metrics.get_notifications_sent(), 1);

        // Seen links short-circuit before scoring or estimating.
        let again = process_listing(&mut ctx, &listing).await;
        assert_eq!(again, EntryOutcome::AlreadySeen);

        tokio::fs::remove_file(ctx.seen.path()).await.ok();
    }

    #[tokio::test]
    async fn test_low_ratio_does_not_notify() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().returning(|_| Ok(400));
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let outcome = process_listing(&mut ctx, &bronze("https://lbc/2", "50 €")).await;

        assert_eq!(outcome, EntryOutcome::BelowRatio { ratio: 8.0 });
        assert!(!ctx.seen.contains("https://lbc/2"));
    }

    #[tokio::test]
    async fn test_missing_price_skips_estimate() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().never();
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;

        let outcome =
            process_listing(&mut ctx, &bronze("https://lbc/3", "prix à débattre")).await;
        assert_eq!(outcome, EntryOutcome::NoPrice);

        let outcome = process_listing(&mut ctx, &bronze("https://lbc/4", "0 €")).await;
        assert_eq!(outcome, EntryOutcome::NoPrice);
    }

    #[tokio::test]
    async fn test_empty_estimate_skips() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().returning(|term| {
            Err(EstimateError::NoData {
                term: term.to_string(),
            })
        });
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let outcome = process_listing(&mut ctx, &bronze("https://lbc/5", "1 €")).await;

        assert_eq!(outcome, EntryOutcome::NoEstimate);
        assert_eq!(ctx.metrics.snapshot().estimate_misses, 1);
    }

    #[tokio::test]
    async fn test_marketplace_failure_skips_and_degrades() {
        let mut estimator = MockValueEstimator::new();
        estimator
            .expect_estimate()
            .times(1)
            .returning(|_| Err(EstimateError::Status { status: 503 }));
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let outcome = process_listing(&mut ctx, &bronze("https://lbc/10", "50 €")).await;

        assert_eq!(outcome, EntryOutcome::NoEstimate);
        assert!(!ctx.seen.contains("https://lbc/10"));
        assert!(!ctx.health.get_status().await.components.marketplace);
        assert_eq!(ctx.metrics.snapshot().estimate_misses, 1);
    }

    #[tokio::test]
    async fn test_unwritable_seen_store_is_reported() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().returning(|_| Ok(600));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Ok(Delivery::Sent));

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let missing_dir = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
        ctx.seen = SeenStore::load(missing_dir.join("seen.json")).await;

        let outcome = process_listing(&mut ctx, &bronze("https://lbc/11", "50 €")).await;
        assert_eq!(
            outcome,
            EntryOutcome::Notified {
                ratio: 12.0,
                delivered: true
            }
        );
        // Kept in memory so the same listing is not sent again this run.
        assert!(ctx.seen.contains("https://lbc/11"));

        let status = ctx.health.get_status().await;
        assert!(!status.components.seen_store);
        assert_eq!(status.status, "degraded");
    }

    #[tokio::test]
    async fn test_excluded_listing_never_reaches_estimator() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().never();

        let mut ctx = context(
            MockFeedSource::new(),
            estimator,
            MockNotifier::new(),
            scan_config(&[]),
        )
        .await;
        let listing = Listing::new("Bronze Daum Gallé", "copie fidèle 10 €", "https://lbc/6");

        let outcome = process_listing(&mut ctx, &listing).await;
        assert_eq!(outcome, EntryOutcome::Excluded("copie".to_string()));
    }

    #[tokio::test]
    async fn test_failed_delivery_still_marks_seen() {
        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().returning(|_| Ok(1000));
        let mut notifier = MockNotifier::new();
        notifier.expect_send().times(1).returning(|_| {
            Err(NotifyError::Rejected {
                status: 400,
                body: "bad request".to_string(),
            })
        });

        let mut ctx = context(MockFeedSource::new(), estimator, notifier, scan_config(&[])).await;
        let outcome = process_listing(&mut ctx, &bronze("https://lbc/7", "10 €")).await;

        assert_eq!(
            outcome,
            EntryOutcome::Notified {
                ratio: 100.0,
                delivered: false
            }
        );
        assert!(ctx.seen.contains("https://lbc/7"));
        assert_eq!(ctx.metrics.snapshot().notification_failures, 1);

        tokio::fs::remove_file(ctx.seen.path()).await.ok();
    }

    #[tokio::test]
    async fn test_scan_once_survives_a_broken_feed() {
        let mut feeds = MockFeedSource::new();
        feeds
            .expect_fetch()
            .with(eq("https://feed/broken"))
            .returning(|url| {
                Err(FeedError::Status {
                    url: url.to_string(),
                    status: 503,
                })
            });
        feeds
            .expect_fetch()
            .with(eq("https://feed/ok"))
            .returning(|_| {
                Ok(vec![
                    Listing::new("Statue bronze", "50 €", "https://lbc/8"),
                    Listing::new("Chaise", "5 €", "https://lbc/9"),
                ])
            });

        let mut estimator = MockValueEstimator::new();
        estimator.expect_estimate().times(1).returning(|_| Ok(900));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Ok(Delivery::Sent));

        let mut ctx = context(
            feeds,
            estimator,
            notifier,
            scan_config(&["https://feed/broken", "https://feed/ok"]),
        )
        .await;

        let report = scan_once(&mut ctx, &CancellationToken::new()).await;
        assert_eq!(report.feeds_failed, 1);
        assert_eq!(report.feeds_ok, 1);
        assert_eq!(report.entries, 2);
        assert_eq!(report.notified, vec!["https://lbc/8".to_string()]);
        assert!(!report.cancelled);
        assert_eq!(ctx.health.get_status().await.status, "healthy");

        tokio::fs::remove_file(ctx.seen.path()).await.ok();
    }

    #[tokio::test]
    async fn test_scan_once_stops_when_cancelled() {
        let mut feeds = MockFeedSource::new();
        feeds.expect_fetch().never();

        let mut ctx = context(
            feeds,
            MockValueEstimator::new(),
            MockNotifier::new(),
            scan_config(&["https://feed/a"]),
        )
        .await;

        let token = CancellationToken::new();
        token.cancel();

        let report = scan_once(&mut ctx, &token).await;
        assert!(report.cancelled);
        assert_eq!(report.feeds_ok, 0);
        assert_eq!(ctx.metrics.snapshot().cycles_completed, 0);
    }
}
