use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::context::ScoutContext;
use super::scan_cycle::scan_once;

/// Scans forever with a jittered pause between passes, until `shutdown` fires.
pub async fn run(mut ctx: ScoutContext, shutdown: CancellationToken) -> ScoutContext {
    tracing::info!(
        "🔍 Scanner starting: {} feeds, score ≥ {}, ratio ≥ x{}",
        ctx.scan.feeds.len(),
        ctx.scorer.threshold(),
        ctx.scan.ratio_threshold
    );

    loop {
        let report = scan_once(&mut ctx, &shutdown).await;
        if report.cancelled {
            break;
        }

        tracing::info!(
            "✅ Cycle done: {}/{} feeds ok, {} entries, {} notified, {} seen total",
            report.feeds_ok,
            report.feeds_ok + report.feeds_failed,
            report.entries,
            report.notified.len(),
            ctx.seen.len()
        );

        let pause = Duration::from_secs(fastrand::u64(ctx.scan.cycle_delay_secs()));
        tracing::debug!("Next cycle in {:?}", pause);

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(pause) => {}
        }
    }

    tracing::info!("🛑 Scanner stopped");
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::feed::MockFeedSource;
    use crate::api::marketplace::MockValueEstimator;
    use crate::api::telegram::MockNotifier;
    use crate::core::config::ScanConfig;
    use crate::core::{HealthChecker, ScanMetrics};
    use crate::scoring::KeywordScorer;
    use crate::store::SeenStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let mut feeds = MockFeedSource::new();
        feeds.expect_fetch().returning(|_| Ok(vec![]));

        let metrics = Arc::new(ScanMetrics::new());
        let ctx = ScoutContext {
            scan: ScanConfig {
                feeds: vec!["https://feed/a".to_string()],
                feed_delay_min_ms: 0,
                feed_delay_max_ms: 0,
                cycle_delay_min_secs: 3600,
                cycle_delay_max_secs: 3600,
                ..Default::default()
            },
            scorer: KeywordScorer::default(),
            seen: SeenStore::load(
                std::env::temp_dir().join(format!("seen-{}.json", uuid::Uuid::new_v4())),
            )
            .await,
            feeds: Arc::new(feeds),
            estimator: Arc::new(MockValueEstimator::new()),
            notifier: Arc::new(MockNotifier::new()),
            health: HealthChecker::new(metrics.clone()),
            metrics: metrics.clone(),
        };

        let token = CancellationToken::new();
        let handle = tokio::spawn(run(ctx, token.clone()));

        // First pass completes, then the hour-long pause is interrupted.
        while metrics.snapshot().cycles_completed == 0 {
            tokio::task::yield_now().await;
        }
        token.cancel();

        let ctx = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scanner did not stop")
            .unwrap();
        assert_eq!(ctx.metrics.snapshot().cycles_completed, 1);
    }
}
