use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use warp::Filter;

use super::metrics::{MetricsSnapshot, ScanMetrics};

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub components: ComponentHealth,
    pub counters: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub feeds: bool,
    pub marketplace: bool,
    pub telegram: bool,
    /// False after the last write of the seen file failed.
    pub seen_store: bool,
}

impl Default for ComponentHealth {
    fn default() -> Self {
        Self {
            feeds: false,
            marketplace: false,
            telegram: false,
            seen_store: true,
        }
    }
}

impl ComponentHealth {
    /// Feeds are reachable and alerts are still being remembered.
    pub fn is_healthy(&self) -> bool {
        self.feeds && self.seen_store
    }
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    status: Arc<RwLock<ComponentHealth>>,
    last_cycle_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    metrics: Arc<ScanMetrics>,
}

impl HealthChecker {
    pub fn new(metrics: Arc<ScanMetrics>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            status: Arc::new(RwLock::new(ComponentHealth::default())),
            last_cycle_at: Arc::new(RwLock::new(None)),
            metrics,
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        let components = self.status.read().await.clone();

        HealthStatus {
            status: if components.is_healthy() {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            last_cycle_at: *self.last_cycle_at.read().await,
            components,
            counters: self.metrics.snapshot(),
        }
    }

    pub async fn update_component(&self, component: &str, healthy: bool) {
        let mut status = self.status.write().await;
        match component {
            "feeds" => status.feeds = healthy,
            "marketplace" => status.marketplace = healthy,
            "telegram" => status.telegram = healthy,
            "seen_store" => status.seen_store = healthy,
            _ => tracing::warn!("Unknown health component: {}", component),
        }
    }

    pub async fn record_cycle(&self) {
        *self.last_cycle_at.write().await = Some(Utc::now());
    }
}

/// Serves `GET /health` until `shutdown` fires.
pub async fn serve(
    health_checker: HealthChecker,
    port: u16,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let health = warp::path("health")
        .and(warp::get())
        .and(warp::any().map(move || health_checker.clone()))
        .and_then(|checker: HealthChecker| async move {
            let status = checker.get_status().await;
            Ok::<_, warp::Rejection>(warp::reply::json(&status))
        });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let (bound, server) = warp::serve(health)
        .try_bind_with_graceful_shutdown(addr, async move { shutdown.cancelled().await })?;

    tracing::info!("Health endpoint listening on {}", bound);
    server.await;
    Ok(())
}
