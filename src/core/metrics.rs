use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for the scan loop, shared with the health endpoint.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    cycles_completed: AtomicU64,
    feeds_failed: AtomicU64,
    entries_examined: AtomicU64,
    already_seen: AtomicU64,
    keyword_rejects: AtomicU64,
    price_missing: AtomicU64,
    estimate_misses: AtomicU64,
    below_ratio: AtomicU64,
    notifications_sent: AtomicU64,
    notification_failures: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles_completed: u64,
    pub feeds_failed: u64,
    pub entries_examined: u64,
    pub already_seen: u64,
    pub keyword_rejects: u64,
    pub price_missing: u64,
    pub estimate_misses: u64,
    pub below_ratio: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_cycles(&self) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_feeds_failed(&self) {
        self.feeds_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_entries_examined(&self) {
        self.entries_examined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_already_seen(&self) {
        self.already_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_keyword_rejects(&self) {
        self.keyword_rejects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_price_missing(&self) {
        self.price_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_estimate_misses(&self) {
        self.estimate_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_below_ratio(&self) {
        self.below_ratio.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notifications_sent(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notification_failures(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_notifications_sent(&self) -> u64 {
        self.notifications_sent.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            feeds_failed: self.feeds_failed.load(Ordering::Relaxed),
            entries_examined: self.entries_examined.load(Ordering::Relaxed),
            already_seen: self.already_seen.load(Ordering::Relaxed),
            keyword_rejects: self.keyword_rejects.load(Ordering::Relaxed),
            price_missing: self.price_missing.load(Ordering::Relaxed),
            estimate_misses: self.estimate_misses.load(Ordering::Relaxed),
            below_ratio: self.below_ratio.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
        }
    }
}
