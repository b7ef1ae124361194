//! Application metrics collection and reporting.

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

/// Metrics collector for the poster API.
#[derive(Debug)]
pub struct MetricsCollector {
    /// Request counts
    pub poster_requests: AtomicU64,
    pub geocode_requests: AtomicU64,
    pub geocode_failures: AtomicU64,

    /// Render stats
    pub posters_rendered: AtomicU64,
    pub render_errors: AtomicU64,

    /// Timing stats (stored as microseconds)
    render_times: RwLock<TimingStats>,
    fetch_times: RwLock<TimingStats>,

    /// Start time for uptime calculation
    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }

    fn summary(&self) -> TimingSummary {
        TimingSummary {
            count: self.count,
            avg_ms: self.avg_ms(),
            min_ms: self.min_us as f64 / 1000.0,
            max_ms: self.max_us as f64 / 1000.0,
            last_ms: self.last_us as f64 / 1000.0,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            poster_requests: AtomicU64::new(0),
            geocode_requests: AtomicU64::new(0),
            geocode_failures: AtomicU64::new(0),
            posters_rendered: AtomicU64::new(0),
            render_errors: AtomicU64::new(0),
            render_times: RwLock::new(TimingStats::default()),
            fetch_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record an incoming poster request
    pub fn record_poster_request(&self) {
        self.poster_requests.fetch_add(1, Ordering::Relaxed);
        counter!("poster_requests_total").increment(1);
    }

    /// Record a geocoder lookup
    pub fn record_geocode(&self, success: bool) {
        self.geocode_requests.fetch_add(1, Ordering::Relaxed);
        counter!("geocode_requests_total").increment(1);
        if !success {
            self.geocode_failures.fetch_add(1, Ordering::Relaxed);
            counter!("geocode_failures_total").increment(1);
        }
    }

    /// Record a feature fetch
    pub async fn record_feature_fetch(&self, duration_us: u64) {
        histogram!("feature_fetch_duration_ms").record(duration_us as f64 / 1000.0);
        let mut times = self.fetch_times.write().await;
        times.record(duration_us);
    }

    /// Record a render operation
    pub async fn record_render(&self, duration_us: u64, success: bool) {
        if success {
            self.posters_rendered.fetch_add(1, Ordering::Relaxed);
            counter!("posters_rendered_total").increment(1);
        } else {
            self.render_errors.fetch_add(1, Ordering::Relaxed);
            counter!("poster_render_errors_total").increment(1);
        }
        histogram!("poster_render_duration_ms").record(duration_us as f64 / 1000.0);

        let mut times = self.render_times.write().await;
        times.record(duration_us);
    }

    /// Get current metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let render_times = self.render_times.read().await;
        let fetch_times = self.fetch_times.read().await;

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            poster_requests: self.poster_requests.load(Ordering::Relaxed),
            posters_rendered: self.posters_rendered.load(Ordering::Relaxed),
            render_errors: self.render_errors.load(Ordering::Relaxed),
            geocode_requests: self.geocode_requests.load(Ordering::Relaxed),
            geocode_failures: self.geocode_failures.load(Ordering::Relaxed),
            render: render_times.summary(),
            feature_fetch: fetch_times.summary(),
        }
    }
}

/// Timing summary in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSummary {
    pub count: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

/// Snapshot of metrics for the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub poster_requests: u64,
    pub posters_rendered: u64,
    pub render_errors: u64,
    pub geocode_requests: u64,
    pub geocode_failures: u64,
    pub render: TimingSummary,
    pub feature_fetch: TimingSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_counts() {
        let metrics = MetricsCollector::new();
        metrics.record_poster_request();
        metrics.record_geocode(true);
        metrics.record_geocode(false);
        metrics.record_render(2_000, true).await;
        metrics.record_render(4_000, false).await;

        let snap = metrics.snapshot().await;
        assert_eq!(snap.poster_requests, 1);
        assert_eq!(snap.geocode_requests, 2);
        assert_eq!(snap.geocode_failures, 1);
        assert_eq!(snap.posters_rendered, 1);
        assert_eq!(snap.render_errors, 1);
        assert_eq!(snap.render.count, 2);
        assert!((snap.render.avg_ms - 3.0).abs() < 1e-9);
        assert!((snap.render.min_ms - 2.0).abs() < 1e-9);
        assert!((snap.render.max_ms - 4.0).abs() < 1e-9);
        assert_eq!(snap.feature_fetch.count, 0);
    }
}
