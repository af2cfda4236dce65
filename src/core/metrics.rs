//! Channel metrics for observability
//!
//! Counts what happened to every entry handed to a channel: delivered to the
//! driver, filtered below the channel level, or rejected by the driver.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-channel delivery counters
///
/// # Example
///
/// ```
/// use rust_channel_logger::ChannelMetrics;
///
/// let metrics = ChannelMetrics::new();
///
/// metrics.record_delivered();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct ChannelMetrics {
    /// Entries the driver accepted
    delivered: AtomicU64,

    /// Entries dropped because they were below the channel level
    filtered: AtomicU64,

    /// Entries the driver returned an error for
    failed: AtomicU64,
}

impl ChannelMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Record an accepted entry, returning the previous count
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Entries that reached the driver, whatever the outcome
    pub fn attempted_count(&self) -> u64 {
        self.delivered_count() + self.failed_count()
    }

    /// Failure rate as a percentage (0.0 - 100.0) of attempted deliveries
    ///
    /// Returns 0.0 if nothing has reached the driver yet.
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.attempted_count() as f64;
        if attempted == 0.0 {
            0.0
        } else {
            (self.failed_count() as f64 / attempted) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for ChannelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChannelMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            failed: AtomicU64::new(self.failed_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = ChannelMetrics::new();
        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.failed_count(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = ChannelMetrics::new();
        assert_eq!(metrics.record_delivered(), 0);
        assert_eq!(metrics.record_delivered(), 1);
        assert_eq!(metrics.delivered_count(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = ChannelMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..3 {
            metrics.record_delivered();
        }
        metrics.record_failed();
        metrics.record_filtered();

        assert_eq!(metrics.attempted_count(), 4);
        assert!((metrics.failure_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = ChannelMetrics::new();
        metrics.record_delivered();
        metrics.record_failed();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.delivered_count(), 0);
        assert_eq!(metrics.failed_count(), 0);
        assert_eq!(snapshot.delivered_count(), 1);
        assert_eq!(snapshot.failed_count(), 1);
    }
}
