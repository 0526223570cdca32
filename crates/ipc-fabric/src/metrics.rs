use std::sync::atomic::{AtomicU64, Ordering};

/// Per-socket counters, read by the owning process's own health reporting
/// (the fabric itself does not publish these anywhere).
#[derive(Debug, Default)]
pub struct FabricMetrics {
    pub sent: AtomicU64,
    pub received: AtomicU64,
    pub dropped: AtomicU64,
}

impl FabricMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FabricMetricsSnapshot {
        FabricMetricsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FabricMetricsSnapshot {
    pub sent: u64,
    pub received: u64,
    pub dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = FabricMetrics::new();
        let s = m.snapshot();
        assert_eq!(s.sent, 0);
        assert_eq!(s.received, 0);
        assert_eq!(s.dropped, 0);
    }

    #[test]
    fn counters_increment() {
        let m = FabricMetrics::new();
        m.record_sent();
        m.record_sent();
        m.record_received();
        m.record_dropped();
        let s = m.snapshot();
        assert_eq!(s.sent, 2);
        assert_eq!(s.received, 1);
        assert_eq!(s.dropped, 1);
    }
}
