use std::collections::VecDeque;

use parking_lot::RwLock;

/// A single UART telemetry reading, as parsed by the motor gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub mq2: f64,
    pub min_distance: f64,
    pub obstacle: bool,
    pub warning: bool,
    pub motor_left: i32,
    pub motor_right: i32,
    pub ts: i64,
}

/// Bounded ring buffer of the most recent `T`s, exposed for telemetry.
#[derive(Debug)]
pub struct RingHistory<T> {
    capacity: usize,
    items: RwLock<VecDeque<T>>,
}

impl<T: Clone> RingHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: RwLock::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn push(&self, item: T) {
        let mut guard = self.items.write();
        guard.push_back(item);
        while guard.len() > self.capacity {
            guard.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<T> {
        self.items.read().back().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let history: RingHistory<i32> = RingHistory::new(2);
        history.push(1);
        history.push(2);
        history.push(3);
        assert_eq!(history.snapshot(), vec![2, 3]);
    }

    #[test]
    fn latest_reflects_most_recent_push() {
        let history: RingHistory<i32> = RingHistory::new(3);
        history.push(1);
        history.push(2);
        assert_eq!(history.latest(), Some(2));
    }

    #[test]
    fn empty_history_has_no_latest() {
        let history: RingHistory<i32> = RingHistory::new(3);
        assert_eq!(history.latest(), None);
    }
}
