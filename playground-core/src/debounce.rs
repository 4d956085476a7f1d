use std::time::Duration;

/// Single-slot debounce timer
///
/// Time is passed in as monotonic milliseconds so the same logic drives the
/// terminal event loop and the browser's `setTimeout` wakeups. Re-arming
/// always replaces the pending deadline, so at most one fire is outstanding.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: delay.as_millis() as u64,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Cancel any pending deadline and re-arm from `now_ms`
    pub fn schedule(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Time left until the pending deadline, if any
    pub fn remaining(&self, now_ms: u64) -> Option<Duration> {
        self.deadline
            .map(|deadline| Duration::from_millis(deadline.saturating_sub(now_ms)))
    }

    /// Returns true exactly once when the deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_of_edits_fires_once() {
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        let mut fired = 0;

        for now in (0..2_000).step_by(100) {
            debounce.schedule(now);
            if debounce.poll(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);

        for now in (1_900..4_000).step_by(50) {
            if debounce.poll(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.schedule(1_000);
        debounce.schedule(1_300);
        assert_eq!(debounce.deadline(), Some(1_800));
        assert!(!debounce.poll(1_500));
        assert_eq!(debounce.remaining(1_500), Some(Duration::from_millis(300)));
        assert!(debounce.poll(1_800));
        assert!(!debounce.poll(1_900));
    }

    #[test]
    fn test_cancel() {
        let mut debounce = Debouncer::new(Duration::from_millis(10));
        debounce.schedule(0);
        debounce.cancel();
        assert!(!debounce.poll(100));
        assert_eq!(debounce.remaining(100), None);
    }
}
