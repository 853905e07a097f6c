//! Quiet-period flush scheduling
//!
//! Two states: Idle (no deadline) and Armed (one deadline). Every accepted
//! change event re-arms the deadline to `now + interval`, so the flush
//! fires only once no event has arrived for a full interval. At most one
//! deadline exists at a time; arming replaces, never stacks.

use std::time::Duration;
use syncline_types::{Error, Result};
use tokio::time::Instant;

/// Deadline state machine driving flush scheduling
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer; the interval must be strictly positive
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::config("debounce interval must be strictly positive"));
        }
        Ok(Self {
            interval,
            deadline: None,
        })
    }

    /// Record an accepted change event, (re)arming the deadline
    pub fn notify(&mut self) {
        self.deadline = Some(Instant::now() + self.interval);
    }

    /// Whether a flush is currently scheduled
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The scheduled flush deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Return to Idle; called after the flush fires
    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}

/// Wait until the given deadline, or forever when there is none
///
/// Recreated each engine-loop iteration so a replaced deadline takes
/// effect immediately.
pub async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Debouncer::new(Duration::ZERO).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_arms_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100)).unwrap();
        assert!(!debouncer.is_armed());

        debouncer.notify();
        assert!(debouncer.is_armed());
        assert_eq!(
            debouncer.deadline().unwrap(),
            Instant::now() + Duration::from_millis(100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_replaces_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100)).unwrap();
        debouncer.notify();
        let first = debouncer.deadline().unwrap();

        tokio::time::advance(Duration::from_millis(60)).await;
        debouncer.notify();
        let second = debouncer.deadline().unwrap();

        // The prior deadline is replaced, not kept alongside a new one
        assert!(second > first);
        assert_eq!(second, Instant::now() + Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_fires_at_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50)).unwrap();
        debouncer.notify();

        wait_until(debouncer.deadline()).await;
        debouncer.disarm();
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_idle_never_fires() {
        let wait = wait_until(None);
        tokio::pin!(wait);

        let fired = tokio::select! {
            _ = &mut wait => true,
            _ = tokio::time::sleep(Duration::from_secs(3600)) => false,
        };
        assert!(!fired);
    }
}
