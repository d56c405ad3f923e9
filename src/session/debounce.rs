use std::time::Duration;
use tokio::time::Instant;

pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Cancellable delayed trigger. Every `schedule` replaces the pending value
/// and restarts the quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T) {
        self.pending = Some((Instant::now() + self.quiet, value));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|at| at <= now) {
            self.cancel()
        } else {
            None
        }
    }
}

/// Sleep until `deadline`, or forever when nothing is scheduled.
pub async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_quiet_period() {
        let mut debouncer = Debouncer::new(SEARCH_QUIET_PERIOD);
        debouncer.schedule("phone");
        advance(Duration::from_millis(299)).await;
        assert_eq!(debouncer.take_due(Instant::now()), None);
        advance(Duration::from_millis(1)).await;
        assert_eq!(debouncer.take_due(Instant::now()), Some("phone"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_event_restarts_delay() {
        let mut debouncer = Debouncer::new(SEARCH_QUIET_PERIOD);
        debouncer.schedule("p");
        advance(Duration::from_millis(200)).await;
        debouncer.schedule("ph");
        advance(Duration::from_millis(200)).await;
        assert_eq!(debouncer.take_due(Instant::now()), None);
        advance(Duration::from_millis(100)).await;
        assert_eq!(debouncer.take_due(Instant::now()), Some("ph"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_deadline() {
        let mut debouncer = Debouncer::new(SEARCH_QUIET_PERIOD);
        debouncer.schedule(1);
        let start = Instant::now();
        wait_until(debouncer.deadline()).await;
        assert!(start.elapsed() >= SEARCH_QUIET_PERIOD);
        assert_eq!(debouncer.take_due(Instant::now()), Some(1));
    }

    #[tokio::test]
    async fn test_cancel() {
        let mut debouncer = Debouncer::new(SEARCH_QUIET_PERIOD);
        assert_eq!(debouncer.cancel(), None::<u8>);
        debouncer.schedule(3);
        assert_eq!(debouncer.cancel(), Some(3));
    }
}
