use std::time::Duration;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer driven by caller-supplied timestamps.
///
/// Each `push` replaces the pending value and restarts the delay; `poll` hands the
/// value out once the delay has elapsed since the last push.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Releases the pending value regardless of time.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
