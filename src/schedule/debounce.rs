use std::time::{Duration, Instant};

use super::{TaskHandle, TimerQueue};

/// Collapses bursts of triggers into one action fired after a quiet period.
///
/// Each trigger cancels the previous pending action and schedules the new
/// one, so only the last trigger inside the window survives.
pub(crate) struct Debouncer<A> {
    quiet: Duration,
    queue: TimerQueue<A>,
    pending: Option<TaskHandle>,
}

impl<A> Debouncer<A> {
    pub(crate) fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            queue: TimerQueue::new(),
            pending: None,
        }
    }

    pub(crate) fn trigger(&mut self, now: Instant, action: A) {
        if let Some(prev) = self.pending.take() {
            self.queue.cancel(prev);
        }
        self.pending = Some(self.queue.schedule(now, self.quiet, action));
    }

    /// Drop the pending action, if any. Returns whether one was dropped.
    pub(crate) fn cancel(&mut self) -> bool {
        self.pending
            .take()
            .and_then(|h| self.queue.cancel(h))
            .is_some()
    }

    /// The pending action once its quiet period has elapsed at `now`.
    pub(crate) fn poll(&mut self, now: Instant) -> Option<A> {
        let action = self.queue.take_due(now).pop()?;
        self.pending = None;
        Some(action)
    }

    /// The pending action immediately, without waiting.
    pub(crate) fn flush(&mut self) -> Option<A> {
        self.pending = None;
        self.queue.drain().pop()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some_and(|h| self.queue.is_scheduled(h))
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.queue.next_due()
    }
}
