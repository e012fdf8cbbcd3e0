//! Explicit timers for a single-threaded event loop.
//!
//! Nothing here sleeps or spawns: callers pass the current `Instant` and
//! collect whatever actions have come due.

mod debounce;

use std::time::{Duration, Instant};

pub(crate) use debounce::Debouncer;

/// Identifies one scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TaskHandle(u64);

struct Scheduled<A> {
    handle: TaskHandle,
    due: Instant,
    action: A,
}

pub(crate) struct TimerQueue<A> {
    next_id: u64,
    tasks: Vec<Scheduled<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Run `action` once `after` has elapsed from `now`.
    pub(crate) fn schedule(&mut self, now: Instant, after: Duration, action: A) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.tasks.push(Scheduled {
            handle,
            due: now + after,
            action,
        });
        handle
    }

    /// Suppress a pending action. Returns it if it had not yet fired.
    pub(crate) fn cancel(&mut self, handle: TaskHandle) -> Option<A> {
        let idx = self.tasks.iter().position(|t| t.handle == handle)?;
        Some(self.tasks.remove(idx).action)
    }

    pub(crate) fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Remove and return every action due at `now`, earliest first.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<A> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due <= now);
        self.tasks = waiting;
        sorted_actions(due)
    }

    /// Remove and return every pending action regardless of its deadline.
    pub(crate) fn drain(&mut self) -> Vec<A> {
        sorted_actions(std::mem::take(&mut self.tasks))
    }

    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn sorted_actions<A>(mut tasks: Vec<Scheduled<A>>) -> Vec<A> {
    tasks.sort_by_key(|t| (t.due, t.handle.0));
    tasks.into_iter().map(|t| t.action).collect()
}
