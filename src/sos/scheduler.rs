//! Deferred-work capability and its deterministic virtual-clock implementation.
//!
//! The SOS sequencers never sleep. They register a task with a [`Scheduler`]
//! and get it back through [`SosController::fire`](super::SosController::fire)
//! once the clock passes its deadline. Tests and the `simulate` command advance
//! a [`VirtualClock`] explicitly; the terminal runtime advances it by elapsed
//! wall-clock time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

/// Opaque identity of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Schedule, cancel and drain deferred tasks.
pub trait Scheduler<T> {
    /// Register `task` to become due `after` from now.
    fn schedule(&mut self, after: Duration, task: T) -> TimerHandle;

    /// Cancel a pending task. Returns whether it was still pending.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Current clock reading, measured from the scheduler's origin.
    fn now(&self) -> Duration;

    /// Earliest pending deadline, if any.
    fn next_deadline(&self) -> Option<Duration>;

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time. Ties fire in scheduling order.
    fn pop_due(&mut self, deadline: Duration) -> Option<(TimerHandle, T)>;

    /// Move the clock forward to `deadline` without firing anything.
    fn advance_to(&mut self, deadline: Duration);

    /// Number of pending tasks.
    fn pending(&self) -> usize;
}

/// Manually driven clock. Time only moves when told to.
#[derive(Debug)]
pub struct VirtualClock<T> {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), T>,
    due_by_id: HashMap<u64, Duration>,
}

impl<T> Default for VirtualClock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VirtualClock<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Whether `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Pending tasks in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (TimerHandle, Duration, &T)> {
        self.queue
            .iter()
            .map(|((due, id), task)| (TimerHandle(*id), *due, task))
    }
}

impl<T> Scheduler<T> for VirtualClock<T> {
    fn schedule(&mut self, after: Duration, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(after);
        self.queue.insert((due, id), task);
        self.due_by_id.insert(id, due);
        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.queue.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    fn pop_due(&mut self, deadline: Duration) -> Option<(TimerHandle, T)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > deadline {
            return None;
        }
        let task = self.queue.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        if due > self.now {
            self.now = due;
        }
        Some((TimerHandle(id), task))
    }

    fn advance_to(&mut self, deadline: Duration) {
        if deadline > self.now {
            self.now = deadline;
        }
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
