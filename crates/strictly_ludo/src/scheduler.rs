//! Deferred controller callbacks on a millisecond clock.
//!
//! The controller never sleeps. Delays become entries in a [`Scheduler`]
//! that the host drives: tests advance virtual time, the terminal front end
//! sleeps until [`Scheduler::next_due`] and then advances.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::trace;

/// Work the controller deferred to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ScheduledAction {
    /// The rolling die lands.
    FinishRoll,
    /// A machine seat requests a roll.
    MachineRoll,
    /// A machine seat picks and plays its move.
    MachineMove,
    /// A turn without a legal move passes.
    AutoSkip,
}

/// Clock plus an ordered queue of pending callbacks.
pub trait Scheduler: Send {
    /// Current time in milliseconds.
    fn now(&self) -> u64;

    /// Queues `action` to fire `delay_ms` from now.
    fn schedule(&mut self, delay_ms: u64, action: ScheduledAction);

    /// Deadline of the earliest pending action.
    fn next_due(&self) -> Option<u64>;

    /// Removes the earliest action due at or before `deadline` and moves the
    /// clock to its due time.
    ///
    /// Actions due at the same time come out in the order they were queued.
    fn pop_due(&mut self, deadline: u64) -> Option<ScheduledAction>;

    /// Moves the clock forward to `at`; never backward.
    fn advance_clock(&mut self, at: u64);

    /// Drops every pending action.
    fn clear(&mut self);

    /// Number of pending actions.
    fn pending(&self) -> usize;
}

/// In-memory scheduler whose clock moves only when told to.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    now: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<(u64, u64, ScheduledAction)>>,
}

impl VirtualScheduler {
    /// A scheduler at time zero with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> u64 {
        self.now
    }

    fn schedule(&mut self, delay_ms: u64, action: ScheduledAction) {
        let due = self.now + delay_ms;
        trace!(%action, due, "Scheduled");
        self.queue.push(Reverse((due, self.seq, action)));
        self.seq += 1;
    }

    fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse((due, _, _))| *due)
    }

    fn pop_due(&mut self, deadline: u64) -> Option<ScheduledAction> {
        if self.next_due()? > deadline {
            return None;
        }
        let Reverse((due, _, action)) = self.queue.pop()?;
        self.advance_clock(due);
        Some(action)
    }

    fn advance_clock(&mut self, at: u64) {
        self.now = self.now.max(at);
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
