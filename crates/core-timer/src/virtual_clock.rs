use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;

use crate::{Scheduler, TimerFired, TimerHandle, TimerKind};

/// Scheduler driven by an explicit clock.
///
/// Time only moves through [`advance_to`](Self::advance_to) / [`advance_by`](Self::advance_by),
/// which return the timers that became due, ordered by deadline and then by scheduling order.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now: Duration,
    next_id: u64,
    /// Keyed by (deadline, handle); handles grow monotonically so ties keep scheduling order.
    pending: BTreeMap<(Duration, TimerHandle), TimerKind>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.keys().any(|(_, h)| *h == handle)
    }

    /// Deadline of the earliest armed timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock to `target` and return every timer due at or before it. A target in the
    /// past leaves the clock where it is.
    pub fn advance_to(&mut self, target: Duration) -> Vec<TimerFired> {
        let mut fired = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            let (deadline, handle) = *entry.key();
            if deadline > target {
                break;
            }
            let kind = entry.remove();
            self.now = self.now.max(deadline);
            trace!(target: "timer", %handle, ?kind, at_ms = deadline.as_millis() as u64, "virtual_fire");
            fired.push(TimerFired { handle, kind });
        }
        self.now = self.now.max(target);
        fired
    }

    pub fn advance_by(&mut self, delta: Duration) -> Vec<TimerFired> {
        self.advance_to(self.now + delta)
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let deadline = self.now + delay;
        self.pending.insert((deadline, handle), kind);
        trace!(target: "timer", %handle, ?kind, deadline_ms = deadline.as_millis() as u64, "virtual_schedule");
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let key = self.pending.keys().find(|(_, h)| *h == handle).copied();
        if let Some(key) = key {
            self.pending.remove(&key);
            trace!(target: "timer", %handle, "virtual_cancel");
        }
    }
}
