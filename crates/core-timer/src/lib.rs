//! One-shot timer scheduling port.
//!
//! The editing core never touches a clock. It asks a [`Scheduler`] for a timer and later
//! receives a [`TimerFired`] carrying the same handle. Two implementations:
//! * [`VirtualScheduler`]: manual clock advanced by the caller; deterministic, used by tests
//!   and by anything that wants to replay timing exactly.
//! * [`TokioScheduler`]: real timers; each timer is a sleeping task that pushes
//!   `Event::Timer` into the host channel and is aborted on cancel.
//!
//! Cancellation is best effort at the port level (a tokio timer may already have queued its
//! event). Consumers therefore compare the fired handle against the one they still hold and
//! drop stale firings.

use std::time::Duration;

pub use core_events::{TimerFired, TimerHandle, TimerKind};

mod tokio_scheduler;
mod virtual_clock;

pub use tokio_scheduler::TokioScheduler;
pub use virtual_clock::VirtualScheduler;

pub trait Scheduler {
    /// Arm a one-shot timer that fires once after `delay`.
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle;
    /// Disarm a timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

impl<T: Scheduler + ?Sized> Scheduler for &mut T {
    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        (**self).schedule(delay, kind)
    }
    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle)
    }
}
