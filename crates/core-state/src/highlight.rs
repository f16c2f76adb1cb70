use std::time::Duration;

use core_timer::{Scheduler, TimerHandle, TimerKind};
use tracing::{debug, trace};

/// Coalescing debounce in front of the highlight pass.
///
/// Every [`request`](HighlightDebouncer::request) replaces the pending timer, so a burst of
/// requests produces one pass, `delay` after the last request.
#[derive(Debug, Default, Clone)]
pub struct HighlightDebouncer {
    pending: Option<TimerHandle>,
    call_count: u64,
}

impl HighlightDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, delay: Duration) {
        if let Some(prev) = self.pending.take() {
            scheduler.cancel(prev);
            trace!(target: "state.highlight", handle = %prev, "debounce_superseded");
        }
        self.pending = Some(scheduler.schedule(delay, TimerKind::Highlight));
    }

    /// Timer fired; runs the pass when `handle` is still the pending one.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.pending != Some(handle) {
            trace!(target: "state.highlight", %handle, "stale_fire_ignored");
            return false;
        }
        self.pending = None;
        self.highlight();
        true
    }

    /// The highlight pass. No tokenizing happens here; the counter is the observable effect.
    fn highlight(&mut self) {
        self.call_count += 1;
        debug!(target: "state.highlight", calls = self.call_count, "highlight_pass");
    }
}
