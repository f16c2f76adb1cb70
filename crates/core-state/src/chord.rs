use std::time::Duration;

use core_timer::{Scheduler, TimerHandle, TimerKind};
use tracing::debug;

/// First-half-pressed flag of the two-key chord plus the timer that expires it.
///
/// `active` is true only between [`arm`](ChordState::arm) and the first of: the expiry timer
/// firing, [`complete`](ChordState::complete). Re-arming restarts the window.
#[derive(Debug, Default, Clone)]
pub struct ChordState {
    active: bool,
    timer: Option<TimerHandle>,
}

impl ChordState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn arm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, window: Duration) {
        if let Some(prev) = self.timer.take() {
            scheduler.cancel(prev);
        }
        let handle = scheduler.schedule(window, TimerKind::ChordExpiry);
        self.active = true;
        self.timer = Some(handle);
        debug!(target: "state.chord", %handle, window_ms = window.as_millis() as u64, "chord_armed");
    }

    /// Finish the chord. Returns `false` when no chord was pending.
    pub fn complete<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let Some(handle) = self.timer.take() {
            scheduler.cancel(handle);
        }
        debug!(target: "state.chord", "chord_completed");
        true
    }

    /// Expiry timer fired. Stale handles (timer already replaced or cancelled) are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.timer != Some(handle) {
            debug!(target: "state.chord", %handle, "stale_expiry_ignored");
            return false;
        }
        self.active = false;
        self.timer = None;
        debug!(target: "state.chord", %handle, "chord_expired");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_timer::VirtualScheduler;

    const WINDOW: Duration = Duration::from_millis(2000);

    fn deliver(chord: &mut ChordState, sched: &mut VirtualScheduler, to: Duration) {
        for fired in sched.advance_to(to) {
            chord.on_timer(fired.handle);
        }
    }

    #[test]
    fn expires_after_window() {
        let mut sched = VirtualScheduler::new();
        let mut chord = ChordState::new();
        chord.arm(&mut sched, WINDOW);
        deliver(&mut chord, &mut sched, Duration::from_millis(1999));
        assert!(chord.is_active());
        deliver(&mut chord, &mut sched, Duration::from_millis(2000));
        assert!(!chord.is_active());
        assert_eq!(chord.timer(), None);
    }

    #[test]
    fn complete_cancels_timer() {
        let mut sched = VirtualScheduler::new();
        let mut chord = ChordState::new();
        chord.arm(&mut sched, WINDOW);
        assert!(chord.complete(&mut sched));
        assert_eq!(sched.pending_count(), 0);
        assert!(!chord.complete(&mut sched), "second completion has nothing to finish");
    }

    #[test]
    fn rearm_restarts_window() {
        let mut sched = VirtualScheduler::new();
        let mut chord = ChordState::new();
        chord.arm(&mut sched, WINDOW);
        deliver(&mut chord, &mut sched, Duration::from_millis(1500));
        chord.arm(&mut sched, WINDOW);
        assert_eq!(sched.pending_count(), 1, "previous expiry cancelled");
        deliver(&mut chord, &mut sched, Duration::from_millis(3000));
        assert!(chord.is_active());
        deliver(&mut chord, &mut sched, Duration::from_millis(3500));
        assert!(!chord.is_active());
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut sched = VirtualScheduler::new();
        let mut chord = ChordState::new();
        chord.arm(&mut sched, WINDOW);
        let first = chord.timer().unwrap();
        chord.arm(&mut sched, WINDOW);
        assert!(!chord.on_timer(first));
        assert!(chord.is_active());
    }
}
