//! The editing session: one owner for editor state, the surface collaborators and the
//! scheduler.
//!
//! `EditorSession` is the only entry point hosts need. It receives surface events and
//! timer firings strictly in delivery order and runs each handler to completion:
//!
//! * `input`: commit the surface text, log `input: content updated`, re-arm the highlight
//!   debounce.
//! * `keydown`: resolve the platform's primary modifier for this key, then hand off to the
//!   shortcut dispatcher (which logs `keydown: <key>` first).
//! * composition events: logged verbatim and tracked in [`EditorSession::is_composing`].
//! * timer firings: routed by kind to the chord or the debounce; stale handles are dropped.
//!
//! Invariants after construction:
//! * history holds exactly one snapshot, the text the surface showed at construction;
//! * no chord is pending, no timer is armed, the highlight count is zero.
//!
//! The session is generic over every collaborator so that tests run it against in-memory
//! doubles and a [`VirtualScheduler`], while the binary host plugs in a tokio scheduler.

use std::sync::atomic::Ordering;
use std::time::Duration;

use core_actions::{ActionContext, DispatchResult, handle_keydown};
use core_events::{INPUT_TOTAL, KEYDOWN_TOTAL, KeyEvent, RawKeyEvent, SurfaceEvent};
use core_keymap::Keymap;
use core_state::{EditorSnapshot, EditorState};
use core_surface::{EventLogSink, Platform, TextSurface};
use core_timer::{Scheduler, TimerFired, TimerKind, VirtualScheduler};
use tracing::{debug, trace};

pub const INPUT_LOG_LINE: &str = "input: content updated";

/// Timing knobs of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Window in which the second chord key must arrive.
    pub chord_timeout: Duration,
    /// Quiet period after the last input before the highlight pass runs.
    pub highlight_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chord_timeout: Duration::from_millis(2000),
            highlight_delay: Duration::from_millis(200),
        }
    }
}

pub struct EditorSession<S, L, P, T> {
    state: EditorState,
    keymap: Keymap,
    options: SessionOptions,
    surface: S,
    log: L,
    platform: P,
    scheduler: T,
    composing: bool,
}

impl<S, L, P, T> EditorSession<S, L, P, T>
where
    S: TextSurface,
    L: EventLogSink,
    P: Platform,
    T: Scheduler,
{
    pub fn new(surface: S, log: L, platform: P, scheduler: T, options: SessionOptions) -> Self {
        let state = EditorState::with_initial(surface.current_text());
        debug!(
            target: "runtime",
            chord_timeout_ms = options.chord_timeout.as_millis() as u64,
            highlight_delay_ms = options.highlight_delay.as_millis() as u64,
            "session_created"
        );
        Self {
            state,
            keymap: Keymap::default(),
            options,
            surface,
            log,
            platform,
            scheduler,
            composing: false,
        }
    }

    /// Route one surface event. Returns whether the host must prevent default handling.
    pub fn handle_event(&mut self, ev: SurfaceEvent) -> bool {
        match ev {
            SurfaceEvent::Input => {
                self.on_input();
                false
            }
            SurfaceEvent::KeyDown(raw) => self.on_keydown(&raw).prevent_default,
            SurfaceEvent::CompositionStart => {
                self.on_composition_start();
                false
            }
            SurfaceEvent::CompositionUpdate => {
                self.on_composition_update();
                false
            }
            SurfaceEvent::CompositionEnd => {
                self.on_composition_end();
                false
            }
        }
    }

    pub fn on_input(&mut self) {
        INPUT_TOTAL.fetch_add(1, Ordering::Relaxed);
        let text = self.surface.current_text();
        self.state.history.commit(text);
        self.log.append(INPUT_LOG_LINE);
        self.state
            .highlight
            .request(&mut self.scheduler, self.options.highlight_delay);
    }

    /// Raw keydown; the primary modifier is asked of the platform on every call.
    pub fn on_keydown(&mut self, raw: &RawKeyEvent) -> DispatchResult {
        let command_is_primary = self.platform.is_primary_modifier_platform();
        let ev = KeyEvent::from_raw(raw, command_is_primary);
        trace!(target: "runtime.events", combo = %raw, command_is_primary, "keydown");
        self.on_key_event(&ev)
    }

    /// Keydown whose primary modifier has already been resolved.
    pub fn on_key_event(&mut self, ev: &KeyEvent) -> DispatchResult {
        KEYDOWN_TOTAL.fetch_add(1, Ordering::Relaxed);
        let mut ctx = ActionContext {
            state: &mut self.state,
            surface: &mut self.surface,
            log: &mut self.log,
            scheduler: &mut self.scheduler,
            chord_window: self.options.chord_timeout,
        };
        handle_keydown(&self.keymap, ev, &mut ctx)
    }

    pub fn on_composition_start(&mut self) {
        self.composing = true;
        self.log.append("compositionstart");
    }

    pub fn on_composition_update(&mut self) {
        self.log.append("compositionupdate");
    }

    pub fn on_composition_end(&mut self) {
        self.composing = false;
        self.log.append("compositionend");
    }

    /// Deliver a timer firing. Returns `false` for stale handles.
    pub fn on_timer(&mut self, fired: TimerFired) -> bool {
        let live = match fired.kind {
            TimerKind::ChordExpiry => self.state.chord.on_timer(fired.handle),
            TimerKind::Highlight => self.state.highlight.on_timer(fired.handle),
        };
        trace!(target: "timer", handle = %fired.handle, kind = ?fired.kind, live, "delivered");
        live
    }

    /// `{content, historySize}` view of the history.
    pub fn editor_state(&self) -> EditorSnapshot {
        self.state.snapshot()
    }

    pub fn highlight_call_count(&self) -> u64 {
        self.state.highlight.call_count()
    }

    pub fn is_chord_pending(&self) -> bool {
        self.state.chord.is_active()
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for host-side edits (what native typing does before `input` fires).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }
}

impl<S, L, P> EditorSession<S, L, P, VirtualScheduler>
where
    S: TextSurface,
    L: EventLogSink,
    P: Platform,
{
    /// Move the virtual clock to `t` (since session start), delivering every due timer in
    /// deadline order. Returns the number of live firings.
    pub fn advance_to(&mut self, t: Duration) -> usize {
        let fired = self.scheduler.advance_to(t);
        fired.into_iter().filter(|f| self.on_timer(*f)).count()
    }

    pub fn advance_by(&mut self, delta: Duration) -> usize {
        let target = self.scheduler.now() + delta;
        self.advance_to(target)
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }
}
