#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::time::Duration;

use core_actions::{ActionContext, DispatchResult, handle_keydown};
use core_events::KeyEvent;
use core_keymap::Keymap;
use core_state::EditorState;
use core_surface::{MemoryEventLog, MemorySurface};
use core_timer::VirtualScheduler;

pub const CHORD_WINDOW: Duration = Duration::from_millis(2000);

/// State plus in-memory collaborators, driven one keydown at a time.
pub struct Harness {
    pub state: EditorState,
    pub surface: MemorySurface,
    pub log: MemoryEventLog,
    pub scheduler: VirtualScheduler,
    pub keymap: Keymap,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            state: EditorState::new(),
            surface: MemorySurface::new(),
            log: MemoryEventLog::new(),
            scheduler: VirtualScheduler::new(),
            keymap: Keymap::default(),
        }
    }

    /// Surface showing `text` with the caret at `cursor`; history is left at its floor.
    pub fn with_text(text: &str, cursor: usize) -> Self {
        let mut h = Self::new();
        h.surface = MemorySurface::with_text(text, Some(cursor));
        h
    }

    pub fn key(&mut self, key: &str, shift: bool, modifier: bool) -> DispatchResult {
        let ev = KeyEvent::new(key, shift, modifier);
        let mut sink = self.log.clone();
        let mut ctx = ActionContext {
            state: &mut self.state,
            surface: &mut self.surface,
            log: &mut sink,
            scheduler: &mut self.scheduler,
            chord_window: CHORD_WINDOW,
        };
        handle_keydown(&self.keymap, &ev, &mut ctx)
    }

    pub fn plain(&mut self, key: &str) -> DispatchResult {
        self.key(key, false, false)
    }

    pub fn shifted(&mut self, key: &str) -> DispatchResult {
        self.key(key, true, false)
    }

    pub fn modified(&mut self, key: &str) -> DispatchResult {
        self.key(key, false, true)
    }

    /// Simulate the user typing: surface changes and the result is committed.
    pub fn type_text(&mut self, text: &str) {
        self.surface.set_text(text);
        self.surface.cursor_to_end();
        self.state.history.commit(text);
    }

    /// Advance the virtual clock and deliver chord expiries.
    pub fn advance_to(&mut self, ms: u64) {
        for fired in self.scheduler.advance_to(Duration::from_millis(ms)) {
            self.state.chord.on_timer(fired.handle);
        }
    }

    pub fn text(&self) -> &str {
        self.surface.text()
    }
}
