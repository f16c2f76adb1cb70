//! Editor state: text history, chord state and the highlight debounce.
//!
//! Everything the editing session mutates lives in [`EditorState`], created once per session
//! with the documented initial invariants:
//! - history holds exactly one snapshot (the initial text, `""` by default), redo is empty;
//! - no chord is pending and no expiry timer is armed;
//! - no highlight timer is armed and the highlight call count is zero.
//!
//! Timers are never owned here. Components hold only the [`TimerHandle`] they were given by a
//! `core_timer::Scheduler` and compare it against incoming firings, which makes stale
//! firings (from a timer replaced or cancelled after it was already queued) harmless.
//!
//! Telemetry:
//! - History stack traffic emits TRACE events under `state.history`.
//! - Chord transitions emit DEBUG events under `state.chord`.
//! - Debounce supersession / passes emit under `state.highlight`.

use serde::Serialize;

pub mod chord;
pub mod highlight;
pub mod history;

pub use chord::ChordState;
pub use core_timer::TimerHandle;
pub use highlight::HighlightDebouncer;
pub use history::History;

#[derive(Debug, Default, Clone)]
pub struct EditorState {
    pub history: History,
    pub chord: ChordState,
    pub highlight: HighlightDebouncer,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose history floor is `initial` instead of the empty document.
    pub fn with_initial(initial: impl Into<String>) -> Self {
        Self {
            history: History::with_initial(initial),
            ..Self::default()
        }
    }

    pub fn content(&self) -> &str {
        self.history.current()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            content: self.history.current().to_string(),
            history_size: self.history.undo_depth(),
        }
    }
}

/// Introspection view handed to external consumers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub content: String,
    /// Length of the undo stack (the initial snapshot included).
    pub history_size: usize,
}
