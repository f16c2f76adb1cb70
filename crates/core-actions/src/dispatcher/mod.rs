//! Dispatcher applying a resolved `Shortcut` to editor state.
//!
//! Sub-modules:
//! * `edit`  - line transforms (indent, outdent, newline with indent, comment toggle)
//! * `chord` - arming and completing the two-key chord
//! * `undo`  - history stepping
//!
//! Every keydown is logged as `keydown: <key>` before anything else runs. Handled shortcuts
//! append their own action line last, after all state changes for the event are done.

use std::time::Duration;

use core_events::KeyEvent;
use core_keymap::{Keymap, Shortcut};
use core_state::EditorState;
use core_surface::{EventLogSink, TextSurface};
use core_timer::Scheduler;
use tracing::debug;

mod chord;
mod edit;
mod undo;

/// Result of dispatching a single keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The host must suppress its default handling of the key.
    pub prevent_default: bool,
    /// The surface text was replaced.
    pub text_changed: bool,
}

impl DispatchResult {
    pub fn pass_through() -> Self {
        Self {
            prevent_default: false,
            text_changed: false,
        }
    }
    pub fn handled() -> Self {
        Self {
            prevent_default: true,
            text_changed: false,
        }
    }
    pub fn edited() -> Self {
        Self {
            prevent_default: true,
            text_changed: true,
        }
    }
}

/// Mutable view over everything a shortcut may touch during one event.
pub struct ActionContext<'a, S: ?Sized, L: ?Sized, T: ?Sized> {
    pub state: &'a mut EditorState,
    pub surface: &'a mut S,
    pub log: &'a mut L,
    pub scheduler: &'a mut T,
    /// How long a pending chord stays valid.
    pub chord_window: Duration,
}

/// Full keydown path: log, guard on a missing caret, resolve, run.
pub fn handle_keydown<S, L, T>(
    keymap: &Keymap,
    ev: &KeyEvent,
    ctx: &mut ActionContext<'_, S, L, T>,
) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    ctx.log.append(&format!("keydown: {}", ev.key));

    let Some(cursor) = ctx.surface.cursor_offset() else {
        debug!(target: "actions.dispatch", key = ev.key.as_str(), "no_selection_pass_through");
        return DispatchResult::pass_through();
    };

    match keymap.resolve(ev, ctx.state.chord.is_active()) {
        Some(shortcut) => dispatch(shortcut, cursor, ctx),
        None => DispatchResult::pass_through(),
    }
}

/// Run `shortcut` with the caret at `cursor` (chars).
pub fn dispatch<S, L, T>(
    shortcut: Shortcut,
    cursor: usize,
    ctx: &mut ActionContext<'_, S, L, T>,
) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    let result = match shortcut {
        Shortcut::Indent
        | Shortcut::Outdent
        | Shortcut::EnterIndent
        | Shortcut::ToggleComment => edit::handle_edit(shortcut, cursor, ctx),
        Shortcut::ChordStart => chord::handle_chord_start(ctx),
        Shortcut::ChordComplete => chord::handle_chord_complete(ctx),
        // Persistence belongs to the host; the core only acknowledges the request.
        Shortcut::Save => DispatchResult::handled(),
        Shortcut::Undo => undo::handle_undo(ctx),
        Shortcut::Redo => undo::handle_redo(ctx),
    };
    ctx.log.append(shortcut.log_line());
    debug!(
        target: "actions.dispatch",
        ?shortcut,
        cursor,
        text_changed = result.text_changed,
        history_size = ctx.state.history.undo_depth(),
        "dispatched"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_surface::{MemoryEventLog, MemorySurface};
    use core_timer::VirtualScheduler;

    #[test]
    fn missing_caret_logs_then_passes_through() {
        let mut state = EditorState::new();
        let mut surface = MemorySurface::with_text("abc", None);
        let log = MemoryEventLog::new();
        let mut sink = log.clone();
        let mut sched = VirtualScheduler::new();
        let mut ctx = ActionContext {
            state: &mut state,
            surface: &mut surface,
            log: &mut sink,
            scheduler: &mut sched,
            chord_window: Duration::from_millis(2000),
        };
        let r = handle_keydown(&Keymap::default(), &KeyEvent::new("Tab", false, false), &mut ctx);
        assert_eq!(r, DispatchResult::pass_through());
        assert_eq!(log.lines(), vec!["keydown: Tab"]);
        assert_eq!(surface.text(), "abc");
        assert_eq!(state.history.undo_depth(), 1);
    }
}
