//! Text-rewriting shortcuts. Each one reads the surface text, rewrites it, pushes the result
//! to the surface and commits it, even when the rewrite left the text unchanged.

use super::{ActionContext, DispatchResult};
use core_keymap::Shortcut;
use core_surface::{EventLogSink, TextSurface};
use core_text::{indent_line_at, newline_with_indent, outdent_line_at, toggle_comment_at};
use core_timer::Scheduler;

/// Pure rewrite for an editing shortcut; `None` for shortcuts that do not edit text.
pub(crate) fn rewrite(shortcut: Shortcut, text: &str, cursor: usize) -> Option<String> {
    let next = match shortcut {
        Shortcut::Indent => indent_line_at(text, cursor),
        Shortcut::Outdent => outdent_line_at(text, cursor),
        Shortcut::EnterIndent => newline_with_indent(text, cursor),
        Shortcut::ToggleComment => toggle_comment_at(text, cursor),
        _ => return None,
    };
    Some(next)
}

pub(crate) fn handle_edit<S, L, T>(
    shortcut: Shortcut,
    cursor: usize,
    ctx: &mut ActionContext<'_, S, L, T>,
) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    let text = ctx.surface.current_text();
    let Some(next) = rewrite(shortcut, &text, cursor) else {
        return DispatchResult::pass_through();
    };
    tracing::trace!(target: "actions.dispatch", ?shortcut, changed = (next != text), "edit");
    ctx.surface.replace_text(&next);
    ctx.state.history.commit(next);
    DispatchResult::edited()
}
