//! Undo / Redo dispatch.
//!
//! Delegates to the snapshot stacks in `History`. The surface is only rewritten when the
//! step actually moved; at either end of the history the shortcut is still consumed and
//! logged.

use super::{ActionContext, DispatchResult};
use core_surface::{EventLogSink, TextSurface};
use core_timer::Scheduler;

pub(crate) fn handle_undo<S, L, T>(ctx: &mut ActionContext<'_, S, L, T>) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    if ctx.state.history.undo() {
        ctx.surface.replace_text(ctx.state.history.current());
        tracing::trace!(target: "actions.dispatch", op = "undo", depth = ctx.state.history.undo_depth(), "undo");
        DispatchResult::edited()
    } else {
        DispatchResult::handled()
    }
}

pub(crate) fn handle_redo<S, L, T>(ctx: &mut ActionContext<'_, S, L, T>) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    if ctx.state.history.redo() {
        ctx.surface.replace_text(ctx.state.history.current());
        tracing::trace!(target: "actions.dispatch", op = "redo", depth = ctx.state.history.undo_depth(), "redo");
        DispatchResult::edited()
    } else {
        DispatchResult::handled()
    }
}
