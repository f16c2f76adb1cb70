use super::{ActionContext, DispatchResult};
use core_surface::{EventLogSink, TextSurface};
use core_timer::Scheduler;

/// First key of the chord: (re)start the expiry window. History is untouched.
pub(crate) fn handle_chord_start<S, L, T>(ctx: &mut ActionContext<'_, S, L, T>) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    ctx.state.chord.arm(&mut *ctx.scheduler, ctx.chord_window);
    DispatchResult::handled()
}

/// Second key of the chord. Carries no text effect.
pub(crate) fn handle_chord_complete<S, L, T>(
    ctx: &mut ActionContext<'_, S, L, T>,
) -> DispatchResult
where
    S: TextSurface + ?Sized,
    L: EventLogSink + ?Sized,
    T: Scheduler + ?Sized,
{
    ctx.state.chord.complete(&mut *ctx.scheduler);
    DispatchResult::handled()
}
