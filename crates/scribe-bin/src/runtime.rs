//! Replay runtime: one bounded channel, one consumer loop owning the session.
//!
//! Producers are the script source (spawned through the event source registry) and the
//! tokio timer tasks. The loop applies events in channel order until the script sends
//! `Shutdown`, then joins the producers.

use std::fmt;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Result;
use core_config::ModifierPreference;
use core_events::{
    CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event, EventSourceRegistry, INPUT_TOTAL,
    KEYDOWN_TOTAL, SurfaceEdit,
};
use core_model::{EditorSession, SessionOptions};
use core_state::EditorSnapshot;
use core_surface::{
    FixedPlatform, HostPlatform, MemoryEventLog, MemorySurface, Platform, TracingEventLog,
};
use core_timer::TokioScheduler;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::script::ScriptStep;

// -------------------------------------------------------------------------------------------------
// Script event source
// -------------------------------------------------------------------------------------------------
pub struct ScriptEventSource {
    steps: Vec<ScriptStep>,
}

impl ScriptEventSource {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }
}

impl core_events::AsyncEventSource for ScriptEventSource {
    fn name(&self) -> &'static str {
        "script"
    }

    fn spawn(self: Box<Self>, tx: mpsc::Sender<Event>) -> JoinHandle<()> {
        let ScriptEventSource { steps } = *self;
        tokio::spawn(async move {
            let total = steps.len();
            for (index, step) in steps.into_iter().enumerate() {
                if let ScriptStep::Wait(delay) = step {
                    trace!(target: "runtime.script", index, delay_ms = delay.as_millis() as u64, "wait");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                for event in step.into_events() {
                    if tx.send(event).await.is_err() {
                        CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                        warn!(target: "runtime.script", index, "consumer_gone_stopping_script");
                        return;
                    }
                }
            }
            debug!(target: "runtime.script", steps = total, "script_finished");
            if tx.send(Event::Shutdown).await.is_err() {
                CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            }
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Platform selection
// -------------------------------------------------------------------------------------------------
/// Primary-modifier platform chosen by `[platform] primary_modifier`.
#[derive(Debug, Clone)]
pub enum ConfiguredPlatform {
    Host(HostPlatform),
    Fixed(FixedPlatform),
}

impl ConfiguredPlatform {
    pub fn from_preference(pref: ModifierPreference) -> Self {
        match pref {
            ModifierPreference::Auto => Self::Host(HostPlatform),
            ModifierPreference::Command => Self::Fixed(FixedPlatform::command()),
            ModifierPreference::Control => Self::Fixed(FixedPlatform::control()),
        }
    }
}

impl Platform for ConfiguredPlatform {
    fn is_primary_modifier_platform(&self) -> bool {
        match self {
            Self::Host(p) => p.is_primary_modifier_platform(),
            Self::Fixed(p) => p.is_primary_modifier_platform(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Runtime
// -------------------------------------------------------------------------------------------------
pub type ReplaySession = EditorSession<
    MemorySurface,
    TracingEventLog<MemoryEventLog>,
    ConfiguredPlatform,
    TokioScheduler,
>;

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    ScriptFinished,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ScriptFinished => "script_finished",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final state printed with `--state-json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(flatten)]
    pub state: EditorSnapshot,
    pub highlight_call_count: u64,
}

pub struct ReplayRuntime {
    session: ReplaySession,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
}

impl ReplayRuntime {
    /// Build the session and spawn the script source. Must run inside a tokio runtime.
    pub fn start(
        steps: Vec<ScriptStep>,
        options: SessionOptions,
        platform: ConfiguredPlatform,
        initial: Option<String>,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
        let scheduler = TokioScheduler::current(tx.clone())?;

        let mut surface = MemorySurface::new();
        if let Some(text) = initial {
            surface.set_text(text);
            surface.cursor_to_end();
        }
        let log = TracingEventLog::new(MemoryEventLog::new());
        let session = EditorSession::new(surface, log, platform, scheduler, options);

        let mut registry = EventSourceRegistry::new();
        registry.register(ScriptEventSource::new(steps));
        let source_handles = registry.spawn_all(&tx);

        Ok(Self {
            session,
            rx,
            tx: Some(tx),
            source_handles,
        })
    }

    pub async fn run(&mut self) -> ShutdownReason {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match self.handle_event(event) {
                LoopControl::Continue => {}
                LoopControl::Break { reason: r } => {
                    reason = r;
                    break;
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        reason
    }

    fn handle_event(&mut self, event: Event) -> LoopControl {
        match event {
            Event::Surface(ev) => {
                let prevent_default = self.session.handle_event(ev);
                trace!(target: "runtime.events", prevent_default, "surface_event_handled");
                LoopControl::Continue
            }
            Event::SurfaceEdit(edit) => {
                let surface = self.session.surface_mut();
                match edit {
                    SurfaceEdit::SetText(text) => surface.set_text(text),
                    SurfaceEdit::SetCursor(at) => surface.set_cursor(at),
                }
                LoopControl::Continue
            }
            Event::Timer(fired) => {
                self.session.on_timer(fired);
                LoopControl::Continue
            }
            Event::Shutdown => LoopControl::Break {
                reason: ShutdownReason::ScriptFinished,
            },
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, "shutdown_begin");
        if let Some(tx) = self.tx.take() {
            drop(tx);
        }
        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(target: "runtime.shutdown", %reason, "event_source_task_stopped"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", %reason, "event_source_task_cancelled")
                }
                Ok(Err(err)) => {
                    error!(target: "runtime.shutdown", %reason, ?err, "event_source_task_error")
                }
                Err(_) => warn!(target: "runtime.shutdown", %reason, "event_source_task_timeout"),
            }
        }
        info!(
            target: "runtime.shutdown",
            %reason,
            keydowns = KEYDOWN_TOTAL.load(Ordering::Relaxed),
            inputs = INPUT_TOTAL.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            "shutdown_complete"
        );
    }

    #[cfg(test)]
    pub fn session(&self) -> &ReplaySession {
        &self.session
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.session.log().inner().lines()
    }

    pub fn report(&self) -> Report {
        Report {
            state: self.session.editor_state(),
            highlight_call_count: self.session.highlight_call_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    async fn replay(script: &str, pref: ModifierPreference) -> ReplayRuntime {
        let steps = parse_script(script).unwrap();
        let mut rt = ReplayRuntime::start(
            steps,
            SessionOptions::default(),
            ConfiguredPlatform::from_preference(pref),
            None,
        )
        .unwrap();
        assert_eq!(rt.run().await, ShutdownReason::ScriptFinished);
        rt
    }

    #[tokio::test(start_paused = true)]
    async fn replays_edits_and_highlight() {
        let rt = replay(
            "input a\ninput ab\nwait 50\ninput abc\nwait 300\nkey Tab\n",
            ModifierPreference::Control,
        )
        .await;
        assert_eq!(
            rt.log_lines(),
            vec![
                "input: content updated",
                "input: content updated",
                "input: content updated",
                "keydown: Tab",
                "Action: Indent",
            ]
        );
        let report = rt.report();
        assert_eq!(report.state.content, "  abc");
        assert_eq!(report.state.history_size, 5);
        assert_eq!(report.highlight_call_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn chord_window_uses_real_timers() {
        let rt = replay(
            "key ctrl+k\nwait 500\nkey ctrl+c\nkey ctrl+k\nwait 2500\nkey ctrl+c\n",
            ModifierPreference::Control,
        )
        .await;
        let successes = rt
            .log_lines()
            .iter()
            .filter(|l| *l == "Action: Chord Success")
            .count();
        assert_eq!(successes, 1);
        assert!(!rt.session().is_chord_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn command_preference_maps_meta() {
        let rt = replay("input x\nkey meta+z\nkey ctrl+z\n", ModifierPreference::Command).await;
        assert_eq!(rt.report().state.content, "");
        assert_eq!(
            rt.log_lines(),
            vec![
                "input: content updated",
                "keydown: z",
                "Action: Undo",
                "keydown: z",
            ]
        );
    }

    #[test]
    fn report_json_is_flat_camel_case() {
        let report = Report {
            state: EditorSnapshot {
                content: "a".into(),
                history_size: 2,
            },
            highlight_call_count: 1,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"content":"a","historySize":2,"highlightCallCount":1}"#
        );
    }
}
