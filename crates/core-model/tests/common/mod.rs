#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::time::Duration;

use core_events::RawKeyEvent;
use core_model::{EditorSession, SessionOptions};
use core_surface::{FixedPlatform, MemoryEventLog, MemorySurface};
use core_timer::VirtualScheduler;

pub type Session = EditorSession<MemorySurface, MemoryEventLog, FixedPlatform, VirtualScheduler>;

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Fresh session on a Control-primary platform. Returns the session and a platform handle
/// that can flip the primary modifier mid-session.
pub fn session() -> (Session, FixedPlatform) {
    let platform = FixedPlatform::control();
    let s = EditorSession::new(
        MemorySurface::new(),
        MemoryEventLog::new(),
        platform.clone(),
        VirtualScheduler::new(),
        SessionOptions::default(),
    );
    (s, platform)
}

/// What native typing does: the surface changes, the caret moves to the end, `input` fires.
pub fn type_text(s: &mut Session, text: &str) {
    s.surface_mut().set_text(text);
    s.surface_mut().cursor_to_end();
    s.on_input();
}

pub fn press(s: &mut Session, combo: &str) -> bool {
    let raw = RawKeyEvent::parse(combo).expect("valid key combo in test");
    s.on_keydown(&raw).prevent_default
}
