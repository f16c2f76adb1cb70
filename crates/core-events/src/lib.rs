//! Core event types and channel helpers for Scribe.
//!
//! Two families of events live here:
//! * Surface events raised by the editable region (raw input, keydown,
//!   composition) in the neutral shape the editing core consumes.
//! * Runtime events flowing through the host's single bounded channel
//!   (surface events, host-side surface edits, timer firings, shutdown).
//!
//! Timer identity types are defined here rather than in `core-timer` so that
//! `Event::Timer` can carry them without a dependency cycle.

use std::fmt;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The host loop uses one bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers (script
// source, timer tasks) await `send`, so a slow consumer applies backpressure instead of dropping
// events. Delivery order on the channel is the processing order of the session.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Relaxed atomic counters; inspected by tests and logged at shutdown.
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYDOWN_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static INPUT_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the host event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Surface(SurfaceEvent),
    /// Host-side change to the simulated surface (what the user's typing did to
    /// the region before the browser reports `input`).
    SurfaceEdit(SurfaceEdit),
    Timer(TimerFired),
    Shutdown,
}

/// Raw events raised by the editable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Content changed by native editing; the core re-reads the surface text.
    Input,
    KeyDown(RawKeyEvent),
    CompositionStart,
    CompositionUpdate,
    CompositionEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEdit {
    SetText(String),
    SetCursor(Option<usize>),
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors hold their configuration and spawn
/// one background task that pushes `Event`s into the shared channel. They must stop when
/// `tx.send(..).await` returns Err (consumer dropped).
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// `Sender` clone; the registry is drained so a second call spawns nothing.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

// -------------------------------------------------------------------------------------------------
// Timers
// -------------------------------------------------------------------------------------------------

/// Which one-shot timer a handle belongs to. Each kind has at most one live timer per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    ChordExpiry,
    Highlight,
}

/// Opaque handle returned by a scheduler; unique for the scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Delivered back to the session when a scheduled timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
}

// -------------------------------------------------------------------------------------------------
// Keys
// -------------------------------------------------------------------------------------------------

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

/// Keydown as reported by the host: the raw key name (`"Tab"`, `"Enter"`, `"k"`, `"Z"`, ...)
/// plus every modifier held.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawKeyEvent {
    pub key: String,
    pub mods: KeyModifiers,
}

/// Neutral keydown consumed by the shortcut layer. `modifier_held` is the platform's primary
/// modifier (Command on Mac-like platforms, Control elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: String,
    pub shift_held: bool,
    pub modifier_held: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, shift_held: bool, modifier_held: bool) -> Self {
        Self {
            key: key.into(),
            shift_held,
            modifier_held,
        }
    }

    /// Resolve the primary modifier from a raw event. `command_is_primary` is the platform
    /// answer for this keydown.
    pub fn from_raw(raw: &RawKeyEvent, command_is_primary: bool) -> Self {
        let primary = if command_is_primary {
            KeyModifiers::META
        } else {
            KeyModifiers::CTRL
        };
        Self {
            key: raw.key.clone(),
            shift_held: raw.mods.contains(KeyModifiers::SHIFT),
            modifier_held: raw.mods.contains(primary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKeyError {
    #[error("empty key combination")]
    Empty,
    #[error("key combination `{0}` names no key")]
    MissingKey(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
}

impl RawKeyEvent {
    pub fn new(key: impl Into<String>, mods: KeyModifiers) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, KeyModifiers::empty())
    }

    /// Parse a combination such as `ctrl+shift+z`, `meta+/`, `shift+Tab` or `ctrl++`.
    ///
    /// Named keys are normalized to their host spelling (`tab` -> `Tab`, `return` -> `Enter`).
    /// A single ASCII letter held with shift is reported upper-case, as hosts do.
    pub fn parse(combo: &str) -> Result<Self, ParseKeyError> {
        let combo = combo.trim();
        if combo.is_empty() {
            return Err(ParseKeyError::Empty);
        }
        let (prefix, key) = if combo == "+" {
            ("", "+")
        } else if let Some(stripped) = combo.strip_suffix("++") {
            (stripped, "+")
        } else {
            combo.rsplit_once('+').unwrap_or(("", combo))
        };
        if key.is_empty() {
            return Err(ParseKeyError::MissingKey(combo.to_string()));
        }

        let mut mods = KeyModifiers::empty();
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            mods |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CTRL,
                "alt" | "option" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                "meta" | "cmd" | "command" | "super" => KeyModifiers::META,
                other => return Err(ParseKeyError::UnknownModifier(other.to_string())),
            };
        }

        let mut key = normalize_key_name(key);
        if mods.contains(KeyModifiers::SHIFT) && key.len() == 1 {
            key = key.to_ascii_uppercase();
        }
        Ok(Self { key, mods })
    }
}

/// Map common spellings of named keys onto the names hosts report.
pub fn normalize_key_name(name: &str) -> String {
    match name.to_ascii_lowercase().as_str() {
        "tab" => "Tab".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "esc" | "escape" => "Escape".to_string(),
        "backspace" => "Backspace".to_string(),
        "delete" | "del" => "Delete".to_string(),
        "space" => " ".to_string(),
        _ => name.to_string(),
    }
}

impl fmt::Display for RawKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, label) in [
            (KeyModifiers::CTRL, "ctrl+"),
            (KeyModifiers::ALT, "alt+"),
            (KeyModifiers::SHIFT, "shift+"),
            (KeyModifiers::META, "meta+"),
        ] {
            if self.mods.contains(flag) {
                f.write_str(label)?;
            }
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_named_key() {
        let ev = RawKeyEvent::parse("tab").unwrap();
        assert_eq!(ev.key, "Tab");
        assert!(ev.mods.is_empty());
    }

    #[test]
    fn parse_modifiers_and_shift_uppercases_letter() {
        let ev = RawKeyEvent::parse("ctrl+shift+z").unwrap();
        assert_eq!(ev.key, "Z");
        assert_eq!(ev.mods, KeyModifiers::CTRL | KeyModifiers::SHIFT);
    }

    #[test]
    fn parse_plus_key() {
        let ev = RawKeyEvent::parse("ctrl++").unwrap();
        assert_eq!(ev.key, "+");
        assert_eq!(ev.mods, KeyModifiers::CTRL);
        assert_eq!(RawKeyEvent::parse("+").unwrap().key, "+");
    }

    #[test]
    fn parse_rejects_unknown_modifier() {
        assert_eq!(
            RawKeyEvent::parse("hyper+k"),
            Err(ParseKeyError::UnknownModifier("hyper".into()))
        );
        assert_eq!(RawKeyEvent::parse("  "), Err(ParseKeyError::Empty));
    }

    #[test]
    fn from_raw_picks_platform_primary() {
        let raw = RawKeyEvent::parse("meta+k").unwrap();
        assert!(KeyEvent::from_raw(&raw, true).modifier_held);
        assert!(!KeyEvent::from_raw(&raw, false).modifier_held);

        let raw = RawKeyEvent::parse("ctrl+k").unwrap();
        assert!(!KeyEvent::from_raw(&raw, true).modifier_held);
        assert!(KeyEvent::from_raw(&raw, false).modifier_held);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let raw = RawKeyEvent::parse("ctrl+shift+z").unwrap();
        assert_eq!(raw.to_string(), "ctrl+shift+Z");
        assert_eq!(RawKeyEvent::parse(&raw.to_string()).unwrap(), raw);
    }
}
