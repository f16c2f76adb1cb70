//! core-keymap: ordered shortcut table.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the key event and the chord flag.
//! - Bindings are tried in declaration order and the first match wins, so overlapping
//!   patterns (e.g. `Tab` with or without shift) are disambiguated by order alone.
//! - No side effects: logging only at TRACE for the matched binding.

use core_events::KeyEvent;
use smallvec::SmallVec;
use tracing::trace;

// -------------------------------------------------------------------------------------------------
// Symbolic output
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Indent,
    Outdent,
    EnterIndent,
    ToggleComment,
    /// First half of the two-key chord.
    ChordStart,
    /// Second half, only reachable while a chord is pending.
    ChordComplete,
    Save,
    Undo,
    Redo,
}

impl Shortcut {
    /// Line written to the event log when the shortcut runs.
    pub fn log_line(self) -> &'static str {
        match self {
            Shortcut::Indent => "Action: Indent",
            Shortcut::Outdent => "Action: Outdent",
            Shortcut::EnterIndent => "Action: Enter Indent",
            Shortcut::ToggleComment => "Action: Toggle Comment",
            Shortcut::ChordStart => "Chord Step 1: Ctrl+K",
            Shortcut::ChordComplete => "Action: Chord Success",
            Shortcut::Save => "Action: Save",
            Shortcut::Undo => "Action: Undo",
            Shortcut::Redo => "Action: Redo",
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Patterns
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch {
    /// Key name must match exactly (`Tab`, `Enter`, `/`).
    Exact(String),
    /// ASCII case-insensitive (`k` matches `K` reported while shift is held).
    IgnoreCase(String),
}

impl KeyMatch {
    fn matches(&self, key: &str) -> bool {
        match self {
            KeyMatch::Exact(k) => k == key,
            KeyMatch::IgnoreCase(k) => k.eq_ignore_ascii_case(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierRule {
    /// Primary modifier may or may not be held.
    Ignored,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftRule {
    Any,
    Held,
    Released,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    pub key: KeyMatch,
    pub modifier: ModifierRule,
    pub shift: ShiftRule,
    /// Only matches while the first half of a chord is pending.
    pub requires_chord: bool,
}

impl KeyPattern {
    pub fn new(key: KeyMatch, modifier: ModifierRule, shift: ShiftRule) -> Self {
        Self {
            key,
            modifier,
            shift,
            requires_chord: false,
        }
    }

    pub fn in_chord(mut self) -> Self {
        self.requires_chord = true;
        self
    }

    pub fn matches(&self, ev: &KeyEvent, chord_active: bool) -> bool {
        if self.requires_chord && !chord_active {
            return false;
        }
        if self.modifier == ModifierRule::Required && !ev.modifier_held {
            return false;
        }
        let shift_ok = match self.shift {
            ShiftRule::Any => true,
            ShiftRule::Held => ev.shift_held,
            ShiftRule::Released => !ev.shift_held,
        };
        shift_ok && self.key.matches(&ev.key)
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub pattern: KeyPattern,
    pub shortcut: Shortcut,
}

// -------------------------------------------------------------------------------------------------
// Keymap
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: SmallVec<[Binding; 10]>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(baseline_bindings())
    }
}

impl Keymap {
    pub fn new(bindings: impl IntoIterator<Item = Binding>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// First binding matching `ev`, or `None` for a pass-through key.
    pub fn resolve(&self, ev: &KeyEvent, chord_active: bool) -> Option<Shortcut> {
        let hit = self
            .bindings
            .iter()
            .enumerate()
            .find(|(_, b)| b.pattern.matches(ev, chord_active));
        match hit {
            Some((index, binding)) => {
                trace!(target: "keymap.resolve", key = ev.key.as_str(), index, shortcut = ?binding.shortcut, "matched");
                Some(binding.shortcut)
            }
            None => {
                trace!(target: "keymap.resolve", key = ev.key.as_str(), modifier = ev.modifier_held, shift = ev.shift_held, chord_active, "pass_through");
                None
            }
        }
    }
}

/// The editor's shortcuts in priority order.
pub fn baseline_bindings() -> Vec<Binding> {
    use KeyMatch::{Exact, IgnoreCase};
    use ModifierRule::{Ignored, Required};
    use ShiftRule::{Any, Held, Released};

    let bind = |pattern: KeyPattern, shortcut: Shortcut| Binding { pattern, shortcut };
    vec![
        bind(
            KeyPattern::new(Exact("Tab".into()), Ignored, Released),
            Shortcut::Indent,
        ),
        bind(
            KeyPattern::new(Exact("Tab".into()), Ignored, Held),
            Shortcut::Outdent,
        ),
        bind(
            KeyPattern::new(Exact("Enter".into()), Ignored, Any),
            Shortcut::EnterIndent,
        ),
        bind(
            KeyPattern::new(Exact("/".into()), Required, Any),
            Shortcut::ToggleComment,
        ),
        bind(
            KeyPattern::new(IgnoreCase("k".into()), Required, Any),
            Shortcut::ChordStart,
        ),
        bind(
            KeyPattern::new(IgnoreCase("c".into()), Required, Any).in_chord(),
            Shortcut::ChordComplete,
        ),
        bind(
            KeyPattern::new(IgnoreCase("s".into()), Required, Any),
            Shortcut::Save,
        ),
        bind(
            KeyPattern::new(IgnoreCase("z".into()), Required, Released),
            Shortcut::Undo,
        ),
        bind(
            KeyPattern::new(IgnoreCase("z".into()), Required, Held),
            Shortcut::Redo,
        ),
    ]
}
