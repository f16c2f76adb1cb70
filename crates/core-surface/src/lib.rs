//! Collaborator seams of the editing core: the editable text surface, the event log sink and
//! the platform query.
//!
//! The core reads `current_text` / `cursor_offset`, writes through `replace_text` and
//! `append`, and never renders anything itself. In-memory implementations back the tests and
//! the replay host; [`TracingEventLog`] mirrors log lines into `tracing`.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

pub mod platform;

pub use platform::{FixedPlatform, HostPlatform, Platform};

/// The editable region.
pub trait TextSurface {
    fn current_text(&self) -> String;
    /// Caret position in chars, or `None` when the region has no selection range.
    fn cursor_offset(&self) -> Option<usize>;
    /// Display exactly `text`. Where the caret lands afterwards is up to the surface.
    fn replace_text(&mut self, text: &str);
}

/// Append-only, ordered log of human-readable action lines.
pub trait EventLogSink {
    fn append(&mut self, line: &str);
}

impl<T: TextSurface + ?Sized> TextSurface for &mut T {
    fn current_text(&self) -> String {
        (**self).current_text()
    }
    fn cursor_offset(&self) -> Option<usize> {
        (**self).cursor_offset()
    }
    fn replace_text(&mut self, text: &str) {
        (**self).replace_text(text)
    }
}

impl<T: EventLogSink + ?Sized> EventLogSink for &mut T {
    fn append(&mut self, line: &str) {
        (**self).append(line)
    }
}

/// Surface kept entirely in memory. The caret stays where it was, clamped to the new text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    text: String,
    cursor: Option<usize>,
    replacements: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: Some(0),
            replacements: 0,
        }
    }

    pub fn with_text(text: impl Into<String>, cursor: Option<usize>) -> Self {
        Self {
            text: text.into(),
            cursor,
            replacements: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Simulate native editing (typing/paste) changing the region's content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.clamp_cursor();
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
    }

    /// Caret at the end of the text.
    pub fn cursor_to_end(&mut self) {
        self.cursor = Some(self.text.chars().count());
    }

    /// Number of `replace_text` calls received.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    fn clamp_cursor(&mut self) {
        let len = self.text.chars().count();
        if let Some(c) = self.cursor.as_mut() {
            *c = (*c).min(len);
        }
    }
}

impl TextSurface for MemorySurface {
    fn current_text(&self) -> String {
        self.text.clone()
    }

    fn cursor_offset(&self) -> Option<usize> {
        self.cursor
    }

    fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.replacements += 1;
        self.clamp_cursor();
    }
}

/// Log lines collected in a shared vector; clones observe the same lines, so a test can keep
/// one clone while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.borrow().iter().any(|l| l == line)
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl EventLogSink for MemoryEventLog {
    fn append(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// Mirrors every line to `tracing` (INFO, target `surface.log`) before forwarding it to an
/// inner sink.
#[derive(Debug, Clone, Default)]
pub struct TracingEventLog<L> {
    inner: L,
}

impl<L: EventLogSink> TracingEventLog<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: EventLogSink> EventLogSink for TracingEventLog<L> {
    fn append(&mut self, line: &str) {
        info!(target: "surface.log", line, "event_log_append");
        self.inner.append(line);
    }
}
