use tracing::trace;

/// Linear undo/redo history of full-text snapshots.
///
/// Invariants (hold after every public call):
/// * `undo_stack` is never empty; its first entry is the session's initial text and acts as
///   the floor undo cannot pass.
/// * The last `undo_stack` entry is the current buffer.
/// * `redo_stack` holds undone snapshots, most recently undone last, and is emptied by every
///   [`commit`](History::commit).
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// History seeded with the empty document.
    pub fn new() -> Self {
        Self::with_initial(String::new())
    }

    pub fn with_initial(initial: impl Into<String>) -> Self {
        Self {
            undo_stack: vec![initial.into()],
            redo_stack: Vec::new(),
        }
    }

    /// Current buffer contents.
    pub fn current(&self) -> &str {
        self.undo_stack.last().map(String::as_str).unwrap_or("")
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record `text` as the new current buffer. Always pushes, even when `text` equals the
    /// current snapshot; the redo branch is discarded.
    pub fn commit(&mut self, text: impl Into<String>) {
        self.undo_stack.push(text.into());
        trace!(target: "state.history", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "commit");
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.history", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Step back one snapshot. Returns `false` (and changes nothing) at the floor.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            trace!(target: "state.history", undo_depth = self.undo_stack.len(), "undo_at_floor");
            return false;
        }
        if let Some(current) = self.undo_stack.pop() {
            self.redo_stack.push(current);
        }
        trace!(target: "state.history", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        true
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when nothing was undone.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(next);
                trace!(target: "state.history", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
                true
            }
            None => {
                trace!(target: "state.history", "redo_empty");
                false
            }
        }
    }
}
