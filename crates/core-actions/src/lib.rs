//! Shortcut execution against editor state and its collaborators.
//!
//! `core-keymap` decides *which* shortcut a key event means; this crate decides *what it
//! does*: rewrite the surface text, commit history, arm or finish the chord, step the
//! history, and append the matching event-log line.

pub mod dispatcher;

pub use dispatcher::{ActionContext, DispatchResult, dispatch, handle_keydown};
