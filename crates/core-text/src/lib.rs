//! Line-oriented text transforms over a flat `String` buffer.
//!
//! The editing core keeps no line model: every transform splits the full text on
//! `\n`, rewrites one line (or splices at the cursor) and joins again. Cursor offsets
//! count Unicode scalar values, never bytes, so multi-byte text cannot split a
//! code point.

pub mod lines;

pub use lines::{
    COMMENT_PREFIX, INDENT_UNIT, byte_index, indent_line_at, is_indent_whitespace,
    leading_whitespace, locate_line, newline_with_indent, outdent_line_at, toggle_comment_at,
};
