use tracing::trace;

/// Inserted by indent, removed by outdent.
pub const INDENT_UNIT: &str = "  ";
/// Line comment marker toggled by the comment shortcut (note the trailing space).
pub const COMMENT_PREFIX: &str = "// ";

/// Index of the line containing `cursor`.
///
/// Walks lines accumulating `len + 1` per line (the `+ 1` is the `\n` separator); the first
/// line whose end satisfies `cursor <= consumed + len` wins, so a cursor sitting right after
/// a line's last character belongs to that line, not the next one. A cursor past the end of
/// the text selects the last line.
pub fn locate_line(text: &str, cursor: usize) -> usize {
    let mut consumed = 0usize;
    let mut last = 0usize;
    for (i, line) in text.split('\n').enumerate() {
        let len = line.chars().count();
        if cursor <= consumed + len {
            return i;
        }
        consumed += len + 1;
        last = i;
    }
    trace!(target: "text.lines", cursor, consumed, line = last, "cursor_past_end_fallback");
    last
}

/// Byte index of char offset `offset`, clamped to the end of `text`.
pub fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Whitespace as editable-text hosts define it: Unicode `White_Space` plus the BOM
/// (U+FEFF), minus NEL (U+0085).
pub fn is_indent_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        c => c.is_whitespace(),
    }
}

/// Leading whitespace run of `line` (empty when the line starts with a visible char).
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| !is_indent_whitespace(*c))
        .map(|(b, _)| b)
        .unwrap_or(line.len());
    &line[..end]
}

fn rewrite_line_at<F>(text: &str, cursor: usize, f: F) -> String
where
    F: FnOnce(&str) -> String,
{
    let target = locate_line(text, cursor);
    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    if let Some(line) = lines.get_mut(target) {
        *line = f(line);
    }
    lines.join("\n")
}

/// Prepend [`INDENT_UNIT`] to the cursor's line.
pub fn indent_line_at(text: &str, cursor: usize) -> String {
    rewrite_line_at(text, cursor, |line| format!("{INDENT_UNIT}{line}"))
}

/// Remove exactly one leading [`INDENT_UNIT`] from the cursor's line; lines without it
/// (including a single leading space or a tab) are left as they are.
pub fn outdent_line_at(text: &str, cursor: usize) -> String {
    rewrite_line_at(text, cursor, |line| {
        line.strip_prefix(INDENT_UNIT).unwrap_or(line).to_string()
    })
}

/// Strip [`COMMENT_PREFIX`] from the cursor's line when present, otherwise prepend it.
pub fn toggle_comment_at(text: &str, cursor: usize) -> String {
    rewrite_line_at(text, cursor, |line| match line.strip_prefix(COMMENT_PREFIX) {
        Some(rest) => rest.to_string(),
        None => format!("{COMMENT_PREFIX}{line}"),
    })
}

/// Split at `cursor`, inserting `\n` followed by the leading whitespace of the text between
/// the previous newline and the cursor.
pub fn newline_with_indent(text: &str, cursor: usize) -> String {
    let split = byte_index(text, cursor);
    let (before, after) = text.split_at(split);
    let current = before.rsplit('\n').next().unwrap_or("");
    let indent = leading_whitespace(current);
    let mut out = String::with_capacity(text.len() + 1 + indent.len());
    out.push_str(before);
    out.push('\n');
    out.push_str(indent);
    out.push_str(after);
    out
}
