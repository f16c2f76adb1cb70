mod common;

use common::Harness;
use core_actions::DispatchResult;
use pretty_assertions::assert_eq;

#[test]
fn tab_indents_cursor_line_and_commits() {
    let mut h = Harness::with_text("a\nb", 2);
    assert_eq!(h.plain("Tab"), DispatchResult::edited());
    assert_eq!(h.text(), "a\n  b");
    assert_eq!(h.state.content(), "a\n  b");
    assert_eq!(h.state.history.undo_depth(), 2);
    assert_eq!(h.log.lines(), vec!["keydown: Tab", "Action: Indent"]);
}

#[test]
fn shift_tab_outdents_two_spaces_only() {
    let mut h = Harness::with_text("    x", 0);
    h.shifted("Tab");
    assert_eq!(h.text(), "  x");
    h.shifted("Tab");
    assert_eq!(h.text(), "x");
    h.shifted("Tab");
    assert_eq!(h.text(), "x", "line without two leading spaces is unchanged");
    assert_eq!(h.state.history.undo_depth(), 4, "unchanged outdent still commits");
    assert_eq!(h.log.last().as_deref(), Some("Action: Outdent"));
}

#[test]
fn single_space_is_not_outdented() {
    let mut h = Harness::with_text(" x", 1);
    h.shifted("Tab");
    assert_eq!(h.text(), " x");
}

#[test]
fn cursor_at_line_end_belongs_to_that_line() {
    let mut h = Harness::with_text("ab\ncd", 2);
    h.plain("Tab");
    assert_eq!(h.text(), "  ab\ncd");
}

#[test]
fn cursor_past_end_targets_last_line() {
    let mut h = Harness::with_text("ab\ncd", 40);
    h.plain("Tab");
    assert_eq!(h.text(), "ab\n  cd");
}

#[test]
fn enter_carries_indent_forward() {
    let mut h = Harness::with_text("  x", 3);
    assert_eq!(h.plain("Enter"), DispatchResult::edited());
    assert_eq!(h.text(), "  x\n  ");
    assert_eq!(h.log.lines(), vec!["keydown: Enter", "Action: Enter Indent"]);
}

#[test]
fn enter_mid_line_splits_and_indents() {
    let mut h = Harness::with_text("\tfoo bar", 4);
    h.plain("Enter");
    assert_eq!(h.text(), "\tfoo\n\t bar");
}

#[test]
fn comment_toggle_round_trips() {
    let mut h = Harness::with_text("foo", 0);
    h.modified("/");
    assert_eq!(h.text(), "// foo");
    h.modified("/");
    assert_eq!(h.text(), "foo");
    assert_eq!(
        h.log.lines(),
        vec![
            "keydown: /",
            "Action: Toggle Comment",
            "keydown: /",
            "Action: Toggle Comment"
        ]
    );
}

#[test]
fn slash_without_modifier_passes_through() {
    let mut h = Harness::with_text("foo", 0);
    assert_eq!(h.plain("/"), DispatchResult::pass_through());
    assert_eq!(h.text(), "foo");
    assert_eq!(h.log.lines(), vec!["keydown: /"]);
}

#[test]
fn multibyte_text_uses_char_offsets() {
    let mut h = Harness::with_text("héllo\nwörld", 7);
    h.plain("Tab");
    assert_eq!(h.text(), "héllo\n  wörld");
}

#[test]
fn unbound_key_only_logs() {
    let mut h = Harness::with_text("abc", 1);
    assert_eq!(h.plain("a"), DispatchResult::pass_through());
    assert_eq!(h.log.lines(), vec!["keydown: a"]);
    assert_eq!(h.surface.replacements(), 0);
}
