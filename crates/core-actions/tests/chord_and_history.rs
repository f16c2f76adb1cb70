mod common;

use common::Harness;
use core_actions::DispatchResult;
use pretty_assertions::assert_eq;

#[test]
fn chord_completes_inside_window() {
    let mut h = Harness::new();
    assert_eq!(h.modified("k"), DispatchResult::handled());
    assert!(h.state.chord.is_active());
    h.advance_to(1500);
    assert_eq!(h.modified("c"), DispatchResult::handled());
    assert!(!h.state.chord.is_active());
    assert_eq!(h.scheduler.pending_count(), 0);
    assert_eq!(
        h.log.lines(),
        vec![
            "keydown: k",
            "Chord Step 1: Ctrl+K",
            "keydown: c",
            "Action: Chord Success"
        ]
    );
    assert_eq!(h.state.history.undo_depth(), 1, "chord never touches history");
}

#[test]
fn chord_expires_after_window() {
    let mut h = Harness::new();
    h.modified("k");
    h.advance_to(2000);
    assert!(!h.state.chord.is_active());
    assert_eq!(h.modified("c"), DispatchResult::pass_through());
    assert!(!h.log.contains("Action: Chord Success"));
}

#[test]
fn second_k_restarts_window() {
    let mut h = Harness::new();
    h.modified("k");
    h.advance_to(1500);
    h.modified("K");
    h.advance_to(3000);
    assert_eq!(h.modified("c"), DispatchResult::handled());
    assert!(h.log.contains("Action: Chord Success"));
}

#[test]
fn save_is_consumed_without_side_effects() {
    let mut h = Harness::with_text("abc", 3);
    assert_eq!(h.modified("s"), DispatchResult::handled());
    assert_eq!(h.text(), "abc");
    assert_eq!(h.state.history.undo_depth(), 1);
    assert_eq!(h.log.lines(), vec!["keydown: s", "Action: Save"]);
}

#[test]
fn undo_and_redo_step_the_surface() {
    let mut h = Harness::new();
    h.type_text("a");
    h.type_text("ab");
    assert_eq!(h.modified("z"), DispatchResult::edited());
    assert_eq!(h.text(), "a");
    assert_eq!(h.state.history.undo_depth(), 2);
    assert_eq!(h.key("Z", true, true), DispatchResult::edited());
    assert_eq!(h.text(), "ab");
    assert_eq!(h.state.history.undo_depth(), 3);
    assert_eq!(h.log.lines(), vec!["keydown: z", "Action: Undo", "keydown: Z", "Action: Redo"]);
}

#[test]
fn undo_at_floor_still_logs() {
    let mut h = Harness::new();
    assert_eq!(h.modified("z"), DispatchResult::handled());
    assert_eq!(h.key("z", true, true), DispatchResult::handled());
    assert_eq!(h.state.history.undo_depth(), 1);
    assert_eq!(h.surface.replacements(), 0);
    assert_eq!(
        h.log.lines(),
        vec!["keydown: z", "Action: Undo", "keydown: z", "Action: Redo"]
    );
}

#[test]
fn edit_after_undo_discards_redo() {
    let mut h = Harness::new();
    h.type_text("a");
    h.type_text("ab");
    h.modified("z");
    h.type_text("ax");
    assert_eq!(h.key("Z", true, true), DispatchResult::handled());
    assert_eq!(h.text(), "ax");
    assert_eq!(h.state.history.redo_depth(), 0);
}

#[test]
fn tab_after_undo_discards_redo() {
    let mut h = Harness::new();
    h.type_text("x");
    h.modified("z");
    h.surface.set_cursor(Some(0));
    h.plain("Tab");
    assert_eq!(h.text(), "  ");
    assert!(!h.state.history.can_redo());
    h.modified("z");
    assert_eq!(h.text(), "");
}
