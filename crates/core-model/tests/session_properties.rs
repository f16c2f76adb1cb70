//! Property checks on a whole session: history size and redo discipline under arbitrary
//! mixes of typing and shortcuts.

mod common;

use common::{press, session, type_text};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Type(String),
    Tab,
    Undo,
    Redo,
    Save,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-z ]{0,5}".prop_map(Step::Type),
        Just(Step::Tab),
        Just(Step::Undo),
        Just(Step::Redo),
        Just(Step::Save),
    ]
}

proptest! {
    #[test]
    fn history_size_matches_model(steps in proptest::collection::vec(step(), 0..40)) {
        let (mut s, _) = session();
        let mut undo = 1usize;
        let mut redo = 0usize;
        for st in steps {
            match st {
                Step::Type(t) => {
                    type_text(&mut s, &t);
                    undo += 1;
                    redo = 0;
                }
                Step::Tab => {
                    press(&mut s, "Tab");
                    undo += 1;
                    redo = 0;
                }
                Step::Undo => {
                    press(&mut s, "ctrl+z");
                    if undo > 1 {
                        undo -= 1;
                        redo += 1;
                    }
                }
                Step::Redo => {
                    press(&mut s, "ctrl+shift+z");
                    if redo > 0 {
                        redo -= 1;
                        undo += 1;
                    }
                }
                Step::Save => {
                    press(&mut s, "ctrl+s");
                }
            }
            let snap = s.editor_state();
            prop_assert_eq!(snap.history_size, undo);
            prop_assert_eq!(s.state().history.redo_depth(), redo);
            prop_assert_eq!(s.surface().text(), snap.content.as_str());
        }
    }
}
