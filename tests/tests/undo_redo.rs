use subsetter::restriction::IGNORE;

use pretty_assertions::assert_eq;
use tests::{assoc, sample_session};

#[test]
fn undo_redo_round_trip_restores_the_overlay_exactly() {
    let mut session = sample_session();
    let ab = assoc(session.schema(), "ab");
    let bc = assoc(session.schema(), "bc");
    let ac = assoc(session.schema(), "ac");

    let initial = session.model().restrictions.clone();

    session.set_restriction(ab, "B.x = 1").unwrap();
    session.set_restriction(bc, IGNORE).unwrap();
    session.set_restriction(ab, "B.x = 2").unwrap();
    session.remove_restriction(bc);
    session.set_restriction(ac, "B.x = 3").unwrap();
    let edited = session.model().restrictions.clone();

    for _ in 0..5 {
        session.undo();
    }
    assert_eq!(session.model().restrictions, initial);
    assert!(!session.undo_manager().can_undo());

    for _ in 0..5 {
        session.redo();
    }
    assert_eq!(session.model().restrictions, edited);
    assert!(!session.undo_manager().can_redo());
}

#[test]
fn repeated_edits_of_one_edge_unwind_step_by_step() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");

    session.set_restriction(bc, "B.x = 1").unwrap();
    session.set_restriction(bc, "B.x = 2").unwrap();
    session.set_restriction(bc, IGNORE).unwrap();

    session.undo();
    assert_eq!(session.model().restrictions.condition(bc), Some("B.x = 2"));
    session.undo();
    assert_eq!(session.model().restrictions.condition(bc), Some("B.x = 1"));
    session.undo();
    assert_eq!(session.model().restrictions.condition(bc), None);
}

#[test]
fn a_new_mutation_clears_the_redo_stack() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");
    let ac = assoc(session.schema(), "ac");

    session.set_restriction(bc, IGNORE).unwrap();
    session.undo();
    assert!(session.undo_manager().can_redo());

    session.set_restriction(ac, "B.x = 1").unwrap();
    assert!(!session.undo_manager().can_redo());
}

#[test]
fn undo_and_redo_on_empty_stacks_are_no_ops() {
    let mut session = sample_session();
    let before = session.model().restrictions.clone();

    session.undo();
    session.redo();

    assert_eq!(session.model().restrictions, before);
    assert!(!session.undo_manager().can_undo());
    assert!(!session.undo_manager().can_redo());
}

#[test]
fn descriptions_track_the_pending_step() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");

    assert_eq!(session.undo_manager().undo_description(), None);

    session.set_restriction(bc, "B.x = 1").unwrap();
    assert_eq!(
        session.undo_manager().undo_description(),
        Some("added restriction")
    );

    session.set_restriction(bc, IGNORE).unwrap();
    assert_eq!(
        session.undo_manager().undo_description(),
        Some("disabled association")
    );

    session.undo();
    assert_eq!(
        session.undo_manager().undo_description(),
        Some("added restriction")
    );
    // the redo entry describes re-disabling the edge
    assert_eq!(
        session.undo_manager().redo_description(),
        Some("disabled association")
    );
}

#[test]
fn actions_carry_the_affected_table_label() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");

    session.set_restriction(bc, IGNORE).unwrap();

    // bc points at C; the label names the destination
    assert_eq!(session.undo_manager().undo_subject(), Some("C"));

    session.undo();
    assert!(!session.model().restrictions.is_overridden(bc));
}

#[test]
fn load_model_drops_all_history() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");

    session.set_restriction(bc, IGNORE).unwrap();
    session.undo();
    assert!(session.undo_manager().can_redo());

    let subject = session.model().subject;
    session.load_model(subsetter::ExtractionModel::new(subject));

    assert!(!session.undo_manager().can_undo());
    assert!(!session.undo_manager().can_redo());
    assert!(session.model().restrictions.is_empty());
}
