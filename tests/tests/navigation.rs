use pretty_assertions::assert_eq;
use tests::{sample_session, table};

#[test]
fn crossing_components_records_a_snapshot() {
    let mut session = sample_session();
    let a = table(session.schema(), "A");
    let d = table(session.schema(), "D");

    assert!(!session.can_navigate_back());

    // A's tree shows {A, B, C}; D's shows {D}. The visible set changes, so
    // the previous focus is retained.
    session.set_root(d);
    assert_eq!(session.root(), d);
    assert!(session.can_navigate_back());
    assert_eq!(session.navigation().len(), 1);

    assert!(session.navigate_back());
    assert_eq!(session.root(), a);
    assert!(!session.can_navigate_back());
}

#[test]
fn refocusing_within_one_component_is_not_recorded() {
    let mut session = sample_session();
    let b = table(session.schema(), "B");

    // A and B span the same tables, so the snapshot coalesces on release
    session.set_root(b);
    assert_eq!(session.root(), b);
    assert!(!session.can_navigate_back());
}

#[test]
fn navigate_back_on_empty_history_is_a_no_op() {
    let mut session = sample_session();
    let a = table(session.schema(), "A");

    assert!(!session.navigate_back());
    assert_eq!(session.root(), a);
}

#[test]
fn restoring_is_not_itself_recorded() {
    let mut session = sample_session();
    let a = table(session.schema(), "A");
    let d = table(session.schema(), "D");

    session.set_root(d);
    session.set_root(a);
    assert_eq!(session.navigation().len(), 2);

    session.navigate_back();
    assert_eq!(session.root(), d);
    assert_eq!(session.navigation().len(), 1);

    session.navigate_back();
    assert_eq!(session.root(), a);
    assert!(session.navigation().is_empty());
}

#[test]
fn nested_capture_scopes_snapshot_once() {
    let mut session = sample_session();
    let a = table(session.schema(), "A");
    let b = table(session.schema(), "B");
    let d = table(session.schema(), "D");

    session.with_layout_capture(|session| {
        session.set_root(b);
        session.set_root(d);
    });

    // one snapshot for the whole outer scope
    assert_eq!(session.root(), d);
    assert_eq!(session.navigation().len(), 1);

    session.navigate_back();
    assert_eq!(session.root(), a);
}

#[test]
fn navigate_back_suppresses_selection_feedback() {
    let mut session = sample_session();
    let d = table(session.schema(), "D");

    session.set_root(d);
    assert!(!session.is_feedback_suppressed());
    session.navigate_back();
    // the suppression window closes with the restore
    assert!(!session.is_feedback_suppressed());
    assert_eq!(session.navigation().capture_level(), 0);
}

#[test]
fn load_model_clears_navigation_history() {
    let mut session = sample_session();
    let d = table(session.schema(), "D");

    session.set_root(d);
    assert!(session.can_navigate_back());

    let subject = session.model().subject;
    session.load_model(subsetter::ExtractionModel::new(subject));
    assert!(!session.can_navigate_back());
}
