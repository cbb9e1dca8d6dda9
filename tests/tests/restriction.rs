use subsetter::restriction::IGNORE;
use subsetter::schema::{AssociationDef, Kind, Schema};
use subsetter::{ExtractionModel, Session};

use pretty_assertions::assert_eq;
use tests::{assoc, sample_session, table};

#[test]
fn conditions_are_normalized() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");

    session.set_restriction(bc, "  B.active = 1  ").unwrap();
    assert_eq!(
        session.model().restrictions.condition(bc),
        Some("B.active = 1")
    );

    // the legacy disable spelling collapses to the sentinel
    session.set_restriction(bc, "false").unwrap();
    assert!(session.model().restrictions.is_ignored(bc));
    assert_eq!(session.model().restrictions.condition(bc), Some(IGNORE));
}

#[test]
fn no_op_mutation_changes_nothing() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");
    let v0 = session.schema().version();

    // the edge is unrestricted; setting the empty condition is a no-op
    session.set_restriction(bc, "").unwrap();
    assert!(!session.model().is_dirty());
    assert!(!session.undo_manager().can_undo());
    assert_eq!(session.schema().version(), v0);

    // same for re-setting the current condition
    session.set_restriction(bc, "B.active = 1").unwrap();
    let dirty_after_first = session.model().is_dirty();
    let depth = session.undo_manager().undo_depth();
    let v1 = session.schema().version();

    session.set_restriction(bc, "B.active = 1").unwrap();
    assert_eq!(session.model().is_dirty(), dirty_after_first);
    assert_eq!(session.undo_manager().undo_depth(), depth);
    assert_eq!(session.schema().version(), v1);
}

#[test]
fn ambiguous_unnamed_edges_are_rejected() {
    let mut builder = Schema::builder();
    builder
        .table("ORDER")
        .table("ADDRESS")
        .association(AssociationDef::new("ORDER", "ADDRESS", Kind::Plain))
        .association(AssociationDef::new("ORDER", "ADDRESS", Kind::Plain));
    let schema = builder.build().unwrap();

    let ambiguous = schema.associations().next().unwrap().id;
    let subject = table(&schema, "ORDER");
    let mut session = Session::new(schema, ExtractionModel::new(subject));

    let err = session.set_restriction(ambiguous, IGNORE).unwrap_err();
    assert!(err.is_ambiguous_association());

    // advisory: the session state is untouched
    assert!(!session.model().is_dirty());
    assert!(!session.undo_manager().can_undo());
    assert!(!session.model().restrictions.is_overridden(ambiguous));

    // clearing is always permitted; here it is a no-op
    session.set_restriction(ambiguous, "").unwrap();
}

#[test]
fn version_bumps_only_when_reachability_could_change() {
    let mut session = sample_session();
    let bc = assoc(session.schema(), "bc");
    let v0 = session.schema().version();

    session.set_restriction(bc, "B.active = 1").unwrap();
    assert_eq!(session.schema().version(), v0);

    session.set_restriction(bc, "B.active = 2").unwrap();
    assert_eq!(session.schema().version(), v0);

    session.set_restriction(bc, IGNORE).unwrap();
    let v1 = session.schema().version();
    assert!(v1 > v0);

    session.set_restriction(bc, "B.active = 1").unwrap();
    assert!(session.schema().version() > v1);
}

#[test]
fn bulk_removal_produces_one_undo_entry_per_edge() {
    let mut session = sample_session();
    let schema = session.schema();
    let named: Vec<_> = ["ab", "bc", "ac"].iter().map(|n| assoc(schema, n)).collect();

    // restrict the three named edges and two reversals
    session.set_restriction(named[0], "B.x = 1").unwrap();
    session.set_restriction(named[1], "B.x = 2").unwrap();
    session.set_restriction(named[2], IGNORE).unwrap();
    let rev0 = session.schema().association(named[0]).reversal;
    let rev1 = session.schema().association(named[1]).reversal;
    session.set_restriction(rev0, "B.y = 1").unwrap();
    session.set_restriction(rev1, IGNORE).unwrap();

    let before = session.model().restrictions.clone();
    assert_eq!(before.len(), 5);
    let depth = session.undo_manager().undo_depth();

    session.remove_all_restrictions(None);
    assert!(session.model().restrictions.is_empty());
    assert_eq!(session.undo_manager().undo_depth(), depth + 5);

    for _ in 0..5 {
        session.undo();
    }
    assert_eq!(session.model().restrictions, before);
}

#[test]
fn bulk_removal_can_be_scoped_to_a_context_table() {
    let mut session = sample_session();
    let ab = assoc(session.schema(), "ab");
    let bc = assoc(session.schema(), "bc");
    let ac = assoc(session.schema(), "ac");
    let c = table(session.schema(), "C");

    session.set_restriction(ab, "B.x = 1").unwrap();
    session.set_restriction(bc, "B.x = 2").unwrap();
    session.set_restriction(ac, "B.x = 3").unwrap();

    session.remove_all_restrictions(Some(c));

    // only the edges touching C were cleared
    assert!(session.model().restrictions.is_overridden(ab));
    assert!(!session.model().restrictions.is_overridden(bc));
    assert!(!session.model().restrictions.is_overridden(ac));
}

#[test]
fn ignore_all_skips_parent_dependencies_and_unnamed_edges() {
    let mut session = sample_session();
    let ab = assoc(session.schema(), "ab");
    let bc = assoc(session.schema(), "bc");
    let ac = assoc(session.schema(), "ac");

    assert!(session.can_ignore_all(None));
    session.ignore_all(None);

    // ab is a parent dependency: untouched
    assert!(!session.model().restrictions.is_overridden(ab));
    // bc and ac are named non-dependencies: disabled
    assert!(session.model().restrictions.is_ignored(bc));
    assert!(session.model().restrictions.is_ignored(ac));
    // reversals are unnamed: untouched
    let rev = session.schema().association(bc).reversal;
    assert!(!session.model().restrictions.is_overridden(rev));

    assert!(!session.can_ignore_all(None));
}

#[test]
fn applicability_checks_respect_context() {
    let mut session = sample_session();
    let ab = assoc(session.schema(), "ab");
    let d = table(session.schema(), "D");

    assert!(!session.can_remove_all_restrictions(None));
    // ab is a parent dependency; it still counts, since removal clears it
    session.set_restriction(ab, "B.x = 1").unwrap();
    assert!(session.can_remove_all_restrictions(None));
    assert!(!session.can_remove_all_restrictions(Some(d)));
}

#[test]
fn restricting_clears_the_fk_null_filter_and_undo_restores_it() {
    let mut builder = Schema::builder();
    builder
        .table("ORDER")
        .table("CUSTOMER")
        .association(
            AssociationDef::new("ORDER", "CUSTOMER", Kind::Parent)
                .named("fk")
                .fk_nullable(),
        );
    let schema = builder.build().unwrap();
    let fk = assoc(&schema, "fk");
    let subject = table(&schema, "ORDER");
    let mut session = Session::new(schema, ExtractionModel::new(subject));

    session.set_fk_null_filter(fk, true);
    assert!(session.model().has_fk_null_filter(fk));

    session.set_restriction(fk, "B.active = 1").unwrap();
    assert!(!session.model().has_fk_null_filter(fk));

    session.undo();
    assert!(session.model().has_fk_null_filter(fk));
    assert!(!session.model().restrictions.is_overridden(fk));

    session.redo();
    assert!(!session.model().has_fk_null_filter(fk));
    assert_eq!(
        session.model().restrictions.condition(fk),
        Some("B.active = 1")
    );
}

#[test]
fn fk_null_filter_toggle_is_undoable() {
    let mut builder = Schema::builder();
    builder
        .table("ORDER")
        .table("CUSTOMER")
        .association(
            AssociationDef::new("ORDER", "CUSTOMER", Kind::Parent)
                .named("fk")
                .fk_nullable(),
        );
    let schema = builder.build().unwrap();
    let fk = assoc(&schema, "fk");
    let subject = table(&schema, "ORDER");
    let mut session = Session::new(schema, ExtractionModel::new(subject));

    session.set_fk_null_filter(fk, true);
    assert!(session.undo_manager().can_undo());
    assert_eq!(session.undo_manager().undo_description(), Some("set filter"));

    session.undo();
    assert!(!session.model().has_fk_null_filter(fk));
    assert_eq!(session.undo_manager().redo_description(), Some("set filter"));

    session.redo();
    assert!(session.model().has_fk_null_filter(fk));

    // toggling to the current state pushes nothing
    let depth = session.undo_manager().undo_depth();
    session.set_fk_null_filter(fk, true);
    assert_eq!(session.undo_manager().undo_depth(), depth);
}

#[test]
fn filter_cannot_be_enabled_on_an_overridden_edge() {
    let mut builder = Schema::builder();
    builder
        .table("ORDER")
        .table("CUSTOMER")
        .association(
            AssociationDef::new("ORDER", "CUSTOMER", Kind::Parent)
                .named("fk")
                .fk_nullable(),
        );
    let schema = builder.build().unwrap();
    let fk = assoc(&schema, "fk");
    let subject = table(&schema, "ORDER");
    let mut session = Session::new(schema, ExtractionModel::new(subject));

    session.set_restriction(fk, IGNORE).unwrap();
    session.set_fk_null_filter(fk, true);
    assert!(!session.model().has_fk_null_filter(fk));
}
