use subsetter::schema::{AssociationDef, Kind, Schema};
use subsetter::tree::SpanningTree;
use subsetter::{ExtractionModel, Restrictions, Session};

use pretty_assertions::assert_eq;
use tests::{assoc, sample_session, table};

#[test]
fn two_cycle_builds_a_finite_tree() {
    let mut builder = Schema::builder();
    builder
        .table("A")
        .table("B")
        .association(AssociationDef::new("A", "B", Kind::Plain).named("ab"));
    let schema = builder.build().unwrap();

    let root = table(&schema, "A");
    let ab = assoc(&schema, "ab");
    let ba = schema.association(ab).reversal;

    let tree = SpanningTree::build(&schema, &Restrictions::new(), root, None);

    // root, the edge A→B, and the reversal B→A: each exactly once
    assert_eq!(tree.len(), 3);
    assert!(tree.contains_association(ab));
    assert!(tree.contains_association(ba));
    assert_eq!(
        tree.nodes().filter(|n| n.association == Some(ab)).count(),
        1
    );
    assert_eq!(
        tree.nodes().filter(|n| n.association == Some(ba)).count(),
        1
    );
}

#[test]
fn first_discoverer_claims_each_association() {
    let mut session = sample_session();
    let tree = session.tree();

    // every edge of the graph appears exactly once: 3 declared + 3 reversals
    assert_eq!(tree.len(), 7);
    for a in session.schema().associations() {
        assert_eq!(
            tree.nodes()
                .filter(|n| n.association == Some(a.id))
                .count(),
            1,
            "association {:?} must appear exactly once",
            a.id
        );
    }

    // the tree spans the closure
    let closure = session.closure().clone();
    let tree = session.tree();
    for id in &closure {
        assert!(tree.tables().contains(id));
    }
}

#[test]
fn siblings_sort_by_rank_then_name() {
    let mut builder = Schema::builder();
    builder
        .table("ROOT")
        .table("ALPHA")
        .table("MIKE")
        .table("ZULU")
        .table("BRAVO")
        .association(AssociationDef::new("ROOT", "ZULU", Kind::Parent).named("to_zulu"))
        .association(AssociationDef::new("ROOT", "MIKE", Kind::Child).named("to_mike"))
        .association(AssociationDef::new("ROOT", "ALPHA", Kind::Plain).named("to_alpha"))
        .association(AssociationDef::new("ROOT", "BRAVO", Kind::Plain).named("to_bravo"));
    let schema = builder.build().unwrap();

    let mut restrictions = Restrictions::new();
    restrictions.set(assoc(&schema, "to_bravo"), "ignore");

    let tree = SpanningTree::build(&schema, &restrictions, table(&schema, "ROOT"), None);

    let order: Vec<&str> = tree
        .root()
        .children
        .iter()
        .map(|i| schema.display_name(tree.node(*i).table))
        .collect();

    // parent dependency, child dependency, plain, then ignored
    assert_eq!(order, ["ZULU", "MIKE", "ALPHA", "BRAVO"]);
}

#[test]
fn must_include_forces_an_unreachable_association() {
    let mut builder = Schema::builder();
    builder
        .table("A")
        .table("B")
        .table("C")
        .table("D")
        .association(AssociationDef::new("A", "B", Kind::Plain).named("ab"))
        .association(AssociationDef::new("C", "D", Kind::Plain).named("cd"));
    let schema = builder.build().unwrap();

    let root = table(&schema, "A");
    let cd = assoc(&schema, "cd");

    let bare = SpanningTree::build(&schema, &Restrictions::new(), root, None);
    assert!(!bare.contains_association(cd));

    let forced = SpanningTree::build(&schema, &Restrictions::new(), root, Some(cd));
    assert!(forced.contains_association(cd));

    // already-reachable associations are not duplicated
    let ab = assoc(&schema, "ab");
    let redundant = SpanningTree::build(&schema, &Restrictions::new(), root, Some(ab));
    assert_eq!(
        redundant
            .nodes()
            .filter(|n| n.association == Some(ab))
            .count(),
        1
    );
}

#[test]
fn rebuilding_after_a_root_change_is_consistent() {
    let mut session = sample_session();
    let b = table(session.schema(), "B");

    session.set_root(b);
    let tree = session.tree();
    assert_eq!(tree.root().table, b);
    assert_eq!(tree.root().association, None);
    assert_eq!(tree.root().depth, 0);
    for child in &tree.root().children {
        assert_eq!(tree.node(*child).depth, 1);
    }
}

#[test]
fn tree_with_keeps_a_just_edited_edge_visible() {
    let session = {
        let mut builder = Schema::builder();
        builder
            .table("A")
            .table("B")
            .table("C")
            .table("D")
            .association(AssociationDef::new("A", "B", Kind::Plain).named("ab"))
            .association(AssociationDef::new("C", "D", Kind::Plain).named("cd"));
        let schema = builder.build().unwrap();
        let subject = table(&schema, "A");
        Session::new(schema, ExtractionModel::new(subject))
    };

    let cd = assoc(session.schema(), "cd");
    assert!(session.tree_with(cd).contains_association(cd));
}
