use subsetter_core::restriction::Restrictions;
use subsetter_core::schema::{Association, AssociationId, Kind, Schema, TableId};

use std::collections::{HashMap, VecDeque};

/// Deterministic navigable tree over the association graph.
///
/// Built breadth-first from a root table. Each association appears at most
/// once, under whichever parent dequeued it first; that first-discoverer
/// rule is what turns the cyclic graph into a tree. Ignored associations
/// stay visible (ranked last among their siblings) so a disabled edge can
/// still be selected and re-enabled.
#[derive(Debug)]
pub struct SpanningTree {
    nodes: Vec<TreeNode>,
}

/// One node of the spanning tree. The root carries no association.
#[derive(Debug)]
pub struct TreeNode {
    /// Table shown at this node: the root table, or the association's
    /// destination
    pub table: TableId,

    /// Edge leading here; `None` only for the root
    pub association: Option<AssociationId>,

    /// Child node indices, kept sorted by classification rank and display
    /// name
    pub children: Vec<usize>,

    /// Distance from the root
    pub depth: usize,
}

impl SpanningTree {
    /// Builds the tree rooted at `root`.
    ///
    /// `must_include` forces one association into the tree even when the
    /// traversal never reaches its source; a freshly created restriction
    /// stays visible regardless of the chosen root.
    pub fn build(
        schema: &Schema,
        restrictions: &Restrictions,
        root: TableId,
        must_include: Option<AssociationId>,
    ) -> Self {
        let mut nodes = vec![TreeNode {
            table: root,
            association: None,
            children: vec![],
            depth: 0,
        }];

        // parent claims are made at enqueue time; the first discoverer wins
        let mut parent: HashMap<AssociationId, usize> = HashMap::new();
        let mut node_of: HashMap<AssociationId, usize> = HashMap::new();
        let mut agenda: VecDeque<AssociationId> = VecDeque::new();

        for id in &schema.table(root).associations {
            parent.insert(*id, 0);
            agenda.push_back(*id);
        }

        while let Some(id) = agenda.pop_front() {
            if node_of.contains_key(&id) {
                continue;
            }

            let a = schema.association(id);
            let parent_index = parent[&id];
            let index = push_child(&mut nodes, parent_index, a.destination, id);
            sort_children(schema, restrictions, &mut nodes, parent_index);
            node_of.insert(id, index);

            for next in &schema.table(a.destination).associations {
                if !parent.contains_key(next) {
                    parent.insert(*next, index);
                    agenda.push_back(*next);
                }
            }
        }

        if let Some(forced) = must_include {
            if !node_of.contains_key(&forced) {
                let a = schema.association(forced);
                let attach = nodes
                    .iter()
                    .position(|n| n.table == a.source)
                    .unwrap_or(0);
                push_child(&mut nodes, attach, a.destination, forced);
                sort_children(schema, restrictions, &mut nodes, attach);
            }
        }

        Self { nodes }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &TreeNode> + '_ {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_association(&self, id: AssociationId) -> bool {
        self.nodes.iter().any(|n| n.association == Some(id))
    }

    /// The tables present in the tree, root first, in discovery order.
    pub fn tables(&self) -> Vec<TableId> {
        let mut tables = vec![];
        for node in &self.nodes {
            if !tables.contains(&node.table) {
                tables.push(node.table);
            }
        }
        tables
    }
}

fn push_child(
    nodes: &mut Vec<TreeNode>,
    parent_index: usize,
    table: TableId,
    association: AssociationId,
) -> usize {
    let index = nodes.len();
    let depth = nodes[parent_index].depth + 1;
    nodes.push(TreeNode {
        table,
        association: Some(association),
        children: vec![],
        depth,
    });
    nodes[parent_index].children.push(index);
    index
}

/// Re-sorts one node's children: parent dependencies, then child
/// dependencies, then plain associations, then ignored edges; display name
/// breaks ties.
fn sort_children(
    schema: &Schema,
    restrictions: &Restrictions,
    nodes: &mut [TreeNode],
    parent_index: usize,
) {
    let mut children = std::mem::take(&mut nodes[parent_index].children);
    children.sort_by(|&x, &y| {
        let ax = nodes[x].association.map(|id| schema.association(id));
        let ay = nodes[y].association.map(|id| schema.association(id));
        let rank = |a: Option<&Association>| match a {
            Some(a) if restrictions.is_ignored(a.id) => 4,
            Some(a) => match a.kind {
                Kind::Parent => 1,
                Kind::Child => 2,
                Kind::Plain => 3,
            },
            None => 0,
        };
        rank(ax).cmp(&rank(ay)).then_with(|| {
            let name = |a: Option<&Association>| {
                a.map(|a| schema.display_name(a.destination)).unwrap_or("")
            };
            name(ax).cmp(name(ay))
        })
    });
    nodes[parent_index].children = children;
}
