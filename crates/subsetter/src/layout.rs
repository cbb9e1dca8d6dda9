use crate::navigation::Layout;

use indexmap::IndexMap;

/// Seam between the engine and whatever renders the graph.
///
/// The session captures and restores focus snapshots through this trait; a
/// presentation layer backs it with its display, a batch caller can use
/// [`InMemoryLayout`] and never look at the positions. Which tables count as
/// visible is derived from the spanning tree, not from this store.
pub trait LayoutStore {
    /// Current node positions, keyed by table display name. Tables without
    /// a stored position default to the origin when captured.
    fn positions(&self) -> IndexMap<String, [f64; 2]>;

    /// Restores a previously captured snapshot.
    fn apply(&mut self, layout: &Layout);
}

/// Headless layout store: positions are whatever was last applied.
#[derive(Debug, Default)]
pub struct InMemoryLayout {
    positions: IndexMap<String, [f64; 2]>,
}

impl InMemoryLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, table: impl Into<String>, position: [f64; 2]) {
        self.positions.insert(table.into(), position);
    }

    pub fn position(&self, table: &str) -> Option<[f64; 2]> {
        self.positions.get(table).copied()
    }
}

impl LayoutStore for InMemoryLayout {
    fn positions(&self) -> IndexMap<String, [f64; 2]> {
        self.positions.clone()
    }

    fn apply(&mut self, layout: &Layout) {
        self.positions = layout.positions.clone();
    }
}
