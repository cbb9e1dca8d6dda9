use subsetter_core::restriction::Restrictions;
use subsetter_core::schema::{Schema, TableId};

use indexmap::IndexSet;
use std::collections::VecDeque;

/// Computes the set of tables reachable from `subjects` under the current
/// overlay.
///
/// Breadth-first over every association whose effective condition is not the
/// ignore sentinel; a row-filter restriction narrows rows at export time but
/// leaves the edge traversable. The visited set guards against cycles, so
/// bidirectional pairs and multi-path reachability terminate.
pub fn closure(
    schema: &Schema,
    restrictions: &Restrictions,
    subjects: &[TableId],
) -> IndexSet<TableId> {
    let mut visited = IndexSet::new();
    let mut queue = VecDeque::new();

    for subject in subjects {
        if visited.insert(*subject) {
            queue.push_back(*subject);
        }
    }

    while let Some(table) = queue.pop_front() {
        for a in schema.outgoing(table) {
            if restrictions.is_ignored(a.id) {
                continue;
            }
            if visited.insert(a.destination) {
                queue.push_back(a.destination);
            }
        }
    }

    visited
}

/// Version-stamped cache of the last computed closure.
///
/// Owned by the session, never process-wide, so independent sessions cannot
/// contaminate each other. A hit requires both the same subject list and the
/// same schema version; anything else recomputes.
#[derive(Debug, Default)]
pub struct ClosureCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    subjects: Vec<TableId>,
    version: u64,
    tables: IndexSet<TableId>,
}

impl ClosureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The closure of `subjects`, recomputed only when the cached stamp is
    /// stale. Idempotent between mutations.
    pub fn closure(
        &mut self,
        schema: &Schema,
        restrictions: &Restrictions,
        subjects: &[TableId],
    ) -> &IndexSet<TableId> {
        let version = schema.version();
        let stale =
            !matches!(&self.entry, Some(e) if e.version == version && e.subjects == subjects);
        if stale {
            self.entry = None;
        }

        let entry = self.entry.get_or_insert_with(|| CacheEntry {
            subjects: subjects.to_vec(),
            version,
            tables: closure(schema, restrictions, subjects),
        });
        &entry.tables
    }

    /// Drops the cached entry outright; used when the whole model is
    /// replaced rather than mutated.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
