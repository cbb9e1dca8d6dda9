mod association;
pub use association::{Association, AssociationId, Cardinality, Kind};

mod builder;
pub use builder::{AssociationDef, Builder};

mod table;
pub use table::{Column, Table, TableId};

use indexmap::IndexMap;

/// The loaded table/association graph.
///
/// The graph is read-mostly after [`Builder::build`]: tables and associations
/// never change during an editing session. `version` is the cache-coherency
/// stamp shared with the restriction overlay; it is bumped whenever the set
/// of reachable tables could have changed, and derived views compare it
/// before trusting cached results.
#[derive(Debug)]
pub struct Schema {
    pub(crate) tables: Vec<Table>,
    pub(crate) associations: Vec<Association>,
    table_lookup: IndexMap<String, TableId>,
    version: u64,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.table_lookup.get(name).map(|id| self.table(*id))
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.iter()
    }

    pub fn association(&self, id: AssociationId) -> &Association {
        &self.associations[id.0]
    }

    pub fn associations(&self) -> impl ExactSizeIterator<Item = &Association> + '_ {
        self.associations.iter()
    }

    /// Outgoing associations of a table, in declaration order.
    pub fn outgoing(&self, table: TableId) -> impl Iterator<Item = &Association> + '_ {
        self.table(table)
            .associations
            .iter()
            .map(|id| self.association(*id))
    }

    /// Finds an association by its relationship name.
    pub fn association_by_name(&self, name: &str) -> Option<&Association> {
        self.associations
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
    }

    pub fn display_name(&self, id: TableId) -> &str {
        self.table(id).display_name()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records a change that can alter the set of reachable tables.
    ///
    /// Derived caches key on the version, so bumping it is what invalidates
    /// them. Cosmetic changes (condition text that narrows rows but not
    /// reachability) must not bump.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    pub(crate) fn from_parts(
        tables: Vec<Table>,
        associations: Vec<Association>,
        table_lookup: IndexMap<String, TableId>,
    ) -> Self {
        Self {
            tables,
            associations,
            table_lookup,
            version: 0,
        }
    }
}
