use super::AssociationId;

use std::fmt;

/// A database table: one node of the association graph.
///
/// Immutable once the schema is built, except for display metadata.
#[derive(Debug, Clone)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Qualified name of the table, unique within the schema
    pub name: String,

    /// The table's columns, in declaration order
    pub columns: Vec<Column>,

    /// Indices into `columns` forming the primary key
    pub primary_key: Vec<usize>,

    /// Outgoing edges, in declaration order
    pub associations: Vec<AssociationId>,

    /// Optional display name, shown instead of the qualified name
    pub display_name: Option<String>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,

    /// SQL type, as reported by the metadata source
    pub sql_type: String,

    pub nullable: bool,

    /// Derived column with no physical storage
    pub is_virtual: bool,

    /// Value generated by the database on insert
    pub is_identity: bool,
}

impl Table {
    pub(crate) fn new(id: TableId, name: String) -> Self {
        Self {
            id,
            name,
            columns: vec![],
            primary_key: vec![],
            associations: vec![],
            display_name: None,
        }
    }

    /// The name shown to users; falls back to the qualified name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn primary_key_columns(&self) -> impl ExactSizeIterator<Item = &Column> + '_ {
        self.primary_key.iter().map(|i| &self.columns[*i])
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: false,
            is_virtual: false,
            is_identity: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    pub fn virtual_column(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

impl TableId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
