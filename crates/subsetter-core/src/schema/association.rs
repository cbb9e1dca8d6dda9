use super::TableId;

use std::fmt;

/// A directed edge of the association graph.
///
/// Every association is stored together with its reversal: the same
/// relationship seen from the destination table. Reversal pairs stay
/// classification-consistent (`Parent` on one side means `Child` on the
/// other).
#[derive(Debug, Clone)]
pub struct Association {
    /// Uniquely identifies an association
    pub id: AssociationId,

    pub source: TableId,

    pub destination: TableId,

    /// Join condition over the aliases `A` (source) and `B` (destination)
    pub join_condition: String,

    pub cardinality: Option<Cardinality>,

    /// `None` when the relationship is unnamed
    pub name: Option<String>,

    /// Relationship classification; drives export ordering and tree ranking
    pub kind: Kind,

    /// The same relationship seen from the destination table
    pub reversal: AssociationId,

    /// Unnamed edge sharing its destination with an unnamed sibling from the
    /// same source. Such an edge cannot be restricted individually because
    /// persisted restriction records could not tell the siblings apart.
    pub ambiguous: bool,

    /// The foreign-key columns on the source side are nullable, so the export
    /// stage may null them out instead of following the edge.
    pub fk_nullable: bool,
}

/// Uniquely identifies an association
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct AssociationId(pub usize);

/// Relationship classification. The three classes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// The destination must be inserted before the source (parent dependency)
    Parent,

    /// The source must be inserted before the destination (child dependency)
    Child,

    /// Plain associated-with relationship without an insert-order constraint
    Plain,
}

/// Cardinality of an association, e.g. `1:n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Association {
    pub fn is_parent_dependency(&self) -> bool {
        matches!(self.kind, Kind::Parent)
    }

    pub fn is_child_dependency(&self) -> bool {
        matches!(self.kind, Kind::Child)
    }

    /// True when the edge carries a name usable as a restriction key.
    pub fn has_name(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }

    /// True when the edge starts or ends at `table`.
    pub fn touches(&self, table: TableId) -> bool {
        self.source == table || self.destination == table
    }
}

impl Kind {
    /// The classification of the reversal edge.
    pub fn reversed(self) -> Kind {
        match self {
            Kind::Parent => Kind::Child,
            Kind::Child => Kind::Parent,
            Kind::Plain => Kind::Plain,
        }
    }
}

impl Cardinality {
    pub fn parse(s: &str) -> Option<Cardinality> {
        match s.trim() {
            "1:1" => Some(Cardinality::OneToOne),
            "1:n" => Some(Cardinality::OneToMany),
            "n:1" => Some(Cardinality::ManyToOne),
            "n:m" => Some(Cardinality::ManyToMany),
            _ => None,
        }
    }

    /// The cardinality of the reversal edge.
    pub fn reversed(self) -> Cardinality {
        match self {
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            other => other,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cardinality::OneToOne => "1:1",
            Cardinality::OneToMany => "1:n",
            Cardinality::ManyToOne => "n:1",
            Cardinality::ManyToMany => "n:m",
        })
    }
}

impl AssociationId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for AssociationId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "AssociationId({})", self.0)
    }
}
