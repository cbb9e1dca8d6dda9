mod def;
pub use def::{RestrictionDef, IGNORE};

use crate::schema::{AssociationId, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;

/// The restriction overlay of one extraction model.
///
/// Maps associations to their effective condition string. An absent entry
/// means the edge is unrestricted; the [`IGNORE`] sentinel disables it for
/// traversal; any other string narrows rows at export time without changing
/// reachability. Keying on [`AssociationId`] makes the at-most-one-override
/// invariant structural.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restrictions {
    conditions: IndexMap<AssociationId, String>,
}

/// Canonicalizes a raw condition string.
///
/// The empty string means unrestricted. `ignore` and the legacy `false`
/// spelling both collapse to the [`IGNORE`] sentinel so the overlay, the
/// closure engine and the persisted format agree on one disabled spelling.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(IGNORE) || trimmed.eq_ignore_ascii_case("false") {
        IGNORE.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Restrictions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective condition of an edge, if any override is set.
    pub fn condition(&self, id: AssociationId) -> Option<&str> {
        self.conditions.get(&id).map(String::as_str)
    }

    /// True when any override (row filter or ignore) is set on the edge.
    pub fn is_overridden(&self, id: AssociationId) -> bool {
        self.conditions.contains_key(&id)
    }

    /// True when the edge is fully disabled for traversal.
    pub fn is_ignored(&self, id: AssociationId) -> bool {
        self.condition(id) == Some(IGNORE)
    }

    /// True when a non-empty, non-ignore condition is set: the edge stays
    /// traversable but the export stage filters rows through it.
    pub fn is_restricted(&self, id: AssociationId) -> bool {
        match self.condition(id) {
            Some(condition) => condition != IGNORE,
            None => false,
        }
    }

    /// Sets the condition of an edge. The caller passes a normalized string;
    /// the empty string removes the override.
    pub fn set(&mut self, id: AssociationId, condition: &str) {
        if condition.is_empty() {
            self.conditions.shift_remove(&id);
        } else {
            self.conditions.insert(id, condition.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssociationId, &str)> + '_ {
        self.conditions.iter().map(|(id, c)| (*id, c.as_str()))
    }

    /// Exports the overlay as persistable records, one per overridden edge.
    pub fn to_defs(&self, schema: &Schema) -> Vec<RestrictionDef> {
        self.conditions
            .iter()
            .map(|(id, condition)| {
                let a = schema.association(*id);
                match a.name.as_deref() {
                    Some(name) => RestrictionDef::by_name(name, condition),
                    None => RestrictionDef::by_tables(
                        &schema.table(a.source).name,
                        &schema.table(a.destination).name,
                        condition,
                    ),
                }
            })
            .collect()
    }

    /// Resolves persisted records back into an overlay.
    ///
    /// A record keyed by tables must match exactly one unnamed edge; an
    /// unnamed edge with unnamed siblings to the same destination is
    /// rejected rather than guessed at.
    pub fn from_defs(schema: &Schema, defs: &[RestrictionDef]) -> Result<Self> {
        let mut restrictions = Self::new();

        for def in defs {
            let id = match &def.to {
                None => match schema.association_by_name(&def.from) {
                    Some(a) => a.id,
                    None => {
                        return Err(Error::invalid_restriction(
                            &def.to_line(),
                            "no association with this name",
                        ))
                    }
                },
                Some(to) => {
                    let source = schema
                        .table_by_name(&def.from)
                        .ok_or_else(|| Error::unknown_table(&def.from))?;
                    let destination = schema
                        .table_by_name(to)
                        .ok_or_else(|| Error::unknown_table(to))?;

                    let mut candidates = schema
                        .outgoing(source.id)
                        .filter(|a| a.destination == destination.id && !a.has_name());
                    let Some(first) = candidates.next() else {
                        return Err(Error::invalid_restriction(
                            &def.to_line(),
                            "no unnamed association between these tables",
                        ));
                    };
                    if first.ambiguous {
                        return Err(Error::ambiguous_association(
                            source.display_name(),
                            destination.display_name(),
                        ));
                    }
                    first.id
                }
            };

            restrictions.set(id, &normalize(&def.condition));
        }

        Ok(restrictions)
    }
}
