use super::{Association, AssociationId, Cardinality, Column, Kind, Schema, Table, TableId};
use crate::{bail, Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;

/// Staged construction of a [`Schema`].
///
/// Tables and associations are declared first; `build` resolves names to
/// ids, materializes the reversal edge of every declared association, marks
/// ambiguous unnamed siblings and verifies the result.
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableDef>,
    associations: Vec<AssociationDef>,
}

#[derive(Debug)]
struct TableDef {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<String>,
    display_name: Option<String>,
}

/// One declared association; the reversal is derived during `build`.
#[derive(Debug)]
pub struct AssociationDef {
    source: String,
    destination: String,
    join_condition: String,
    cardinality: Option<Cardinality>,
    name: Option<String>,
    reverse_name: Option<String>,
    kind: Kind,
    fk_nullable: bool,
}

impl AssociationDef {
    pub fn new(source: &str, destination: &str, kind: Kind) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            join_condition: String::new(),
            cardinality: None,
            name: None,
            reverse_name: None,
            kind,
            fk_nullable: false,
        }
    }

    /// Join condition over the aliases `A` (source) and `B` (destination).
    pub fn condition(mut self, sql: &str) -> Self {
        self.join_condition = sql.to_string();
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn reverse_named(mut self, name: &str) -> Self {
        self.reverse_name = Some(name.to_string());
        self
    }

    /// Cardinality in `1:1` / `1:n` / `n:1` / `n:m` notation; anything else
    /// leaves the cardinality unknown.
    pub fn cardinality(mut self, spec: &str) -> Self {
        self.cardinality = Cardinality::parse(spec);
        self
    }

    pub fn fk_nullable(mut self) -> Self {
        self.fk_nullable = true;
        self
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table without column metadata.
    pub fn table(&mut self, name: &str) -> &mut Self {
        self.tables.push(TableDef {
            name: name.to_string(),
            columns: vec![],
            primary_key: vec![],
            display_name: None,
        });
        self
    }

    /// Declares a table with columns and a primary key.
    pub fn table_with_columns(
        &mut self,
        name: &str,
        columns: Vec<Column>,
        primary_key: &[&str],
    ) -> &mut Self {
        self.tables.push(TableDef {
            name: name.to_string(),
            columns,
            primary_key: primary_key.iter().map(|s| s.to_string()).collect(),
            display_name: None,
        });
        self
    }

    /// Overrides the display name of the most recently declared table.
    pub fn display_name(&mut self, display: &str) -> &mut Self {
        if let Some(table) = self.tables.last_mut() {
            table.display_name = Some(display.to_string());
        }
        self
    }

    pub fn association(&mut self, def: AssociationDef) -> &mut Self {
        self.associations.push(def);
        self
    }

    pub fn build(&mut self) -> Result<Schema> {
        let table_defs = std::mem::take(&mut self.tables);
        let association_defs = std::mem::take(&mut self.associations);

        let mut table_lookup = IndexMap::new();
        let mut tables = Vec::with_capacity(table_defs.len());

        for def in table_defs {
            let id = TableId(tables.len());
            if table_lookup.insert(def.name.clone(), id).is_some() {
                bail!("duplicate table name `{}`", def.name);
            }

            let mut table = Table::new(id, def.name);
            table.display_name = def.display_name;
            for pk in &def.primary_key {
                let Some(index) = def.columns.iter().position(|c| &c.name == pk) else {
                    bail!(
                        "primary key column `{}` not found in table `{}`",
                        pk,
                        table.name
                    );
                };
                table.primary_key.push(index);
            }
            table.columns = def.columns;
            tables.push(table);
        }

        let mut associations = Vec::with_capacity(association_defs.len() * 2);

        for def in association_defs {
            let source = Self::resolve(&table_lookup, &def.source)?;
            let destination = Self::resolve(&table_lookup, &def.destination)?;

            let forward = AssociationId(associations.len());
            let reversal = AssociationId(associations.len() + 1);

            associations.push(Association {
                id: forward,
                source,
                destination,
                join_condition: def.join_condition.clone(),
                cardinality: def.cardinality,
                name: def.name,
                kind: def.kind,
                reversal,
                ambiguous: false,
                fk_nullable: def.fk_nullable,
            });
            associations.push(Association {
                id: reversal,
                source: destination,
                destination: source,
                join_condition: swap_aliases(&def.join_condition),
                cardinality: def.cardinality.map(Cardinality::reversed),
                name: def.reverse_name,
                kind: def.kind.reversed(),
                reversal: forward,
                ambiguous: false,
                fk_nullable: false,
            });

            tables[source.0].associations.push(forward);
            tables[destination.0].associations.push(reversal);
        }

        mark_ambiguous(&tables, &mut associations);
        verify(&tables, &associations)?;

        Ok(Schema::from_parts(tables, associations, table_lookup))
    }

    fn resolve(lookup: &IndexMap<String, TableId>, name: &str) -> Result<TableId> {
        lookup
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_table(name))
    }
}

/// Swaps the `A`/`B` aliases so the condition reads correctly from the
/// reversal's point of view.
///
/// Only standalone alias tokens are swapped: an `A` or `B` directly before a
/// dot, not preceded by an identifier character. `SUBA.x` stays untouched.
fn swap_aliases(condition: &str) -> String {
    let mut out = String::with_capacity(condition.len());
    let mut prev = None;
    let mut chars = condition.chars().peekable();

    while let Some(c) = chars.next() {
        let standalone = matches!(c, 'A' | 'B')
            && chars.peek() == Some(&'.')
            && !prev.is_some_and(|p: char| p.is_ascii_alphanumeric() || p == '_');
        if standalone {
            out.push(if c == 'A' { 'B' } else { 'A' });
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Marks every unnamed edge that shares its destination with an unnamed
/// sibling from the same source. The graph never changes after build, so
/// this runs exactly once instead of living in a mutable cache.
fn mark_ambiguous(tables: &[Table], associations: &mut [Association]) {
    for table in tables {
        let mut by_destination: HashMap<TableId, Vec<AssociationId>> = HashMap::new();
        for id in &table.associations {
            let a = &associations[id.0];
            if !a.has_name() {
                by_destination.entry(a.destination).or_default().push(*id);
            }
        }
        for siblings in by_destination.values() {
            if siblings.len() > 1 {
                for id in siblings {
                    associations[id.0].ambiguous = true;
                }
            }
        }
    }
}

fn verify(tables: &[Table], associations: &[Association]) -> Result<()> {
    // Construction above guarantees pairing; a broken pair here is a bug.
    for a in associations {
        let reversal = &associations[a.reversal.0];
        debug_assert_eq!(reversal.reversal, a.id);
        debug_assert_eq!(reversal.kind, a.kind.reversed());
        debug_assert_ne!(a.id, AssociationId::placeholder());
        debug_assert_ne!(a.source, TableId::placeholder());
    }

    // Named edges must be unique per (source, destination, name); persisted
    // restriction records key on that triple.
    let mut seen = HashMap::new();
    for a in associations {
        if let Some(name) = &a.name {
            if seen.insert((a.source, a.destination, name.clone()), a.id).is_some() {
                bail!(
                    "duplicate association `{}` from `{}` to `{}`",
                    name,
                    tables[a.source.0].name,
                    tables[a.destination.0].name
                );
            }
        }
    }

    Ok(())
}
