use crate::restriction::Restrictions;
use crate::schema::{AssociationId, Schema, TableId};

use indexmap::IndexSet;

/// Aggregate root of one extraction: the subject tables, the global subject
/// condition, and the restriction overlay.
///
/// Created fresh per editing session and replaced wholesale when a new model
/// is loaded. The `dirty` flag tracks unsaved or recovered-from state; the
/// persistence collaborator clears it.
#[derive(Debug, Clone)]
pub struct ExtractionModel {
    /// The primary subject: extraction starts here
    pub subject: TableId,

    /// Extra root tables, each with its own condition
    pub additional_subjects: Vec<AdditionalSubject>,

    /// Condition on the primary subject's rows
    pub subject_condition: String,

    /// Per-edge overrides
    pub restrictions: Restrictions,

    /// Edges whose nullable foreign key is exported as null instead of being
    /// followed; mutually exclusive with a restriction on the same edge
    fk_null_filters: IndexSet<AssociationId>,

    dirty: bool,
}

/// An extra root table with its own row condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalSubject {
    pub subject: TableId,
    pub condition: String,
}

/// Advisory result of resolving a subject table by name.
///
/// A missing subject is recovered from, never raised: the model falls back
/// to an arbitrary table and flags itself dirty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectLookup {
    Found(TableId),
    Fallback { requested: String, chosen: TableId },
}

impl ExtractionModel {
    pub fn new(subject: TableId) -> Self {
        Self {
            subject,
            additional_subjects: vec![],
            subject_condition: String::new(),
            restrictions: Restrictions::new(),
            fk_null_filters: IndexSet::new(),
            dirty: false,
        }
    }

    /// Resolves the subject by name, falling back to the first table of the
    /// schema when the name no longer resolves. Returns `None` only for an
    /// empty schema.
    pub fn with_subject_name(schema: &Schema, name: &str) -> Option<(Self, SubjectLookup)> {
        if let Some(table) = schema.table_by_name(name) {
            return Some((Self::new(table.id), SubjectLookup::Found(table.id)));
        }

        let fallback = schema.tables().next()?;
        let mut model = Self::new(fallback.id);
        model.dirty = true;
        Some((
            model,
            SubjectLookup::Fallback {
                requested: name.to_string(),
                chosen: fallback.id,
            },
        ))
    }

    /// The primary subject followed by the additional subjects.
    pub fn subjects(&self) -> Vec<TableId> {
        let mut subjects = Vec::with_capacity(1 + self.additional_subjects.len());
        subjects.push(self.subject);
        subjects.extend(self.additional_subjects.iter().map(|s| s.subject));
        subjects
    }

    pub fn has_fk_null_filter(&self, id: AssociationId) -> bool {
        self.fk_null_filters.contains(&id)
    }

    pub fn set_fk_null_filter(&mut self, id: AssociationId, on: bool) {
        let changed = if on {
            self.fk_null_filters.insert(id)
        } else {
            self.fk_null_filters.shift_remove(&id)
        };
        if changed {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the persistence collaborator after a successful save.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
