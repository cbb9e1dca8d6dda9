use super::Session;
use crate::undo::CompensationAction;

use subsetter_core::restriction::{self, IGNORE};
use subsetter_core::schema::{AssociationId, TableId};
use subsetter_core::{Error, Result};

impl Session {
    /// Sets the restriction condition of one association.
    ///
    /// The condition is normalized first: empty means unrestricted, the
    /// `ignore` sentinel (or the legacy `false` spelling) disables the edge,
    /// anything else is a row filter applied at export time. Setting the
    /// condition an edge already has is a silent no-op: no dirty flag, no
    /// undo entry, no cache invalidation.
    ///
    /// Restricting an ambiguous unnamed edge is rejected rather than guessed
    /// at; clearing one is always permitted (at worst a no-op).
    pub fn set_restriction(&mut self, id: AssociationId, condition: &str) -> Result<()> {
        let new = restriction::normalize(condition);
        if self.model.restrictions.condition(id).unwrap_or("") == new {
            return Ok(());
        }

        if !new.is_empty() {
            let a = self.schema.association(id);
            if a.ambiguous {
                return Err(Error::ambiguous_association(
                    self.schema.display_name(a.source),
                    self.schema.display_name(a.destination),
                ));
            }
        }

        self.apply_restriction(id, new);
        Ok(())
    }

    /// Clears the restriction of one association.
    pub fn remove_restriction(&mut self, id: AssociationId) {
        // never fails: the empty condition skips the ambiguity check
        let _ = self.set_restriction(id, "");
    }

    /// Disables one association entirely.
    pub fn disable_association(&mut self, id: AssociationId) -> Result<()> {
        self.set_restriction(id, IGNORE)
    }

    /// Clears every override, optionally only on edges touching `context`.
    ///
    /// Each cleared edge produces its own undo entry, so a bulk removal is
    /// undone one edge at a time in reverse application order.
    pub fn remove_all_restrictions(&mut self, context: Option<TableId>) {
        let ids: Vec<AssociationId> = self
            .schema
            .associations()
            .filter(|a| context.is_none_or(|table| a.touches(table)))
            .filter(|a| self.model.restrictions.is_overridden(a.id))
            .map(|a| a.id)
            .collect();

        for id in ids {
            self.apply_restriction(id, String::new());
        }
    }

    /// True exactly when [`remove_all_restrictions`] with the same context
    /// would clear at least one edge. Parent-dependency edges count: removal
    /// clears them too.
    ///
    /// [`remove_all_restrictions`]: Session::remove_all_restrictions
    pub fn can_remove_all_restrictions(&self, context: Option<TableId>) -> bool {
        self.schema
            .associations()
            .filter(|a| context.is_none_or(|table| a.touches(table)))
            .any(|a| self.model.restrictions.is_overridden(a.id))
    }

    /// Disables every named association that is not a parent dependency,
    /// optionally only on edges touching `context`. Same per-edge undo
    /// granularity as [`remove_all_restrictions`].
    ///
    /// [`remove_all_restrictions`]: Session::remove_all_restrictions
    pub fn ignore_all(&mut self, context: Option<TableId>) {
        let ids: Vec<AssociationId> = self
            .schema
            .associations()
            .filter(|a| !a.is_parent_dependency() && a.has_name())
            .filter(|a| context.is_none_or(|table| a.touches(table)))
            .filter(|a| !self.model.restrictions.is_ignored(a.id))
            .map(|a| a.id)
            .collect();

        for id in ids {
            self.apply_restriction(id, IGNORE.to_string());
        }
    }

    pub fn can_ignore_all(&self, context: Option<TableId>) -> bool {
        self.schema
            .associations()
            .filter(|a| !a.is_parent_dependency() && a.has_name())
            .filter(|a| context.is_none_or(|table| a.touches(table)))
            .any(|a| !self.model.restrictions.is_ignored(a.id))
    }

    /// Turns the nullable-FK null filter of an edge on or off.
    ///
    /// The filter and a restriction are mutually exclusive on the same edge;
    /// enabling it on an overridden edge is a no-op. An effective toggle is
    /// undoable like any other mutation.
    pub fn set_fk_null_filter(&mut self, id: AssociationId, on: bool) {
        if on && self.model.restrictions.is_overridden(id) {
            return;
        }
        if on && !self.schema.association(id).fk_nullable {
            return;
        }
        if self.model.has_fk_null_filter(id) == on {
            return;
        }

        self.model.set_fk_null_filter(id, on);

        let destination = self.schema.association(id).destination;
        let label = self.schema.display_name(destination).to_string();
        let (forward, inverse) = if on {
            ("set filter", "removed filter")
        } else {
            ("removed filter", "set filter")
        };
        self.undo_manager.push(CompensationAction::new(
            forward,
            inverse,
            Some(label),
            Box::new(move |session: &mut Session| session.set_fk_null_filter(id, !on)),
        ));
    }

    /// Applies an already-normalized, already-validated condition.
    ///
    /// This is the one place a restriction actually changes: overlay
    /// mutation, dirty flag, version bump when reachability could have
    /// changed, FK-filter reset, undo push, in that order. The compensating
    /// action captures the old condition and filter state by value and
    /// restores both.
    pub(crate) fn apply_restriction(&mut self, id: AssociationId, new: String) {
        let old = self
            .model
            .restrictions
            .condition(id)
            .unwrap_or("")
            .to_string();
        if old == new {
            return;
        }

        let was_ignored = self.model.restrictions.is_ignored(id);
        self.model.restrictions.set(id, &new);
        self.model.mark_dirty();

        if was_ignored != self.model.restrictions.is_ignored(id) {
            // reachability may have changed; stale closures must recompute
            self.schema.bump_version();
        }

        let filter_cleared = self.model.has_fk_null_filter(id) && !new.is_empty();
        if filter_cleared {
            self.model.set_fk_null_filter(id, false);
        }

        let destination = self.schema.association(id).destination;
        let label = self.schema.display_name(destination).to_string();

        self.undo_manager.push(CompensationAction::new(
            describe(&new),
            describe(&old),
            Some(label),
            Box::new(move |session: &mut Session| {
                session.apply_restriction(id, old);
                if filter_cleared {
                    session.model.set_fk_null_filter(id, true);
                }
            }),
        ));
    }
}

fn describe(condition: &str) -> &'static str {
    if condition.is_empty() {
        "removed restriction"
    } else if condition == IGNORE {
        "disabled association"
    } else {
        "added restriction"
    }
}
