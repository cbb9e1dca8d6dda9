mod restriction;

use crate::closure::ClosureCache;
use crate::layout::{InMemoryLayout, LayoutStore};
use crate::navigation::{Layout, NavigationStack};
use crate::tree::SpanningTree;
use crate::undo::{self, CompensationAction, UndoManager};

use subsetter_core::extraction::{AdditionalSubject, ExtractionModel};
use subsetter_core::schema::{AssociationId, Schema, TableId};

use indexmap::IndexSet;

/// One editing session over a loaded schema and extraction model.
///
/// Owns every piece of mutable state (the restriction overlay, the closure
/// cache, the undo stacks, the navigation history) and is the only way to
/// mutate any of it. All operations run on the calling thread; background
/// work must marshal its results back before touching the session. A
/// mutation's effects (overlay change, dirty flag, version bump, undo push)
/// therefore complete before any other engine call can observe the session.
pub struct Session {
    pub(crate) schema: Schema,
    pub(crate) model: ExtractionModel,
    pub(crate) closure_cache: ClosureCache,
    pub(crate) undo_manager: UndoManager,
    navigation: NavigationStack,
    layout: Box<dyn LayoutStore>,
    root: TableId,
    suppress_feedback: u32,
}

impl Session {
    pub fn new(schema: Schema, model: ExtractionModel) -> Self {
        Self::with_layout(schema, model, Box::new(InMemoryLayout::new()))
    }

    pub fn with_layout(
        schema: Schema,
        model: ExtractionModel,
        layout: Box<dyn LayoutStore>,
    ) -> Self {
        let root = model.subject;
        Self {
            schema,
            model,
            closure_cache: ClosureCache::new(),
            undo_manager: UndoManager::new(),
            navigation: NavigationStack::new(),
            layout,
            root,
            suppress_feedback: 0,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn model(&self) -> &ExtractionModel {
        &self.model
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo_manager
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    pub fn root(&self) -> TableId {
        self.root
    }

    /// Replaces the extraction model wholesale, dropping every derived view.
    pub fn load_model(&mut self, model: ExtractionModel) {
        self.root = model.subject;
        self.model = model;
        self.closure_cache.invalidate();
        self.undo_manager.clear();
        self.navigation.clear();
    }

    /// The closure of the primary subject plus all additional subjects.
    pub fn closure(&mut self) -> &IndexSet<TableId> {
        let subjects = self.model.subjects();
        self.closure_cache
            .closure(&self.schema, &self.model.restrictions, &subjects)
    }

    /// The closure of an explicit subject set.
    pub fn closure_of(&mut self, subjects: &[TableId]) -> &IndexSet<TableId> {
        self.closure_cache
            .closure(&self.schema, &self.model.restrictions, subjects)
    }

    /// The spanning tree rooted at the current root.
    pub fn tree(&self) -> SpanningTree {
        SpanningTree::build(&self.schema, &self.model.restrictions, self.root, None)
    }

    /// The spanning tree with one association forced into it, so a
    /// just-edited edge is visible regardless of the root.
    pub fn tree_with(&self, must_include: AssociationId) -> SpanningTree {
        SpanningTree::build(
            &self.schema,
            &self.model.restrictions,
            self.root,
            Some(must_include),
        )
    }

    /// Changes the tree root, recording the previous focus for back
    /// navigation.
    pub fn set_root(&mut self, root: TableId) {
        self.with_layout_capture(|session| session.root = root);
    }

    /// Runs `f` inside one capture scope: the focus is snapshotted before,
    /// and release-time coalescing runs after, even if `f` unwinds. Nested
    /// scopes snapshot only once.
    pub fn with_layout_capture<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        struct Scope<'a>(&'a mut Session);

        impl Drop for Scope<'_> {
            fn drop(&mut self) {
                self.0.check_layout_stack();
            }
        }

        self.capture_layout();
        let mut scope = Scope(self);
        f(&mut *scope.0)
    }

    pub fn can_navigate_back(&self) -> bool {
        self.navigation.can_navigate_back()
    }

    /// Pops the most recent focus snapshot and restores it. The capture
    /// level stays raised for the whole restore, so restoring is never
    /// itself recorded as a navigation event.
    pub fn navigate_back(&mut self) -> bool {
        let Some(layout) = self.navigation.pop() else {
            return false;
        };

        self.suppressing(|session| {
            session.with_raised_capture(|session| {
                session.root = layout.root;
                session.layout.apply(&layout);
            });
        });

        true
    }

    pub fn undo(&mut self) {
        let Some(action) = self.undo_manager.pop_undo() else {
            return;
        };
        self.undo_manager.begin_undo();
        undo::run(action, self);
        self.undo_manager.end_replay();
    }

    pub fn redo(&mut self) {
        let Some(action) = self.undo_manager.pop_redo() else {
            return;
        };
        self.undo_manager.begin_redo();
        undo::run(action, self);
        self.undo_manager.end_replay();
    }

    /// Changes the primary subject; undoable.
    pub fn set_subject(&mut self, subject: TableId) {
        let old = self.model.subject;
        if old == subject {
            return;
        }

        self.model.subject = subject;
        self.model.mark_dirty();

        let label = self.schema.display_name(old).to_string();
        self.undo_manager.push(CompensationAction::new(
            "changed subject",
            "changed subject",
            Some(label),
            Box::new(move |session: &mut Session| session.set_subject(old)),
        ));
    }

    /// Replaces the additional-subject list; undoable as one step.
    pub fn set_additional_subjects(&mut self, subjects: Vec<AdditionalSubject>) {
        if self.model.additional_subjects == subjects {
            return;
        }

        let old = std::mem::replace(&mut self.model.additional_subjects, subjects);
        self.model.mark_dirty();

        self.undo_manager.push(CompensationAction::new(
            "changed additional subjects",
            "changed additional subjects",
            None,
            Box::new(move |session: &mut Session| session.set_additional_subjects(old)),
        ));
    }

    /// Changes the condition on the primary subject's rows; undoable.
    pub fn set_subject_condition(&mut self, condition: &str) {
        let condition = condition.trim().to_string();
        if self.model.subject_condition == condition {
            return;
        }

        let old = std::mem::replace(&mut self.model.subject_condition, condition);
        self.model.mark_dirty();

        let label = self.schema.display_name(self.model.subject).to_string();
        self.undo_manager.push(CompensationAction::new(
            "changed subject condition",
            "changed subject condition",
            Some(label),
            Box::new(move |session: &mut Session| session.set_subject_condition(&old)),
        ));
    }

    /// True while a caller-initiated selection update is in progress.
    ///
    /// Selection-driven updates can recursively trigger further selection
    /// changes; a presentation layer checks this before reacting.
    pub fn is_feedback_suppressed(&self) -> bool {
        self.suppress_feedback > 0
    }

    /// Runs `f` with selection feedback suppressed; the counter is restored
    /// on every exit path.
    pub fn suppressing<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        struct Guard<'a>(&'a mut Session);

        impl Drop for Guard<'_> {
            fn drop(&mut self) {
                self.0.suppress_feedback -= 1;
            }
        }

        self.suppress_feedback += 1;
        let mut guard = Guard(self);
        f(&mut *guard.0)
    }

    fn with_raised_capture<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        struct Guard<'a>(&'a mut Session);

        impl Drop for Guard<'_> {
            fn drop(&mut self) {
                self.0.navigation.lower();
            }
        }

        self.navigation.raise();
        let mut guard = Guard(self);
        f(&mut *guard.0)
    }

    /// Display names of the tables in the current spanning tree; this is
    /// what "visible" means for navigation coalescing.
    fn visible_tables(&self) -> IndexSet<String> {
        self.tree()
            .tables()
            .into_iter()
            .map(|id| self.schema.display_name(id).to_string())
            .collect()
    }

    fn capture_layout(&mut self) {
        let root = self.root;
        let visible = self.visible_tables();
        let layout = &self.layout;
        self.navigation.capture(|| {
            let stored = layout.positions();
            let positions = visible
                .into_iter()
                .map(|name| {
                    let position = stored.get(&name).copied().unwrap_or([0.0, 0.0]);
                    (name, position)
                })
                .collect();
            Layout { root, positions }
        });
    }

    fn check_layout_stack(&mut self) {
        let visible = self.visible_tables();
        self.navigation.release(&visible);
    }
}
