use crate::session::Session;

/// A compensating action: replaying it performs the exact inverse of one
/// prior mutation.
///
/// Actions capture the old state by value, never by reference, so
/// restricting the same edge twice in a row yields two independent inverses.
/// An action is only ever pushed after its mutation fully completed; replay
/// must restore the prior observable state completely or not run at all.
pub struct CompensationAction {
    forward: String,
    inverse: String,
    subject: Option<String>,
    run: Box<dyn FnOnce(&mut Session)>,
}

impl CompensationAction {
    pub fn new(
        forward: impl Into<String>,
        inverse: impl Into<String>,
        subject: Option<String>,
        run: Box<dyn FnOnce(&mut Session)>,
    ) -> Self {
        Self {
            forward: forward.into(),
            inverse: inverse.into(),
            subject,
            run,
        }
    }

    /// What the original mutation did, for menu labels.
    pub fn forward_description(&self) -> &str {
        &self.forward
    }

    /// What replaying this action will do.
    pub fn inverse_description(&self) -> &str {
        &self.inverse
    }

    /// Display label of the affected table, ignorable by headless callers.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

impl std::fmt::Debug for CompensationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompensationAction")
            .field("forward", &self.forward)
            .field("inverse", &self.inverse)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Where a pushed action lands.
///
/// Normal mutations push undo entries and clear the redo stack. While an
/// undo replays, the replayed mutation's own inverse is routed to the redo
/// stack instead of being stacked as new history; redo routes symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushTarget {
    Normal,
    Undoing,
    Redoing,
}

/// Stacks of compensating actions.
///
/// The session drives `undo`/`redo`; this type only owns the bookkeeping so
/// the routing invariant lives in one place.
pub struct UndoManager {
    undo: Vec<CompensationAction>,
    redo: Vec<CompensationAction>,
    target: PushTarget,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoManager {
    pub fn new() -> Self {
        Self {
            undo: vec![],
            redo: vec![],
            target: PushTarget::Normal,
        }
    }

    pub fn push(&mut self, action: CompensationAction) {
        match self.target {
            PushTarget::Normal => {
                self.undo.push(action);
                self.redo.clear();
            }
            PushTarget::Undoing => self.redo.push(action),
            PushTarget::Redoing => self.undo.push(action),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Description of what `undo` would revert, for menu labels.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo.last().map(|a| a.forward_description())
    }

    /// Description of what `redo` would re-apply. Entries on the redo stack
    /// were pushed by an undo replay, so the re-application is their inverse.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo.last().map(|a| a.inverse_description())
    }

    /// Table label of the step `undo` would revert, if it names one.
    pub fn undo_subject(&self) -> Option<&str> {
        self.undo.last().and_then(|a| a.subject())
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.target = PushTarget::Normal;
    }

    pub(crate) fn pop_undo(&mut self) -> Option<CompensationAction> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<CompensationAction> {
        self.redo.pop()
    }

    pub(crate) fn begin_undo(&mut self) {
        self.target = PushTarget::Undoing;
    }

    pub(crate) fn begin_redo(&mut self) {
        self.target = PushTarget::Redoing;
    }

    pub(crate) fn end_replay(&mut self) {
        self.target = PushTarget::Normal;
    }
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("target", &self.target)
            .finish()
    }
}

pub(crate) fn run(action: CompensationAction, session: &mut Session) {
    (action.run)(session);
}
