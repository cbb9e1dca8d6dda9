use subsetter_core::schema::TableId;

use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// Maximum number of retained focus snapshots; the oldest is dropped first.
pub const MAX_NAVIGATION_STACK_SIZE: usize = 20;

/// A snapshot exceeding this many positions is discarded at release time
/// rather than retained.
const MAX_CAPTURED_POSITIONS: usize = 1400;

/// One focus snapshot: the tree root plus the view positions at capture
/// time, keyed by table display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root: TableId,
    pub positions: IndexMap<String, [f64; 2]>,
}

/// Bounded history of focus snapshots with reentrant capture coalescing.
///
/// `capture` and `release` must be called in matching pairs. Only the
/// outermost capture (level 0 → 1) takes a snapshot; nested pairs just move
/// the level so the outermost release can be detected. On that release, a
/// snapshot that turned out to be a no-op navigation (same visible key set)
/// or oversized is popped again.
#[derive(Debug, Default)]
pub struct NavigationStack {
    stack: VecDeque<Layout>,
    capture_level: u32,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a capture scope. `snapshot` runs only on the outermost call.
    pub fn capture(&mut self, snapshot: impl FnOnce() -> Layout) {
        if self.capture_level == 0 {
            let layout = snapshot();
            let duplicate = self
                .stack
                .front()
                .is_some_and(|top| key_sets_equal(&top.positions, &layout.positions));
            if !duplicate {
                self.stack.push_front(layout);
                if self.stack.len() > MAX_NAVIGATION_STACK_SIZE {
                    self.stack.pop_back();
                }
            }
        }
        self.capture_level += 1;
    }

    /// Closes a capture scope. On the outermost exit, coalesces a snapshot
    /// that matches what is currently visible or exceeds the size threshold.
    pub fn release(&mut self, visible: &IndexSet<String>) {
        if self.capture_level > 0 {
            self.capture_level -= 1;
        }
        if self.capture_level == 0 {
            let coalesce = self.stack.front().is_some_and(|top| {
                top.positions.len() > MAX_CAPTURED_POSITIONS
                    || (top.positions.len() == visible.len()
                        && top.positions.keys().all(|k| visible.contains(k)))
            });
            if coalesce {
                self.stack.pop_front();
            }
        }
    }

    /// Pops the most recent snapshot for the caller to restore. The caller
    /// is expected to hold the capture level raised for the whole restore so
    /// the restore itself is not recorded.
    pub fn pop(&mut self) -> Option<Layout> {
        self.stack.pop_front()
    }

    /// Raises the capture level without snapshotting; pairs with [`lower`].
    ///
    /// [`lower`]: NavigationStack::lower
    pub fn raise(&mut self) {
        self.capture_level += 1;
    }

    pub fn lower(&mut self) {
        if self.capture_level > 0 {
            self.capture_level -= 1;
        }
    }

    pub fn can_navigate_back(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn capture_level(&self) -> u32 {
        self.capture_level
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.capture_level = 0;
    }
}

fn key_sets_equal(a: &IndexMap<String, [f64; 2]>, b: &IndexMap<String, [f64; 2]>) -> bool {
    a.len() == b.len() && a.keys().all(|k| b.contains_key(k))
}
