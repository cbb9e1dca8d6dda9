mod closure;
pub use closure::{closure, ClosureCache};

pub mod layout;
pub use layout::{InMemoryLayout, LayoutStore};

pub mod navigation;
pub use navigation::{Layout, NavigationStack};

mod session;
pub use session::Session;

pub mod tree;
pub use tree::{SpanningTree, TreeNode};

mod undo;
pub use undo::{CompensationAction, UndoManager};

pub use subsetter_core::{
    extraction, restriction, schema, Error, ExtractionModel, Restrictions, Result, Schema,
};
