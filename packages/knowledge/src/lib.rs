// ABOUTME: Leadflow knowledge library - category aggregation over knowledge brain entries
// ABOUTME: Arena category tree with cycle-checked parents, search and zoomable navigation

pub mod error;
pub mod tree;
pub mod view;

pub use error::{KnowledgeError, Result};
pub use tree::{CategoryTree, BUILT_IN_CATEGORIES, UNCATEGORIZED};
pub use view::BrainView;
