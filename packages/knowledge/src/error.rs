// ABOUTME: Error types for knowledge category operations
// ABOUTME: Validation failures abort the operation without changing the tree

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("Category label cannot be empty")]
    EmptyLabel,

    #[error("Category not found: {0}")]
    UnknownCategory(String),

    #[error("Parent category not found: {0}")]
    UnknownParent(String),

    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    #[error("Built-in category {0} cannot be moved")]
    BuiltIn(String),

    #[error("Placing {category} under {parent} would make it its own ancestor")]
    Cycle { category: String, parent: String },
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
