// ABOUTME: Core types and utilities for Leadflow
// ABOUTME: Foundational package providing the shared data model across all Leadflow packages

pub mod constants;
pub mod knowledge;
pub mod phases;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{
    AnswerMap, AnswerRecord, AnsweredVia, Button, ChatMessage, ConversationStatus, Intent,
    MessageRole, Offer, Question, Tracker, UnknownIntent,
};

pub use knowledge::{
    CategoryData, CreateCategoryInput, CreateKnowledgeInput, CustomCategory, EntryKind,
    KnowledgeEntry,
};

pub use phases::{CustomActionableStep, CustomPhaseConfig, Priority};

// Re-export utilities
pub use utils::{generate_id, generate_message_id, truncate};
