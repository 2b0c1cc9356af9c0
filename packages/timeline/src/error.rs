// ABOUTME: Error types for timeline phase editing
// ABOUTME: Every variant aborts the edit with the phase list unchanged

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Phase name cannot be empty")]
    EmptyName,

    #[error("Step title cannot be empty")]
    EmptyTitle,

    #[error("Advice text cannot be empty")]
    EmptyAdvice,

    #[error("Story id cannot be empty")]
    EmptyStoryId,

    #[error("A timeline holds at most {max} phases")]
    TooManyPhases { max: usize },

    #[error("A timeline needs at least {min} phases")]
    TooFewPhases { min: usize },

    #[error("Invalid phase bounds {min}..={max}")]
    InvalidBounds { min: usize, max: usize },

    #[error("Phase not found: {0}")]
    UnknownPhase(String),

    #[error("Step {step} not found in phase {phase}")]
    UnknownStep { phase: String, step: String },

    #[error("Position {position} is out of range for {len} items")]
    PositionOutOfRange { position: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, TimelineError>;
