// ABOUTME: Leadflow chat engine - the conversation state machine
// ABOUTME: Session state, answer storage, transitions and the serialising shared handle

pub mod answers;
pub mod engine;
pub mod session;
pub mod shared;

pub use answers::AnswerStore;
pub use engine::{ChatEngine, TransitionOutcome};
pub use session::{ContactDetails, ConversationSession, FlowState};
pub use shared::SharedEngine;
