// ABOUTME: Answer classification and extraction client
// ABOUTME: Smart chat endpoint wire types, the collaborator trait and its HTTP implementation

pub mod service;
pub mod types;

pub use service::{
    OfflineSmartChat, SmartChat, SmartChatError, SmartChatResult, SmartChatService,
    SMART_CHAT_PATH,
};
pub use types::{
    ContextMessage, Extracted, NextQuestionHint, SmartChatRequest, SmartChatResponse, UserAction,
};
