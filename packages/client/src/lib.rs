// ABOUTME: REST client for the Leadflow persistence API
// ABOUTME: Conversation mirroring, knowledge brain, categories, custom phases and questions

pub mod api;
pub mod client;
pub mod error;

pub use api::{
    CategorySummary, ConversationUpdate, CreateConversationInput, CreateConversationResponse,
    KnowledgeBrain,
};
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
