// ABOUTME: HTTP client for the smart chat classification endpoint
// ABOUTME: Sends answer context, maps transport and status failures, parses the structured reply

use async_trait::async_trait;
use leadflow_config::Config;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::types::{SmartChatRequest, SmartChatResponse};

pub const SMART_CHAT_PATH: &str = "/api/chat/smart";

#[derive(Debug, Error)]
pub enum SmartChatError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Smart chat is unavailable")]
    Unavailable,
}

pub type SmartChatResult<T> = Result<T, SmartChatError>;

/// The classification/extraction collaborator consulted on every answer
#[async_trait]
pub trait SmartChat: Send + Sync {
    async fn classify(&self, request: &SmartChatRequest) -> SmartChatResult<SmartChatResponse>;
}

pub struct SmartChatService {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl SmartChatService {
    pub fn new(config: &Config) -> SmartChatResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.http_connect_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(SMART_CHAT_PATH),
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SmartChat for SmartChatService {
    async fn classify(&self, request: &SmartChatRequest) -> SmartChatResult<SmartChatResponse> {
        info!(
            "Classifying answer for {}/{} question {}",
            request.selected_offer, request.current_intent, request.current_question_id
        );

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Smart chat request timed out");
                SmartChatError::Timeout
            } else if e.is_connect() {
                error!("Failed to connect to smart chat endpoint: {}", e);
                SmartChatError::Connection(e.to_string())
            } else {
                error!("Smart chat request failed: {}", e);
                SmartChatError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Smart chat error: {} - {}", status, body);
            return Err(SmartChatError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SmartChatResponse = response
            .json()
            .await
            .map_err(|e| SmartChatError::ParseError(e.to_string()))?;

        debug!(
            "Smart chat replied (extracted: {:?}, clarifying: {})",
            parsed.extracted, parsed.is_free_text_response
        );

        Ok(parsed)
    }
}

/// A collaborator that is never reachable, forcing local advancement
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSmartChat;

#[async_trait]
impl SmartChat for OfflineSmartChat {
    async fn classify(&self, _request: &SmartChatRequest) -> SmartChatResult<SmartChatResponse> {
        Err(SmartChatError::Unavailable)
    }
}
