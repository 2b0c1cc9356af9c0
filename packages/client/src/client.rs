// ABOUTME: HTTP client for the Leadflow persistence endpoints
// ABOUTME: Conversations, knowledge brain, custom categories, custom phases and custom questions

use leadflow_config::Config;
use leadflow_core::{
    CreateCategoryInput, CreateKnowledgeInput, CustomCategory, CustomPhaseConfig, Intent,
    KnowledgeEntry, Question,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::api::*;
use crate::error::{ClientError, ClientResult};

#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.http_connect_timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> ClientResult<Response> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| {
                error!("{} failed: {}", what, e);
                ClientError::http(e)
            })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(what.to_string())),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                error!("{} returned {}: {}", what, status, body);
                Err(ClientError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> ClientResult<T> {
        self.send(builder, what)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Conversations
    // ------------------------------------------------------------------

    /// Create a conversation and return its server id
    pub async fn create_conversation(
        &self,
        input: &CreateConversationInput,
    ) -> ClientResult<String> {
        info!(
            "Creating conversation for {}/{}",
            input.selected_offer, input.current_intent
        );

        let response: CreateConversationResponse = self
            .send_json(
                self.http_client.post(self.url("/api/conversations")).json(input),
                "create conversation",
            )
            .await?;

        match (response.success, response.id) {
            (true, Some(id)) => Ok(id),
            (true, None) => Err(ClientError::InvalidResponse(
                "conversation created without _id".to_string(),
            )),
            (false, _) => Err(ClientError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "conversation not created".to_string()),
            )),
        }
    }

    pub async fn update_conversation(
        &self,
        id: &str,
        update: &ConversationUpdate,
    ) -> ClientResult<()> {
        debug!(
            "Updating conversation {} ({} new messages, progress {})",
            id,
            update.messages.len(),
            update.progress
        );

        self.send(
            self.http_client
                .patch(self.url(&format!("/api/conversations/{}", id)))
                .json(update),
            "update conversation",
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Knowledge brain
    // ------------------------------------------------------------------

    pub async fn knowledge_brain(&self) -> ClientResult<KnowledgeBrain> {
        info!("Fetching knowledge brain");
        self.send_json(
            self.http_client.get(self.url("/api/knowledge-brain")),
            "fetch knowledge brain",
        )
        .await
    }

    pub async fn create_category(
        &self,
        input: &CreateCategoryInput,
    ) -> ClientResult<CustomCategory> {
        info!("Creating knowledge category '{}'", input.label);

        let response: CreateCategoryResponse = self
            .send_json(
                self.http_client
                    .post(self.url("/api/knowledge-categories"))
                    .json(input),
                "create category",
            )
            .await?;

        match response.category {
            Some(category) if response.success => Ok(category),
            _ => Err(ClientError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "category not created".to_string()),
            )),
        }
    }

    pub async fn create_knowledge(
        &self,
        input: &CreateKnowledgeInput,
    ) -> ClientResult<KnowledgeEntry> {
        info!("Creating knowledge entry '{}' in {}", input.title, input.category);

        let response: CreateKnowledgeResponse = self
            .send_json(
                self.http_client
                    .post(self.url("/api/agent-knowledge"))
                    .json(input),
                "create knowledge",
            )
            .await?;

        match response.entry {
            Some(entry) if response.success => Ok(entry),
            _ => Err(ClientError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "knowledge entry not created".to_string()),
            )),
        }
    }

    pub async fn delete_knowledge(&self, id: &str) -> ClientResult<()> {
        info!("Deleting knowledge entry {}", id);
        self.send(
            self.http_client
                .delete(self.url("/api/agent-knowledge"))
                .query(&[("id", id)]),
            "delete knowledge",
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Custom phases
    // ------------------------------------------------------------------

    pub async fn custom_phases(&self, flow: Intent) -> ClientResult<Vec<CustomPhaseConfig>> {
        info!("Fetching custom phases for {}", flow);
        let response: PhasesResponse = self
            .send_json(
                self.http_client
                    .get(self.url("/api/custom-phases"))
                    .query(&[("flow", flow.as_str())]),
                "fetch custom phases",
            )
            .await?;
        Ok(response.phases)
    }

    pub async fn save_custom_phases(
        &self,
        flow: Intent,
        phases: &[CustomPhaseConfig],
    ) -> ClientResult<()> {
        info!("Saving {} custom phases for {}", phases.len(), flow);
        self.send(
            self.http_client
                .put(self.url("/api/custom-phases"))
                .query(&[("flow", flow.as_str())])
                .json(&SavePhasesRequest { flow, phases }),
            "save custom phases",
        )
        .await?;
        Ok(())
    }

    pub async fn delete_custom_phases(&self, flow: Intent) -> ClientResult<()> {
        info!("Resetting custom phases for {}", flow);
        self.send(
            self.http_client
                .delete(self.url("/api/custom-phases"))
                .query(&[("flow", flow.as_str())]),
            "delete custom phases",
        )
        .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Custom questions
    // ------------------------------------------------------------------

    pub async fn custom_questions(&self, flow: Intent) -> ClientResult<Vec<Question>> {
        info!("Fetching custom questions for {}", flow);
        let response: QuestionsResponse = self
            .send_json(
                self.http_client
                    .get(self.url("/api/custom-questions"))
                    .query(&[("flow", flow.as_str())]),
                "fetch custom questions",
            )
            .await?;
        Ok(response.questions)
    }

    pub async fn save_custom_questions(
        &self,
        flow: Intent,
        questions: &[Question],
    ) -> ClientResult<()> {
        info!("Saving {} custom questions for {}", questions.len(), flow);
        self.send(
            self.http_client
                .put(self.url("/api/custom-questions"))
                .query(&[("flow", flow.as_str())])
                .json(&SaveQuestionsRequest { flow, questions }),
            "save custom questions",
        )
        .await?;
        Ok(())
    }

    pub async fn delete_custom_questions(&self, flow: Intent) -> ClientResult<()> {
        info!("Resetting custom questions for {}", flow);
        self.send(
            self.http_client
                .delete(self.url("/api/custom-questions"))
                .query(&[("flow", flow.as_str())]),
            "delete custom questions",
        )
        .await?;
        Ok(())
    }
}
