// ABOUTME: Conversation session state owned by the chat engine
// ABOUTME: One authoritative record; the flow state and legacy names are derived from it

use leadflow_core::{AnswerMap, ChatMessage, Intent, Tracker};

use crate::answers::AnswerStore;

/// Where a session sits in the offer → intent → questions → contact → done flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    NoOfferSelected,
    OfferSelected,
    IntentSelected,
    Answering(String),
    ContactModal(String),
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSession {
    pub selected_offer: Option<String>,
    pub current_intent: Option<Intent>,
    pub current_question_id: Option<String>,
    pub input: AnswerStore,
    pub messages: Vec<ChatMessage>,
    pub progress: u8,
    pub is_complete: bool,
    /// Last collaborator failure, for operators; never blocks the flow
    pub error: Option<String>,
    /// Question id whose contact form is open
    pub contact_modal: Option<String>,
    pub last_tracker: Option<Tracker>,
    pub conversation_id: Option<String>,
}

impl ConversationSession {
    pub fn new(greeting: ChatMessage) -> Self {
        Self {
            selected_offer: None,
            current_intent: None,
            current_question_id: None,
            input: AnswerStore::new(),
            messages: vec![greeting],
            progress: 0,
            is_complete: false,
            error: None,
            contact_modal: None,
            last_tracker: None,
            conversation_id: None,
        }
    }

    pub fn state(&self) -> FlowState {
        if self.is_complete {
            return FlowState::Complete;
        }
        if let Some(id) = &self.contact_modal {
            return FlowState::ContactModal(id.clone());
        }
        if let Some(id) = &self.current_question_id {
            return FlowState::Answering(id.clone());
        }
        match (&self.selected_offer, self.current_intent) {
            (_, Some(_)) => FlowState::IntentSelected,
            (Some(_), None) => FlowState::OfferSelected,
            (None, None) => FlowState::NoOfferSelected,
        }
    }

    pub fn user_input(&self) -> &AnswerMap {
        self.input.answers()
    }

    /// Legacy name for the selected intent
    pub fn user_type(&self) -> Option<Intent> {
        self.current_intent
    }

    /// Legacy name for the answer map
    pub fn answers(&self) -> &AnswerMap {
        self.input.answers()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
