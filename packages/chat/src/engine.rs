// ABOUTME: Transition engine for offer, intent and question flows
// ABOUTME: Applies one user action at a time, consulting the classifier and falling back locally

use std::sync::Arc;

use leadflow_ai::{SmartChat, SmartChatRequest, SmartChatResponse, UserAction};
use leadflow_core::constants::{
    CLARIFY_FALLBACK, CONTACT_EMAIL_KEY, CONTACT_NAME_KEY, CONTACT_PHONE_KEY, COMPLETION_MESSAGE,
    DEFAULT_CONTEXT_WINDOW, GREETING, INTENT_ANSWER_KEY, INTENT_PROMPT,
};
use leadflow_core::{
    AnswerRecord, AnsweredVia, Button, ChatMessage, ConversationStatus, Intent, Offer, Question,
};
use leadflow_offers::OfferRegistry;
use leadflow_sync::{ConversationMirror, SessionSnapshot, SyncOp};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::session::{ContactDetails, ConversationSession, FlowState};

/// What a single user action did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Not valid in the current state; the session is unchanged
    Ignored,
    OfferSelected,
    IntentSelected,
    Advanced { question_id: String },
    ContactModal { question_id: String },
    Completed,
    /// The input was a question back to us; nothing was stored
    Clarified,
    Reset,
    /// Another transition is still running
    Busy,
}

/// The question being answered together with its flow coordinates
struct ActiveQuestion {
    offer: String,
    intent: Intent,
    question: Question,
    /// Key-less questions advance the flow without storing an answer
    mapping_key: Option<String>,
}

pub struct ChatEngine {
    registry: Arc<OfferRegistry>,
    smart_chat: Arc<dyn SmartChat>,
    mirror: Arc<dyn ConversationMirror>,
    context_window: usize,
    loading: watch::Sender<bool>,
    session: ConversationSession,
}

impl ChatEngine {
    pub fn new(
        registry: Arc<OfferRegistry>,
        smart_chat: Arc<dyn SmartChat>,
        mirror: Arc<dyn ConversationMirror>,
    ) -> Self {
        let session = ConversationSession::new(greeting(&registry));
        let (loading, _) = watch::channel(false);
        Self {
            registry,
            smart_chat,
            mirror,
            context_window: DEFAULT_CONTEXT_WINDOW,
            loading,
            session,
        }
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn state(&self) -> FlowState {
        self.session.state()
    }

    /// True while a classification call is in flight
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn registry(&self) -> &OfferRegistry {
        &self.registry
    }

    pub fn current_question(&self) -> Option<&Question> {
        let offer = self.session.selected_offer.as_deref()?;
        let intent = self.session.current_intent?;
        let id = self.session.current_question_id.as_deref()?;
        self.registry.question(offer, intent, id)
    }

    /// Buttons offered by the latest assistant message
    pub fn current_buttons(&self) -> &[Button] {
        self.session
            .last_message()
            .and_then(|m| m.buttons.as_deref())
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    pub async fn handle_button(&mut self, button: &Button) -> TransitionOutcome {
        if self.session.is_complete {
            debug!("Ignoring button {} on a completed session", button.id);
            return TransitionOutcome::Ignored;
        }

        if self.session.current_intent.is_none() {
            if let Some(offer) = self.registry.offer(&button.value).cloned() {
                return self.select_offer(&offer);
            }
            if self.session.selected_offer.is_some() {
                if let Ok(intent) = button.value.parse::<Intent>() {
                    return self.select_intent(intent, &button.label);
                }
            }
            debug!("Button {} does not match an offer or intent", button.value);
            return TransitionOutcome::Ignored;
        }

        self.answer(UserAction::Button(button.clone())).await
    }

    pub async fn handle_free_text(&mut self, text: &str) -> TransitionOutcome {
        let text = text.trim();
        if text.is_empty() || self.session.is_complete {
            return TransitionOutcome::Ignored;
        }
        self.answer(UserAction::FreeText(text.to_string())).await
    }

    /// Skip the current question when it is optional
    pub fn skip_current(&mut self) -> TransitionOutcome {
        let Some(active) = self.active_question() else {
            return TransitionOutcome::Ignored;
        };
        if active.question.required {
            warn!("Question {} is required and cannot be skipped", active.question.id);
            return TransitionOutcome::Ignored;
        }

        self.session.messages.push(ChatMessage::user("Skip"));
        if let Some(key) = &active.mapping_key {
            self.session.input.skip_field(key);
        }

        let outcome = self.advance(&active, None);
        self.mirror_update(None);
        outcome
    }

    /// Fill in the open contact form and continue the flow
    pub fn submit_contact(&mut self, details: ContactDetails) -> TransitionOutcome {
        let Some(question_id) = self.session.contact_modal.clone() else {
            debug!("No contact form is open");
            return TransitionOutcome::Ignored;
        };
        let email = details.email.trim();
        if email.is_empty() {
            warn!("Contact details submitted without an email");
            return TransitionOutcome::Ignored;
        }
        let Some(active) = self.active_question() else {
            return TransitionOutcome::Ignored;
        };

        info!("Contact details captured for question {}", question_id);
        let name = details.name.trim();
        if !name.is_empty() {
            self.session.input.add_answer(CONTACT_NAME_KEY, name);
        }
        self.session.input.add_answer(CONTACT_EMAIL_KEY, email);
        if let Some(phone) = details.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            self.session.input.add_answer(CONTACT_PHONE_KEY, phone);
        }
        if let Some(key) = &active.mapping_key {
            self.session.input.add_answer(key, email);
        }

        self.session.contact_modal = None;
        self.session
            .messages
            .push(ChatMessage::user(contact_summary(name, email)));

        let key = active.mapping_key.as_deref().unwrap_or(CONTACT_EMAIL_KEY);
        let record = answer_record(&active, key, email, AnsweredVia::Contact);
        let outcome = self.advance(&active, None);
        self.mirror_update(Some(record));
        outcome
    }

    /// Back to a fresh session with only the greeting
    pub fn reset(&mut self) -> TransitionOutcome {
        info!("Resetting conversation session");
        self.session = ConversationSession::new(greeting(&self.registry));
        self.mirror.push(SyncOp::Reset);
        TransitionOutcome::Reset
    }

    fn select_offer(&mut self, offer: &Offer) -> TransitionOutcome {
        info!("Offer selected: {}", offer.id);
        self.session.selected_offer = Some(offer.id.clone());
        self.session.messages.push(ChatMessage::user(offer.label.clone()));

        let buttons = offer
            .supported_intents
            .iter()
            .map(|intent| Button::new(intent.as_str(), intent.label(), intent.as_str()))
            .collect();
        self.session
            .messages
            .push(ChatMessage::assistant(INTENT_PROMPT, Some(buttons)));

        TransitionOutcome::OfferSelected
    }

    fn select_intent(&mut self, intent: Intent, label: &str) -> TransitionOutcome {
        let Some(offer) = self.session.selected_offer.clone() else {
            return TransitionOutcome::Ignored;
        };
        if !self.registry.intents_for(&offer).contains(&intent) {
            warn!("Offer {} does not support intent {}", offer, intent);
            return TransitionOutcome::Ignored;
        }

        info!("Intent selected: {} for {}", intent, offer);
        self.session.current_intent = Some(intent);
        self.session.messages.push(ChatMessage::user(label));
        self.session.input.add_answer(INTENT_ANSWER_KEY, intent.as_str());

        let outcome = match self.registry.first_question(&offer, intent).cloned() {
            Some(first) => {
                let answers = self.session.input.answers();
                self.session.progress = self.registry.progress(&offer, intent, answers);
                match self.present(first, None) {
                    modal @ TransitionOutcome::ContactModal { .. } => modal,
                    _ => TransitionOutcome::IntentSelected,
                }
            }
            None => {
                info!("Flow {}/{} has no questions; completing", offer, intent);
                self.complete(None)
            }
        };

        if let Some(snapshot) = self.snapshot(None) {
            self.mirror.push(SyncOp::Create(snapshot));
        }
        outcome
    }

    async fn answer(&mut self, action: UserAction) -> TransitionOutcome {
        if self.session.contact_modal.is_some() {
            debug!("Contact form is open; ignoring chat input");
            return TransitionOutcome::Ignored;
        }
        let Some(active) = self.active_question() else {
            return TransitionOutcome::Ignored;
        };
        self.session.error = None;
        self.session.last_tracker = None;

        match &action {
            UserAction::Button(button) => {
                self.session.messages.push(ChatMessage::user(button.label.clone()));
                if let Some(key) = &active.mapping_key {
                    self.session.input.add_answer(key, &button.value);
                }

                if let Some(tracker) = &button.tracker {
                    if let Some(insight) = &tracker.insight {
                        info!("Tracker: {}", insight);
                    }
                    self.session.last_tracker = Some(tracker.clone());
                }
            }
            UserAction::FreeText(text) => {
                self.session.messages.push(ChatMessage::user(text.clone()));
            }
        }

        let outcome = match self.classify(&action, &active).await {
            Some(response) if response.is_free_text_response => {
                debug!("Input was a clarifying question; staying on {}", active.question.id);
                let reply = Some(response.reply)
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| CLARIFY_FALLBACK.to_string());
                self.session
                    .messages
                    .push(ChatMessage::assistant(reply, active.question.buttons.clone()));
                if matches!(action, UserAction::Button(_)) {
                    // The button value stays stored
                    self.refresh_progress(&active);
                }
                TransitionOutcome::Clarified
            }
            Some(response) => {
                match &response.extracted {
                    Some(extracted) if is_storable(&extracted.mapping_key, &extracted.value) => {
                        self.session
                            .input
                            .add_answer(&extracted.mapping_key, &extracted.value);
                    }
                    _ => self.store_free_text(&action, &active),
                }
                let reply = Some(response.reply).filter(|r| !r.trim().is_empty());
                self.advance(&active, reply)
            }
            None => {
                self.store_free_text(&action, &active);
                self.advance(&active, None)
            }
        };

        let record = self.audit_record(&action, &active, &outcome);
        self.mirror_update(record);
        outcome
    }

    /// Audit entry for the stored answer, once the classifier had its say
    fn audit_record(
        &self,
        action: &UserAction,
        active: &ActiveQuestion,
        outcome: &TransitionOutcome,
    ) -> Option<AnswerRecord> {
        let key = active.mapping_key.as_deref()?;
        let (raw, via) = match action {
            UserAction::Button(button) => (button.value.as_str(), AnsweredVia::Button),
            UserAction::FreeText(_) if *outcome == TransitionOutcome::Clarified => return None,
            UserAction::FreeText(text) => (text.as_str(), AnsweredVia::Text),
        };
        let value = self.session.input.get(key).unwrap_or(raw);
        Some(answer_record(active, key, value, via))
    }

    /// Free text is stored raw when nothing better was extracted
    fn store_free_text(&mut self, action: &UserAction, active: &ActiveQuestion) {
        if let (UserAction::FreeText(text), Some(key)) = (action, &active.mapping_key) {
            self.session.input.add_answer(key, text);
        }
    }

    async fn classify(
        &mut self,
        action: &UserAction,
        active: &ActiveQuestion,
    ) -> Option<SmartChatResponse> {
        let request = SmartChatRequest::new(
            action,
            &active.offer,
            active.intent,
            &active.question,
            self.session.input.answers(),
            &self.session.messages,
            self.context_window,
        );

        self.loading.send_replace(true);
        let result = self.smart_chat.classify(&request).await;
        self.loading.send_replace(false);

        match result {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(
                    "Smart chat failed for question {}, advancing locally: {}",
                    active.question.id, e
                );
                self.session.error = Some(e.to_string());
                None
            }
        }
    }

    /// Recompute progress, then complete or move to the next question
    fn advance(&mut self, active: &ActiveQuestion, reply: Option<String>) -> TransitionOutcome {
        self.refresh_progress(active);

        let answers = self.session.input.answers();
        if self.registry.is_complete(&active.offer, active.intent, answers) {
            return self.complete(reply);
        }

        let next = self
            .registry
            .next_question(&active.offer, active.intent, &active.question.id)
            .or_else(|| self.first_unanswered_required(active))
            .cloned();

        match next {
            Some(question) => self.present(question, reply),
            None => self.complete(reply),
        }
    }

    fn refresh_progress(&mut self, active: &ActiveQuestion) {
        let answers = self.session.input.answers();
        self.session.progress = self.registry.progress(&active.offer, active.intent, answers);
    }

    /// Past the last question with required answers still missing, ask the first one again
    fn first_unanswered_required(&self, active: &ActiveQuestion) -> Option<&Question> {
        let missing = self.registry.missing_required(
            &active.offer,
            active.intent,
            self.session.input.answers(),
        );
        let key = missing.first()?;
        self.registry
            .questions(&active.offer, active.intent)
            .iter()
            .find(|q| q.mapping_key.as_deref() == Some(key.as_str()))
    }

    fn present(&mut self, question: Question, reply: Option<String>) -> TransitionOutcome {
        let question_id = question.id.clone();
        self.session.current_question_id = Some(question_id.clone());

        if question.triggers_contact_modal {
            info!("Opening contact form for question {}", question_id);
            self.session.contact_modal = Some(question_id.clone());
            return TransitionOutcome::ContactModal { question_id };
        }

        let text = reply.unwrap_or(question.text);
        self.session
            .messages
            .push(ChatMessage::assistant(text, question.buttons));
        TransitionOutcome::Advanced { question_id }
    }

    fn complete(&mut self, reply: Option<String>) -> TransitionOutcome {
        info!(
            "Conversation complete for {:?}/{:?}",
            self.session.selected_offer, self.session.current_intent
        );
        self.session.is_complete = true;
        self.session.progress = 100;
        self.session.contact_modal = None;
        self.session.messages.push(ChatMessage::assistant(
            reply.unwrap_or_else(|| COMPLETION_MESSAGE.to_string()),
            None,
        ));
        TransitionOutcome::Completed
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn active_question(&self) -> Option<ActiveQuestion> {
        let (Some(offer), Some(intent), Some(question_id)) = (
            self.session.selected_offer.clone(),
            self.session.current_intent,
            self.session.current_question_id.as_deref(),
        ) else {
            debug!("No active question; ignoring input");
            return None;
        };

        let Some(question) = self.registry.question(&offer, intent, question_id).cloned() else {
            warn!("Question {} is not part of {}/{}", question_id, offer, intent);
            return None;
        };
        Some(ActiveQuestion {
            offer,
            intent,
            mapping_key: question.mapping_key.clone(),
            question,
        })
    }

    fn snapshot(&self, answer: Option<AnswerRecord>) -> Option<SessionSnapshot> {
        Some(SessionSnapshot {
            selected_offer: self.session.selected_offer.clone()?,
            current_intent: self.session.current_intent?,
            messages: self.session.messages.clone(),
            user_input: self.session.input.answers().clone(),
            answer,
            status: if self.session.is_complete {
                ConversationStatus::Completed
            } else {
                ConversationStatus::Active
            },
            progress: self.session.progress,
            current_question_id: self.session.current_question_id.clone(),
        })
    }

    fn mirror_update(&mut self, answer: Option<AnswerRecord>) {
        if let Some(snapshot) = self.snapshot(answer) {
            self.mirror.push(SyncOp::Update(snapshot));
        }
        self.session.conversation_id = self.mirror.conversation_id();
    }
}

fn greeting(registry: &OfferRegistry) -> ChatMessage {
    let buttons = registry
        .offers()
        .iter()
        .map(|offer| Button::new(offer.id.clone(), offer.label.clone(), offer.id.clone()))
        .collect();
    ChatMessage::assistant(GREETING, Some(buttons))
}

fn answer_record(
    active: &ActiveQuestion,
    mapping_key: &str,
    value: &str,
    via: AnsweredVia,
) -> AnswerRecord {
    AnswerRecord {
        question_id: active.question.id.clone(),
        mapping_key: mapping_key.to_string(),
        value: value.to_string(),
        answered_via: via,
    }
}

/// Extracted answers may not overwrite keys the engine owns
fn is_storable(mapping_key: &str, value: &str) -> bool {
    !mapping_key.trim().is_empty() && !value.trim().is_empty() && mapping_key != INTENT_ANSWER_KEY
}

fn contact_summary(name: &str, email: &str) -> String {
    if name.is_empty() {
        email.to_string()
    } else {
        format!("{} ({})", name, email)
    }
}
