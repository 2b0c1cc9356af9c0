// ABOUTME: Conversation type definitions shared across Leadflow packages
// ABOUTME: Offers, intents, questions, buttons, chat messages and answer audit records

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::generate_message_id;

/// Structured answers keyed by mapping key
pub type AnswerMap = BTreeMap<String, String>;

/// The user's high-level goal, chosen right after the offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Buy,
    Sell,
    Browse,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::Buy, Intent::Sell, Intent::Browse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Buy => "buy",
            Intent::Sell => "sell",
            Intent::Browse => "browse",
        }
    }

    /// Label shown on the intent selection button
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Buy => "I'm buying",
            Intent::Sell => "I'm selling",
            Intent::Browse => "Just browsing",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntent(pub String);

impl fmt::Display for UnknownIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown intent: {}", self.0)
    }
}

impl std::error::Error for UnknownIntent {}

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Intent::Buy),
            "sell" => Ok(Intent::Sell),
            "browse" => Ok(Intent::Browse),
            _ => Err(UnknownIntent(s.to_string())),
        }
    }
}

/// Immediate UI feedback attached to a button
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,
}

impl Button {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            mapping_key: None,
            tracker: None,
        }
    }

    /// Attach insight / db activity feedback to this button
    pub fn with_tracker(mut self, insight: &str, db_message: &str) -> Self {
        self.tracker = Some(Tracker {
            insight: Some(insight.to_string()),
            db_message: Some(db_message.to_string()),
        });
        self
    }
}

fn default_required() -> bool {
    true
}

/// One step of an offer + intent question flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    /// Absent in persisted configs means required
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub free_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_phase_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_story_id: Option<String>,
    #[serde(default)]
    pub triggers_contact_modal: bool,
    #[serde(default)]
    pub order: i32,
}

impl Question {
    /// Create a closed-choice question
    pub fn choice(
        id: impl Into<String>,
        text: impl Into<String>,
        mapping_key: impl Into<String>,
        buttons: Vec<Button>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            mapping_key: Some(mapping_key.into()),
            buttons: Some(buttons),
            required: true,
            free_text: false,
            linked_phase_id: None,
            linked_step_id: None,
            linked_story_id: None,
            triggers_contact_modal: false,
            order: 0,
        }
    }

    /// Create a typed-answer question
    pub fn open(
        id: impl Into<String>,
        text: impl Into<String>,
        mapping_key: impl Into<String>,
    ) -> Self {
        Self {
            buttons: None,
            free_text: true,
            ..Self::choice(id, text, mapping_key, Vec::new())
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Make this question skippable
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Show the contact capture modal instead of a chat bubble
    pub fn contact_modal(mut self) -> Self {
        self.triggers_contact_modal = true;
        self
    }

    pub fn linked_to_phase(mut self, phase_id: &str) -> Self {
        self.linked_phase_id = Some(phase_id.to_string());
        self
    }

    pub fn button_list(&self) -> &[Button] {
        self.buttons.as_deref().unwrap_or(&[])
    }

    pub fn is_free_text(&self) -> bool {
        self.free_text || self.button_list().is_empty()
    }

    pub fn find_button(&self, value: &str) -> Option<&Button> {
        self.button_list().iter().find(|b| b.value == value)
    }
}

/// A journey type exposed to end users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub supported_intents: Vec<Intent>,
}

impl Offer {
    pub fn supports(&self, intent: Intent) -> bool {
        self.supported_intents.contains(&intent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// An entry in the append-only chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<serde_json::Value>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role: MessageRole::User,
            content: content.into(),
            buttons: None,
            timestamp: Utc::now(),
            visual: None,
        }
    }

    pub fn assistant(content: impl Into<String>, buttons: Option<Vec<Button>>) -> Self {
        Self {
            id: generate_message_id(),
            role: MessageRole::Assistant,
            content: content.into(),
            buttons: buttons.filter(|b| !b.is_empty()),
            timestamp: Utc::now(),
            visual: None,
        }
    }
}

/// How an answer entered the answer map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnsweredVia {
    Button,
    Text,
    Contact,
}

/// Per-answer audit record mirrored to the conversation store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub mapping_key: String,
    pub value: String,
    pub answered_via: AnsweredVia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Completed,
}
