// ABOUTME: Timeline phase type definitions
// ABOUTME: Custom phases and their actionable steps as persisted per flow

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomActionableStep {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_story_id: Option<String>,
}

impl CustomActionableStep {
    /// A step counts as advised when either advice source is set
    pub fn has_advice(&self) -> bool {
        self.linked_story_id.is_some()
            || self
                .inline_experience
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPhaseConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub description: String,
    pub order: usize,
    #[serde(default)]
    pub actionable_steps: Vec<CustomActionableStep>,
}
