// ABOUTME: Error types for the offers package
// ABOUTME: Configuration errors detected while building or extending the registry

use leadflow_core::Intent;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown offer: {0}")]
    UnknownOffer(String),

    #[error("Offer registered twice: {0}")]
    DuplicateOffer(String),

    #[error("Offer {offer} does not support intent {intent}")]
    UnsupportedIntent { offer: String, intent: Intent },

    #[error("Duplicate question id '{question_id}' in {offer}/{intent}")]
    DuplicateQuestionId {
        offer: String,
        intent: Intent,
        question_id: String,
    },

    #[error("Duplicate mapping key '{mapping_key}' in {offer}/{intent}")]
    DuplicateMappingKey {
        offer: String,
        intent: Intent,
        mapping_key: String,
    },

    #[error("Mapping key '{mapping_key}' is reserved ({offer}/{intent})")]
    ReservedMappingKey {
        offer: String,
        intent: Intent,
        mapping_key: String,
    },

    #[error("Question in {offer}/{intent} has an empty id")]
    EmptyQuestionId { offer: String, intent: Intent },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
