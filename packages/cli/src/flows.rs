// ABOUTME: Builds the offer registry used by the terminal driver
// ABOUTME: Starts from the built-in catalogue and layers saved custom questions on top

use leadflow_client::{ApiClient, ClientError};
use leadflow_offers::{builtin, OfferRegistry, REAL_ESTATE_TIMELINE};
use tracing::{debug, info, warn};

/// Built-in flows, replaced per intent by any custom questions the agent saved.
///
/// Custom question sets belong to the timeline offer. A missing, empty,
/// unreachable or invalid set keeps the built-in flow for that intent.
pub async fn load_registry(client: Option<&ApiClient>) -> leadflow_offers::Result<OfferRegistry> {
    let mut registry = builtin()?;
    let Some(client) = client else {
        return Ok(registry);
    };

    for intent in registry.intents_for(REAL_ESTATE_TIMELINE).to_vec() {
        match client.custom_questions(intent).await {
            Ok(questions) if questions.is_empty() => {
                debug!("No custom questions for {}", intent);
            }
            Ok(questions) => {
                if let Err(e) = registry.with_custom_flow(REAL_ESTATE_TIMELINE, intent, questions) {
                    warn!("Ignoring invalid custom questions for {}: {}", intent, e);
                } else {
                    info!("Using custom questions for {}", intent);
                }
            }
            Err(ClientError::NotFound(_)) => debug!("No custom questions saved for {}", intent),
            Err(e) => warn!("Could not load custom questions for {}: {}", intent, e),
        }
    }

    Ok(registry)
}
