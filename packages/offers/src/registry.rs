// ABOUTME: Typed registry of offers and their per-intent question flows
// ABOUTME: Pure lookups for first/next question, completion and progress over an answer map

use std::collections::{HashMap, HashSet};

use leadflow_core::constants::{
    CONTACT_EMAIL_KEY, CONTACT_NAME_KEY, CONTACT_PHONE_KEY, INTENT_ANSWER_KEY,
};
use leadflow_core::{AnswerMap, Intent, Offer, Question};
use tracing::{debug, info};

use crate::error::{RegistryError, Result};

/// Keys the engine writes itself and which questions may not claim
const RESERVED_KEYS: [&str; 4] = [
    INTENT_ANSWER_KEY,
    CONTACT_NAME_KEY,
    CONTACT_EMAIL_KEY,
    CONTACT_PHONE_KEY,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FlowKey {
    offer: String,
    intent: Intent,
}

impl FlowKey {
    fn new(offer: &str, intent: Intent) -> Self {
        Self {
            offer: offer.to_string(),
            intent,
        }
    }
}

/// Offers in registration order plus one validated, ordered question list per (offer, intent)
#[derive(Debug, Clone, Default)]
pub struct OfferRegistry {
    offers: Vec<Offer>,
    flows: HashMap<FlowKey, Vec<Question>>,
}

#[derive(Debug, Default)]
pub struct OfferRegistryBuilder {
    offers: Vec<Offer>,
    flows: Vec<(String, Intent, Vec<Question>)>,
}

impl OfferRegistryBuilder {
    pub fn offer(mut self, offer: Offer) -> Self {
        self.offers.push(offer);
        self
    }

    pub fn flow(mut self, offer: &str, intent: Intent, questions: Vec<Question>) -> Self {
        self.flows.push((offer.to_string(), intent, questions));
        self
    }

    /// Validate everything and fail on the first configuration error
    pub fn build(self) -> Result<OfferRegistry> {
        let mut registry = OfferRegistry::default();

        for offer in self.offers {
            if registry.offer(&offer.id).is_some() {
                return Err(RegistryError::DuplicateOffer(offer.id));
            }
            registry.offers.push(offer);
        }

        for (offer, intent, questions) in self.flows {
            registry.install_flow(&offer, intent, questions)?;
        }

        info!(
            "Built offer registry with {} offers and {} flows",
            registry.offers.len(),
            registry.flows.len()
        );

        Ok(registry)
    }
}

impl OfferRegistry {
    pub fn builder() -> OfferRegistryBuilder {
        OfferRegistryBuilder::default()
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn offer(&self, offer_id: &str) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == offer_id)
    }

    pub fn intents_for(&self, offer_id: &str) -> &[Intent] {
        self.offer(offer_id)
            .map(|o| o.supported_intents.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the questions of one flow with a persisted custom configuration
    pub fn with_custom_flow(
        &mut self,
        offer: &str,
        intent: Intent,
        questions: Vec<Question>,
    ) -> Result<()> {
        info!(
            "Installing custom flow for {}/{} ({} questions)",
            offer,
            intent,
            questions.len()
        );
        self.install_flow(offer, intent, questions)
    }

    fn install_flow(
        &mut self,
        offer: &str,
        intent: Intent,
        mut questions: Vec<Question>,
    ) -> Result<()> {
        let registered = self
            .offer(offer)
            .ok_or_else(|| RegistryError::UnknownOffer(offer.to_string()))?;

        if !registered.supports(intent) {
            return Err(RegistryError::UnsupportedIntent {
                offer: offer.to_string(),
                intent,
            });
        }

        validate_questions(offer, intent, &questions)?;

        // Stable sort keeps declaration order for equal `order` values
        questions.sort_by_key(|q| q.order);

        self.flows.insert(FlowKey::new(offer, intent), questions);
        Ok(())
    }

    /// All questions of a flow in ascending order; empty for unknown pairs
    pub fn questions(&self, offer: &str, intent: Intent) -> &[Question] {
        self.flows
            .get(&FlowKey::new(offer, intent))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first_question(&self, offer: &str, intent: Intent) -> Option<&Question> {
        self.questions(offer, intent).first()
    }

    pub fn question(&self, offer: &str, intent: Intent, question_id: &str) -> Option<&Question> {
        self.questions(offer, intent)
            .iter()
            .find(|q| q.id == question_id)
    }

    pub fn next_question(
        &self,
        offer: &str,
        intent: Intent,
        current_question_id: &str,
    ) -> Option<&Question> {
        let questions = self.questions(offer, intent);
        let Some(position) = questions.iter().position(|q| q.id == current_question_id) else {
            debug!(
                "Unknown question id {} for {}/{}",
                current_question_id, offer, intent
            );
            return None;
        };
        questions.get(position + 1)
    }

    pub fn question_count(&self, offer: &str, intent: Intent) -> usize {
        self.questions(offer, intent).len()
    }

    /// Every required question with a mapping key has a non-empty answer
    pub fn is_complete(&self, offer: &str, intent: Intent, user_input: &AnswerMap) -> bool {
        self.questions(offer, intent)
            .iter()
            .filter(|q| q.required)
            .filter_map(|q| q.mapping_key.as_deref())
            .all(|key| has_answer(user_input, key))
    }

    /// Mapping keys of required questions still missing an answer
    pub fn missing_required(
        &self,
        offer: &str,
        intent: Intent,
        user_input: &AnswerMap,
    ) -> Vec<String> {
        self.questions(offer, intent)
            .iter()
            .filter(|q| q.required)
            .filter_map(|q| q.mapping_key.as_deref())
            .filter(|key| !has_answer(user_input, key))
            .map(str::to_string)
            .collect()
    }

    /// Percentage of this flow's mapping keys that hold an answer, 0..=100
    pub fn progress(&self, offer: &str, intent: Intent, user_input: &AnswerMap) -> u8 {
        let questions = self.questions(offer, intent);
        if questions.is_empty() {
            return 100;
        }

        let answered = questions
            .iter()
            .filter_map(|q| q.mapping_key.as_deref())
            .filter(|key| has_answer(user_input, key))
            .count();

        let percent = (100.0 * answered as f64 / questions.len() as f64).round();
        percent.clamp(0.0, 100.0) as u8
    }
}

fn has_answer(user_input: &AnswerMap, key: &str) -> bool {
    user_input
        .get(key)
        .is_some_and(|value| !value.trim().is_empty())
}

fn validate_questions(offer: &str, intent: Intent, questions: &[Question]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut keys = HashSet::new();

    for question in questions {
        if question.id.trim().is_empty() {
            return Err(RegistryError::EmptyQuestionId {
                offer: offer.to_string(),
                intent,
            });
        }

        if !ids.insert(question.id.as_str()) {
            return Err(RegistryError::DuplicateQuestionId {
                offer: offer.to_string(),
                intent,
                question_id: question.id.clone(),
            });
        }

        if let Some(key) = question.mapping_key.as_deref() {
            if RESERVED_KEYS.contains(&key) {
                return Err(RegistryError::ReservedMappingKey {
                    offer: offer.to_string(),
                    intent,
                    mapping_key: key.to_string(),
                });
            }
            if !keys.insert(key) {
                return Err(RegistryError::DuplicateMappingKey {
                    offer: offer.to_string(),
                    intent,
                    mapping_key: key.to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::Button;

    fn offer() -> Offer {
        Offer {
            id: "demo".to_string(),
            label: "Demo".to_string(),
            description: String::new(),
            supported_intents: vec![Intent::Buy],
        }
    }

    #[test]
    fn test_questions_sorted_by_order() {
        let registry = OfferRegistry::builder()
            .offer(offer())
            .flow(
                "demo",
                Intent::Buy,
                vec![
                    Question::open("b", "Second", "b").with_order(2),
                    Question::open("a", "First", "a").with_order(1),
                ],
            )
            .build()
            .unwrap();

        assert_eq!(registry.first_question("demo", Intent::Buy).unwrap().id, "a");
        assert_eq!(
            registry.next_question("demo", Intent::Buy, "a").unwrap().id,
            "b"
        );
    }

    #[test]
    fn test_reserved_key_rejected() {
        let result = OfferRegistry::builder()
            .offer(offer())
            .flow(
                "demo",
                Intent::Buy,
                vec![Question::choice(
                    "q",
                    "Which?",
                    "intent",
                    vec![Button::new("x", "X", "x")],
                )],
            )
            .build();

        assert!(matches!(result, Err(RegistryError::ReservedMappingKey { .. })));
    }

    #[test]
    fn test_whitespace_answer_does_not_count() {
        let registry = OfferRegistry::builder()
            .offer(offer())
            .flow("demo", Intent::Buy, vec![Question::open("a", "A?", "a")])
            .build()
            .unwrap();

        let mut input = AnswerMap::new();
        input.insert("a".to_string(), "   ".to_string());

        assert!(!registry.is_complete("demo", Intent::Buy, &input));
        assert_eq!(registry.progress("demo", Intent::Buy, &input), 0);
        assert_eq!(registry.missing_required("demo", Intent::Buy, &input), vec!["a"]);
    }
}
