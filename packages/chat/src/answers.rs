// ABOUTME: Answer map plus the set of fields the user chose to skip
// ABOUTME: The only place session answers are written

use std::collections::BTreeSet;

use leadflow_core::AnswerMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    user_input: AnswerMap,
    skipped_fields: BTreeSet<String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer, un-skipping the field. Returns false when nothing changed.
    pub fn add_answer(&mut self, mapping_key: &str, value: &str) -> bool {
        let unskipped = self.skipped_fields.remove(mapping_key);
        let previous = self
            .user_input
            .insert(mapping_key.to_string(), value.to_string());

        let changed = unskipped || previous.as_deref() != Some(value);
        if changed {
            debug!("Stored answer for {}", mapping_key);
        }
        changed
    }

    pub fn skip_field(&mut self, mapping_key: &str) {
        debug!("Skipping field {}", mapping_key);
        self.skipped_fields.insert(mapping_key.to_string());
    }

    pub fn is_skipped(&self, mapping_key: &str) -> bool {
        self.skipped_fields.contains(mapping_key)
    }

    pub fn get(&self, mapping_key: &str) -> Option<&str> {
        self.user_input.get(mapping_key).map(String::as_str)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.user_input
    }

    pub fn skipped_fields(&self) -> &BTreeSet<String> {
        &self.skipped_fields
    }

    pub fn len(&self) -> usize {
        self.user_input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_input.is_empty()
    }

    pub fn clear(&mut self) {
        self.user_input.clear();
        self.skipped_fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_answer_is_idempotent() {
        let mut store = AnswerStore::new();
        assert!(store.add_answer("budget", "400-600k"));
        assert!(!store.add_answer("budget", "400-600k"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("budget"), Some("400-600k"));
    }

    #[test]
    fn test_overwrite_reports_change() {
        let mut store = AnswerStore::new();
        store.add_answer("budget", "400-600k");
        assert!(store.add_answer("budget", "600k+"));
        assert_eq!(store.get("budget"), Some("600k+"));
    }

    #[test]
    fn test_answer_unskips_field() {
        let mut store = AnswerStore::new();
        store.skip_field("mustHaves");
        assert!(store.is_skipped("mustHaves"));

        store.add_answer("mustHaves", "garage");
        assert!(!store.is_skipped("mustHaves"));
        assert!(store.skipped_fields().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = AnswerStore::new();
        store.add_answer("a", "1");
        store.skip_field("b");
        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_skipped("b"));
    }
}
