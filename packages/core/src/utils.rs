// ABOUTME: Shared utility functions for Leadflow
// ABOUTME: ID generation and text helpers used in logs and transcripts

use nanoid::nanoid;

/// Generate a transcript message ID
pub fn generate_message_id() -> String {
    nanoid!(12)
}

/// Generate a prefixed ID for locally created records (`phase-…`, `step-…`)
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid!(8))
}

/// Truncate text to at most `max_chars` characters, appending an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_message_id() {
        let id1 = generate_message_id();
        let id2 = generate_message_id();

        assert_eq!(id1.len(), 12);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_id_prefix() {
        let id = generate_id("phase");
        assert!(id.starts_with("phase-"));
        assert_eq!(id.len(), "phase-".len() + 8);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("héllo wörld", 5), "héllo…");
    }
}
