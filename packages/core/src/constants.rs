/// Answer map key that records the selected intent
pub const INTENT_ANSWER_KEY: &str = "intent";

/// Answer map keys written by the contact capture modal
pub const CONTACT_NAME_KEY: &str = "contactName";
pub const CONTACT_EMAIL_KEY: &str = "contactEmail";
pub const CONTACT_PHONE_KEY: &str = "contactPhone";

/// Number of trailing transcript messages sent to the extraction endpoint
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// Greeting shown when a session starts or is reset
pub const GREETING: &str =
    "Hi there! I can put together a personalised plan for your next move. What would you like help with?";

pub const INTENT_PROMPT: &str =
    "Great choice. Are you looking to buy, sell, or just browsing for now?";

pub const COMPLETION_MESSAGE: &str =
    "Thanks, that's everything I need. Your personalised timeline is on its way!";

pub const CLARIFY_FALLBACK: &str =
    "Sorry, I didn't quite catch that. Could you answer that another way?";
