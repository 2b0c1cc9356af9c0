// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Leadflow

// Backend API
pub const LEADFLOW_API_URL: &str = "LEADFLOW_API_URL";
pub const LEADFLOW_API_TOKEN: &str = "LEADFLOW_API_TOKEN";

// HTTP client
pub const LEADFLOW_HTTP_TIMEOUT_SECS: &str = "LEADFLOW_HTTP_TIMEOUT_SECS";
pub const LEADFLOW_HTTP_CONNECT_TIMEOUT_SECS: &str = "LEADFLOW_HTTP_CONNECT_TIMEOUT_SECS";

// Conversation engine
pub const LEADFLOW_CONTEXT_WINDOW: &str = "LEADFLOW_CONTEXT_WINDOW";
pub const LEADFLOW_SYNC_MAX_RETRIES: &str = "LEADFLOW_SYNC_MAX_RETRIES";

// Logging
pub const LEADFLOW_LOG: &str = "LEADFLOW_LOG";

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;
pub const DEFAULT_SYNC_MAX_RETRIES: u32 = 3;
pub const DEFAULT_LOG_FILTER: &str = "info";
