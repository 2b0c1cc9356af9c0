// ABOUTME: Best-effort persistence mirror for conversation sessions
// ABOUTME: Snapshot types, the mirror contract and a retrying background sync queue

pub mod mirror;
pub mod queue;

pub use mirror::{ConversationMirror, ConversationStore, NoopMirror, SessionSnapshot, SyncOp};
pub use queue::{RetryPolicy, SyncQueue};
