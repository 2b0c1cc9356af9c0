// ABOUTME: Cloneable engine handle that serialises transitions per session
// ABOUTME: Input arriving while a transition is running is rejected as Busy

use std::sync::Arc;

use leadflow_core::Button;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::engine::{ChatEngine, TransitionOutcome};
use crate::session::{ContactDetails, ConversationSession};

#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<ChatEngine>>,
    loading: watch::Receiver<bool>,
}

impl SharedEngine {
    pub fn new(engine: ChatEngine) -> Self {
        Self {
            loading: engine.loading(),
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub async fn handle_button(&self, button: &Button) -> TransitionOutcome {
        match self.inner.try_lock() {
            Ok(mut engine) => engine.handle_button(button).await,
            Err(_) => busy("button"),
        }
    }

    pub async fn handle_free_text(&self, text: &str) -> TransitionOutcome {
        match self.inner.try_lock() {
            Ok(mut engine) => engine.handle_free_text(text).await,
            Err(_) => busy("free text"),
        }
    }

    pub fn skip_current(&self) -> TransitionOutcome {
        match self.inner.try_lock() {
            Ok(mut engine) => engine.skip_current(),
            Err(_) => busy("skip"),
        }
    }

    pub fn submit_contact(&self, details: ContactDetails) -> TransitionOutcome {
        match self.inner.try_lock() {
            Ok(mut engine) => engine.submit_contact(details),
            Err(_) => busy("contact details"),
        }
    }

    pub fn reset(&self) -> TransitionOutcome {
        match self.inner.try_lock() {
            Ok(mut engine) => engine.reset(),
            Err(_) => busy("reset"),
        }
    }

    /// Readable while a transition holds the engine
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// Copy of the session, or None while a transition is running
    pub fn session(&self) -> Option<ConversationSession> {
        self.inner
            .try_lock()
            .ok()
            .map(|engine| engine.session().clone())
    }
}

fn busy(input: &str) -> TransitionOutcome {
    debug!("Transition in flight; rejecting {}", input);
    TransitionOutcome::Busy
}
