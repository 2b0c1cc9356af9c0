// ABOUTME: Background queue that mirrors session snapshots to the conversation store
// ABOUTME: Coalesces updates, resends unacknowledged messages and retries transient failures

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use backoff::{future::retry, ExponentialBackoff};
use leadflow_client::ClientResult;
use leadflow_core::AnswerRecord;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::mirror::{ConversationMirror, ConversationStore, SessionSnapshot, SyncOp};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_millis(250),
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// Handle to the mirroring task; pushing never waits on the network
pub struct SyncQueue {
    sender: mpsc::UnboundedSender<SyncOp>,
    conversation_id: watch::Receiver<Option<String>>,
    worker: JoinHandle<()>,
}

impl SyncQueue {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(store: Arc<dyn ConversationStore>, policy: RetryPolicy) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (id_sender, conversation_id) = watch::channel(None);

        let worker = SyncWorker {
            store,
            policy,
            receiver,
            id_sender,
            conversation_id: None,
            acked_messages: 0,
            pending_answers: Vec::new(),
        };

        Self {
            sender,
            conversation_id,
            worker: tokio::spawn(worker.run()),
        }
    }

    /// Stop accepting work and wait until everything queued has been attempted
    pub async fn shutdown(self) {
        let SyncQueue { sender, worker, .. } = self;
        drop(sender);
        if let Err(e) = worker.await {
            error!("Conversation sync worker panicked: {}", e);
        }
    }
}

impl ConversationMirror for SyncQueue {
    fn push(&self, op: SyncOp) {
        if self.sender.send(op).is_err() {
            warn!("Conversation sync worker has stopped; dropping update");
        }
    }

    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.borrow().clone()
    }
}

struct SyncWorker {
    store: Arc<dyn ConversationStore>,
    policy: RetryPolicy,
    receiver: mpsc::UnboundedReceiver<SyncOp>,
    id_sender: watch::Sender<Option<String>>,
    conversation_id: Option<String>,
    /// Transcript length the server has confirmed
    acked_messages: usize,
    /// Audit records not yet confirmed by the server
    pending_answers: Vec<AnswerRecord>,
}

impl SyncWorker {
    async fn run(mut self) {
        let mut deferred: Option<SyncOp> = None;

        loop {
            let op = match deferred.take() {
                Some(op) => op,
                None => match self.receiver.recv().await {
                    Some(op) => op,
                    None => break,
                },
            };

            match op {
                SyncOp::Create(snapshot) => self.create(snapshot).await,
                SyncOp::Update(snapshot) => {
                    let (latest, next) = self.coalesce(snapshot);
                    deferred = next;
                    self.update(latest).await;
                }
                SyncOp::Reset => self.reset(),
            }
        }

        debug!("Conversation sync worker stopped");
    }

    /// Fold queued updates into the newest snapshot, keeping every audit record
    fn coalesce(&mut self, snapshot: SessionSnapshot) -> (SessionSnapshot, Option<SyncOp>) {
        let mut latest = snapshot;
        self.pending_answers.extend(latest.answer.take());

        while let Ok(next) = self.receiver.try_recv() {
            match next {
                SyncOp::Update(mut snapshot) => {
                    self.pending_answers.extend(snapshot.answer.take());
                    latest = snapshot;
                }
                other => return (latest, Some(other)),
            }
        }

        (latest, None)
    }

    fn reset(&mut self) {
        info!("Forgetting mirrored conversation {:?}", self.conversation_id);
        self.conversation_id = None;
        self.acked_messages = 0;
        self.pending_answers.clear();
        self.id_sender.send_replace(None);
    }

    async fn create(&mut self, snapshot: SessionSnapshot) {
        if self.conversation_id.is_some() {
            // A create after an un-reset conversation starts a new one
            self.reset();
        }

        let input = snapshot.to_create_input();
        let store = Arc::clone(&self.store);
        let result = self
            .with_retry("create conversation", || {
                let store = Arc::clone(&store);
                let input = input.clone();
                async move { store.create(&input).await }
            })
            .await;

        match result {
            Ok(id) => {
                info!("Mirroring session to conversation {}", id);
                self.conversation_id = Some(id.clone());
                self.acked_messages = snapshot.messages.len();
                self.id_sender.send_replace(Some(id));
            }
            Err(e) => error!("Failed to create conversation: {}", e),
        }
    }

    async fn update(&mut self, mut snapshot: SessionSnapshot) {
        self.pending_answers.extend(snapshot.answer.take());

        if self.conversation_id.is_none() {
            // Creation never succeeded; the full snapshot doubles as the create
            warn!("No mirrored conversation yet; creating one from the latest snapshot");
            self.create(snapshot.clone()).await;
            if self.conversation_id.is_none() || self.pending_answers.is_empty() {
                return;
            }
            // Audit records have no place in the create body
            debug!(
                "Sending {} audit records held back by the failed create",
                self.pending_answers.len()
            );
        }

        self.send_update(snapshot).await;
    }

    async fn send_update(&mut self, snapshot: SessionSnapshot) {
        let Some(id) = self.conversation_id.clone() else {
            return;
        };

        let update = snapshot.to_update(self.acked_messages, self.pending_answers.clone());
        let store = Arc::clone(&self.store);
        let result = self
            .with_retry("update conversation", || {
                let store = Arc::clone(&store);
                let id = id.clone();
                let update = update.clone();
                async move { store.update(&id, &update).await }
            })
            .await;

        match result {
            Ok(()) => {
                self.acked_messages = snapshot.messages.len();
                self.pending_answers.clear();
            }
            Err(e) => error!(
                "Failed to update conversation {} ({} answers pending): {}",
                id,
                self.pending_answers.len(),
                e
            ),
        }
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut operation: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let policy = ExponentialBackoff {
            current_interval: self.policy.initial_interval,
            initial_interval: self.policy.initial_interval,
            max_elapsed_time: Some(self.policy.max_elapsed),
            ..Default::default()
        };
        let max_retries = self.policy.max_retries;
        let mut attempts: u32 = 0;

        retry(policy, || {
            attempts += 1;
            let attempt = attempts;
            let call = operation();
            async move {
                match call.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_transient() && attempt <= max_retries => {
                        warn!("{} attempt {} failed, retrying: {}", what, attempt, e);
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }
}
