// ABOUTME: Integration tests for the conversation sync queue
// ABOUTME: Uses an in-memory store to check create/update ordering, deltas, retries and resets

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use leadflow_client::{ClientError, ClientResult, ConversationUpdate, CreateConversationInput};
use leadflow_core::{
    AnswerMap, AnswerRecord, AnsweredVia, ChatMessage, ConversationStatus, Intent,
};
use leadflow_sync::{
    ConversationMirror, ConversationStore, RetryPolicy, SessionSnapshot, SyncOp, SyncQueue,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(usize),
    Update {
        id: String,
        messages: usize,
        answers: usize,
        progress: u8,
    },
}

#[derive(Default)]
struct MemoryStore {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<VecDeque<ClientError>>,
    next_id: Mutex<u32>,
}

impl MemoryStore {
    fn failing_with(errors: Vec<ClientError>) -> Self {
        Self {
            failures: Mutex::new(errors.into()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.failures.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(&self, input: &CreateConversationInput) -> ClientResult<String> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(input.messages.len()));
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(format!("conv-{}", next))
    }

    async fn update(&self, id: &str, update: &ConversationUpdate) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(Call::Update {
            id: id.to_string(),
            messages: update.messages.len(),
            answers: update.answers.len(),
            progress: update.progress,
        });
        Ok(())
    }
}

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_interval: Duration::from_millis(5),
        max_elapsed: Duration::from_secs(2),
    }
}

fn snapshot(messages: usize, progress: u8, answer: Option<&str>) -> SessionSnapshot {
    SessionSnapshot {
        selected_offer: "real-estate-timeline".to_string(),
        current_intent: Intent::Buy,
        messages: (0..messages)
            .map(|i| ChatMessage::user(format!("m{}", i)))
            .collect(),
        user_input: AnswerMap::new(),
        answer: answer.map(|key| AnswerRecord {
            question_id: key.to_string(),
            mapping_key: key.to_string(),
            value: "v".to_string(),
            answered_via: AnsweredVia::Button,
        }),
        status: ConversationStatus::Active,
        progress,
        current_question_id: None,
    }
}

#[tokio::test]
async fn test_updates_send_only_new_messages() {
    let store = Arc::new(MemoryStore::default());
    let queue = SyncQueue::spawn(store.clone(), fast_policy(0));

    queue.push(SyncOp::Create(snapshot(3, 0, None)));
    // Let the create land before queueing updates so they are not coalesced
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.conversation_id().as_deref(), Some("conv-1"));

    queue.push(SyncOp::Update(snapshot(5, 50, Some("propertyType"))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.push(SyncOp::Update(snapshot(7, 100, Some("budget"))));
    queue.shutdown().await;

    assert_eq!(
        store.calls(),
        vec![
            Call::Create(3),
            Call::Update {
                id: "conv-1".to_string(),
                messages: 2,
                answers: 1,
                progress: 50
            },
            Call::Update {
                id: "conv-1".to_string(),
                messages: 2,
                answers: 1,
                progress: 100
            },
        ]
    );
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let store = Arc::new(MemoryStore::failing_with(vec![
        ClientError::Network("reset".to_string()),
        ClientError::Api {
            status: 503,
            body: "busy".to_string(),
        },
    ]));
    let queue = SyncQueue::spawn(store.clone(), fast_policy(3));

    queue.push(SyncOp::Create(snapshot(1, 0, None)));
    queue.shutdown().await;

    assert_eq!(store.calls(), vec![Call::Create(1)]);
}

#[tokio::test]
async fn test_failed_update_is_resent_with_the_next_one() {
    let store = Arc::new(MemoryStore::default());
    let queue = SyncQueue::spawn(store.clone(), fast_policy(0));

    queue.push(SyncOp::Create(snapshot(2, 0, None)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    store
        .failures
        .lock()
        .unwrap()
        .push_back(ClientError::Api {
            status: 400,
            body: "bad".to_string(),
        });
    queue.push(SyncOp::Update(snapshot(4, 50, Some("propertyType"))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.push(SyncOp::Update(snapshot(6, 100, Some("budget"))));
    queue.shutdown().await;

    // The rejected delta and audit record travel with the following update
    assert_eq!(
        store.calls(),
        vec![
            Call::Create(2),
            Call::Update {
                id: "conv-1".to_string(),
                messages: 4,
                answers: 2,
                progress: 100
            },
        ]
    );
}

#[tokio::test]
async fn test_update_without_conversation_creates_one() {
    let store = Arc::new(MemoryStore::failing_with(vec![ClientError::Rejected(
        "nope".to_string(),
    )]));
    let queue = SyncQueue::spawn(store.clone(), fast_policy(0));

    queue.push(SyncOp::Create(snapshot(1, 0, None)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(queue.conversation_id().is_none());

    queue.push(SyncOp::Update(snapshot(3, 50, Some("propertyType"))));
    queue.shutdown().await;

    // The audit record follows the create in its own update
    assert_eq!(
        store.calls(),
        vec![
            Call::Create(3),
            Call::Update {
                id: "conv-1".to_string(),
                messages: 0,
                answers: 1,
                progress: 50
            },
        ]
    );
}

#[tokio::test]
async fn test_answers_survive_a_failed_create() {
    let store = Arc::new(MemoryStore::failing_with(vec![ClientError::Rejected(
        "nope".to_string(),
    )]));
    let queue = SyncQueue::spawn(store.clone(), fast_policy(0));

    queue.push(SyncOp::Create(snapshot(2, 0, None)));
    queue.push(SyncOp::Update(snapshot(4, 50, Some("propertyType"))));
    queue.push(SyncOp::Update(snapshot(6, 100, Some("budget"))));
    queue.shutdown().await;

    let calls = store.calls();
    assert!(matches!(calls.first(), Some(Call::Create(_))));

    let answers: usize = calls
        .iter()
        .map(|call| match call {
            Call::Update { answers, .. } => *answers,
            Call::Create(_) => 0,
        })
        .sum();
    assert_eq!(answers, 2);
    assert!(matches!(
        calls.last(),
        Some(Call::Update { progress: 100, .. })
    ));
}

#[tokio::test]
async fn test_reset_forgets_conversation() {
    let store = Arc::new(MemoryStore::default());
    let queue = SyncQueue::spawn(store.clone(), fast_policy(0));

    queue.push(SyncOp::Create(snapshot(2, 0, None)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    queue.push(SyncOp::Reset);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(queue.conversation_id().is_none());

    queue.push(SyncOp::Create(snapshot(2, 0, None)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(queue.conversation_id().as_deref(), Some("conv-2"));
    queue.shutdown().await;
}
