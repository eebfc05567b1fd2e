//! In-memory queue transport.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::ports::{
    MAX_RECEIVE_BATCH, QueueTransport, Receipt, ReceivedMessage, TransportError,
};

/// A message as stored on the queue.
#[derive(Debug, Clone)]
struct StoredMessage {
    body: Vec<u8>,

    /// How many times this message has been handed out.
    delivery_attempt: u32,

    /// Current receipt; `None` until the first dequeue. Rotated on every
    /// handout so earlier receipts stop matching.
    receipt: Option<Receipt>,

    /// While set and in the future, the message is hidden from dequeues.
    invisible_until: Option<Instant>,
}

#[derive(Debug, Default)]
struct TransportState {
    exists: bool,
    messages: VecDeque<StoredMessage>,
}

/// Single-process [`QueueTransport`] with remote-queue semantics.
///
/// Behaves like the durable queue it stands in for:
/// - the queue must be provisioned with `ensure_exists` before use,
/// - dequeued messages stay stored but invisible for the visibility window,
/// - every handout increments `delivery_attempt` and rotates the receipt,
/// - a batch never exceeds [`MAX_RECEIVE_BATCH`] messages.
///
/// State lives behind a single mutex owned by this instance, so independent
/// instances (one per test, say) never share anything.
pub struct InMemoryTransport {
    name: String,
    visibility_timeout: Duration,
    state: Mutex<TransportState>,
}

impl InMemoryTransport {
    /// `visibility_timeout` is how long a dequeued message stays hidden
    /// before it becomes deliverable again. `Duration::ZERO` makes
    /// redelivery immediate, which keeps tests and demos deterministic.
    pub fn new(name: impl Into<String>, visibility_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            visibility_timeout,
            state: Mutex::new(TransportState::default()),
        }
    }
}

#[async_trait]
impl QueueTransport for InMemoryTransport {
    async fn ensure_exists(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        state.exists = true;
        Ok(())
    }

    async fn enqueue(&self, body: Vec<u8>) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        if !state.exists {
            return Err(TransportError::NotFound(self.name.clone()));
        }

        state.messages.push_back(StoredMessage {
            body,
            delivery_attempt: 0,
            receipt: None,
            invisible_until: None,
        });
        Ok(())
    }

    async fn dequeue_batch(
        &self,
        max_count: usize,
    ) -> Result<Vec<ReceivedMessage>, TransportError> {
        let mut state = self.state.lock().await;
        if !state.exists {
            return Err(TransportError::NotFound(self.name.clone()));
        }

        let now = Instant::now();
        let limit = max_count.min(MAX_RECEIVE_BATCH);
        let mut handed_out = Vec::new();

        for stored in state.messages.iter_mut() {
            if handed_out.len() == limit {
                break;
            }
            if let Some(until) = stored.invisible_until
                && until > now
            {
                continue;
            }

            stored.delivery_attempt += 1;
            stored.invisible_until = Some(now + self.visibility_timeout);
            let receipt = Receipt::new(Ulid::new().to_string());
            stored.receipt = Some(receipt.clone());

            handed_out.push(ReceivedMessage {
                body: stored.body.clone(),
                delivery_attempt: stored.delivery_attempt,
                receipt,
            });
        }

        Ok(handed_out)
    }

    async fn delete(&self, receipt: &Receipt) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        if !state.exists {
            return Err(TransportError::NotFound(self.name.clone()));
        }

        let position = state
            .messages
            .iter()
            .position(|stored| stored.receipt.as_ref() == Some(receipt));
        match position {
            Some(index) => {
                state.messages.remove(index);
                Ok(())
            }
            None => Err(TransportError::InvalidReceipt(receipt.to_string())),
        }
    }

    async fn approximate_count(&self) -> Result<usize, TransportError> {
        let state = self.state.lock().await;
        if !state.exists {
            return Err(TransportError::NotFound(self.name.clone()));
        }
        Ok(state.messages.len())
    }
}
