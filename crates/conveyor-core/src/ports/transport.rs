//! Queue transport port: the durable FIFO queue seam.

use async_trait::async_trait;
use thiserror::Error;

/// Hard upper bound on how many messages one dequeue returns.
///
/// Callers asking for more silently get at most this many. That is not an
/// error, it is the transport's contract.
pub const MAX_RECEIVE_BATCH: usize = 32;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("queue does not exist: {0}")]
    NotFound(String),

    /// The receipt was superseded by a later dequeue of the same message, or
    /// the message is already gone.
    #[error("receipt no longer valid: {0}")]
    InvalidReceipt(String),

    #[error("transport operation failed: {0}")]
    OperationFailed(String),
}

/// Opaque delivery handle required to delete a received message.
///
/// A receipt is only good until the message becomes visible again and is
/// handed out anew; the transport rotates it on every dequeue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Receipt(String);

impl Receipt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One message handed out by a dequeue.
///
/// `delivery_attempt` is maintained by the transport: it counts how many
/// times the message has become visible for processing, starting at 1. It is
/// the sole signal the pipeline uses for poison detection.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Serialized [`Envelope`](crate::domain::Envelope) bytes.
    pub body: Vec<u8>,
    pub delivery_attempt: u32,
    pub receipt: Receipt,
}

/// Durable queue port.
///
/// Dequeued messages stay on the queue but are invisible to other consumers
/// for the transport's visibility window; deleting with the receipt is the
/// only acknowledgement. This trait is the seam for swapping a remote queue
/// in behind the same pipeline.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Provision the queue if it does not exist yet. Idempotent.
    async fn ensure_exists(&self) -> Result<(), TransportError>;

    /// Append one message body to the back of the queue.
    async fn enqueue(&self, body: Vec<u8>) -> Result<(), TransportError>;

    /// Hand out up to `min(max_count, MAX_RECEIVE_BATCH)` visible messages in
    /// FIFO order, bumping each one's `delivery_attempt` and hiding it for
    /// the visibility window. An empty queue yields an empty vec.
    async fn dequeue_batch(
        &self,
        max_count: usize,
    ) -> Result<Vec<ReceivedMessage>, TransportError>;

    /// Remove a message for good. Fails with [`TransportError::InvalidReceipt`]
    /// when the receipt is stale.
    async fn delete(&self, receipt: &Receipt) -> Result<(), TransportError>;

    /// Approximate number of live messages, visible or not.
    async fn approximate_count(&self) -> Result<usize, TransportError>;
}
