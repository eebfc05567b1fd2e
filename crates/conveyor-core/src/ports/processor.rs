//! Processor contract: the caller-supplied unit of work.

use async_trait::async_trait;

use crate::domain::ProcessingResult;

/// Business logic invoked for each in-budget message.
///
/// `payload` is the envelope's serialized payload text, not the raw transport
/// bytes. Decode it with [`Envelope::unwrap`](crate::domain::Envelope::unwrap)
/// or any other way the implementation likes.
///
/// Failure is data, not an error: return [`ProcessingResult::failure`] to
/// leave the message on the queue for redelivery. Because delivery is
/// at-least-once, implementations must tolerate seeing the same payload more
/// than once (a worker can crash between processing and delete).
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, payload: &str) -> ProcessingResult;
}
