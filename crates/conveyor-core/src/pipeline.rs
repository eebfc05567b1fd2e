//! The queue processing pipeline: receive, decode, judge, dispatch, settle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{ArchiveEntry, ArchiveStatus, Envelope, ProcessingResult};
use crate::error::PipelineError;
use crate::ports::{
    ArchiveStore, MAX_RECEIVE_BATCH, Processor, QueueTransport, Receipt, ReceivedMessage,
};

/// Drives messages from a queue transport through a processor and into the
/// archive.
///
/// Design:
/// - Collaborators arrive as trait objects at construction and never change
///   afterwards; the pipeline itself holds no mutable state, so one instance
///   can serve any number of concurrent callers.
/// - Poison detection runs before dispatch: a message whose delivery attempt
///   strictly exceeds the envelope's retry budget is archived and removed
///   without ever reaching the processor.
/// - Settlement is archive first, then delete, with no transaction across
///   the two. See [`Pipeline::process_one`] for the delivery guarantee.
pub struct Pipeline {
    transport: Arc<dyn QueueTransport>,
    archive: Arc<dyn ArchiveStore>,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn QueueTransport>, archive: Arc<dyn ArchiveStore>) -> Self {
        Self { transport, archive }
    }

    /// Put an envelope on the queue, provisioning the queue on first use.
    pub async fn enqueue(&self, envelope: &Envelope) -> Result<(), PipelineError> {
        self.transport.ensure_exists().await?;
        self.transport.enqueue(envelope.to_bytes()?).await?;
        Ok(())
    }

    /// Approximate number of messages on the queue, in flight or not.
    pub async fn queue_depth(&self) -> Result<usize, PipelineError> {
        Ok(self.transport.approximate_count().await?)
    }

    /// Receive up to `max_count` messages without processing them.
    ///
    /// Asking for more than [`MAX_RECEIVE_BATCH`] is not an error; the batch
    /// is capped there.
    pub async fn receive_batch(
        &self,
        max_count: usize,
    ) -> Result<Vec<ReceivedMessage>, PipelineError> {
        let capped = max_count.min(MAX_RECEIVE_BATCH);
        Ok(self.transport.dequeue_batch(capped).await?)
    }

    /// Run one received message through the pipeline.
    ///
    /// Order of operations:
    /// 1. Decode the body into an [`Envelope`]. An undecodable body is
    ///    [`PipelineError::MalformedMessage`]; the message stays queued.
    /// 2. Poison check: `delivery_attempt > max_retries` (strictly greater)
    ///    archives the message as poison, deletes it, and returns the poison
    ///    result without invoking the processor.
    /// 3. Dispatch the payload to the processor.
    /// 4. Settle: an empty `error` on the result means success, so archive
    ///    then delete. Any error text leaves the message on the queue for
    ///    redelivery after its visibility window.
    ///
    /// Archive and delete are two separate writes. If the delete fails after
    /// the archive append, the message comes back and is processed and
    /// archived again. Processing is therefore at-least-once and the archive
    /// may hold duplicate entries; processors must tolerate re-dispatch of a
    /// payload they have already handled.
    pub async fn process_one(
        &self,
        message: &ReceivedMessage,
        processor: &dyn Processor,
    ) -> Result<ProcessingResult, PipelineError> {
        let envelope =
            Envelope::from_bytes(&message.body).map_err(PipelineError::MalformedMessage)?;

        if message.delivery_attempt > envelope.max_retries() {
            warn!(
                message_type = envelope.message_type(),
                delivery_attempt = message.delivery_attempt,
                max_retries = envelope.max_retries(),
                "retry budget exhausted, archiving as poison"
            );
            self.archive_and_delete(&envelope, &message.receipt, ArchiveStatus::Poison)
                .await?;
            return Ok(ProcessingResult::poison());
        }

        let result = processor.process(envelope.payload()).await;

        if result.error.is_empty() {
            self.archive_and_delete(&envelope, &message.receipt, ArchiveStatus::Success)
                .await?;
            debug!(
                message_type = envelope.message_type(),
                "processed and archived"
            );
        } else {
            debug!(
                message_type = envelope.message_type(),
                error = %result.error,
                "processing failed, leaving message for redelivery"
            );
        }

        Ok(result)
    }

    /// Process the frontmost message, if any.
    ///
    /// `Ok(None)` means the queue had nothing to hand out; it is not an
    /// error and carries no fabricated result.
    pub async fn process_first(
        &self,
        processor: &dyn Processor,
    ) -> Result<Option<ProcessingResult>, PipelineError> {
        let mut batch = self.receive_batch(1).await?;
        let Some(message) = batch.pop() else {
            return Ok(None);
        };

        let result = self.process_one(&message, processor).await?;
        Ok(Some(result))
    }

    /// Receive up to `max_count` messages and process them in order.
    pub async fn process_batch(
        &self,
        max_count: usize,
        processor: &dyn Processor,
    ) -> Result<Vec<ProcessingResult>, PipelineError> {
        let batch = self.receive_batch(max_count).await?;
        self.process_messages(&batch, processor).await
    }

    /// Process already-received messages sequentially.
    ///
    /// Results align positionally with `messages`. A pipeline error on one
    /// message aborts the rest of the batch; the unprocessed remainder
    /// reappears after its visibility window.
    pub async fn process_messages(
        &self,
        messages: &[ReceivedMessage],
        processor: &dyn Processor,
    ) -> Result<Vec<ProcessingResult>, PipelineError> {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            results.push(self.process_one(message, processor).await?);
        }
        Ok(results)
    }

    /// Append an envelope to the archive under the given status.
    pub async fn archive(
        &self,
        envelope: &Envelope,
        status: ArchiveStatus,
    ) -> Result<(), PipelineError> {
        let entry = ArchiveEntry::new(envelope.to_json()?, status);
        self.archive.append(entry).await?;
        Ok(())
    }

    /// Remove a message from the queue by hand, archiving it as poison.
    ///
    /// For operator tooling: drains a message that keeps failing without
    /// waiting for its retry budget to run out. The processor is not
    /// consulted.
    pub async fn clear_poison(&self, message: &ReceivedMessage) -> Result<(), PipelineError> {
        let envelope =
            Envelope::from_bytes(&message.body).map_err(PipelineError::MalformedMessage)?;

        self.archive_and_delete(&envelope, &message.receipt, ArchiveStatus::Poison)
            .await?;
        info!(
            message_type = envelope.message_type(),
            "message cleared from queue and archived as poison"
        );
        Ok(())
    }

    /// Archive first, then delete. A failure in either step propagates and
    /// leaves the message on the queue, so nothing is ever deleted without
    /// an archive entry written first.
    async fn archive_and_delete(
        &self,
        envelope: &Envelope,
        receipt: &Receipt,
        status: ArchiveStatus,
    ) -> Result<(), PipelineError> {
        self.archive(envelope, status).await?;
        self.transport.delete(receipt).await?;
        Ok(())
    }
}
