use thiserror::Error;

use crate::domain::CodecError;
use crate::ports::{ArchiveError, TransportError};

/// Errors surfaced by pipeline operations.
///
/// Only exceptional conditions land here. Expected outcomes (a processor
/// failure, a poison message, an empty queue) are modeled as data, never as
/// an error: a [`ProcessingResult`](crate::domain::ProcessingResult), a
/// `None`, an empty batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A received message whose bytes do not decode into an envelope at all.
    ///
    /// The message is left on the queue untouched: without a readable retry
    /// budget it cannot be classified as poison.
    #[error("message does not decode into an envelope: {0}")]
    MalformedMessage(#[source] CodecError),

    #[error("codec: {0}")]
    Codec(#[from] CodecError),

    #[error("queue transport: {0}")]
    Transport(#[from] TransportError),

    #[error("archive store: {0}")]
    Archive(#[from] ArchiveError),
}
