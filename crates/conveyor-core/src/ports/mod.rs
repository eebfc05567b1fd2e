//! Ports: the seams between the pipeline and its external collaborators.
//!
//! The pipeline consumes two of these ([`QueueTransport`], [`ArchiveStore`])
//! and is handed the third ([`Processor`]) by the integrator. Production and
//! in-memory implementations are interchangeable behind them.

pub mod archive_store;
pub mod processor;
pub mod transport;

pub use archive_store::{ArchiveError, ArchiveStore};
pub use processor::Processor;
pub use transport::{
    MAX_RECEIVE_BATCH, QueueTransport, Receipt, ReceivedMessage, TransportError,
};
