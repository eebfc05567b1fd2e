//! conveyor-core
//!
//! Queue-backed work processing. Callers wrap payloads into envelopes and
//! enqueue them; the pipeline receives, dispatches each payload to a
//! processor, and settles every finished message into an append-only
//! archive.
//!
//! # Module map
//! - **domain**: value types (`Envelope`, `ProcessingResult`, `ArchiveEntry`)
//! - **ports**: the swap points (`QueueTransport`, `ArchiveStore`, `Processor`)
//! - **pipeline**: the engine wiring the ports together
//! - **memory**: in-memory port implementations for tests and demos
//! - **error**: the pipeline's error type

pub mod domain;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod ports;
