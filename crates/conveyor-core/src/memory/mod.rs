//! In-memory backends for the transport and archive ports.
//!
//! These are real implementations, not mocks: they enforce the same
//! semantics a remote queue and table would (provisioning, visibility,
//! receipt rotation), just without the network. Tests and demos run
//! against them; production code swaps in networked implementations of
//! the same ports.

mod archive;
mod transport;

pub use archive::InMemoryArchive;
pub use transport::InMemoryTransport;
