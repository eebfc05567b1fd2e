//! Domain model (envelopes, processing results, archive records).

pub mod archive;
pub mod envelope;
pub mod result;

pub use archive::{ArchiveEntry, ArchiveStatus};
pub use envelope::{CodecError, Envelope};
pub use result::{Disposition, ProcessingResult};
