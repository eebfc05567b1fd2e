//! Processing results: the common shape every processor invocation produces.

use serde::{Deserialize, Serialize};

/// What became of one processed message.
///
/// The three dispositions map onto the pipeline's terminal states:
/// - `Success`: archived as success and deleted from the queue.
/// - `Retryable`: left on the queue; the transport will redeliver it.
/// - `Poison`: retry budget exceeded; archived as poison and deleted without
///   invoking the processor.
///
/// Historically success and poison were distinguishable only by error text;
/// the explicit tag exists so callers never have to parse `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Success,
    Retryable,
    Poison,
}

/// Result of processing one message.
///
/// Invariant (held by the constructors): `error` is empty exactly when the
/// disposition is `Success`. The pipeline returns processor results
/// unchanged, so `response` is whatever the processor produced; the pipeline
/// never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub disposition: Disposition,
    pub error: String,
    pub response: String,
}

impl ProcessingResult {
    /// A successful outcome with a processor-defined response payload.
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            disposition: Disposition::Success,
            error: String::new(),
            response: response.into(),
        }
    }

    /// A failed outcome that leaves the message on the queue for redelivery.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            disposition: Disposition::Retryable,
            error: error.into(),
            response: String::new(),
        }
    }

    /// The canonical poison outcome produced when a message's delivery
    /// attempts exceed its retry budget.
    pub fn poison() -> Self {
        Self {
            disposition: Disposition::Poison,
            error: "Max retry count has been exceeded.".to_string(),
            response: String::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.disposition == Disposition::Success
    }
}
