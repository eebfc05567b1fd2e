//! Envelope: the serialized unit of work carried on the queue.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors from the payload codec (wrap/unwrap) and the envelope wire form.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("value cannot be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("payload cannot be deserialized: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// A caller payload plus its retry budget and type tag.
///
/// Design:
/// - The payload is stored in serialized form (JSON text), so the envelope
///   itself never depends on the caller's types.
/// - All fields are private and set once at construction; an envelope is
///   immutable value data.
/// - `max_retries` is the delivery-attempt budget used for poison detection.
///   The pipeline compares it against the transport's delivery counter and
///   keeps no retry count of its own.
/// - `message_type` is a caller-assigned tag for routing and diagnostics.
///   The pipeline never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    payload: String,
    max_retries: u32,
    message_type: String,
}

impl Envelope {
    /// Wrap a caller value into an envelope, serializing it to JSON text.
    ///
    /// Fails only for values the serializer cannot represent (for example a
    /// map with non-string keys).
    pub fn wrap<T: Serialize>(
        value: &T,
        max_retries: u32,
        message_type: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let payload = serde_json::to_string(value).map_err(CodecError::Serialize)?;
        Ok(Self {
            payload,
            max_retries,
            message_type: message_type.into(),
        })
    }

    /// An envelope with no payload.
    ///
    /// Unwrapping it yields the target type's `Default` value.
    pub fn empty(max_retries: u32, message_type: impl Into<String>) -> Self {
        Self {
            payload: String::new(),
            max_retries,
            message_type: message_type.into(),
        }
    }

    /// Unwrap the payload back into a caller type.
    ///
    /// An empty payload yields `T::default()` rather than an error; a payload
    /// that is present but structurally incompatible with `T` is a
    /// [`CodecError::Deserialize`].
    pub fn unwrap<T: DeserializeOwned + Default>(&self) -> Result<T, CodecError> {
        if self.payload.is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&self.payload).map_err(CodecError::Deserialize)
    }

    /// Serialized payload text ("" when the envelope carries none).
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Delivery-attempt budget. A message whose delivery attempt exceeds this
    /// (strictly) is poison.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Caller-assigned type tag.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Wire form placed on the queue transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(CodecError::Serialize)
    }

    /// The same wire form as JSON text, for archival.
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::Serialize)
    }

    /// Decode the wire form back into an envelope.
    ///
    /// Round-trips [`Envelope::to_bytes`] with no loss: payload text,
    /// `max_retries` and `message_type` all come back identical.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    struct OrderPlaced {
        id: u64,
        sku: String,
    }

    #[test]
    fn wrap_then_unwrap_round_trips() {
        let order = OrderPlaced {
            id: 42,
            sku: "ABC-1".to_string(),
        };

        let envelope = Envelope::wrap(&order, 3, "order").unwrap();
        let back: OrderPlaced = envelope.unwrap().unwrap();

        assert_eq!(back, order);
        assert_eq!(envelope.max_retries(), 3);
        assert_eq!(envelope.message_type(), "order");
    }

    #[test]
    fn unwrap_with_empty_payload_returns_default() {
        let envelope = Envelope::empty(1, "order");

        let back: OrderPlaced = envelope.unwrap().unwrap();
        assert_eq!(back, OrderPlaced::default());
    }

    #[test]
    fn unwrap_rejects_incompatible_payload() {
        // A JSON array cannot become an OrderPlaced struct.
        let envelope = Envelope::wrap(&vec![1, 2, 3], 1, "order").unwrap();

        let err = envelope.unwrap::<OrderPlaced>().unwrap_err();
        assert!(matches!(err, CodecError::Deserialize(_)));
    }

    #[test]
    fn wrap_rejects_unserializable_value() {
        // JSON object keys must be strings; a tuple key cannot be represented.
        let mut value: HashMap<(u8, u8), &str> = HashMap::new();
        value.insert((1, 2), "x");

        let err = Envelope::wrap(&value, 1, "order").unwrap_err();
        assert!(matches!(err, CodecError::Serialize(_)));
    }

    #[test]
    fn bytes_round_trip_preserves_every_field() {
        let order = OrderPlaced {
            id: 7,
            sku: "XYZ-9".to_string(),
        };
        let envelope = Envelope::wrap(&order, 5, "order").unwrap();

        let bytes = envelope.to_bytes().unwrap();
        let back = Envelope::from_bytes(&bytes).unwrap();

        assert_eq!(back, envelope);
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        let err = Envelope::from_bytes(b"not an envelope").unwrap_err();
        assert!(matches!(err, CodecError::Deserialize(_)));
    }
}
