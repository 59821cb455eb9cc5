//! JSON encoding for messages passed between pipeline stages.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Encode a queue message as compact JSON.
pub fn encode<T: Serialize>(message: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a queue message produced by [`encode`].
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T, AppError> {
    Ok(serde_json::from_str(payload)?)
}
