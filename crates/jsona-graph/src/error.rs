//! # Errors
//!
//! Deserialization itself never fails: declined models, unresolved targets and
//! malformed linkage all surface as absence in the built graph. The only hard
//! error is input that cannot be read as a JSON:API document in the first place.

/// Errors raised while reading a document from its wire encoding.
#[derive(Debug, thiserror::Error)]
pub enum JsonaError {
    #[error("Malformed JSON:API document: {0}")]
    Json(#[from] serde_json::Error),
}
