//! Error types for snapshot decoding.

/// Errors returned when a Plan or Health document cannot be decoded at all.
///
/// Malformations confined to one collection entry are not decoding errors.
/// They are kept in the model and surface per collection from the planner.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The Plan document does not have the expected shape.
    #[error("malformed plan document: {0}")]
    Plan(#[source] serde_json::Error),

    /// The Health document does not have the expected shape.
    #[error("malformed health document: {0}")]
    Health(#[source] serde_json::Error),
}
