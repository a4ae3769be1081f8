use thiserror::Error;

/// Failures crossing the domain boundary: unparseable musical symbols
/// and session codec errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown note name: {0}")]
    UnknownNote(String),
    #[error("unknown chord symbol: {0}")]
    UnknownChord(String),
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
    #[error("unknown progression style: {0}")]
    UnknownStyle(String),
    #[error("session codec failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
