use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::DomainError;
use crate::tuning::Instrument;

pub const DEFAULT_BPM: u32 = 120;

/// Everything the trainer persists between visits. Storage itself is an
/// external collaborator; the core only produces and consumes this value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedSession {
    pub instrument: Instrument,
    pub bpm: u32,
    pub note_score: u32,
    pub interval_score: u32,
    pub last_used: Option<OffsetDateTime>,
}

impl SavedSession {
    pub fn new() -> Self {
        Self {
            instrument: Instrument::Guitar,
            bpm: DEFAULT_BPM,
            note_score: 0,
            interval_score: 0,
            last_used: None,
        }
    }

    pub fn touch(&mut self, now: OffsetDateTime) {
        self.last_used = Some(now);
    }
}

impl Default for SavedSession {
    fn default() -> Self {
        Self::new()
    }
}

pub trait SessionCodec {
    fn encode(&self, session: &SavedSession) -> Result<Vec<u8>, DomainError>;
    fn decode(&self, bytes: &[u8]) -> Result<SavedSession, DomainError>;
}

pub struct JsonCodec;

impl SessionCodec for JsonCodec {
    fn encode(&self, session: &SavedSession) -> Result<Vec<u8>, DomainError> {
        Ok(serde_json::to_vec_pretty(session)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<SavedSession, DomainError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
