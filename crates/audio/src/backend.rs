use anyhow::Result;
use tracing::debug;

use crate::voice::{VoiceId, VoiceSpec};

/// The audio-device seam. Everything above this trait is identical
/// whether tones reach a real device or nothing at all.
pub trait AudioOutput: Send + Sync {
    fn submit(&self, voice: VoiceSpec) -> Result<()>;
    /// Must be idempotent; cancelling an unknown or retired voice is fine.
    fn cancel(&self, id: VoiceId);
    fn is_live(&self) -> bool {
        true
    }
}

/// Silent output used when no audio device is available. Accepts every
/// request so callers never observe the difference.
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn submit(&self, voice: VoiceSpec) -> Result<()> {
        debug!(
            id = voice.id,
            frequency = voice.frequency,
            "discarding voice, no audio device"
        );
        Ok(())
    }

    fn cancel(&self, _id: VoiceId) {}

    fn is_live(&self) -> bool {
        false
    }
}
