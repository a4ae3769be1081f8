pub mod backend;
pub mod engine;
pub mod output;
pub mod voice;

pub use backend::{AudioOutput, NullOutput};
pub use engine::{ToneEngine, ToneHandle, TonePlayer};
pub use output::CpalOutput;
pub use voice::{VoiceId, VoiceMixer, VoiceSpec, Waveform};
