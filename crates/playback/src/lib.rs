pub mod metronome;
pub mod sequence;

#[cfg(test)]
pub(crate) mod testing;

pub use metronome::{beat_interval, clamp_bpm, Metronome, MAX_BPM, MIN_BPM};
pub use sequence::{
    progression_steps, recall_steps, rhythm_steps, scale_steps, PlaybackStep, SequencePlayer,
    StepItem,
};
