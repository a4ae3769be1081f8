pub mod chord;
pub mod error;
pub mod interval;
pub mod note;
pub mod progression;
pub mod scale;
pub mod session;
pub mod tuning;

pub use crate::chord::{Chord, ChordQuality, ChordShape, StringAction};
pub use crate::error::DomainError;
pub use crate::interval::Interval;
pub use crate::note::{NoteName, PitchedNote, REFERENCE_OCTAVE};
pub use crate::progression::{generate_progression, ProgressionStyle, RhythmPattern};
pub use crate::scale::{KeySignature, Scale, TriadQuality};
pub use crate::session::{JsonCodec, SavedSession, SessionCodec, DEFAULT_BPM};
pub use crate::tuning::{tuning_reference, FretNote, Instrument, Tuning};
