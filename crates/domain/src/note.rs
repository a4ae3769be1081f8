use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Reference octave for the base frequency table.
pub const REFERENCE_OCTAVE: i32 = 4;

/// The twelve pitch classes, canonical sharp spelling.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl NoteName {
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::CSharp,
        NoteName::D,
        NoteName::DSharp,
        NoteName::E,
        NoteName::F,
        NoteName::FSharp,
        NoteName::G,
        NoteName::GSharp,
        NoteName::A,
        NoteName::ASharp,
        NoteName::B,
    ];

    /// Semitone index within the octave, 0 (C) through 11 (B).
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&n| n == self).expect("note in table")
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Frequency in Hz at the reference octave (4). Values match the
    /// twelve-tone equal-temperament table rounded to two decimals.
    pub fn base_frequency(self) -> f64 {
        match self {
            NoteName::C => 261.63,
            NoteName::CSharp => 277.18,
            NoteName::D => 293.66,
            NoteName::DSharp => 311.13,
            NoteName::E => 329.63,
            NoteName::F => 349.23,
            NoteName::FSharp => 369.99,
            NoteName::G => 392.00,
            NoteName::GSharp => 415.30,
            NoteName::A => 440.00,
            NoteName::ASharp => 466.16,
            NoteName::B => 493.88,
        }
    }

    /// Frequency at an arbitrary octave: `base * 2^(octave - 4)`.
    pub fn frequency_at(self, octave: i32) -> f64 {
        self.base_frequency() * 2f64.powi(octave - REFERENCE_OCTAVE)
    }

    /// Pitch class reached by moving `semitones` up from this one.
    pub fn transpose(self, semitones: u32) -> Self {
        Self::from_index(self.index() + semitones as usize)
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::CSharp => "C#",
            NoteName::D => "D",
            NoteName::DSharp => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F#",
            NoteName::G => "G",
            NoteName::GSharp => "G#",
            NoteName::A => "A",
            NoteName::ASharp => "A#",
            NoteName::B => "B",
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NoteName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownNote(s.to_owned()))
    }
}

/// A pitch class anchored to a concrete octave, e.g. the open strings in
/// the tuning reference table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PitchedNote {
    pub name: NoteName,
    pub octave: i32,
}

impl PitchedNote {
    pub fn new(name: NoteName, octave: i32) -> Self {
        Self { name, octave }
    }

    pub fn frequency(self) -> f64 {
        self.name.frequency_at(self.octave)
    }
}

impl fmt::Display for PitchedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn twelve_distinct_indices() {
        for (i, note) in NoteName::ALL.iter().enumerate() {
            assert_eq!(note.index(), i);
            assert_eq!(NoteName::from_index(i), *note);
        }
        assert_eq!(NoteName::from_index(12), NoteName::C);
    }

    #[test]
    fn base_frequency_table() {
        assert_eq!(NoteName::A.base_frequency(), 440.00);
        assert_eq!(NoteName::C.base_frequency(), 261.63);
        assert_eq!(NoteName::G.base_frequency(), 392.00);
        assert_eq!(NoteName::B.base_frequency(), 493.88);
    }

    #[test]
    fn frequency_doubles_per_octave() {
        assert_relative_eq!(NoteName::A.frequency_at(5), 880.0);
        assert_relative_eq!(NoteName::A.frequency_at(3), 220.0);
        assert_relative_eq!(NoteName::E.frequency_at(2), 82.4075);
    }

    #[test]
    fn transpose_wraps_mod_twelve() {
        assert_eq!(NoteName::A.transpose(3), NoteName::C);
        assert_eq!(NoteName::B.transpose(1), NoteName::C);
        for note in NoteName::ALL {
            assert_eq!(note.transpose(12), note);
        }
    }

    #[test]
    fn label_round_trip() {
        for note in NoteName::ALL {
            assert_eq!(note.label().parse::<NoteName>().unwrap(), note);
        }
        assert!(matches!(
            "H".parse::<NoteName>(),
            Err(DomainError::UnknownNote(_))
        ));
    }

    #[test]
    fn pitched_note_frequency() {
        let low_e = PitchedNote::new(NoteName::E, 2);
        assert_relative_eq!(low_e.frequency(), 82.4075);
        assert_eq!(low_e.to_string(), "E2");
    }
}
