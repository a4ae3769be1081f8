use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::note::{NoteName, PitchedNote, REFERENCE_OCTAVE};
use crate::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Instrument {
    Guitar,
    Bass,
    Violin,
    Cello,
    Ukulele,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::Guitar,
        Instrument::Bass,
        Instrument::Violin,
        Instrument::Cello,
        Instrument::Ukulele,
    ];
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Instrument::Guitar => "guitar",
            Instrument::Bass => "bass",
            Instrument::Violin => "violin",
            Instrument::Cello => "cello",
            Instrument::Ukulele => "ukulele",
        };
        f.write_str(name)
    }
}

impl FromStr for Instrument {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instrument::ALL
            .iter()
            .copied()
            .find(|i| i.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownInstrument(s.to_owned()))
    }
}

/// Ordered open-string pitch classes for one instrument, low string first.
/// Immutable once constructed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tuning {
    instrument: Instrument,
    open_strings: Vec<NoteName>,
}

/// One entry of the fretboard lookup table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FretNote {
    pub string: usize,
    pub fret: u32,
    pub note: NoteName,
    pub frequency: f64,
}

impl Tuning {
    pub fn standard(instrument: Instrument) -> Self {
        use NoteName::*;
        let open_strings = match instrument {
            Instrument::Guitar => vec![E, A, D, G, B, E],
            Instrument::Bass => vec![E, A, D, G],
            Instrument::Violin => vec![G, D, A, E],
            Instrument::Cello => vec![C, G, D, A],
            Instrument::Ukulele => vec![G, C, E, A],
        };
        Self {
            instrument,
            open_strings,
        }
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn string_count(&self) -> usize {
        self.open_strings.len()
    }

    pub fn open_strings(&self) -> &[NoteName] {
        &self.open_strings
    }

    /// Pitch class at a given string and fret.
    pub fn note_at(&self, string: usize, fret: u32) -> Option<NoteName> {
        self.open_strings
            .get(string)
            .map(|open| open.transpose(fret % 12))
    }

    /// Audible frequency at a given string and fret. The octave rises by
    /// one for every twelve frets above the reference octave.
    pub fn frequency_at(&self, string: usize, fret: u32) -> Option<f64> {
        self.note_at(string, fret)
            .map(|note| note.frequency_at(REFERENCE_OCTAVE + (fret / 12) as i32))
    }

    /// Full (string, fret) -> (note, frequency) lookup table covering
    /// frets 0..=`frets` on every string.
    pub fn note_map(&self, frets: u32) -> Vec<Vec<FretNote>> {
        (0..self.string_count())
            .map(|string| {
                (0..=frets)
                    .map(|fret| FretNote {
                        string,
                        fret,
                        note: self.note_at(string, fret).expect("string in range"),
                        frequency: self.frequency_at(string, fret).expect("string in range"),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Concert-pitch open strings per instrument, used by the tuning
/// reference panel (these carry real octaves, unlike the fretboard
/// table which is anchored at the reference octave).
pub fn tuning_reference(instrument: Instrument) -> Vec<PitchedNote> {
    use NoteName::*;
    let pitches: &[(NoteName, i32)] = match instrument {
        Instrument::Guitar => &[(E, 2), (A, 2), (D, 3), (G, 3), (B, 3), (E, 4)],
        Instrument::Bass => &[(E, 1), (A, 1), (D, 2), (G, 2)],
        Instrument::Violin => &[(G, 3), (D, 4), (A, 4), (E, 5)],
        Instrument::Cello => &[(C, 2), (G, 2), (D, 3), (A, 3)],
        Instrument::Ukulele => &[(G, 4), (C, 4), (E, 4), (A, 4)],
    };
    pitches
        .iter()
        .map(|&(name, octave)| PitchedNote::new(name, octave))
        .collect()
}
