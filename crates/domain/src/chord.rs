use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::note::{NoteName, REFERENCE_OCTAVE};
use crate::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Minor7,
    Diminished,
}

impl ChordQuality {
    /// Semitone offsets from the root, ascending.
    pub fn intervals(self) -> &'static [u32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Diminished => &[0, 3, 6],
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Diminished => "dim",
        }
    }
}

/// A chord symbol such as `Am7`, independent of any voicing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: NoteName,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn new(root: NoteName, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    /// Ascending audible frequencies, root anchored at the reference
    /// octave, wrapping notes raised into the next octave.
    pub fn frequencies(&self) -> Vec<f64> {
        self.quality
            .intervals()
            .iter()
            .map(|&offset| {
                let index = self.root.index() + offset as usize;
                let note = NoteName::from_index(index);
                note.frequency_at(REFERENCE_OCTAVE + (index / 12) as i32)
            })
            .collect()
    }

    pub fn notes(&self) -> Vec<NoteName> {
        self.quality
            .intervals()
            .iter()
            .map(|&offset| self.root.transpose(offset))
            .collect()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

impl FromStr for Chord {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The root is the first char, plus a '#' when one follows.
        // Counted in chars so a multi-byte symbol fails cleanly.
        let root_len = match s.chars().nth(1) {
            Some('#') => s.chars().take(2).map(char::len_utf8).sum(),
            _ => s.chars().next().map_or(0, char::len_utf8),
        };
        if root_len == 0 {
            return Err(DomainError::UnknownChord(s.to_owned()));
        }
        let root: NoteName = s[..root_len]
            .parse()
            .map_err(|_| DomainError::UnknownChord(s.to_owned()))?;
        let quality = match &s[root_len..] {
            "" => ChordQuality::Major,
            "m" => ChordQuality::Minor,
            "7" => ChordQuality::Dominant7,
            "maj7" => ChordQuality::Major7,
            "m7" => ChordQuality::Minor7,
            "dim" => ChordQuality::Diminished,
            _ => return Err(DomainError::UnknownChord(s.to_owned())),
        };
        Ok(Chord::new(root, quality))
    }
}

/// What one string does in a chord diagram.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum StringAction {
    Muted,
    Open,
    Fretted { fret: u8, finger: u8 },
}

/// A concrete voicing as drawn on a chord diagram, low string first.
/// `base_fret` > 1 positions movable shapes above the nut.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChordShape {
    pub name: String,
    pub strings: Vec<StringAction>,
    pub base_fret: u8,
}

impl ChordShape {
    pub fn library() -> Vec<ChordShape> {
        use StringAction::*;
        let fret = |fret, finger| Fretted { fret, finger };
        vec![
            ChordShape {
                name: "C".into(),
                strings: vec![Muted, fret(3, 3), fret(2, 2), Open, fret(1, 1), Open],
                base_fret: 1,
            },
            ChordShape {
                name: "Cm".into(),
                strings: vec![
                    Muted,
                    fret(1, 1),
                    fret(3, 3),
                    fret(3, 4),
                    fret(2, 2),
                    fret(1, 1),
                ],
                base_fret: 3,
            },
            ChordShape {
                name: "C7".into(),
                strings: vec![Muted, fret(3, 3), fret(2, 2), fret(3, 4), fret(1, 1), Open],
                base_fret: 1,
            },
            ChordShape {
                name: "Cmaj7".into(),
                strings: vec![Muted, fret(3, 3), fret(2, 2), Open, Open, Open],
                base_fret: 1,
            },
            ChordShape {
                name: "G".into(),
                strings: vec![fret(3, 2), fret(2, 1), Open, Open, Open, fret(3, 3)],
                base_fret: 1,
            },
            ChordShape {
                name: "D".into(),
                strings: vec![Muted, Muted, Open, fret(2, 1), fret(3, 3), fret(2, 2)],
                base_fret: 1,
            },
            ChordShape {
                name: "A".into(),
                strings: vec![Muted, Open, fret(2, 1), fret(2, 2), fret(2, 3), Open],
                base_fret: 1,
            },
            ChordShape {
                name: "E".into(),
                strings: vec![Open, fret(2, 2), fret(2, 3), fret(1, 1), Open, Open],
                base_fret: 1,
            },
        ]
    }

    pub fn named(name: &str) -> Option<ChordShape> {
        Self::library().into_iter().find(|shape| shape.name == name)
    }
}
