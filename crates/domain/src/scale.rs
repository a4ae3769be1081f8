use serde::{Deserialize, Serialize};

use crate::note::NoteName;

const MAJOR_PATTERN: [u32; 7] = [0, 2, 4, 5, 7, 9, 11];
const NATURAL_MINOR_PATTERN: [u32; 7] = [0, 2, 3, 5, 7, 8, 10];
const MINOR_PENTATONIC_PATTERN: [u32; 5] = [0, 3, 5, 7, 10];

/// A named ordered set of pitch classes. The first note is the root.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scale {
    pub name: String,
    pub notes: Vec<NoteName>,
}

impl Scale {
    pub fn new(name: impl Into<String>, notes: Vec<NoteName>) -> Self {
        Self {
            name: name.into(),
            notes,
        }
    }

    pub fn major(tonic: NoteName) -> Self {
        Self::from_pattern(format!("{tonic} major"), tonic, &MAJOR_PATTERN)
    }

    pub fn natural_minor(tonic: NoteName) -> Self {
        Self::from_pattern(format!("{tonic} minor"), tonic, &NATURAL_MINOR_PATTERN)
    }

    pub fn minor_pentatonic(tonic: NoteName) -> Self {
        Self::from_pattern(
            format!("{tonic} minor pentatonic"),
            tonic,
            &MINOR_PENTATONIC_PATTERN,
        )
    }

    pub fn root(&self) -> Option<NoteName> {
        self.notes.first().copied()
    }

    pub fn contains(&self, note: NoteName) -> bool {
        self.notes.contains(&note)
    }

    fn from_pattern(name: String, tonic: NoteName, pattern: &[u32]) -> Self {
        Self {
            name,
            notes: pattern.iter().map(|&step| tonic.transpose(step)).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
}

/// Key signature facts for a major tonic, as shown on the circle of
/// fifths panel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeySignature {
    pub tonic: NoteName,
    pub sharps: u8,
    pub flats: u8,
    pub relative_minor: NoteName,
}

impl KeySignature {
    pub fn of(tonic: NoteName) -> Self {
        // Position on the circle of fifths: 0 = C, each step up adds a
        // sharp; walking the other way accumulates flats instead.
        let fifths = (0..12)
            .find(|&k| NoteName::C.transpose(7 * k as u32) == tonic)
            .expect("every pitch class lies on the circle");
        let (sharps, flats) = if fifths <= 6 {
            (fifths as u8, 0)
        } else {
            (0, (12 - fifths) as u8)
        };
        Self {
            tonic,
            sharps,
            flats,
            relative_minor: tonic.transpose(9),
        }
    }

    /// Diatonic triads of the major key, root plus quality per degree.
    pub fn diatonic_triads(&self) -> Vec<(NoteName, TriadQuality)> {
        const QUALITIES: [TriadQuality; 7] = [
            TriadQuality::Major,
            TriadQuality::Minor,
            TriadQuality::Minor,
            TriadQuality::Major,
            TriadQuality::Major,
            TriadQuality::Minor,
            TriadQuality::Diminished,
        ];
        MAJOR_PATTERN
            .iter()
            .zip(QUALITIES)
            .map(|(&step, quality)| (self.tonic.transpose(step), quality))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NoteName::*;

    #[test]
    fn c_major_scale() {
        let scale = Scale::major(C);
        assert_eq!(scale.notes, vec![C, D, E, F, G, A, B]);
        assert_eq!(scale.root(), Some(C));
    }

    #[test]
    fn a_minor_pentatonic() {
        let scale = Scale::minor_pentatonic(A);
        assert_eq!(scale.notes, vec![A, C, D, E, G]);
        assert!(scale.contains(G));
        assert!(!scale.contains(B));
    }

    #[test]
    fn natural_minor_shares_major_pitches() {
        let a_minor = Scale::natural_minor(A);
        let c_major = Scale::major(C);
        for note in &a_minor.notes {
            assert!(c_major.contains(*note));
        }
    }

    #[test]
    fn key_signature_accidentals() {
        assert_eq!(KeySignature::of(C).sharps, 0);
        assert_eq!(KeySignature::of(C).flats, 0);
        assert_eq!(KeySignature::of(G).sharps, 1);
        assert_eq!(KeySignature::of(D).sharps, 2);
        assert_eq!(KeySignature::of(F).flats, 1);
        assert_eq!(KeySignature::of(ASharp).flats, 2);
    }

    #[test]
    fn relative_minor_is_a_sixth_up() {
        assert_eq!(KeySignature::of(C).relative_minor, A);
        assert_eq!(KeySignature::of(G).relative_minor, E);
    }

    #[test]
    fn diatonic_triads_of_c() {
        let triads = KeySignature::of(C).diatonic_triads();
        assert_eq!(triads[0], (C, TriadQuality::Major));
        assert_eq!(triads[1], (D, TriadQuality::Minor));
        assert_eq!(triads[6], (B, TriadQuality::Diminished));
    }
}
