use serde::{Deserialize, Serialize};

use crate::note::NoteName;

/// The interval pool used by ear training, each prompt rooted at C4.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    MajorSecond,
    MinorThird,
    PerfectFifth,
    MinorSeventh,
}

impl Interval {
    pub const ALL: [Interval; 4] = [
        Interval::MajorSecond,
        Interval::MinorThird,
        Interval::PerfectFifth,
        Interval::MinorSeventh,
    ];

    pub fn semitones(self) -> u32 {
        match self {
            Interval::MajorSecond => 2,
            Interval::MinorThird => 3,
            Interval::PerfectFifth => 7,
            Interval::MinorSeventh => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interval::MajorSecond => "major 2nd",
            Interval::MinorThird => "minor 3rd",
            Interval::PerfectFifth => "perfect 5th",
            Interval::MinorSeventh => "minor 7th",
        }
    }

    /// The two prompt frequencies: C4 plus the note the interval lands on.
    pub fn prompt_frequencies(self) -> (f64, f64) {
        let root = NoteName::C;
        (
            root.base_frequency(),
            root.transpose(self.semitones()).base_frequency(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn prompt_frequencies_match_the_reference_pairs() {
        let cases = [
            (Interval::MajorSecond, 293.66),
            (Interval::MinorThird, 311.13),
            (Interval::PerfectFifth, 392.00),
            (Interval::MinorSeventh, 466.16),
        ];
        for (interval, upper) in cases {
            let (root, top) = interval.prompt_frequencies();
            assert_relative_eq!(root, 261.63);
            assert_relative_eq!(top, upper);
        }
    }

    #[test]
    fn labels_are_distinct() {
        let labels: Vec<_> = Interval::ALL.iter().map(|i| i.label()).collect();
        let mut unique = labels.clone();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
    }
}
