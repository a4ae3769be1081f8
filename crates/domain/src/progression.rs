use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chord::Chord;
use crate::error::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProgressionStyle {
    Pop,
    Rock,
    Jazz,
    Blues,
    Classical,
}

impl ProgressionStyle {
    pub const ALL: [ProgressionStyle; 5] = [
        ProgressionStyle::Pop,
        ProgressionStyle::Rock,
        ProgressionStyle::Jazz,
        ProgressionStyle::Blues,
        ProgressionStyle::Classical,
    ];

    /// Template pool per style. Classical templates are the usual degree
    /// formulas resolved into C major.
    fn templates(self) -> &'static [&'static [&'static str]] {
        match self {
            ProgressionStyle::Pop => &[
                &["C", "G", "Am", "F"],
                &["C", "Em", "F", "G"],
                &["Am", "F", "C", "G"],
                &["C", "F", "Am", "G"],
            ],
            ProgressionStyle::Rock => &[
                &["E", "A", "D", "E"],
                &["A", "D", "E", "A"],
                &["G", "C", "D", "G"],
                &["E", "D", "A", "E"],
            ],
            ProgressionStyle::Jazz => &[
                &["Dm7", "G7", "Cmaj7", "Am7"],
                &["Em7", "A7", "Dmaj7", "Bm7"],
                &["Cmaj7", "Am7", "Dm7", "G7"],
                &["Fmaj7", "Dm7", "G7", "C7"],
            ],
            ProgressionStyle::Blues => &[
                &[
                    "C7", "C7", "C7", "C7", "F7", "F7", "C7", "C7", "G7", "F7", "C7", "G7",
                ],
                &[
                    "A7", "D7", "A7", "A7", "D7", "D7", "A7", "A7", "E7", "D7", "A7", "E7",
                ],
            ],
            ProgressionStyle::Classical => &[
                &["C", "F", "G", "C"],
                &["C", "Am", "F", "G"],
                &["Dm", "G", "C", "Am"],
                &["C", "G", "Am", "Em", "F", "C", "F", "G"],
            ],
        }
    }
}

impl fmt::Display for ProgressionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressionStyle::Pop => "pop",
            ProgressionStyle::Rock => "rock",
            ProgressionStyle::Jazz => "jazz",
            ProgressionStyle::Blues => "blues",
            ProgressionStyle::Classical => "classical",
        };
        f.write_str(label)
    }
}

impl FromStr for ProgressionStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pop" => Ok(ProgressionStyle::Pop),
            "rock" => Ok(ProgressionStyle::Rock),
            "jazz" => Ok(ProgressionStyle::Jazz),
            "blues" => Ok(ProgressionStyle::Blues),
            "classical" => Ok(ProgressionStyle::Classical),
            other => Err(DomainError::UnknownStyle(other.to_owned())),
        }
    }
}

/// Pick a random template for the style and repeat or truncate it to the
/// requested length.
pub fn generate_progression<R: Rng + ?Sized>(
    style: ProgressionStyle,
    length: usize,
    rng: &mut R,
) -> Vec<Chord> {
    let template = style
        .templates()
        .choose(rng)
        .expect("every style has templates");
    (0..length)
        .map(|i| {
            template[i % template.len()]
                .parse()
                .expect("templates hold valid chord symbols")
        })
        .collect()
}

/// One bar of sixteenth-note cells on the rhythm grid.
pub const RHYTHM_GRID_CELLS: usize = 16;

/// The rhythm grid: 16 toggleable sixteenth-note cells.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RhythmPattern {
    cells: [bool; RHYTHM_GRID_CELLS],
}

impl RhythmPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, cell: usize) {
        if let Some(state) = self.cells.get_mut(cell) {
            *state = !*state;
        }
    }

    pub fn clear(&mut self) {
        self.cells = [false; RHYTHM_GRID_CELLS];
    }

    pub fn is_active(&self, cell: usize) -> bool {
        self.cells.get(cell).copied().unwrap_or(false)
    }

    /// Indices of the active cells, in playback order.
    pub fn active_steps(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect()
    }

    /// Cells falling on a quarter-note beat carry the accent marker.
    pub fn is_beat(cell: usize) -> bool {
        cell % 4 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn generated_length_is_exact() {
        let mut rng = SmallRng::seed_from_u64(7);
        for style in ProgressionStyle::ALL {
            for length in [4, 8, 12, 16] {
                assert_eq!(generate_progression(style, length, &mut rng).len(), length);
            }
        }
    }

    #[test]
    fn short_templates_repeat() {
        let mut rng = SmallRng::seed_from_u64(1);
        let chords = generate_progression(ProgressionStyle::Rock, 8, &mut rng);
        assert_eq!(chords[0], chords[4]);
        assert_eq!(chords[3], chords[7]);
    }

    #[test]
    fn blues_truncates_to_length() {
        let mut rng = SmallRng::seed_from_u64(2);
        let chords = generate_progression(ProgressionStyle::Blues, 4, &mut rng);
        assert_eq!(chords.len(), 4);
    }

    #[test]
    fn style_labels_round_trip() {
        for style in ProgressionStyle::ALL {
            assert_eq!(style.to_string().parse::<ProgressionStyle>().unwrap(), style);
        }
        assert!("baroque".parse::<ProgressionStyle>().is_err());
    }

    #[test]
    fn rhythm_pattern_toggles_and_clears() {
        let mut pattern = RhythmPattern::new();
        pattern.toggle(0);
        pattern.toggle(5);
        pattern.toggle(5);
        pattern.toggle(9);
        assert_eq!(pattern.active_steps(), vec![0, 9]);
        assert!(RhythmPattern::is_beat(0));
        assert!(!RhythmPattern::is_beat(9));
        pattern.clear();
        assert!(pattern.active_steps().is_empty());
    }

    #[test]
    fn out_of_range_cell_is_ignored() {
        let mut pattern = RhythmPattern::new();
        pattern.toggle(40);
        assert!(!pattern.is_active(40));
        assert!(pattern.active_steps().is_empty());
    }
}
