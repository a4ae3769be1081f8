use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use fretwise_audio::{TonePlayer, Waveform};
use fretwise_domain::{NoteName, REFERENCE_OCTAVE};

use crate::round::RoundPhase;

const PROMPT_DURATION: Duration = Duration::from_millis(500);
const PROMPT_VOLUME: f32 = 0.3;
const REWARD: u32 = 5;
const PENALTY: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteVerdict {
    pub correct: bool,
    pub target: NoteName,
}

/// "Which note was that?" A single tone at the reference octave, one
/// guess per round.
pub struct NoteIdentification {
    player: Arc<dyn TonePlayer>,
    target: Option<NoteName>,
    phase: RoundPhase,
    score: u32,
}

impl NoteIdentification {
    pub fn new(player: Arc<dyn TonePlayer>) -> Self {
        Self {
            player,
            target: None,
            phase: RoundPhase::AwaitingPrompt,
            score: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let target = *NoteName::ALL
            .choose(rng)
            .unwrap_or(&NoteName::C);
        debug!(target = %target, "note round started");
        self.target = Some(target);
        self.play_prompt(target);
        self.phase = RoundPhase::PromptPlayed;
    }

    /// Replay the current prompt without affecting the round.
    pub fn replay_prompt(&self) {
        if let Some(target) = self.target {
            self.play_prompt(target);
        }
    }

    /// One guess per round. Returns `None` outside `PromptPlayed`.
    pub fn submit(&mut self, answer: NoteName) -> Option<NoteVerdict> {
        if self.phase != RoundPhase::PromptPlayed {
            return None;
        }
        let target = self.target?;
        let correct = answer == target;
        if correct {
            self.score += REWARD;
        } else {
            self.score = self.score.saturating_sub(PENALTY);
        }
        self.phase = RoundPhase::Evaluated;
        Some(NoteVerdict { correct, target })
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.phase = RoundPhase::AwaitingPrompt;
        self.score = 0;
    }

    fn play_prompt(&self, target: NoteName) {
        self.player.play_tone(
            target.frequency_at(REFERENCE_OCTAVE),
            PROMPT_DURATION,
            Waveform::Sine,
            PROMPT_VOLUME,
        );
    }
}
