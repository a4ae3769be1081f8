use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use fretwise_audio::TonePlayer;
use fretwise_domain::Interval;

use crate::round::RoundPhase;

const REWARD: u32 = 10;
const PENALTY: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalVerdict {
    pub correct: bool,
    pub target: Interval,
}

/// "Which interval was that?" Two simultaneous tones rooted at C4.
pub struct IntervalTraining {
    player: Arc<dyn TonePlayer>,
    target: Option<Interval>,
    phase: RoundPhase,
    score: u32,
}

impl IntervalTraining {
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
        let target = *Interval::ALL.choose(rng).unwrap_or(&Interval::PerfectFifth);
        debug!(target = target.label(), "interval round started");
        self.target = Some(target);
        self.player.play_interval(target.prompt_frequencies());
        self.phase = RoundPhase::PromptPlayed;
    }

    pub fn replay_prompt(&self) {
        if let Some(target) = self.target {
            self.player.play_interval(target.prompt_frequencies());
        }
    }

    /// Returns `None` when no prompt has sounded this round.
    pub fn submit(&mut self, answer: Interval) -> Option<IntervalVerdict> {
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
        Some(IntervalVerdict { correct, target })
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.phase = RoundPhase::AwaitingPrompt;
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SilentPlayer;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn game() -> IntervalTraining {
        IntervalTraining::new(Arc::new(SilentPlayer))
    }

    #[test]
    fn correct_answer_earns_ten_points() {
        let mut game = game();
        let mut rng = SmallRng::seed_from_u64(11);
        game.begin_round(&mut rng);
        let target = game.target.unwrap();
        let verdict = game.submit(target).unwrap();
        assert!(verdict.correct);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn repeated_wrong_answers_hold_the_floor_at_zero() {
        let mut game = game();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..5 {
            game.begin_round(&mut rng);
            let target = game.target.unwrap();
            let wrong = Interval::ALL
                .iter()
                .copied()
                .find(|candidate| *candidate != target)
                .unwrap();
            assert!(!game.submit(wrong).unwrap().correct);
        }
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn penalty_never_drops_a_partial_score_below_zero() {
        let mut game = game();
        let mut rng = SmallRng::seed_from_u64(2);
        // Win once (10), then lose twice (-5, -5): floor at 0.
        game.begin_round(&mut rng);
        let target = game.target.unwrap();
        game.submit(target);
        for _ in 0..2 {
            game.begin_round(&mut rng);
            let target = game.target.unwrap();
            let wrong = Interval::ALL
                .iter()
                .copied()
                .find(|candidate| *candidate != target)
                .unwrap();
            game.submit(wrong);
        }
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn submit_without_a_prompt_is_rejected() {
        let mut game = game();
        assert!(game.submit(Interval::PerfectFifth).is_none());
    }
}
