use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use fretwise_domain::NoteName;
use fretwise_playback::{recall_steps, SequencePlayer};

use crate::round::RoundPhase;

pub const MIN_SEQUENCE_LEN: usize = 4;
pub const MAX_SEQUENCE_LEN: usize = 7;

/// What happened to one tapped-in note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecallInput {
    /// Ignored: no round in progress, or the prompt is still sounding.
    Rejected,
    /// Buffered; more notes are expected.
    Accepted,
    /// The buffer reached the target length and was judged.
    Evaluated { correct: bool },
}

/// Memory game: listen to a short random melody, then tap it back.
/// The attempt is judged only once the reply is the same length as the
/// prompt, and a single wrong position fails it. Not scored.
pub struct SequenceRecall {
    sequencer: SequencePlayer,
    target: Vec<NoteName>,
    inputs: Vec<NoteName>,
    phase: RoundPhase,
    prompt_in_flight: Arc<AtomicBool>,
}

impl SequenceRecall {
    pub fn new(sequencer: SequencePlayer) -> Self {
        Self {
            sequencer,
            target: Vec::new(),
            inputs: Vec::new(),
            phase: RoundPhase::AwaitingPrompt,
            prompt_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The melody to reveal after evaluation.
    pub fn target(&self) -> &[NoteName] {
        &self.target
    }

    pub fn inputs(&self) -> &[NoteName] {
        &self.inputs
    }

    pub fn prompt_in_flight(&self) -> bool {
        self.prompt_in_flight.load(Ordering::SeqCst)
    }

    /// Pick a fresh 4 to 7 note melody and play it. Must run inside a
    /// tokio runtime.
    pub fn begin_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let length = rng.gen_range(MIN_SEQUENCE_LEN..=MAX_SEQUENCE_LEN);
        self.target = (0..length)
            .map(|_| *NoteName::ALL.choose(rng).unwrap_or(&NoteName::C))
            .collect();
        self.inputs.clear();
        debug!(length, "recall round started");
        self.prompt_in_flight.store(true, Ordering::SeqCst);
        let flag = self.prompt_in_flight.clone();
        self.sequencer.play_with(
            recall_steps(&self.target),
            |_| (),
            move || flag.store(false, Ordering::SeqCst),
        );
        self.phase = RoundPhase::PromptPlayed;
    }

    pub fn record_input(&mut self, note: NoteName) -> RecallInput {
        if self.phase != RoundPhase::PromptPlayed || self.prompt_in_flight() {
            return RecallInput::Rejected;
        }
        self.inputs.push(note);
        if self.inputs.len() < self.target.len() {
            return RecallInput::Accepted;
        }
        let correct = self.inputs == self.target;
        self.inputs.clear();
        self.phase = RoundPhase::Evaluated;
        RecallInput::Evaluated { correct }
    }

    pub fn reset(&mut self) {
        self.target.clear();
        self.inputs.clear();
        self.phase = RoundPhase::AwaitingPrompt;
        self.prompt_in_flight.store(false, Ordering::SeqCst);
    }
}
