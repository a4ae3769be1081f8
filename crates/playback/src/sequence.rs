use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use fretwise_audio::engine::{DEFAULT_ARPEGGIO_STEP, DEFAULT_CHORD_DURATION, DEFAULT_TONE_VOLUME};
use fretwise_audio::{TonePlayer, Waveform};
use fretwise_domain::{Chord, NoteName, RhythmPattern};

use crate::metronome::{beat_interval, clamp_bpm};

/// Tone length for one note of a played-back scale or sequence.
const STEP_TONE_DURATION: Duration = Duration::from_millis(300);
/// Spacing between scale notes.
const SCALE_STEP_WINDOW: Duration = Duration::from_millis(500);
/// Spacing between recall-prompt notes: the highlight window plus the
/// gap before the next note.
const RECALL_STEP_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, PartialEq)]
pub enum StepItem {
    Tone {
        frequency: f64,
        duration: Duration,
        waveform: Waveform,
        volume: f32,
    },
    Chord {
        frequencies: Vec<f64>,
    },
    Click,
}

/// One playable item plus the window it occupies before the next item
/// may sound.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackStep {
    pub item: StepItem,
    pub window: Duration,
}

impl PlaybackStep {
    pub fn tone(frequency: f64, duration: Duration, window: Duration) -> Self {
        Self {
            item: StepItem::Tone {
                frequency,
                duration,
                waveform: Waveform::Sine,
                volume: DEFAULT_TONE_VOLUME,
            },
            window,
        }
    }
}

/// Scale playback: each note at the reference octave, half a second apart.
pub fn scale_steps(notes: &[NoteName]) -> Vec<PlaybackStep> {
    notes
        .iter()
        .map(|note| PlaybackStep::tone(note.base_frequency(), STEP_TONE_DURATION, SCALE_STEP_WINDOW))
        .collect()
}

/// Recall-game prompt: slower spacing so each note registers.
pub fn recall_steps(notes: &[NoteName]) -> Vec<PlaybackStep> {
    notes
        .iter()
        .map(|note| {
            PlaybackStep::tone(note.base_frequency(), STEP_TONE_DURATION, RECALL_STEP_WINDOW)
        })
        .collect()
}

/// Rhythm-grid playback: the active cells as clicks at sixteenth-note
/// spacing for the given tempo.
pub fn rhythm_steps(pattern: &RhythmPattern, bpm: u32) -> Vec<PlaybackStep> {
    let window = beat_interval(clamp_bpm(bpm)) / 4;
    pattern
        .active_steps()
        .into_iter()
        .map(|_| PlaybackStep {
            item: StepItem::Click,
            window,
        })
        .collect()
}

/// Progression playback: each chord held for two beats.
pub fn progression_steps(chords: &[Chord], bpm: u32) -> Vec<PlaybackStep> {
    let window = beat_interval(clamp_bpm(bpm)) * 2;
    chords
        .iter()
        .map(|chord| PlaybackStep {
            item: StepItem::Chord {
                frequencies: chord.frequencies(),
            },
            window,
        })
        .collect()
}

/// Fire-and-forget sequential playback. There is deliberately no pause,
/// resume or cancel: a started sequence runs to completion, and two
/// overlapping sequences simply interleave.
pub struct SequencePlayer {
    player: Arc<dyn TonePlayer>,
}

impl SequencePlayer {
    pub fn new(player: Arc<dyn TonePlayer>) -> Self {
        Self { player }
    }

    pub fn play(&self, steps: Vec<PlaybackStep>) {
        self.play_with(steps, |_| (), || ());
    }

    /// `on_step(i)` fires as step `i` starts sounding (the UI highlight
    /// hook); `on_complete` fires once the final step's window closes.
    /// An empty sequence schedules nothing and completes synchronously.
    pub fn play_with<S, C>(&self, steps: Vec<PlaybackStep>, on_step: S, on_complete: C)
    where
        S: Fn(usize) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        if steps.is_empty() {
            on_complete();
            return;
        }
        debug!(steps = steps.len(), "starting sequence playback");
        let player = self.player.clone();
        tokio::spawn(async move {
            for (index, step) in steps.iter().enumerate() {
                on_step(index);
                match &step.item {
                    StepItem::Tone {
                        frequency,
                        duration,
                        waveform,
                        volume,
                    } => player.play_tone(*frequency, *duration, *waveform, *volume),
                    StepItem::Chord { frequencies } => {
                        player.play_chord(frequencies, DEFAULT_CHORD_DURATION, DEFAULT_ARPEGGIO_STEP)
                    }
                    StepItem::Click => player.play_click(),
                }
                tokio::time::sleep(step.window).await;
            }
            on_complete();
        });
    }
}
