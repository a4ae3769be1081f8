//! Test doubles for the [`TonePlayer`] seam.

use std::time::Duration;

use fretwise_audio::{TonePlayer, Waveform};

/// Discards every playback call.
pub struct SilentPlayer;

impl TonePlayer for SilentPlayer {
    fn play_tone(&self, _frequency: f64, _duration: Duration, _waveform: Waveform, _volume: f32) {}

    fn play_chord(&self, _frequencies: &[f64], _total_duration: Duration, _arpeggio_step: Duration) {
    }

    fn play_click(&self) {}

    fn play_interval(&self, _frequencies: (f64, f64)) {}
}
