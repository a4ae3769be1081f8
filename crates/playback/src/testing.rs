//! Test doubles for the [`TonePlayer`] seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use fretwise_audio::{TonePlayer, Waveform};

/// Counts clicks and ignores everything else.
#[derive(Default)]
pub struct CountingPlayer {
    clicks: AtomicUsize,
}

impl CountingPlayer {
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

impl TonePlayer for CountingPlayer {
    fn play_tone(&self, _frequency: f64, _duration: Duration, _waveform: Waveform, _volume: f32) {}

    fn play_chord(&self, _frequencies: &[f64], _total_duration: Duration, _arpeggio_step: Duration) {
    }

    fn play_click(&self) {
        self.clicks.fetch_add(1, Ordering::SeqCst);
    }

    fn play_interval(&self, _frequencies: (f64, f64)) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlayedItem {
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
    Interval {
        frequencies: (f64, f64),
    },
}

/// Records every playback call in order.
#[derive(Default)]
pub struct RecordingPlayer {
    items: Mutex<Vec<PlayedItem>>,
}

impl RecordingPlayer {
    pub fn items(&self) -> Vec<PlayedItem> {
        self.items.lock().unwrap().clone()
    }
}

impl TonePlayer for RecordingPlayer {
    fn play_tone(&self, frequency: f64, duration: Duration, waveform: Waveform, volume: f32) {
        self.items.lock().unwrap().push(PlayedItem::Tone {
            frequency,
            duration,
            waveform,
            volume,
        });
    }

    fn play_chord(&self, frequencies: &[f64], _total_duration: Duration, _arpeggio_step: Duration) {
        self.items.lock().unwrap().push(PlayedItem::Chord {
            frequencies: frequencies.to_vec(),
        });
    }

    fn play_click(&self) {
        self.items.lock().unwrap().push(PlayedItem::Click);
    }

    fn play_interval(&self, frequencies: (f64, f64)) {
        self.items
            .lock()
            .unwrap()
            .push(PlayedItem::Interval { frequencies });
    }
}
