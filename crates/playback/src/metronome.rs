use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use fretwise_audio::TonePlayer;
use fretwise_domain::DEFAULT_BPM;

pub const MIN_BPM: u32 = 40;
pub const MAX_BPM: u32 = 240;

/// Clamp a requested tempo into the supported range. Guards the interval
/// computation against zero and absurd values.
pub fn clamp_bpm(bpm: u32) -> u32 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// Seconds between beats at a given tempo.
pub fn beat_interval(bpm: u32) -> Duration {
    Duration::from_secs_f64(60.0 / clamp_bpm(bpm) as f64)
}

/// The repeating click track. Owns the one cancellable timer in the
/// system; starting always cancels any previous timer first, so two
/// click tracks can never run concurrently from one metronome.
pub struct Metronome {
    player: Arc<dyn TonePlayer>,
    bpm: u32,
    timer: Option<JoinHandle<()>>,
}

impl Metronome {
    pub fn new(player: Arc<dyn TonePlayer>) -> Self {
        Self {
            player,
            bpm: DEFAULT_BPM,
            timer: None,
        }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval(&self) -> Duration {
        beat_interval(self.bpm)
    }

    /// Begin clicking at `bpm`. Must run inside a tokio runtime.
    pub fn start(&mut self, bpm: u32) {
        self.stop();
        self.bpm = clamp_bpm(bpm);
        let interval = self.interval();
        debug!(bpm = self.bpm, ?interval, "starting metronome");
        let player = self.player.clone();
        self.timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                player.play_click();
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("stopping metronome");
            timer.abort();
        }
    }

    /// Change tempo. While running this restarts the click track from
    /// zero phase; while stopped it only records the new tempo.
    pub fn reconfigure(&mut self, bpm: u32) {
        if self.is_running() {
            self.stop();
            self.start(bpm);
        } else {
            self.bpm = clamp_bpm(bpm);
        }
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}
