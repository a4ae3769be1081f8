use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{AudioOutput, NullOutput};
use crate::output::CpalOutput;
use crate::voice::{VoiceId, VoiceSpec, Waveform};

pub const DEFAULT_TONE_VOLUME: f32 = 0.3;
pub const CHORD_VOLUME: f32 = 0.2;
pub const INTERVAL_VOLUME: f32 = 0.2;
pub const DEFAULT_CHORD_DURATION: Duration = Duration::from_millis(1500);
pub const DEFAULT_ARPEGGIO_STEP: Duration = Duration::from_millis(50);
pub const INTERVAL_DURATION: Duration = Duration::from_millis(1500);
pub const CLICK_FREQUENCY: f64 = 1000.0;
pub const CLICK_DURATION: Duration = Duration::from_millis(50);
pub const CLICK_VOLUME: f32 = 0.1;

/// The playback surface the scheduler and games drive. None of these
/// methods can fail from the caller's point of view; a missing audio
/// device degrades to silence.
pub trait TonePlayer: Send + Sync {
    fn play_tone(&self, frequency: f64, duration: Duration, waveform: Waveform, volume: f32);
    fn play_chord(&self, frequencies: &[f64], total_duration: Duration, arpeggio_step: Duration);
    fn play_click(&self);
    fn play_interval(&self, frequencies: (f64, f64));
}

/// Allows a started tone to be cut short. Dropping the handle leaves the
/// tone running to its natural end.
pub struct ToneHandle {
    inner: Option<(VoiceId, Weak<dyn AudioOutput>)>,
}

impl ToneHandle {
    fn inert() -> Self {
        Self { inner: None }
    }

    pub fn cancel(&self) {
        if let Some((id, output)) = &self.inner {
            if let Some(output) = output.upgrade() {
                output.cancel(*id);
            }
        }
    }
}

/// Produces tones, chords and clicks through a shared audio output.
/// The output handle is process-wide: create one engine and clone the
/// `Arc` it sits behind wherever playback is needed.
pub struct ToneEngine {
    output: Arc<dyn AudioOutput>,
    next_id: AtomicU64,
}

impl ToneEngine {
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        Self {
            output,
            next_id: AtomicU64::new(1),
        }
    }

    /// Opens the default audio device, degrading to a silent output when
    /// none is available rather than failing.
    pub fn with_default_output() -> Self {
        match CpalOutput::start() {
            Ok(output) => Self::new(Arc::new(output)),
            Err(err) => {
                warn!(%err, "audio device unavailable, tones will be silent");
                Self::new(Arc::new(NullOutput))
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.output.is_live()
    }

    /// Starts a tone and returns a cancellation handle.
    pub fn start_tone(
        &self,
        frequency: f64,
        duration: Duration,
        waveform: Waveform,
        volume: f32,
    ) -> ToneHandle {
        if frequency <= 0.0 || duration.is_zero() {
            warn!(frequency, ?duration, "ignoring unplayable tone request");
            return ToneHandle::inert();
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.submit(VoiceSpec {
            id,
            frequency,
            delay: Duration::ZERO,
            duration,
            waveform,
            volume: volume.clamp(f32::MIN_POSITIVE, 1.0),
        });
        ToneHandle {
            inner: Some((id, Arc::downgrade(&self.output))),
        }
    }

    fn submit(&self, voice: VoiceSpec) {
        if let Err(err) = self.output.submit(voice) {
            warn!(%err, id = voice.id, "audio output rejected voice");
        }
    }
}

impl TonePlayer for ToneEngine {
    fn play_tone(&self, frequency: f64, duration: Duration, waveform: Waveform, volume: f32) {
        let _ = self.start_tone(frequency, duration, waveform, volume);
    }

    /// One voice per chord note, onsets staggered by `arpeggio_step`.
    /// Every voice shares the chord's decay and release point, so a
    /// late-starting voice may be released around its own attack; the
    /// mixer tolerates that.
    fn play_chord(&self, frequencies: &[f64], total_duration: Duration, arpeggio_step: Duration) {
        if total_duration.is_zero() {
            warn!("ignoring chord with zero duration");
            return;
        }
        for (index, &frequency) in frequencies.iter().enumerate() {
            if frequency <= 0.0 {
                warn!(frequency, "skipping unplayable chord note");
                continue;
            }
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            self.submit(VoiceSpec {
                id,
                frequency,
                delay: arpeggio_step * index as u32,
                duration: total_duration,
                waveform: Waveform::Sine,
                volume: CHORD_VOLUME,
            });
        }
    }

    fn play_click(&self) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.submit(VoiceSpec {
            id,
            frequency: CLICK_FREQUENCY,
            delay: Duration::ZERO,
            duration: CLICK_DURATION,
            waveform: Waveform::Sine,
            volume: CLICK_VOLUME,
        });
    }

    fn play_interval(&self, frequencies: (f64, f64)) {
        for frequency in [frequencies.0, frequencies.1] {
            if frequency <= 0.0 {
                warn!(frequency, "skipping unplayable interval note");
                continue;
            }
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            self.submit(VoiceSpec {
                id,
                frequency,
                delay: Duration::ZERO,
                duration: INTERVAL_DURATION,
                waveform: Waveform::Sine,
                volume: INTERVAL_VOLUME,
            });
        }
    }
}

impl Default for ToneEngine {
    fn default() -> Self {
        info!("creating tone engine on the default audio output");
        Self::with_default_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingOutput {
        voices: Mutex<Vec<VoiceSpec>>,
        cancelled: Mutex<Vec<VoiceId>>,
    }

    impl AudioOutput for RecordingOutput {
        fn submit(&self, voice: VoiceSpec) -> Result<()> {
            self.voices.lock().unwrap().push(voice);
            Ok(())
        }

        fn cancel(&self, id: VoiceId) {
            self.cancelled.lock().unwrap().push(id);
        }
    }

    fn engine_with_recorder() -> (ToneEngine, Arc<RecordingOutput>) {
        let recorder = Arc::new(RecordingOutput::default());
        (ToneEngine::new(recorder.clone()), recorder)
    }

    #[test]
    fn tone_carries_the_requested_shape() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_tone(440.0, Duration::from_millis(500), Waveform::Square, 0.3);
        let voices = recorder.voices.lock().unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].frequency, 440.0);
        assert_eq!(voices[0].duration, Duration::from_millis(500));
        assert_eq!(voices[0].waveform, Waveform::Square);
        assert_eq!(voices[0].delay, Duration::ZERO);
    }

    #[test]
    fn chord_staggers_attacks_and_shares_the_release() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_chord(
            &[261.63, 329.63, 392.00],
            DEFAULT_CHORD_DURATION,
            DEFAULT_ARPEGGIO_STEP,
        );
        let voices = recorder.voices.lock().unwrap();
        assert_eq!(voices.len(), 3);
        let delays: Vec<u64> = voices.iter().map(|v| v.delay.as_millis() as u64).collect();
        assert_eq!(delays, vec![0, 50, 100]);
        assert!(voices
            .iter()
            .all(|v| v.duration == Duration::from_millis(1500)));
    }

    #[test]
    fn click_is_short_quiet_and_fixed_pitch() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_click();
        engine.play_click();
        let voices = recorder.voices.lock().unwrap();
        assert_eq!(voices.len(), 2);
        for voice in voices.iter() {
            assert_eq!(voice.frequency, CLICK_FREQUENCY);
            assert_eq!(voice.duration, CLICK_DURATION);
            assert_eq!(voice.volume, CLICK_VOLUME);
        }
        // Rapid clicks are independent voices with distinct ids.
        assert_ne!(voices[0].id, voices[1].id);
    }

    #[test]
    fn interval_plays_both_notes_simultaneously() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_interval((261.63, 392.00));
        let voices = recorder.voices.lock().unwrap();
        assert_eq!(voices.len(), 2);
        assert!(voices.iter().all(|v| v.delay.is_zero()));
        assert!(voices.iter().all(|v| v.duration == INTERVAL_DURATION));
    }

    #[test]
    fn unplayable_requests_are_absorbed() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_tone(-10.0, Duration::from_millis(500), Waveform::Sine, 0.3);
        engine.play_tone(440.0, Duration::ZERO, Waveform::Sine, 0.3);
        engine.play_chord(&[], DEFAULT_CHORD_DURATION, DEFAULT_ARPEGGIO_STEP);
        assert!(recorder.voices.lock().unwrap().is_empty());
    }

    #[test]
    fn handle_cancels_its_own_voice() {
        let (engine, recorder) = engine_with_recorder();
        let handle = engine.start_tone(440.0, Duration::from_secs(2), Waveform::Sine, 0.3);
        handle.cancel();
        let submitted = recorder.voices.lock().unwrap()[0].id;
        assert_eq!(recorder.cancelled.lock().unwrap().as_slice(), &[submitted]);
    }

    #[test]
    fn inert_handle_is_harmless() {
        let (engine, recorder) = engine_with_recorder();
        let handle = engine.start_tone(0.0, Duration::from_secs(1), Waveform::Sine, 0.3);
        handle.cancel();
        assert!(recorder.cancelled.lock().unwrap().is_empty());
    }

    #[test]
    fn volume_is_clamped_into_audible_range() {
        let (engine, recorder) = engine_with_recorder();
        engine.play_tone(440.0, Duration::from_millis(100), Waveform::Sine, 4.0);
        assert_eq!(recorder.voices.lock().unwrap()[0].volume, 1.0);
    }
}
