use std::f64::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Near-zero target of the amplitude ramp. An exponential ramp cannot
/// reach zero, so decays land here, matching the audible behaviour of a
/// gain node ramped to 1e-5.
pub const GAIN_FLOOR: f32 = 1e-5;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

pub type VoiceId = u64;

/// One scheduled tone: frequency, onset delay, lifetime and loudness.
/// Immutable once submitted to an output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSpec {
    pub id: VoiceId,
    pub frequency: f64,
    /// Silence before the oscillator is heard, relative to submission.
    pub delay: Duration,
    /// Lifetime relative to submission; the voice is retired here even
    /// if `delay` consumed most or all of it.
    pub duration: Duration,
    pub waveform: Waveform,
    pub volume: f32,
}

/// Amplitude at `t` seconds into a voice's lifetime: an exponential ramp
/// from `volume` down to the floor at `duration`.
fn envelope_gain(volume: f32, t: f64, duration: f64) -> f32 {
    if t >= duration {
        return 0.0;
    }
    let ratio = (GAIN_FLOOR / volume) as f64;
    volume * ratio.powf(t / duration) as f32
}

fn oscillator_value(waveform: Waveform, frequency: f64, t: f64) -> f32 {
    let cycle = (t * frequency).rem_euclid(1.0);
    let value = match waveform {
        Waveform::Sine => (TAU * t * frequency).sin(),
        Waveform::Square => {
            if cycle < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 4.0 * (cycle - 0.5).abs() - 1.0,
        Waveform::Sawtooth => 2.0 * cycle - 1.0,
    };
    value as f32
}

#[derive(Debug)]
struct ActiveVoice {
    spec: VoiceSpec,
    /// Samples rendered since the voice was accepted.
    position: u64,
}

impl ActiveVoice {
    fn next_sample(&mut self, sample_rate: f64) -> f32 {
        let t = self.position as f64 / sample_rate;
        self.position += 1;
        let heard = t - self.spec.delay.as_secs_f64();
        if heard < 0.0 {
            return 0.0;
        }
        let gain = envelope_gain(self.spec.volume, t, self.spec.duration.as_secs_f64());
        oscillator_value(self.spec.waveform, self.spec.frequency, heard) * gain
    }

    fn finished(&self, sample_rate: f64) -> bool {
        self.position as f64 / sample_rate >= self.spec.duration.as_secs_f64()
    }
}

/// Mixes the currently sounding voices into an output buffer. Purely
/// sample-driven, so it runs identically inside a device callback and in
/// tests.
#[derive(Debug, Default)]
pub struct VoiceMixer {
    voices: Vec<ActiveVoice>,
}

impl VoiceMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: VoiceSpec) {
        self.voices.push(ActiveVoice { spec, position: 0 });
    }

    /// Removing an already retired voice is a no-op.
    pub fn cancel(&mut self, id: VoiceId) {
        self.voices.retain(|voice| voice.spec.id != id);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Sum of all voices for one mono frame; retires voices that have
    /// outlived their duration.
    pub fn next_sample(&mut self, sample_rate: f64) -> f32 {
        let mixed = self
            .voices
            .iter_mut()
            .map(|voice| voice.next_sample(sample_rate))
            .sum();
        self.voices.retain(|voice| !voice.finished(sample_rate));
        mixed
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f64) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec(id: VoiceId, delay_ms: u64, duration_ms: u64) -> VoiceSpec {
        VoiceSpec {
            id,
            frequency: 440.0,
            delay: Duration::from_millis(delay_ms),
            duration: Duration::from_millis(duration_ms),
            waveform: Waveform::Sine,
            volume: 0.3,
        }
    }

    #[test]
    fn envelope_starts_at_volume_and_decays_to_floor() {
        assert_relative_eq!(envelope_gain(0.3, 0.0, 1.0), 0.3);
        let near_end = envelope_gain(0.3, 0.999, 1.0);
        assert!(near_end > 0.0 && near_end < 1e-4);
        assert_eq!(envelope_gain(0.3, 1.0, 1.0), 0.0);
    }

    #[test]
    fn envelope_is_monotonically_decreasing() {
        let mut last = f32::MAX;
        for i in 0..100 {
            let gain = envelope_gain(0.5, i as f64 * 0.01, 1.0);
            assert!(gain < last);
            last = gain;
        }
    }

    #[test]
    fn voice_retires_exactly_after_duration() {
        let mut mixer = VoiceMixer::new();
        mixer.add(spec(1, 0, 10));
        // 10 ms at 1 kHz = 10 samples.
        for _ in 0..10 {
            assert_eq!(mixer.active_voices(), 1);
            mixer.next_sample(1000.0);
        }
        assert_eq!(mixer.active_voices(), 0);
        assert_eq!(mixer.next_sample(1000.0), 0.0);
    }

    #[test]
    fn delayed_voice_is_silent_before_onset() {
        let mut mixer = VoiceMixer::new();
        mixer.add(spec(1, 5, 10));
        for _ in 0..5 {
            assert_eq!(mixer.next_sample(1000.0), 0.0);
        }
    }

    #[test]
    fn voice_with_delay_past_duration_still_retires() {
        // The late-start edge case: onset would fall after the shared
        // release point, so the voice dies without ever sounding.
        let mut mixer = VoiceMixer::new();
        mixer.add(spec(1, 20, 10));
        for _ in 0..10 {
            assert_eq!(mixer.next_sample(1000.0), 0.0);
        }
        assert_eq!(mixer.active_voices(), 0);
        // Double release is harmless.
        mixer.cancel(1);
        mixer.cancel(1);
    }

    #[test]
    fn cancel_removes_only_the_target_voice() {
        let mut mixer = VoiceMixer::new();
        mixer.add(spec(1, 0, 1000));
        mixer.add(spec(2, 0, 1000));
        mixer.cancel(1);
        assert_eq!(mixer.active_voices(), 1);
    }

    #[test]
    fn all_waveforms_stay_in_unit_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Triangle,
            Waveform::Sawtooth,
        ] {
            for i in 0..1000 {
                let value = oscillator_value(waveform, 440.0, i as f64 / 48_000.0);
                assert!((-1.0..=1.0).contains(&value), "{waveform:?} out of range");
            }
        }
    }

    #[test]
    fn render_fills_a_buffer() {
        let mut mixer = VoiceMixer::new();
        mixer.add(spec(1, 0, 100));
        let mut buffer = vec![0.0f32; 512];
        mixer.render(&mut buffer, 48_000.0);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));
    }
}
