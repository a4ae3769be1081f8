use std::sync::mpsc;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use tracing::{info, warn};

use crate::backend::AudioOutput;
use crate::voice::{VoiceId, VoiceMixer, VoiceSpec};

const COMMAND_QUEUE_CAPACITY: usize = 256;

enum Command {
    Start(VoiceSpec),
    Cancel(VoiceId),
}

/// Real audio device. The cpal stream lives on a dedicated thread (cpal
/// streams are not `Send`); voice commands reach the device callback
/// through a lock-free SPSC queue, so submitting a tone never blocks on
/// the audio thread.
pub struct CpalOutput {
    commands: Mutex<HeapProducer<Command>>,
}

impl CpalOutput {
    pub fn start() -> Result<Self> {
        let queue = HeapRb::<Command>::new(COMMAND_QUEUE_CAPACITY);
        let (producer, consumer) = queue.split();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        std::thread::Builder::new()
            .name("fretwise-audio".into())
            .spawn(move || run_device_thread(consumer, ready_tx))
            .context("spawn audio thread")?;

        ready_rx
            .recv()
            .context("audio thread exited before reporting readiness")??;

        Ok(Self {
            commands: Mutex::new(producer),
        })
    }

    fn push(&self, command: Command) {
        let mut producer = self
            .commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if producer.push(command).is_err() {
            warn!("audio command queue full, dropping command");
        }
    }
}

impl AudioOutput for CpalOutput {
    fn submit(&self, voice: VoiceSpec) -> Result<()> {
        self.push(Command::Start(voice));
        Ok(())
    }

    fn cancel(&self, id: VoiceId) {
        self.push(Command::Cancel(id));
    }
}

fn run_device_thread(consumer: HeapConsumer<Command>, ready: mpsc::Sender<Result<()>>) {
    match open_stream(consumer) {
        Ok(stream) => {
            let result = stream.play().map_err(Into::into);
            let failed = result.is_err();
            let _ = ready.send(result);
            if failed {
                return;
            }
            // The stream is dropped, and playback stops, when this
            // thread ends; it never does during normal operation.
            loop {
                std::thread::park();
            }
        }
        Err(err) => {
            let _ = ready.send(Err(err));
        }
    }
}

fn open_stream(consumer: HeapConsumer<Command>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))?;
    let config = device
        .default_output_config()
        .context("query default output config")?;
    info!(
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate = config.sample_rate().0,
        "opening audio output"
    );

    match config.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), consumer),
        SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), consumer),
        SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), consumer),
        other => Err(anyhow!("unsupported sample format {other:?}")),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: HeapConsumer<Command>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f64;
    let channels = config.channels as usize;
    let mut mixer = VoiceMixer::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            while let Some(command) = consumer.pop() {
                match command {
                    Command::Start(voice) => mixer.add(voice),
                    Command::Cancel(id) => mixer.cancel(id),
                }
            }
            for frame in data.chunks_mut(channels) {
                let value = mixer.next_sample(sample_rate);
                for sample in frame.iter_mut() {
                    *sample = T::from_sample(value);
                }
            }
        },
        |err| warn!(%err, "audio stream error"),
        None,
    )?;
    Ok(stream)
}
