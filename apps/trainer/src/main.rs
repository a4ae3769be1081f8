use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fretwise_audio::engine::DEFAULT_TONE_VOLUME;
use fretwise_audio::{ToneEngine, TonePlayer, Waveform};
use fretwise_domain::{
    generate_progression, Chord, Instrument, NoteName, ProgressionStyle, Scale, Tuning,
    DEFAULT_BPM,
};
use fretwise_playback::{progression_steps, scale_steps, Metronome, PlaybackStep, SequencePlayer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fretwise music trainer, terminal edition")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a single note
    Note {
        /// Note name, e.g. C, F#, A
        name: String,
        #[arg(long, default_value_t = 4)]
        octave: i32,
        #[arg(long, default_value_t = 500)]
        duration_ms: u64,
        #[arg(long, value_enum, default_value_t = WaveformArg::Sine)]
        waveform: WaveformArg,
    },
    /// Play a chord from its symbol, e.g. Am, G7, Cmaj7
    Chord { symbol: String },
    /// Play a scale ascending from its tonic
    Scale {
        tonic: String,
        #[arg(long, value_enum, default_value_t = ScaleKind::Major)]
        kind: ScaleKind,
    },
    /// Generate and play a chord progression
    Progression {
        /// pop, rock, jazz, blues or classical
        style: String,
        #[arg(long, default_value_t = 4)]
        length: usize,
        #[arg(long, default_value_t = DEFAULT_BPM)]
        bpm: u32,
    },
    /// Run the metronome for a number of beats
    Metronome {
        #[arg(long, default_value_t = DEFAULT_BPM)]
        bpm: u32,
        #[arg(long, default_value_t = 8)]
        beats: u32,
    },
    /// Print the fretboard note map for an instrument
    Fretboard {
        /// guitar, bass, violin, cello or ukulele
        instrument: String,
        #[arg(long, default_value_t = 12)]
        frets: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WaveformArg {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl From<WaveformArg> for Waveform {
    fn from(arg: WaveformArg) -> Self {
        match arg {
            WaveformArg::Sine => Waveform::Sine,
            WaveformArg::Square => Waveform::Square,
            WaveformArg::Triangle => Waveform::Triangle,
            WaveformArg::Sawtooth => Waveform::Sawtooth,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScaleKind {
    Major,
    Minor,
    Pentatonic,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let engine = Arc::new(ToneEngine::with_default_output());
    if !engine.is_live() {
        info!("no audio device available, running silent");
    }

    match args.command {
        Command::Note {
            name,
            octave,
            duration_ms,
            waveform,
        } => {
            let note: NoteName = name.parse()?;
            let duration = Duration::from_millis(duration_ms);
            println!("{} at {:.2} Hz", note, note.frequency_at(octave));
            engine.play_tone(
                note.frequency_at(octave),
                duration,
                waveform.into(),
                DEFAULT_TONE_VOLUME,
            );
            tokio::time::sleep(duration + Duration::from_millis(100)).await;
        }
        Command::Chord { symbol } => {
            let chord: Chord = symbol.parse()?;
            println!(
                "{}: {}",
                chord,
                chord
                    .notes()
                    .iter()
                    .map(NoteName::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            play_steps(
                engine.clone(),
                vec![PlaybackStep {
                    item: fretwise_playback::StepItem::Chord {
                        frequencies: chord.frequencies(),
                    },
                    window: Duration::from_millis(1600),
                }],
            )
            .await;
        }
        Command::Scale { tonic, kind } => {
            let tonic: NoteName = tonic.parse()?;
            let scale = match kind {
                ScaleKind::Major => Scale::major(tonic),
                ScaleKind::Minor => Scale::natural_minor(tonic),
                ScaleKind::Pentatonic => Scale::minor_pentatonic(tonic),
            };
            println!(
                "{}: {}",
                scale.name,
                scale
                    .notes
                    .iter()
                    .map(NoteName::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            play_steps(engine.clone(), scale_steps(&scale.notes)).await;
        }
        Command::Progression { style, length, bpm } => {
            let style: ProgressionStyle = style.parse()?;
            let mut rng = StdRng::from_entropy();
            let chords = generate_progression(style, length, &mut rng);
            println!(
                "{style}: {}",
                chords
                    .iter()
                    .map(Chord::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            play_steps(engine.clone(), progression_steps(&chords, bpm)).await;
        }
        Command::Metronome { bpm, beats } => {
            let mut metronome = Metronome::new(engine.clone());
            metronome.start(bpm);
            println!("{} bpm for {beats} beats", metronome.bpm());
            tokio::time::sleep(metronome.interval() * beats + Duration::from_millis(100)).await;
            metronome.stop();
        }
        Command::Fretboard { instrument, frets } => {
            let instrument: Instrument = instrument.parse()?;
            let tuning = Tuning::standard(instrument);
            println!("{instrument} standard tuning, {frets} frets");
            for string in tuning.note_map(frets) {
                let row = string
                    .iter()
                    .map(|fret| format!("{:>2}", fret.note.label()))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{row}");
            }
        }
    }

    Ok(())
}

/// Play a step sequence and wait for it to finish plus a short decay tail.
async fn play_steps(player: Arc<dyn TonePlayer>, steps: Vec<PlaybackStep>) {
    let sequencer = SequencePlayer::new(player);
    let (done_tx, done_rx) = oneshot::channel();
    sequencer.play_with(steps, |_| (), move || {
        let _ = done_tx.send(());
    });
    let _ = done_rx.await;
    tokio::time::sleep(Duration::from_millis(200)).await;
}
