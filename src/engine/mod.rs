//! The audio engine: voice collection, render loop, and stream lifecycle.
//!
//! Two actors meet here. The control actor (the thread that owns the
//! [`AudioEngine`]) creates voices at a slow cadence and occasionally reaps
//! the expired ones. The render actor is the audio backend's callback
//! thread: at a fixed, hard-deadline cadence it mixes every live voice into
//! the next output buffer. The two synchronize on the single lock inside
//! [`registry::VoiceRegistry`] — see that module for the lock discipline.

pub mod registry;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::dsp::envelope::Envelope;
use crate::dsp::voice::{Voice, VoiceId};
use crate::dsp::wavetable::WaveTable;
use crate::io::writer::SampleWriter;
use crate::MAX_BLOCK_SIZE;

use self::registry::VoiceRegistry;

/// Errors from opening or driving the audio engine. Everything here is a
/// resource problem: a device or file we could not acquire or drive.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no default audio output device available")]
    NoOutputDevice,

    #[error("failed to query the output device config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to stop the output stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[error("output file error: {0}")]
    OutputFile(#[from] hound::Error),
}

/// Settings for [`AudioEngine::open`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sample rate to synthesize and play at.
    pub sample_rate: u32,
    /// If set, every rendered buffer is also appended to this WAV file.
    ///
    /// Mirroring costs file I/O on the render thread (after the registry
    /// lock is released); on slow disks it can still cause underruns,
    /// which is why it is opt-in.
    pub output_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            output_path: None,
        }
    }
}

/// Owns the voice registry and the output stream; mixes every live voice
/// into each output buffer the device asks for.
pub struct AudioEngine {
    registry: Arc<VoiceRegistry>,
    writer: Option<Arc<Mutex<SampleWriter>>>,
    stream: cpal::Stream,
    sample_rate: u32,
    next_id: u64,
}

impl AudioEngine {
    /// Open the default output device and, if configured, the mirror file.
    ///
    /// Fails if either resource is unavailable; on failure nothing is left
    /// open. The stream does not deliver buffers until [`start`] is
    /// called.
    ///
    /// [`start`]: AudioEngine::start
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        let writer = match &config.output_path {
            Some(path) => Some(Arc::new(Mutex::new(SampleWriter::create(
                path,
                config.sample_rate,
            )?))),
            None => None,
        };

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let channels = device.default_output_config()?.channels() as usize;

        let stream_config = cpal::StreamConfig {
            channels: channels as u16,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let registry = Arc::new(VoiceRegistry::new());
        let render_registry = Arc::clone(&registry);
        let mirror = writer.clone();
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels;
                let mut written = 0;

                while written < frames {
                    let count = (frames - written).min(MAX_BLOCK_SIZE);
                    let block = &mut mono[..count];

                    // Mix all live voices; the registry lock is held for
                    // this block only.
                    render_registry.render(block);

                    // Fan the mono mix out to every device channel.
                    for (i, &sample) in block.iter().enumerate() {
                        let offset = (written + i) * channels;
                        for channel in 0..channels {
                            data[offset + channel] = sample;
                        }
                    }

                    // Mirror to the file outside the registry lock.
                    if let Some(writer) = &mirror {
                        if let Err(e) = writer.lock().unwrap().append(block) {
                            log::error!("dropping mirrored samples: {e}");
                        }
                    }

                    written += count;
                }
            },
            |err| log::error!("output stream error: {err}"),
            None,
        )?;

        Ok(Self {
            registry,
            writer,
            stream,
            sample_rate: config.sample_rate,
            next_id: 0,
        })
    }

    /// Schedule a note: build a voice from a shared table, a shared
    /// envelope, and the given schedule, and append it to the registry.
    ///
    /// Returns the id the voice was registered under. Ids are unique among
    /// currently live voices.
    pub fn add_voice(
        &mut self,
        table: Arc<WaveTable>,
        envelope: Arc<Envelope>,
        frequency: f32,
        amplitude: f32,
        duration_secs: f32,
        wait_secs: f32,
    ) -> VoiceId {
        let id = VoiceId(self.next_id);
        self.next_id += 1;

        let voice = Voice::new(
            id,
            table,
            envelope,
            self.sample_rate,
            frequency,
            amplitude,
            duration_secs,
            wait_secs,
        );
        log::debug!(
            "scheduled voice {} at {:.2} Hz for {duration_secs} s (+{wait_secs} s wait)",
            id.0,
            voice.frequency(),
        );
        self.registry.add(voice);
        id
    }

    /// Reap expired voices. Call this from the control loop every pass or
    /// two; it must never run on the render path. Returns the reap count.
    pub fn reap_expired(&self) -> usize {
        self.registry.remove_expired()
    }

    /// Begin frame delivery: the device starts invoking the render
    /// callback.
    pub fn start(&self) -> Result<(), EngineError> {
        self.stream.play()?;
        Ok(())
    }

    /// Halt frame delivery. Voices keep their state; a subsequent
    /// [`start`] resumes where playback left off.
    ///
    /// [`start`]: AudioEngine::start
    pub fn stop(&self) -> Result<(), EngineError> {
        self.stream.pause()?;
        Ok(())
    }

    /// Tear down: drop every remaining voice, close the stream, and
    /// finalize the mirror file so its header reflects what was written.
    pub fn shutdown(self) -> Result<(), EngineError> {
        self.registry.clear();
        drop(self.stream);

        if let Some(writer) = self.writer {
            writer.lock().unwrap().finalize()?;
        }
        Ok(())
    }

    /// Number of voices currently in the registry, reaped or not.
    pub fn live_voices(&self) -> usize {
        self.registry.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
