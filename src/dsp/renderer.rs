//! Offline rendering: a clock-driven output device, WAV export and a full
//! soundtrack render of the slicing scene.

use crate::config::SceneConfig;
use crate::error::{AudioError, SceneError};
use crate::scene::Scene;
use crate::scene::sequencer::{Phase, SoundEvent};

use super::engine::{AudioDevice, AudioEngine};
use super::mixer::Mixer;
use super::voice::Voice;

/// Frames rendered per mixing block.
const BLOCK_SIZE: usize = 128;
/// Silence kept after the last cue so decays are not cut off.
const TAIL_SECONDS: f64 = 0.5;
/// Upper bound on simulated time for a soundtrack render.
const MAX_SOUNDTRACK_SECONDS: f64 = 120.0;
/// Highest sample rate an offline device accepts.
pub const MAX_SAMPLE_RATE: f64 = 384_000.0;

/// An output device that renders scheduled voices to memory.
///
/// The clock does not run on its own: the owner moves it with
/// [`OfflineRenderer::set_time`] and then calls [`OfflineRenderer::render`].
#[derive(Debug, Clone)]
pub struct OfflineRenderer {
    sample_rate: f64,
    time: f64,
    /// Frames already written by earlier `render` calls.
    rendered: usize,
    mixer: Mixer,
    voices: Vec<Voice>,
}

impl OfflineRenderer {
    pub fn new(sample_rate: f64) -> Self {
        OfflineRenderer {
            sample_rate,
            time: 0.0,
            rendered: 0,
            mixer: Mixer::new(),
            voices: Vec::new(),
        }
    }

    /// A device at `sample_rate`, rejecting rates that are not finite, not
    /// positive or above [`MAX_SAMPLE_RATE`].
    pub fn open(sample_rate: f64) -> Result<Self, AudioError> {
        if sample_rate > 0.0 && sample_rate <= MAX_SAMPLE_RATE {
            Ok(Self::new(sample_rate))
        } else {
            Err(AudioError::InvalidSampleRate(sample_rate))
        }
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Voices scheduled but not yet rendered to completion.
    pub fn pending_voices(&self) -> usize {
        self.voices.len()
    }

    /// Render the device timeline up to `until` seconds as interleaved stereo
    /// f32, continuing from where the previous call stopped.
    ///
    /// Voices that finish inside the range are dropped.
    pub fn render(&mut self, until: f64) -> Vec<f32> {
        let total_frames = (until * self.sample_rate).round().max(0.0) as usize;
        let mut output = Vec::with_capacity(total_frames.saturating_sub(self.rendered) * 2);

        let mut block_start = self.rendered;
        while block_start < total_frames {
            let block_end = (block_start + BLOCK_SIZE).min(total_frames);
            let block_end_time = block_end as f64 / self.sample_rate;

            self.mixer.clear(block_end - block_start);
            for voice in self.voices.iter_mut() {
                if voice.start() >= block_end_time {
                    continue;
                }
                for (i, frame) in (block_start..block_end).enumerate() {
                    let t = frame as f64 / self.sample_rate;
                    self.mixer.add(i, voice.next_frame(t));
                }
            }
            self.mixer.drain_into(&mut output);

            // Remove finished voices
            self.voices.retain(|v| !v.is_finished(block_end_time));

            block_start = block_end;
        }
        self.rendered = self.rendered.max(total_frames);

        output
    }
}

impl AudioDevice for OfflineRenderer {
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_master_gain(&mut self, gain: f64) {
        self.mixer.master_gain = gain;
    }

    fn schedule(&mut self, voice: Voice) {
        self.voices.push(voice);
    }
}

/// Render one sound cue in isolation, starting at time zero.
pub fn render_cue(
    event: SoundEvent,
    sample_rate: f64,
    seed: u64,
) -> Result<Vec<f32>, AudioError> {
    let mut engine = AudioEngine::with_seed(seed);
    engine.start(|| OfflineRenderer::open(sample_rate))?;
    engine.play(event);
    Ok(engine
        .device_mut()
        .map(|device| device.render(cue_length(event) + TAIL_SECONDS))
        .unwrap_or_default())
}

fn cue_length(event: SoundEvent) -> f64 {
    match event {
        SoundEvent::Slice => 0.2,
        SoundEvent::Crack => 0.13,
        SoundEvent::Shards => 0.38,
    }
}

/// Run the whole scene at a fixed frame rate and render every sound cue at
/// the simulated time it was raised.
pub fn render_soundtrack(
    config: SceneConfig,
    sample_rate: f64,
    fps: f64,
) -> Result<Vec<f32>, SceneError> {
    if !(fps > 0.0) {
        return Err(SceneError::NonPositive { field: "fps", value: fps });
    }
    let mut scene = Scene::new(config)?;
    let mut engine = AudioEngine::with_seed(config.seed.wrapping_add(1));
    engine.start(|| OfflineRenderer::open(sample_rate))?;

    let dt = 1.0 / fps;
    let max_frames = (MAX_SOUNDTRACK_SECONDS * fps).ceil() as u64;
    while scene.sequencer().phase() != Phase::Settle && scene.frame() < max_frames {
        let sounds = scene.advance(dt);
        if let Some(device) = engine.device_mut() {
            device.set_time(scene.frame() as f64 * dt);
        }
        for sound in sounds {
            engine.play(sound);
        }
    }

    let duration = scene.frame() as f64 * dt + TAIL_SECONDS;
    log::debug!("rendering {duration:.2}s soundtrack over {} frames", scene.frame());
    Ok(engine
        .device_mut()
        .map(|device| device.render(duration))
        .unwrap_or_default())
}

/// Encode interleaved stereo f32 samples as a 16-bit PCM WAV file.
pub fn render_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s as f64 * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect();
    encode_wav(&pcm, sample_rate, 2)
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
