//! Audio Engine: turns sound cues into scheduled voices on an output device.
//!
//! The engine is an ordinary owned value. It stays inactive until [`AudioEngine::start`]
//! opens a device (hosts call it from a user gesture); until then every
//! `play_*` call is a silent no-op. Scheduling is fire-and-forget: voices are
//! handed to the device and never referenced again.

use rand::SeedableRng;

use crate::error::AudioError;
use crate::scene::SceneRng;
use crate::scene::sequencer::SoundEvent;

use super::recipes;
use super::voice::Voice;

/// Fixed level of the master bus every voice is routed through.
pub const MASTER_GAIN: f64 = 0.6;

/// An output that mixes scheduled voices through one master bus.
pub trait AudioDevice {
    fn sample_rate(&self) -> f64;
    /// Current time of the device clock in seconds.
    fn current_time(&self) -> f64;
    fn set_master_gain(&mut self, gain: f64);
    /// Take ownership of a voice; the device plays it and drops it once finished.
    fn schedule(&mut self, voice: Voice);
}

/// The procedural sound engine.
pub struct AudioEngine<D: AudioDevice> {
    device: Option<D>,
    rng: SceneRng,
}

impl<D: AudioDevice> AudioEngine<D> {
    /// An inactive engine drawing randomness from `rng`.
    pub fn new(rng: SceneRng) -> Self {
        AudioEngine { device: None, rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SceneRng::seed_from_u64(seed))
    }

    pub fn is_started(&self) -> bool {
        self.device.is_some()
    }

    /// Open the output device and route the master bus to it.
    ///
    /// Idempotent: once started, `open` is not called again. If `open` fails
    /// the engine stays inactive and `start` may be retried.
    pub fn start(
        &mut self,
        open: impl FnOnce() -> Result<D, AudioError>,
    ) -> Result<(), AudioError> {
        if self.device.is_some() {
            return Ok(());
        }
        let mut device = open().inspect_err(|e| log::warn!("audio start failed: {e}"))?;
        device.set_master_gain(MASTER_GAIN);
        log::info!("audio started at {} Hz", device.sample_rate());
        self.device = Some(device);
        Ok(())
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> Option<&mut D> {
        self.device.as_mut()
    }

    pub fn into_device(self) -> Option<D> {
        self.device
    }

    pub fn play(&mut self, event: SoundEvent) {
        match event {
            SoundEvent::Slice => self.play_slice(),
            SoundEvent::Crack => self.play_crack(),
            SoundEvent::Shards => self.play_shards(),
        }
    }

    pub fn play_slice(&mut self) {
        let Some(device) = &mut self.device else {
            return;
        };
        let now = device.current_time();
        let voice = recipes::slice(now, device.sample_rate(), &mut self.rng);
        log::trace!("slice voice at {now:.3}s");
        device.schedule(voice);
    }

    pub fn play_crack(&mut self) {
        let Some(device) = &mut self.device else {
            return;
        };
        let now = device.current_time();
        log::trace!("crack voice at {now:.3}s");
        device.schedule(recipes::crack(now, device.sample_rate()));
    }

    pub fn play_shards(&mut self) {
        let Some(device) = &mut self.device else {
            return;
        };
        let now = device.current_time();
        log::trace!("{} shard voices at {now:.3}s", recipes::SHARD_VOICES);
        for voice in recipes::shards(now, device.sample_rate(), &mut self.rng) {
            device.schedule(voice);
        }
    }
}
