//! Scene simulation: pure state updates for the slicing animation.
//!
//! Everything here is deterministic for a given seed and frame-delta sequence,
//! and nothing depends on a renderer or an audio device. A host calls
//! [`Scene::advance`] once per rendered frame, forwards the returned sound
//! cues to the audio engine, and draws [`Scene::snapshot`].

pub mod clip;
pub mod fragments;
pub mod frame;
pub mod sequencer;
pub mod tool;

use rand::SeedableRng;

use crate::config::SceneConfig;
use crate::error::SceneError;

use self::clip::ClipPlaneSet;
use self::fragments::FragmentField;
use self::frame::FrameSnapshot;
use self::sequencer::{AnimationSequencer, SoundEvent};
use self::tool::ToolMotionController;

/// Seedable generator used for every random draw in the crate.
pub type SceneRng = rand_chacha::ChaCha8Rng;

/// The complete slicing scene: slabs, sequencer, shards, knife and hand.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    clip_planes: ClipPlaneSet,
    sequencer: AnimationSequencer,
    tool: ToolMotionController,
    frame: u64,
}

impl Scene {
    /// Validate `config` and build the scene at `t = 0`.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let fragments = FragmentField::new(config.fragments, SceneRng::seed_from_u64(config.seed));
        Ok(Scene {
            config,
            clip_planes: ClipPlaneSet::new(&config.geometry),
            sequencer: AnimationSequencer::new(config.timeline, fragments),
            tool: ToolMotionController::new(config.timeline.max_step),
            frame: 0,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Self::new(SceneConfig::from_json(json)?)
    }

    /// Advance every component by one frame, returning the sound cues it raised.
    pub fn advance(&mut self, delta: f64) -> Vec<SoundEvent> {
        self.frame += 1;
        let sounds = self.sequencer.tick(delta);
        self.tool.advance(delta);
        for sound in &sounds {
            log::trace!("frame {}: sound cue {sound}", self.frame);
        }
        sounds
    }

    /// Like [`Scene::advance`], delivering each cue to `on_sound` in order.
    pub fn advance_with(&mut self, delta: f64, mut on_sound: impl FnMut(SoundEvent)) {
        for sound in self.advance(delta) {
            on_sound(sound);
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clip_planes(&self) -> &ClipPlaneSet {
        &self.clip_planes
    }

    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }

    pub fn tool(&self) -> &ToolMotionController {
        &self.tool
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
