//! Animation sequencer: the phase clock of the slicing scene.
//!
//! Phases run `intro → slice1 → between → slice2 → settle` and never go back.
//! Narrative timing (phase durations) uses the unclamped frame delta; slice
//! offsets and shard physics advance by the delta clamped to
//! [`TimelineConfig::max_step`].

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::TimelineConfig;
use crate::error::SceneError;

use super::fragments::FragmentField;

/// Timeline phases in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Intro,
    Slice1,
    Between,
    Slice2,
    Settle,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::Slice1 => "slice1",
            Phase::Between => "between",
            Phase::Slice2 => "slice2",
            Phase::Settle => "settle",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fire-and-forget sound cue raised by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEvent {
    Slice,
    Crack,
    Shards,
}

impl SoundEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEvent::Slice => "slice",
            SoundEvent::Crack => "crack",
            SoundEvent::Shards => "shards",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundEvent {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slice" => Ok(SoundEvent::Slice),
            "crack" => Ok(SoundEvent::Crack),
            "shards" => Ok(SoundEvent::Shards),
            _ => Err(SceneError::UnknownSound(s.to_string())),
        }
    }
}

/// Phase state machine driving slab offsets, shard spawns and sound cues.
#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    timeline: TimelineConfig,
    phase: Phase,
    /// Seconds since the current phase was entered.
    elapsed: f64,
    slice1_offset: f64,
    slice2_offset: f64,
    /// Whether the crack cue already fired for the current slice.
    crack_fired: bool,
    /// Whether the current slice already made its spawn attempt.
    batch_spawned: bool,
    fragments: FragmentField,
}

impl AnimationSequencer {
    pub fn new(timeline: TimelineConfig, fragments: FragmentField) -> Self {
        AnimationSequencer {
            timeline,
            phase: Phase::Intro,
            elapsed: 0.0,
            slice1_offset: 0.0,
            slice2_offset: 0.0,
            crack_fired: false,
            batch_spawned: false,
            fragments,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn slice1_offset(&self) -> f64 {
        self.slice1_offset
    }

    pub fn slice2_offset(&self) -> f64 {
        self.slice2_offset
    }

    pub fn fragments(&self) -> &FragmentField {
        &self.fragments
    }

    /// Advance by one frame of `delta` seconds, returning the sound cues raised
    /// during this frame in emission order.
    pub fn tick(&mut self, delta: f64) -> Vec<SoundEvent> {
        let mut sounds = Vec::new();
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let step = delta.min(self.timeline.max_step);
        self.elapsed += delta;

        match self.phase {
            Phase::Intro => {
                if self.elapsed > self.timeline.intro_duration {
                    self.enter(Phase::Slice1);
                    sounds.push(SoundEvent::Slice);
                }
            }
            Phase::Slice1 => {
                self.slice1_offset = advance(self.slice1_offset, self.timeline.slice1_rate, step);
                let offset = self.slice1_offset;
                self.check_crack(offset, &mut sounds);
                if !self.batch_spawned
                    && offset > self.timeline.spawn_threshold
                    && self.fragments.is_empty()
                {
                    self.spawn_batch(self.timeline.spawn_depths.0, &mut sounds);
                }
                if offset >= 1.0 {
                    self.enter(Phase::Between);
                }
            }
            Phase::Between => {
                if self.elapsed > self.timeline.between_duration {
                    self.enter(Phase::Slice2);
                    sounds.push(SoundEvent::Slice);
                }
            }
            Phase::Slice2 => {
                self.slice2_offset = advance(self.slice2_offset, self.timeline.slice2_rate, step);
                let offset = self.slice2_offset;
                self.check_crack(offset, &mut sounds);
                if !self.batch_spawned
                    && offset > self.timeline.spawn_threshold
                    && self.fragments.len() < self.timeline.second_batch_gate
                {
                    self.spawn_batch(self.timeline.spawn_depths.1, &mut sounds);
                }
                if offset >= 1.0 {
                    self.enter(Phase::Settle);
                }
            }
            Phase::Settle => {}
        }

        if !self.fragments.is_empty() {
            self.fragments.integrate(step);
        }
        sounds
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("phase {} -> {phase} after {:.3}s", self.phase, self.elapsed);
        self.phase = phase;
        self.elapsed = 0.0;
        self.crack_fired = false;
        self.batch_spawned = false;
    }

    /// Fires once on the first frame whose offset lands inside the crack
    /// window. A large step may jump over the window; no cue is raised then.
    fn check_crack(&mut self, offset: f64, sounds: &mut Vec<SoundEvent>) {
        let (low, high) = self.timeline.crack_window;
        if !self.crack_fired && offset > low && offset < high {
            self.crack_fired = true;
            sounds.push(SoundEvent::Crack);
        }
    }

    /// At most one attempt per slice, even when the cap truncates it to nothing.
    fn spawn_batch(&mut self, depth: f64, sounds: &mut Vec<SoundEvent>) {
        self.batch_spawned = true;
        let spawned = self
            .fragments
            .spawn(DVec3::new(0.0, 0.0, depth), self.timeline.batch_size);
        if spawned > 0 {
            sounds.push(SoundEvent::Shards);
        }
    }
}

fn advance(offset: f64, rate: f64, step: f64) -> f64 {
    (offset + rate * step).clamp(0.0, 1.0)
}
