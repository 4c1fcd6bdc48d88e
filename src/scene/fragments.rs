//! Shard physics: small glass fragments under gravity with a lossy floor bounce.
//!
//! Fragments are never expired; they settle on the floor and stay for the rest
//! of the run. The live count is bounded by [`FragmentConfig::max_live`].

use glam::DVec3;
use rand::Rng;
use serde::Serialize;

use crate::config::{FragmentConfig, OverflowPolicy};

use super::SceneRng;

/// Half extents of the box spawn positions are jittered within.
const SPAWN_JITTER: DVec3 = DVec3::new(0.125, 0.06, 0.04);
/// Smallest shard radius; each shard adds up to `SIZE_JITTER`.
const MIN_SIZE: f64 = 0.02;
const SIZE_JITTER: f64 = 0.015;

/// One glass shard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    /// Icosahedron radius.
    pub size: f64,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Tumble angles about x and y (radians).
    pub rotation: (f64, f64),
}

/// The live fragment collection and its integrator.
#[derive(Debug, Clone)]
pub struct FragmentField {
    config: FragmentConfig,
    fragments: Vec<Fragment>,
    rng: SceneRng,
}

impl FragmentField {
    pub fn new(config: FragmentConfig, rng: SceneRng) -> Self {
        FragmentField {
            config,
            fragments: Vec::new(),
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Spawn up to `count` shards around `center`, returning how many were created.
    ///
    /// Once the live cap is reached the overflow policy decides whether the
    /// batch is truncated or the oldest shards make room.
    pub fn spawn(&mut self, center: DVec3, count: usize) -> usize {
        let max_live = self.config.max_live;
        let count = match self.config.overflow {
            OverflowPolicy::Ignore => count.min(max_live.saturating_sub(self.fragments.len())),
            OverflowPolicy::EvictOldest => {
                let count = count.min(max_live);
                let excess = (self.fragments.len() + count).saturating_sub(max_live);
                if excess > 0 {
                    log::warn!("fragment cap {max_live} reached, evicting {excess} oldest");
                    self.fragments.drain(..excess);
                }
                count
            }
        };
        if count == 0 {
            log::warn!("fragment cap {max_live} reached, spawn ignored");
            return 0;
        }

        self.fragments.reserve(count);
        for _ in 0..count {
            let fragment = self.random_fragment(center);
            self.fragments.push(fragment);
        }
        log::debug!(
            "spawned {count} fragments at {center}, {} live",
            self.fragments.len()
        );
        count
    }

    fn random_fragment(&mut self, center: DVec3) -> Fragment {
        let rng = &mut self.rng;
        let size = MIN_SIZE + rng.random::<f64>() * SIZE_JITTER;
        let jitter = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ) * SPAWN_JITTER;
        let velocity = DVec3::new(
            rng.random_range(-0.4..0.4),
            rng.random_range(0.4..1.6),
            rng.random_range(-0.2..0.2),
        );
        Fragment {
            size,
            position: center + jitter,
            velocity,
            rotation: (0.0, 0.0),
        }
    }

    /// Advance every live fragment by `dt` seconds. Non-positive steps are ignored.
    pub fn integrate(&mut self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }
        let FragmentConfig {
            gravity,
            floor,
            restitution,
            friction,
            ..
        } = self.config;

        for fragment in &mut self.fragments {
            fragment.velocity.y -= gravity * dt;
            fragment.position += fragment.velocity * dt;
            if fragment.position.y < floor {
                fragment.position.y = floor;
                fragment.velocity.y *= -restitution;
                fragment.velocity.x *= friction;
                fragment.velocity.z *= friction;
            }
            fragment.rotation.0 += dt * self.rng.random_range(0.5..2.0);
            fragment.rotation.1 += dt * self.rng.random_range(0.5..2.0);
        }
    }
}
