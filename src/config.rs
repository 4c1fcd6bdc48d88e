//! Scene configuration: every timing, geometry and physics constant in one place.
//!
//! Defaults reproduce the scripted scene exactly. A config loaded from JSON may
//! override any subset of fields; missing fields fall back to the defaults.
//! Nothing is built from a config until [`SceneConfig::validate`] passes.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Cut layout of the sphere along the slicing (z) axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceGeometry {
    /// Radius of the sliced sphere in scene units.
    pub radius: f64,
    /// Near boundary of the first (front) slab.
    pub slice1_start: f64,
    pub slice1_thickness: f64,
    /// Near boundary of the second slab.
    pub slice2_start: f64,
    pub slice2_thickness: f64,
}

impl Default for SliceGeometry {
    fn default() -> Self {
        Self {
            radius: 0.45,
            slice1_start: 0.1,
            slice1_thickness: 0.10,
            slice2_start: -0.07,
            slice2_thickness: 0.12,
        }
    }
}

impl SliceGeometry {
    pub fn slice1_end(&self) -> f64 {
        self.slice1_start + self.slice1_thickness
    }

    pub fn slice2_end(&self) -> f64 {
        self.slice2_start + self.slice2_thickness
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        positive("geometry.radius", self.radius)?;
        positive("geometry.slice1_thickness", self.slice1_thickness)?;
        positive("geometry.slice2_thickness", self.slice2_thickness)?;
        if self.slice2_end() > self.slice1_start {
            return Err(SceneError::OverlappingSlabs {
                slice1_start: self.slice1_start,
                slice2_start: self.slice2_start,
                slice2_end: self.slice2_end(),
            });
        }
        for boundary in [self.slice2_start, self.slice1_end()] {
            if boundary.abs() >= self.radius {
                return Err(SceneError::SlabOutsideVolume {
                    boundary,
                    radius: self.radius,
                });
            }
        }
        Ok(())
    }
}

/// Phase durations, slice rates and trigger thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Seconds spent in `intro` before the first cut.
    pub intro_duration: f64,
    /// Seconds spent in `between` before the second cut.
    pub between_duration: f64,
    /// Offset advance per second during `slice1`.
    pub slice1_rate: f64,
    /// Offset advance per second during `slice2`.
    pub slice2_rate: f64,
    /// Open interval of slice offset in which the crack sound fires.
    pub crack_window: (f64, f64),
    /// Slice offset past which shards are spawned.
    pub spawn_threshold: f64,
    /// Fragments created per spawn.
    pub batch_size: usize,
    /// The second batch only spawns while fewer than this many fragments live.
    pub second_batch_gate: usize,
    /// Spawn depth (z) of the first and second batch.
    pub spawn_depths: (f64, f64),
    /// Largest simulation step applied in one frame (seconds).
    pub max_step: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            intro_duration: 0.8,
            between_duration: 0.5,
            slice1_rate: 0.6,
            slice2_rate: 0.7,
            crack_window: (0.2, 0.25),
            spawn_threshold: 0.3,
            batch_size: 36,
            second_batch_gate: 60,
            spawn_depths: (0.16, 0.0),
            max_step: 1.0 / 30.0,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        positive("timeline.intro_duration", self.intro_duration)?;
        positive("timeline.between_duration", self.between_duration)?;
        positive("timeline.slice1_rate", self.slice1_rate)?;
        positive("timeline.slice2_rate", self.slice2_rate)?;
        positive("timeline.max_step", self.max_step)?;
        let (low, high) = self.crack_window;
        if !(0.0..1.0).contains(&low) || high <= low || high > 1.0 {
            return Err(SceneError::InvalidCrackWindow { low, high });
        }
        positive("timeline.spawn_threshold", self.spawn_threshold)?;
        positive("timeline.batch_size", self.batch_size as f64)?;
        Ok(())
    }
}

/// What happens when a spawn would exceed the live fragment cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Create only as many fragments as fit under the cap.
    #[default]
    Ignore,
    /// Discard the oldest fragments to make room for the new batch.
    EvictOldest,
}

/// Shard physics constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Downward acceleration in units/s².
    pub gravity: f64,
    /// Height of the cutting board surface.
    pub floor: f64,
    /// Fraction of vertical speed kept (and reversed) on a bounce.
    pub restitution: f64,
    /// Fraction of horizontal speed kept on a bounce.
    pub friction: f64,
    /// Maximum number of live fragments.
    pub max_live: usize,
    pub overflow: OverflowPolicy,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            gravity: 3.2,
            floor: -0.22,
            restitution: 0.25,
            friction: 0.7,
            max_live: 96,
            overflow: OverflowPolicy::Ignore,
        }
    }
}

impl FragmentConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        positive("fragments.gravity", self.gravity)?;
        positive("fragments.restitution", self.restitution)?;
        positive("fragments.friction", self.friction)?;
        if self.max_live == 0 {
            return Err(SceneError::ZeroFragmentCap);
        }
        Ok(())
    }
}

/// Full scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub geometry: SliceGeometry,
    pub timeline: TimelineConfig,
    pub fragments: FragmentConfig,
    /// Seed for every random draw in the scene.
    pub seed: u64,
}

impl SceneConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.geometry.validate()?;
        self.timeline.validate()?;
        self.fragments.validate()
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SceneError> {
    // NaN fails this check too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SceneConfig::default().validate().expect("defaults should validate");
    }

    #[test]
    fn zero_thickness_rejected() {
        let mut config = SceneConfig::default();
        config.geometry.slice1_thickness = 0.0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, SceneError::NonPositive { field: "geometry.slice1_thickness", .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn overlapping_slabs_rejected() {
        let mut config = SceneConfig::default();
        config.geometry.slice2_thickness = 0.2;
        assert!(matches!(
            config.validate(),
            Err(SceneError::OverlappingSlabs { .. })
        ));
    }

    #[test]
    fn slab_outside_sphere_rejected() {
        let mut config = SceneConfig::default();
        config.geometry.slice1_start = 0.4;
        assert!(matches!(
            config.validate(),
            Err(SceneError::SlabOutsideVolume { .. })
        ));
    }

    #[test]
    fn inverted_crack_window_rejected() {
        let mut config = SceneConfig::default();
        config.timeline.crack_window = (0.25, 0.2);
        assert!(matches!(
            config.validate(),
            Err(SceneError::InvalidCrackWindow { .. })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "seed": 7, "fragments": { "max_live": 40, "overflow": "evict_oldest" } }"#,
        )
        .expect("parse failed");
        assert_eq!(config.seed, 7);
        assert_eq!(config.fragments.max_live, 40);
        assert_eq!(config.fragments.overflow, OverflowPolicy::EvictOldest);
        assert_eq!(config.fragments.gravity, 3.2);
        assert_eq!(config.geometry, SliceGeometry::default());
    }

    #[test]
    fn invalid_json_values_fail_validation() {
        let err = SceneConfig::from_json(r#"{ "timeline": { "slice1_rate": -1.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("timeline.slice1_rate"), "got: {err}");
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SceneError::Json(_))
        ));
    }
}
