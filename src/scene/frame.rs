//! Presentation adapter: reads simulation state into a per-frame snapshot.
//!
//! The rendering collaborator consumes [`FrameSnapshot`] (serialized over the
//! WASM boundary) and never touches the simulation directly.

use glam::DVec3;
use serde::Serialize;

use super::Scene;
use super::clip::{CutPlane, RegionName};
use super::sequencer::Phase;
use super::tool::Pose;

/// Distance the front slab travels along +z over the first cut.
const FRONT_SLAB_TRAVEL: f64 = 0.6;
/// Displacement of the second slab at the end of the second cut.
const SECOND_SLAB_TRAVEL: DVec3 = DVec3::new(0.02, -0.02, -0.05);

/// World-space state of one slab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabFrame {
    pub name: RegionName,
    pub translation: DVec3,
    /// Clip planes moved along with the slab.
    pub planes: Vec<CutPlane>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentTransform {
    pub position: DVec3,
    pub rotation: (f64, f64),
    pub size: f64,
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub phase: Phase,
    pub slice1_offset: f64,
    pub slice2_offset: f64,
    pub slabs: Vec<SlabFrame>,
    pub fragments: Vec<FragmentTransform>,
    pub knife: Pose,
    pub hand: Pose,
}

impl FrameSnapshot {
    pub fn capture(scene: &Scene) -> Self {
        let sequencer = scene.sequencer();
        let slice1 = sequencer.slice1_offset();
        let slice2 = sequencer.slice2_offset();
        let intact = sequencer.phase() == Phase::Intro;

        let slabs = scene
            .clip_planes()
            .regions()
            .iter()
            .map(|region| {
                let translation = match region.name {
                    RegionName::FrontThin => DVec3::new(0.0, 0.0, slice1 * FRONT_SLAB_TRAVEL),
                    RegionName::SecondThin => SECOND_SLAB_TRAVEL * slice2,
                    _ => DVec3::ZERO,
                };
                SlabFrame {
                    name: region.name,
                    translation,
                    planes: region.planes_translated(translation),
                    visible: (region.name == RegionName::Whole) == intact,
                }
            })
            .collect();

        let fragments = sequencer
            .fragments()
            .fragments()
            .iter()
            .map(|f| FragmentTransform {
                position: f.position,
                rotation: f.rotation,
                size: f.size,
            })
            .collect();

        FrameSnapshot {
            phase: sequencer.phase(),
            slice1_offset: slice1,
            slice2_offset: slice2,
            slabs,
            fragments,
            knife: scene.tool().knife(),
            hand: scene.tool().hand(),
        }
    }

    pub fn slab(&self, name: RegionName) -> Option<&SlabFrame> {
        self.slabs.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn scene_after(seconds: f64) -> Scene {
        let mut scene = Scene::new(SceneConfig::default()).expect("default scene");
        let frames = (seconds * 60.0).round() as usize;
        for _ in 0..frames {
            scene.advance(1.0 / 60.0);
        }
        scene
    }

    #[test]
    fn intro_shows_only_the_whole_sphere() {
        let frame = scene_after(0.2).snapshot();
        assert_eq!(frame.phase, Phase::Intro);
        for slab in &frame.slabs {
            assert_eq!(slab.visible, slab.name == RegionName::Whole, "{:?}", slab.name);
        }
        assert!(frame.fragments.is_empty());
    }

    #[test]
    fn settled_slabs_are_displaced() {
        let frame = scene_after(8.0).snapshot();
        assert_eq!(frame.phase, Phase::Settle);
        let front = frame.slab(RegionName::FrontThin).unwrap();
        assert!(front.visible);
        assert!((front.translation.z - 0.6).abs() < 1e-12);
        // The near plane followed the slab from z = 0.1 to z = 0.7.
        assert!((front.planes[0].offset - -0.7).abs() < 1e-12);

        let second = frame.slab(RegionName::SecondThin).unwrap();
        assert!((second.translation - SECOND_SLAB_TRAVEL).length() < 1e-12);
        assert!(!frame.slab(RegionName::Whole).unwrap().visible);
        assert_eq!(frame.slab(RegionName::RestMid).unwrap().translation, DVec3::ZERO);
        assert_eq!(frame.fragments.len(), 72);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_names() {
        let frame = scene_after(1.5).snapshot();
        let json = serde_json::to_value(&frame).expect("serialize");
        assert_eq!(json["phase"], "slice1");
        assert!(json["slice1Offset"].is_number());
        assert_eq!(json["slabs"][0]["name"], "frontThin");
        assert_eq!(json["knife"]["position"].as_array().map(Vec::len), Some(3));
    }
}
