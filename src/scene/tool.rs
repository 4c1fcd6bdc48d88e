//! Knife and hand motion.
//!
//! The knife follows a fixed curve over four timed windows, then drifts toward
//! a rest pose. The hand eases toward a point behind the knife handle every
//! frame. This clock runs independently of the sequencer's phases.

use glam::DVec3;
use serde::Serialize;

/// Window boundaries (seconds) of the knife curve.
const HOVER_END: f64 = 0.8;
const FIRST_CUT_END: f64 = 1.4;
const LIFT_END: f64 = 2.0;
const SECOND_CUT_END: f64 = 2.6;
const WINDOW: f64 = 0.6;

const REST_POSITION: DVec3 = DVec3::new(-0.1, 0.05, -0.2);
const REST_ROTATION: DVec3 = DVec3::new(0.05, 0.0, 0.25);
const SETTLE_RATE: f64 = 0.04;

const HAND_OFFSET: DVec3 = DVec3::new(0.12, 0.0, -0.6);
const HAND_HEIGHT: f64 = 0.02;
const HAND_RATE: f64 = 0.12;

/// Position and Euler rotation (radians, XYZ) of a manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DVec3,
}

impl Pose {
    pub const fn new(position: DVec3, rotation: DVec3) -> Self {
        Pose { position, rotation }
    }

    /// Move a fraction `t` of the way toward `target`.
    pub fn approach(&mut self, target: &Pose, t: f64) {
        self.position = self.position.lerp(target.position, t);
        self.rotation = self.rotation.lerp(target.rotation, t);
    }
}

/// Drives the knife along its timeline and the hand after it.
#[derive(Debug, Clone)]
pub struct ToolMotionController {
    elapsed: f64,
    max_step: f64,
    knife: Pose,
    hand: Pose,
}

impl ToolMotionController {
    pub const KNIFE_START: Pose = Pose::new(DVec3::new(0.0, 0.25, 0.55), DVec3::ZERO);
    pub const HAND_START: Pose = Pose::new(DVec3::new(0.1, 0.02, -0.65), DVec3::new(0.0, 0.1, 0.0));
    pub const KNIFE_REST: Pose = Pose::new(REST_POSITION, REST_ROTATION);

    /// `max_step` bounds the time one frame can add to the curve clock.
    pub fn new(max_step: f64) -> Self {
        ToolMotionController {
            elapsed: 0.0,
            max_step,
            knife: Self::KNIFE_START,
            hand: Self::HAND_START,
        }
    }

    pub fn knife(&self) -> Pose {
        self.knife
    }

    pub fn hand(&self) -> Pose {
        self.hand
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, delta: f64) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.elapsed += delta.min(self.max_step);
        let t = self.elapsed;

        if let Some(pose) = knife_curve(t) {
            self.knife = pose;
        } else if t >= SECOND_CUT_END {
            self.knife.approach(&Self::KNIFE_REST, SETTLE_RATE);
        }

        let follow = Pose {
            position: DVec3::new(
                self.knife.position.x + HAND_OFFSET.x,
                HAND_HEIGHT,
                self.knife.position.z + HAND_OFFSET.z,
            ),
            rotation: self.hand.rotation,
        };
        self.hand.approach(&follow, HAND_RATE);
    }
}

/// The scripted knife pose at time `t`, or `None` while hovering or settling.
fn knife_curve(t: f64) -> Option<Pose> {
    if !(HOVER_END..SECOND_CUT_END).contains(&t) {
        return None;
    }
    let pose = if t < FIRST_CUT_END {
        let k = (t - HOVER_END) / WINDOW;
        Pose::new(
            DVec3::new(0.0, 0.25 - 0.28 * k, 0.5 - 0.5 * k),
            DVec3::new(0.1, 0.0, 0.2 * k),
        )
    } else if t < LIFT_END {
        let k = (t - FIRST_CUT_END) / WINDOW;
        Pose::new(
            DVec3::new(0.0, 0.1 * k, 0.2 * k),
            DVec3::new(0.2 - 0.1 * k, 0.0, 0.2 - 0.1 * k),
        )
    } else {
        let k = (t - LIFT_END) / WINDOW;
        Pose::new(
            DVec3::new(0.02, 0.15 - 0.26 * k, 0.15 - 0.35 * k),
            DVec3::new(0.1, 0.0, 0.1 + 0.15 * k),
        )
    };
    Some(pose)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 1.0 / 60.0;

    fn run(ctrl: &mut ToolMotionController, seconds: f64) {
        let frames = (seconds / STEP).round() as usize;
        for _ in 0..frames {
            ctrl.advance(STEP);
        }
    }

    #[test]
    fn knife_hovers_during_intro() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        run(&mut ctrl, 0.5);
        assert_eq!(ctrl.knife(), ToolMotionController::KNIFE_START);
    }

    #[test]
    fn first_cut_descends() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        run(&mut ctrl, 1.1);
        let k = (ctrl.elapsed() - HOVER_END) / WINDOW;
        let knife = ctrl.knife();
        assert!((knife.position.y - (0.25 - 0.28 * k)).abs() < 1e-9);
        assert!((knife.rotation.z - 0.2 * k).abs() < 1e-9);
        assert!(knife.position.y < 0.25);
    }

    #[test]
    fn second_cut_ends_low() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        run(&mut ctrl, 2.58);
        let knife = ctrl.knife();
        assert!(knife.position.y < -0.09, "y = {}", knife.position.y);
        assert!(knife.position.z < -0.18, "z = {}", knife.position.z);
    }

    #[test]
    fn settle_converges_without_arriving() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        run(&mut ctrl, 3.0);
        let mut last = ctrl.knife().position.distance(REST_POSITION);
        for _ in 0..200 {
            ctrl.advance(STEP);
            let d = ctrl.knife().position.distance(REST_POSITION);
            assert!(d < last, "distance should shrink every frame");
            assert!(d > 0.0);
            last = d;
        }
        assert!(last < 1e-3);
        assert!((ctrl.knife().rotation.x - REST_ROTATION.x).abs() < 1e-3);
    }

    #[test]
    fn hand_follows_handle() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        run(&mut ctrl, 6.0);
        let knife = ctrl.knife().position;
        let hand = ctrl.hand().position;
        assert!((hand.x - (knife.x + 0.12)).abs() < 1e-3, "hand x {}", hand.x);
        assert!((hand.y - HAND_HEIGHT).abs() < 1e-6);
        assert!((hand.z - (knife.z - 0.6)).abs() < 1e-3, "hand z {}", hand.z);
        assert_eq!(ctrl.hand().rotation, ToolMotionController::HAND_START.rotation);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut ctrl = ToolMotionController::new(1.0 / 30.0);
        ctrl.advance(5.0);
        assert!((ctrl.elapsed() - 1.0 / 30.0).abs() < 1e-12);
        ctrl.advance(-1.0);
        assert!((ctrl.elapsed() - 1.0 / 30.0).abs() < 1e-12);
    }
}
