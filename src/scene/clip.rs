//! Clip planes: partition the sphere into slabs along the slicing axis.
//!
//! The camera looks down −z, so "front" means larger z. Each slab is the
//! region kept by one or two half-spaces `dot(normal, p) + offset >= 0`;
//! the rasterizer discards everything outside it. Plane offsets are fixed
//! once from the [`SliceGeometry`]; slabs move by translating their planes.

use glam::DVec3;
use serde::Serialize;

use crate::config::SliceGeometry;

/// Tolerance for points on a shared slab boundary.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// A half-space boundary `dot(normal, p) + offset >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutPlane {
    pub normal: DVec3,
    pub offset: f64,
}

impl CutPlane {
    /// Keeps `z >= z0`.
    pub fn keep_front_of(z0: f64) -> Self {
        CutPlane {
            normal: DVec3::Z,
            offset: -z0,
        }
    }

    /// Keeps `z <= z0`.
    pub fn keep_behind(z0: f64) -> Self {
        CutPlane {
            normal: DVec3::NEG_Z,
            offset: z0,
        }
    }

    /// Signed distance from the plane; non-negative on the kept side.
    pub fn distance(&self, p: DVec3) -> f64 {
        self.normal.dot(p) + self.offset
    }

    pub fn keeps(&self, p: DVec3) -> bool {
        self.distance(p) >= -BOUNDARY_EPSILON
    }

    /// The same plane after moving the clipped body by `by`.
    pub fn translated(&self, by: DVec3) -> Self {
        CutPlane {
            normal: self.normal,
            offset: self.offset - self.normal.dot(by),
        }
    }
}

/// How a region combines its planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipMode {
    /// Keep points inside every plane (the slab between two cuts).
    KeepBetween,
    /// Keep points inside any plane (everything beyond a cut).
    KeepBeyond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionName {
    FrontThin,
    SecondThin,
    RestBack,
    RestMid,
    RestFront,
    Whole,
}

impl RegionName {
    pub const ALL: [RegionName; 6] = [
        RegionName::FrontThin,
        RegionName::SecondThin,
        RegionName::RestBack,
        RegionName::RestMid,
        RegionName::RestFront,
        RegionName::Whole,
    ];
}

/// A named piece of the sphere bounded by zero, one or two cut planes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlabRegion {
    pub name: RegionName,
    pub planes: Vec<CutPlane>,
    pub mode: ClipMode,
}

impl SlabRegion {
    pub fn contains(&self, p: DVec3) -> bool {
        if self.planes.is_empty() {
            return true;
        }
        match self.mode {
            ClipMode::KeepBetween => self.planes.iter().all(|plane| plane.keeps(p)),
            ClipMode::KeepBeyond => self.planes.iter().any(|plane| plane.keeps(p)),
        }
    }

    /// Planes of this region after translating the slab by `by`.
    pub fn planes_translated(&self, by: DVec3) -> Vec<CutPlane> {
        self.planes.iter().map(|plane| plane.translated(by)).collect()
    }
}

/// The six region definitions derived from a slice geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipPlaneSet {
    regions: Vec<SlabRegion>,
}

impl ClipPlaneSet {
    /// Derive all regions algebraically from the cut positions.
    ///
    /// Along z, back to front: `restBack`, `secondThin`, `restMid`,
    /// `frontThin`, `restFront`. `whole` has no planes. The geometry is
    /// assumed validated.
    pub fn new(geometry: &SliceGeometry) -> Self {
        let s1 = geometry.slice1_start;
        let s1_end = geometry.slice1_end();
        let s2 = geometry.slice2_start;
        let s2_end = geometry.slice2_end();

        let between = |name, near: f64, far: f64| SlabRegion {
            name,
            planes: vec![CutPlane::keep_front_of(near), CutPlane::keep_behind(far)],
            mode: ClipMode::KeepBetween,
        };
        let beyond = |name, plane| SlabRegion {
            name,
            planes: vec![plane],
            mode: ClipMode::KeepBeyond,
        };

        let regions = vec![
            between(RegionName::FrontThin, s1, s1_end),
            between(RegionName::SecondThin, s2, s2_end),
            beyond(RegionName::RestBack, CutPlane::keep_behind(s2)),
            between(RegionName::RestMid, s2_end, s1),
            beyond(RegionName::RestFront, CutPlane::keep_front_of(s1_end)),
            SlabRegion {
                name: RegionName::Whole,
                planes: Vec::new(),
                mode: ClipMode::KeepBeyond,
            },
        ];
        ClipPlaneSet { regions }
    }

    pub fn region(&self, name: RegionName) -> &SlabRegion {
        // `new` builds regions in `RegionName::ALL` order.
        &self.regions[name as usize]
    }

    pub fn regions(&self) -> &[SlabRegion] {
        &self.regions
    }

    /// The five slabs that together rebuild the whole volume.
    pub fn slabs(&self) -> impl Iterator<Item = &SlabRegion> {
        self.regions.iter().filter(|r| r.name != RegionName::Whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(set: &ClipPlaneSet, name: RegionName) -> Vec<f64> {
        set.region(name).planes.iter().map(|p| p.offset).collect()
    }

    fn assert_offsets(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "offset {a} != {e} in {actual:?}");
        }
    }

    #[test]
    fn region_lookup_matches_name() {
        let set = ClipPlaneSet::new(&SliceGeometry::default());
        for name in RegionName::ALL {
            assert_eq!(set.region(name).name, name);
        }
    }

    #[test]
    fn front_thin_offsets() {
        let set = ClipPlaneSet::new(&SliceGeometry::default());
        assert_offsets(&offsets(&set, RegionName::FrontThin), &[-0.1, 0.2]);
        assert_eq!(set.region(RegionName::FrontThin).mode, ClipMode::KeepBetween);
    }

    #[test]
    fn second_thin_offsets() {
        let set = ClipPlaneSet::new(&SliceGeometry::default());
        // Near plane keeps z >= -0.07; far plane keeps z <= 0.05.
        assert_offsets(&offsets(&set, RegionName::SecondThin), &[0.07, 0.05]);
        // The same far boundary seen from restMid faces +z, offset -0.05.
        assert_offsets(&offsets(&set, RegionName::RestMid), &[-0.05, 0.1]);
    }

    #[test]
    fn single_plane_regions() {
        let set = ClipPlaneSet::new(&SliceGeometry::default());
        assert_offsets(&offsets(&set, RegionName::RestBack), &[-0.07]);
        assert_offsets(&offsets(&set, RegionName::RestFront), &[-0.2]);
        assert!(set.region(RegionName::Whole).planes.is_empty());
    }

    #[test]
    fn slabs_partition_the_sphere() {
        let geometry = SliceGeometry::default();
        let set = ClipPlaneSet::new(&geometry);
        let boundaries = [
            geometry.slice2_start,
            geometry.slice2_end(),
            geometry.slice1_start,
            geometry.slice1_end(),
        ];
        let steps = 900;
        for i in 0..=steps {
            let z = -geometry.radius + 2.0 * geometry.radius * i as f64 / steps as f64;
            if boundaries.iter().any(|b| (z - b).abs() < 1e-6) {
                continue;
            }
            let p = DVec3::new(0.03, -0.02, z);
            let owners: Vec<_> = set.slabs().filter(|r| r.contains(p)).map(|r| r.name).collect();
            assert_eq!(owners.len(), 1, "z = {z} owned by {owners:?}");
            assert!(set.region(RegionName::Whole).contains(p));
        }
    }

    #[test]
    fn shared_boundary_belongs_to_both_neighbours() {
        let geometry = SliceGeometry::default();
        let set = ClipPlaneSet::new(&geometry);
        let p = DVec3::new(0.0, 0.0, geometry.slice1_start);
        assert!(set.region(RegionName::FrontThin).contains(p));
        assert!(set.region(RegionName::RestMid).contains(p));
        assert!(!set.region(RegionName::SecondThin).contains(p));
    }

    #[test]
    fn keep_beyond_is_a_union() {
        let region = SlabRegion {
            name: RegionName::RestFront,
            planes: vec![CutPlane::keep_front_of(0.2), CutPlane::keep_behind(-0.2)],
            mode: ClipMode::KeepBeyond,
        };
        assert!(region.contains(DVec3::new(0.0, 0.0, 0.3)));
        assert!(region.contains(DVec3::new(0.0, 0.0, -0.3)));
        assert!(!region.contains(DVec3::ZERO));
    }

    #[test]
    fn translated_plane_moves_with_slab() {
        let plane = CutPlane::keep_front_of(0.1);
        let moved = plane.translated(DVec3::new(0.0, 0.0, 0.6));
        assert!((moved.offset - -0.7).abs() < 1e-12);
        assert!(moved.keeps(DVec3::new(0.0, 0.0, 0.75)));
        assert!(!moved.keeps(DVec3::new(0.0, 0.0, 0.65)));
    }
}
