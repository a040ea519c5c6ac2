//! Axis-aligned bounding extents.

use vek::*;


/// Axis-aligned bounding box given by its minimum and maximum corners.
///
/// Unlike a box with a position and an extent, this can be empty, in which
/// case the minimum is above the maximum on every axis. Expanding an empty
/// extents by a point makes it contain exactly that point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Extents {
    pub mins: Vec3<f32>,
    pub maxs: Vec3<f32>,
}

impl Extents {
    /// Extents that contain nothing.
    pub const EMPTY: Extents = Extents {
        mins: Vec3 { x: f32::MAX, y: f32::MAX, z: f32::MAX },
        maxs: Vec3 { x: -f32::MAX, y: -f32::MAX, z: -f32::MAX },
    };

    pub fn new<V: Into<Vec3<f32>>>(mins: V, maxs: V) -> Self {
        Extents {
            mins: mins.into(),
            maxs: maxs.into(),
        }
    }

    /// Smallest extents containing all of `points`.
    pub fn from_points<I: IntoIterator<Item=Vec3<f32>>>(points: I) -> Self {
        let mut extents = Extents::EMPTY;
        for p in points {
            extents.expand_to_point(p);
        }
        extents
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.mins[i] > self.maxs[i])
    }

    /// Grow self just enough to contain `p`.
    pub fn expand_to_point<V: Into<Vec3<f32>>>(&mut self, p: V) {
        let p = p.into();
        self.mins = Vec3::partial_min(self.mins, p);
        self.maxs = Vec3::partial_max(self.maxs, p);
    }

    /// Do self and `rhs` overlap or share a boundary?
    pub fn touches(&self, rhs: &Extents) -> bool {
        (0..3).all(|i| self.mins[i] <= rhs.maxs[i] && self.maxs[i] >= rhs.mins[i])
    }

    /// Are all six bounds finite and within `limit` of the origin?
    pub fn is_bounded(&self, limit: f32) -> bool {
        (0..3).all(|i| {
            self.mins[i].is_finite()
                && self.maxs[i].is_finite()
                && self.mins[i].abs() <= limit
                && self.maxs[i].abs() <= limit
        })
    }
}

impl Default for Extents {
    fn default() -> Self {
        Extents::EMPTY
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_expanded() {
        let mut e = Extents::EMPTY;
        assert!(e.is_empty());
        e.expand_to_point([1.0, 2.0, 3.0]);
        assert!(!e.is_empty());
        assert_eq!(e.mins, e.maxs);
        e.expand_to_point([-1.0, 5.0, 3.0]);
        assert_eq!(e.mins, Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(e.maxs, Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn touching_includes_shared_boundary() {
        let a = Extents::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Extents::new([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
        let c = Extents::new([1.5, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.touches(&b));
        assert!(!a.touches(&c));
    }

    #[test]
    fn non_finite_is_unbounded() {
        let e = Extents::new([0.0, 0.0, f32::NAN], [1.0, 1.0, 1.0]);
        assert!(!e.is_bounded(1.0e6));
        let e = Extents::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert!(e.is_bounded(1.0e6));
    }
}
