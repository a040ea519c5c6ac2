//! Half-infinite rays.

use vek::*;


/// A ray with an origin and a direction.
///
/// The direction is not required to be normalized. Times along the ray are
/// measured in units of the direction's length, so `point_at(1.0)` is
/// `origin + direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3<f32>,
    pub direction: Vec3<f32>,
}

impl Ray {
    pub fn new<O: Into<Vec3<f32>>, D: Into<Vec3<f32>>>(origin: O, direction: D) -> Self {
        Ray {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// Point at time `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3<f32> {
        self.origin + self.direction * t
    }
}
