//! Passing through the opening and coming out of the destination.

use super::{
    Teleporter,
    Face,
};
use crate::{
    ray::Ray,
    obstacle::Obstacle,
    intersect::{
        time_ray_hits_block,
        test_rect_circle,
        rotate_xy,
        to_local_xy,
    },
};
use std::f32::consts::PI;
use vek::*;


/// Distance a ray must reach past the frame for the opening to count as hit
/// first.
const FRAME_EPSILON: f32 = 1.0e-6;

/// Proximity starts ramping up this many radii away from the opening.
const PROXIMITY_REACH: f32 = 1.2;

/// A position re-expressed relative to a destination teleporter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointWrt {
    pub pos: Vec3<f32>,
    /// The input direction rotated onto the destination, if one was given.
    pub dir: Option<Vec3<f32>>,
    /// The input azimuth turned by `rotation`, if one was given.
    pub azimuth: Option<f32>,
    /// Net rotation about Z from source to destination.
    pub rotation: f32,
}

impl Teleporter {
    /// If `ray` passes into the opening without touching the frame first,
    /// the time it does so and the face it enters through.
    ///
    /// A horizontal teleporter is entered through the top going down and
    /// through the bottom going up.
    pub fn is_teleported(&self, ray: &Ray) -> Option<(f32, Face)> {
        if self.horizontal {
            return self.is_teleported_horizontal(ray);
        }

        let t_frame = self.intersect(ray);
        let t_open = time_ray_hits_block(
            ray,
            self.pos,
            self.angle,
            self.size.x,
            self.open_breadth(),
            self.open_height(),
        );
        if t_open < 0.0 || (t_frame >= 0.0 && t_open - t_frame > FRAME_EPSILON) {
            return None;
        }

        let p = ray.point_at(t_open);
        let z = p.z - self.pos.z;
        if z < 0.0 || z > self.open_height() {
            return None;
        }
        let x = to_local_xy(p, self.pos, self.angle).x;
        Some((t_open, Face::of_local_x(x)))
    }

    /// How close a body of size `radius` at `p` is to passing through, from
    /// `0.0` when well clear to `1.0` when about to.
    ///
    /// A `radius` of zero yields `0.0`.
    pub fn get_proximity(&self, p: Vec3<f32>, radius: f32) -> f32 {
        if self.horizontal {
            return self.get_proximity_horizontal(p, radius);
        }

        let reach = PROXIMITY_REACH * radius;
        let open_breadth = self.open_breadth();
        let open_height = self.open_height();

        if !test_rect_circle(self.pos, self.angle, self.size.x, open_breadth, p, reach) {
            return 0.0;
        }
        let dz = p.z - self.pos.z;
        if dz < -reach || dz > open_height + reach {
            return 0.0;
        }

        let local = to_local_xy(p, self.pos, self.angle);
        let x = local.x.abs();
        let y = local.y.abs();
        let mut t = PROXIMITY_REACH - x / radius;

        if y > open_breadth {
            // around the post
            let f = (2.0 / PI) * x.atan2(y - open_breadth);
            t *= f * f;
        } else if dz < 0.0 {
            let f = 1.0 + dz / reach;
            if (0.0..=1.0).contains(&f) {
                t *= f * f;
            }
        } else if dz > open_height {
            let f = 1.0 - (dz - open_height) / reach;
            if (0.0..=1.0).contains(&f) {
                t *= f * f;
            }
        }

        // also catches NaN
        if t > 0.0 { t.min(1.0) } else { 0.0 }
    }

    /// If moving from `p1` to `p2` passes through the opening's center plane,
    /// the face on `p1`'s side.
    pub fn has_crossed(&self, p1: Vec3<f32>, p2: Vec3<f32>) -> Option<Face> {
        if self.horizontal {
            return self.has_crossed_horizontal(p1, p2);
        }

        let bottom = self.pos.z;
        let top = bottom + self.open_height();
        if (p1.z < bottom && p2.z < bottom) || (p1.z > top && p2.z > top) {
            return None;
        }

        let l1 = to_local_xy(p1, self.pos, self.angle);
        let l2 = to_local_xy(p2, self.pos, self.angle);
        if l1.x * l2.x < 0.0 && l2.y.abs() <= self.open_breadth() {
            Some(Face::of_local_x(l1.x))
        } else {
            None
        }
    }

    /// Re-express `p`, which just went through `src_face` of self, relative
    /// to `dst_face` of `dst`.
    ///
    /// The point comes out at `dst`'s mouth on `dst_face`'s side, with its
    /// lateral and vertical offsets scaled by the ratio of the two openings.
    /// `dir` and `azimuth` are turned by the net rotation between the two.
    pub fn get_point_wrt(
        &self,
        dst: &Teleporter,
        src_face: Face,
        dst_face: Face,
        p: Vec3<f32>,
        dir: Option<Vec3<f32>>,
        azimuth: Option<f32>,
    ) -> PointWrt {
        if self.horizontal || dst.horizontal {
            return self.get_point_wrt_mouths(dst, src_face, dst_face, p, dir, azimuth);
        }

        let a1 = self.angle + if src_face == Face::NegX { PI } else { 0.0 };
        let a2 = dst.angle + if dst_face != Face::NegX { PI } else { 0.0 };
        let rotation = a2 - a1;

        let rel = p - self.pos;
        let local = rotate_xy(rel.xy(), -a1);
        let y = local.y * dst.open_breadth() / self.open_breadth();
        let z = rel.z * dst.open_height() / self.open_height();
        let out = dst.pos.xy() + rotate_xy(Vec2::new(-dst.size.x, y), a2);

        PointWrt {
            pos: Vec3::new(out.x, out.y, dst.pos.z + z),
            dir: dir.map(|d| {
                let xy = rotate_xy(d.xy(), rotation);
                Vec3::new(xy.x, xy.y, d.z)
            }),
            azimuth: azimuth.map(|a| a + rotation),
            rotation,
        }
    }

    fn is_teleported_horizontal(&self, ray: &Ray) -> Option<(f32, Face)> {
        let dz = ray.direction.z;
        if dz == 0.0 {
            return None;
        }
        let t = (self.open_plane_z() - ray.origin.z) / dz;
        if t < 0.0 || !self.in_opening_xy(ray.point_at(t)) {
            return None;
        }

        // coming down through the rim slab, it must already be inside the
        // opening at the top
        let top = self.pos.z + self.size.z;
        if dz < 0.0 && ray.origin.z > top {
            let t_top = (top - ray.origin.z) / dz;
            if !self.in_opening_xy(ray.point_at(t_top)) {
                return None;
            }
        }
        Some((t, if dz < 0.0 { Face::NegX } else { Face::PosX }))
    }

    fn get_proximity_horizontal(&self, p: Vec3<f32>, radius: f32) -> f32 {
        let reach = PROXIMITY_REACH * radius;
        let half = self.open_half_xy();
        let local = to_local_xy(p, self.pos, self.angle);
        let outside = Vec2::new(
            (local.x.abs() - half.x).max(0.0),
            (local.y.abs() - half.y).max(0.0),
        );
        if outside.x > reach || outside.y > reach {
            return 0.0;
        }

        let dz = (p.z - self.open_plane_z()).abs();
        let mut t = PROXIMITY_REACH - dz / radius;
        let off = outside.magnitude();
        if off > 0.0 {
            // around the rim
            let f = 1.0 - off / reach;
            t *= if (0.0..=1.0).contains(&f) { f * f } else { 0.0 };
        }

        if t > 0.0 { t.min(1.0) } else { 0.0 }
    }

    fn has_crossed_horizontal(&self, p1: Vec3<f32>, p2: Vec3<f32>) -> Option<Face> {
        let plane = self.open_plane_z();
        let above = p1.z > plane;
        if above == (p2.z > plane) {
            return None;
        }
        let f = (plane - p1.z) / (p2.z - p1.z);
        if !self.in_opening_xy(p1 + (p2 - p1) * f) {
            return None;
        }
        Some(if above { Face::NegX } else { Face::PosX })
    }

    /// The mouth of `face`, oriented for a body going through it into self
    /// when `entering`, or coming out of self otherwise.
    fn mouth(&self, face: Face, entering: bool) -> Mouth {
        let (s, c) = self.angle.sin_cos();
        // outward normal of the face
        let (outward, center, exit_offset, half) = if self.horizontal {
            let top = face == Face::NegX;
            let plane = self.open_plane_z();
            let center = Vec3::new(self.pos.x, self.pos.y, plane);
            let half = self.open_half_xy();
            if top {
                (Vec3::unit_z(), center, Vec3::new(0.0, 0.0, self.border), Vec2::new(half.y, half.x))
            } else {
                (-Vec3::unit_z(), center, Vec3::zero(), Vec2::new(half.y, half.x))
            }
        } else {
            let x_axis = Vec3::new(c, s, 0.0);
            let outward = if face == Face::NegX { -x_axis } else { x_axis };
            let center = Vec3::new(self.pos.x, self.pos.y, self.pos.z + 0.5 * self.open_height());
            (outward, center, outward * self.size.x, Vec2::new(self.open_breadth(), 0.5 * self.open_height()))
        };

        let through = if entering { -outward } else { outward };
        let lateral = if self.horizontal {
            Vec3::new(-s, c, 0.0)
        } else {
            Vec3::unit_z().cross(through)
        };
        Mouth {
            center,
            exit_offset,
            through,
            lateral,
            up: through.cross(lateral),
            half,
        }
    }

    /// `get_point_wrt` when either end is horizontal. Positions keep their
    /// place relative to the size of the opening, and directions keep their
    /// components along and across the direction of passage.
    fn get_point_wrt_mouths(
        &self,
        dst: &Teleporter,
        src_face: Face,
        dst_face: Face,
        p: Vec3<f32>,
        dir: Option<Vec3<f32>>,
        azimuth: Option<f32>,
    ) -> PointWrt {
        let from = self.mouth(src_face, true);
        let to = dst.mouth(dst_face, false);
        let map = |v: Vec3<f32>| {
            to.through * v.dot(from.through)
                + to.lateral * v.dot(from.lateral)
                + to.up * v.dot(from.up)
        };

        let rel = p - from.center;
        let u = ratio(rel.dot(from.lateral), from.half.x);
        let v = ratio(rel.dot(from.up), from.half.y);
        let pos = to.center
            + to.exit_offset
            + to.lateral * (u * to.half.x)
            + to.up * (v * to.half.y);

        // whichever horizontal axis stays horizontal gives the turn
        let heading_turn = |axis: Vec3<f32>| {
            let out = map(axis);
            if out.xy().magnitude_squared() > 1.0e-6 {
                Some(out.y.atan2(out.x) - axis.y.atan2(axis.x))
            } else {
                None
            }
        };
        let rotation = heading_turn(Vec3::unit_x())
            .or_else(|| heading_turn(Vec3::unit_y()))
            .unwrap_or(0.0);

        PointWrt {
            pos,
            dir: dir.map(map),
            azimuth: azimuth.map(|a| {
                let out = map(Vec3::new(a.cos(), a.sin(), 0.0));
                if out.xy().magnitude_squared() > 1.0e-6 {
                    out.y.atan2(out.x)
                } else {
                    a + rotation
                }
            }),
            rotation,
        }
    }
}

/// Orthonormal frame over a teleporter mouth.
struct Mouth {
    center: Vec3<f32>,
    /// From `center` to where a body comes out.
    exit_offset: Vec3<f32>,
    /// Direction of passage.
    through: Vec3<f32>,
    lateral: Vec3<f32>,
    up: Vec3<f32>,
    /// Half extents of the opening along `lateral` and `up`.
    half: Vec2<f32>,
}

fn ratio(a: f32, b: f32) -> f32 {
    if b > 0.0 { a / b } else { 0.0 }
}
