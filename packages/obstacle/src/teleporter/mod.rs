//! Teleporter obstacles.
//!
//! A teleporter is a box of half width `size.x`, half breadth `size.y`, and
//! height `size.z` standing on its base position. The solid part is a frame
//! of thickness `border`: for a vertical (doorway) teleporter that means two
//! posts at the ends of the breadth joined by a crossbar along the top, and
//! for a horizontal (trapdoor) teleporter a flat rim around the opening. The
//! opening inside the frame has two link faces, one per side, which are what
//! map links refer to.
//!
//! Size is authored as `orig_size`. For vertical teleporters, the effective
//! `size` used for collision is inflated so the frame surrounds the authored
//! opening.

mod warp;
mod codec;
mod export;

pub use self::warp::PointWrt;

use crate::{
    ray::Ray,
    extents::Extents,
    obstacle::{
        Obstacle,
        ObstacleKind,
        PassFlags,
        MAX_EXTENT,
    },
    mesh_face::MeshFace,
    transform::MeshTransform,
    intersect::{
        time_ray_hits_block,
        get_normal_rect,
        test_rect_circle,
        test_rect_rect,
        test_rect_in_rect,
        get_hit_normal,
        rotate_xy,
        to_local_xy,
    },
};
use vek::*;


/// One side of a teleporter, as used by map links.
///
/// The face index is the low bit of a link id.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Face {
    /// The side facing local +X.
    PosX = 0,
    /// The side facing local -X.
    NegX = 1,
}

impl Face {
    pub fn index(self) -> u16 {
        self as u16
    }

    /// Face on the side `local_x` lies on.
    fn of_local_x(local_x: f32) -> Self {
        if local_x > 0.0 { Face::PosX } else { Face::NegX }
    }
}

/// The two opening surfaces of a finalized teleporter.
#[derive(Debug, Clone, PartialEq)]
struct LinkFaces {
    back: MeshFace,
    front: MeshFace,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Teleporter {
    name: String,
    pos: Vec3<f32>,
    angle: f32,
    orig_size: Vec3<f32>,
    size: Vec3<f32>,
    border: f32,
    horizontal: bool,
    flags: PassFlags,
    extents: Extents,
    links: Option<LinkFaces>,
}

impl Teleporter {
    /// Construct and finalize a teleporter. `size` is the authored half
    /// width, half breadth, and height.
    pub fn new<P, S>(
        pos: P,
        rotation: f32,
        size: S,
        border: f32,
        horizontal: bool,
        flags: PassFlags,
    ) -> Self
    where
        P: Into<Vec3<f32>>,
        S: Into<Vec3<f32>>,
    {
        let mut tele = Teleporter {
            pos: pos.into(),
            angle: rotation,
            orig_size: size.into(),
            border,
            horizontal,
            flags,
            ..Default::default()
        };
        tele.finalize();
        tele
    }

    /// Rederive the effective size, the extents, and both link faces from
    /// the authored parameters.
    pub fn finalize(&mut self) {
        self.size = self.orig_size;
        if !self.horizontal {
            self.size.y += 2.0 * self.border;
            self.size.z += self.border;
        }

        let half_width = (0.5 * self.border).max(self.size.x);
        let (s, c) = self.angle.sin_cos();
        let x_span = c.abs() * half_width + s.abs() * self.size.y;
        let y_span = s.abs() * half_width + c.abs() * self.size.y;
        self.extents = Extents::new(
            Vec3::new(self.pos.x - x_span, self.pos.y - y_span, self.pos.z),
            Vec3::new(self.pos.x + x_span, self.pos.y + y_span, self.pos.z + self.size.z),
        );

        self.make_links();
    }

    fn make_links(&mut self) {
        let open_breadth = self.size.y - self.border;
        let v = if open_breadth > 0.0 {
            self.size.z / (2.0 * open_breadth)
        } else {
            1.0
        };
        let texcoords = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, v),
            Vec2::new(0.0, v),
        ];

        let (back, front) = if self.horizontal {
            self.horizontal_link_quads()
        } else {
            self.vertical_link_quads()
        };

        trace!(name = %self.name, horizontal = self.horizontal, "made teleporter links");
        self.links = Some(LinkFaces {
            back: MeshFace::new_link(back, texcoords),
            front: MeshFace::new_link(front, texcoords),
        });
    }

    /// Back quad on the +X side facing +X, front quad on the -X side facing
    /// -X, both spanning the opening.
    fn vertical_link_quads(&self) -> ([Vec3<f32>; 4], [Vec3<f32>; 4]) {
        const PARAMS: [[f32; 2]; 4] = [
            [-1.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [-1.0, 1.0],
        ];

        let (s, c) = self.angle.sin_cos();
        let w = Vec2::new(c, s) * self.size.x;
        let b = Vec2::new(-s, c) * (self.size.y - self.border);
        let h = self.size.z - self.border;

        let mut back = [Vec3::zero(); 4];
        let mut front = [Vec3::zero(); 4];
        for (i, &[pb, pz]) in PARAMS.iter().enumerate() {
            let z = self.pos.z + pz * h;
            let off = w + b * pb;
            back[i] = Vec3::new(self.pos.x + off.x, self.pos.y + off.y, z);
            front[i] = Vec3::new(self.pos.x - off.x, self.pos.y - off.y, z);
        }
        (back, front)
    }

    /// Back quad at the bottom of the rim facing down, front quad at the top
    /// facing up.
    fn horizontal_link_quads(&self) -> ([Vec3<f32>; 4], [Vec3<f32>; 4]) {
        const CORNERS: [[f32; 2]; 4] = [
            [-1.0, -1.0],
            [-1.0, 1.0],
            [1.0, 1.0],
            [1.0, -1.0],
        ];

        let half = Vec2::new(self.size.x - self.border, self.size.y - self.border);
        let top = self.pos.z + self.size.z;

        let mut back = [Vec3::zero(); 4];
        let mut front = [Vec3::zero(); 4];
        for (i, &[cx, cy]) in CORNERS.iter().enumerate() {
            let xy = self.pos.xy() + rotate_xy(half * Vec2::new(cx, cy), self.angle);
            back[i] = Vec3::new(xy.x, xy.y, top - self.border);
            front[3 - i] = Vec3::new(xy.x, xy.y, top);
        }
        (back, front)
    }

    /// A transformed copy, refinalized. Name and flags carry over.
    pub fn copy_with_transform(&self, xform: &MeshTransform) -> Teleporter {
        let out = xform.modify_old_style(self.pos, self.orig_size, self.angle);
        let mut copy = Teleporter::new(
            out.pos,
            out.angle,
            out.size,
            self.border,
            self.horizontal,
            self.flags,
        );
        copy.name = self.name.clone();
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Authored size, before the frame inflation.
    pub fn orig_size(&self) -> Vec3<f32> {
        self.orig_size
    }

    pub fn border(&self) -> f32 {
        self.border
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    /// Link face on the +X side, or the bottom for horizontal teleporters.
    /// `None` only before finalization.
    pub fn back_link(&self) -> Option<&MeshFace> {
        self.links.as_ref().map(|links| &links.back)
    }

    /// Link face on the -X side, or the top for horizontal teleporters.
    pub fn front_link(&self) -> Option<&MeshFace> {
        self.links.as_ref().map(|links| &links.front)
    }

    /// Half breadth of the opening.
    fn open_breadth(&self) -> f32 {
        self.size.y - self.border
    }

    /// Height of the opening above the base.
    fn open_height(&self) -> f32 {
        self.size.z - self.border
    }

    /// Half extents of a horizontal teleporter's opening, inside the rim.
    fn open_half_xy(&self) -> Vec2<f32> {
        Vec2::new(self.size.x - self.border, self.size.y - self.border)
    }

    /// Height of the plane a horizontal teleporter is passed through at, the
    /// underside of the rim.
    fn open_plane_z(&self) -> f32 {
        self.pos.z + self.size.z - self.border
    }

    /// Is `p` horizontally within a horizontal teleporter's opening?
    fn in_opening_xy(&self, p: Vec3<f32>) -> bool {
        let local = to_local_xy(p, self.pos, self.angle);
        let half = self.open_half_xy();
        local.x.abs() < half.x && local.y.abs() < half.y
    }

    /// Does the box overlap one of the two posts of a vertical teleporter?
    fn box_hits_posts(&self, p: Vec3<f32>, angle: f32, dx: f32, dy: f32) -> bool {
        let (s, c) = self.angle.sin_cos();
        let r = 0.5 * self.border;
        let d = self.size.y - r;
        [1.0, -1.0].iter().any(|&side| {
            let post = Vec3::new(self.pos.x - side * s * d, self.pos.y + side * c * d, self.pos.z);
            test_rect_rect(p, angle, dx, dy, post, self.angle, r, r)
        })
    }
}

impl Obstacle for Teleporter {
    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Teleporter
    }

    fn position(&self) -> Vec3<f32> {
        self.pos
    }

    fn rotation(&self) -> f32 {
        self.angle
    }

    fn size(&self) -> Vec3<f32> {
        self.size
    }

    fn extents(&self) -> &Extents {
        &self.extents
    }

    fn flags(&self) -> PassFlags {
        self.flags
    }

    fn is_valid(&self) -> bool {
        let faces_valid = match self.links {
            Some(ref links) => links.back.is_valid() && links.front.is_valid(),
            None => false,
        };
        let rim_fits = !self.horizontal
            || (self.border < self.size.x && self.border < self.size.y);
        faces_valid
            && rim_fits
            && self.border >= 0.0
            && self.angle.is_finite()
            && self.extents.is_bounded(MAX_EXTENT)
    }

    fn intersect(&self, ray: &Ray) -> f32 {
        time_ray_hits_block(ray, self.pos, self.angle, self.size.x, self.size.y, self.size.z)
    }

    /// Normal of the nearer post, for vertical teleporters. Posts are treated
    /// as squares of side `border`.
    fn get_normal(&self, p: Vec3<f32>) -> Vec3<f32> {
        if self.horizontal {
            return get_normal_rect(p, self.pos.xy(), self.angle, self.size.x, self.size.y);
        }

        let b = 0.5 * self.border;
        let d = self.size.y - b;
        let local = to_local_xy(p, self.pos, self.angle);
        let j = if local.y > 0.0 { d } else { -d };
        let post = self.pos.xy() + rotate_xy(Vec2::new(0.0, j), self.angle);
        get_normal_rect(p, post, self.angle, b, b)
    }

    fn in_cylinder(&self, p: Vec3<f32>, radius: f32, height: f32) -> bool {
        p.z + height >= self.pos.z
            && p.z <= self.pos.z + self.size.z
            && test_rect_circle(self.pos, self.angle, self.size.x, self.size.y, p, radius)
    }

    fn in_box(&self, p: Vec3<f32>, angle: f32, dx: f32, dy: f32, height: f32) -> bool {
        let top = self.pos.z + self.size.z;
        let bar = top - self.border;

        if self.horizontal {
            return p.z + height >= bar
                && p.z <= top
                && test_rect_rect(p, angle, dx, dy, self.pos, self.angle, self.size.x, self.size.y)
                && !test_rect_in_rect(
                    self.pos, self.angle,
                    self.size.x - self.border, self.open_breadth(),
                    p, angle, dx, dy,
                );
        }

        if p.z + height < self.pos.z || p.z > top {
            return false;
        }
        if p.z < bar && self.box_hits_posts(p, angle, dx, dy) {
            return true;
        }
        p.z + height >= bar
            && test_rect_rect(p, angle, dx, dy, self.pos, self.angle, self.size.x, self.size.y)
    }

    /// The frame is swept vertically only, at the new orientation. The old
    /// orientation is not consulted.
    fn in_moving_box(
        &self,
        old_p: Vec3<f32>,
        _old_angle: f32,
        p: Vec3<f32>,
        angle: f32,
        dx: f32,
        dy: f32,
        height: f32,
    ) -> bool {
        let low = Vec3::new(p.x, p.y, old_p.z.min(p.z));
        let swept = (p.z - old_p.z).abs() + height;
        self.in_box(low, angle, dx, dy, swept)
    }

    fn is_crossing(
        &self,
        p: Vec3<f32>,
        angle: f32,
        dx: f32,
        dy: f32,
        height: f32,
    ) -> Option<Vec4<f32>> {
        if self.horizontal {
            let top = self.pos.z + self.size.z;
            let bottom = top - self.border;
            if p.z + height < bottom || p.z > top
                || !test_rect_rect(
                    p, angle, dx, dy,
                    self.pos, self.angle, self.size.x - self.border, self.open_breadth(),
                )
            {
                return None;
            }
            // the nearer of the two opening surfaces
            return Some(if p.z + 0.5 * height >= 0.5 * (top + bottom) {
                Vec4::new(0.0, 0.0, 1.0, -top)
            } else {
                Vec4::new(0.0, 0.0, -1.0, bottom)
            });
        }

        if p.z < self.pos.z
            || p.z > self.pos.z + self.open_height()
            || !test_rect_rect(
                p, angle, dx, dy,
                self.pos, self.angle, self.size.x, self.open_breadth(),
            )
        {
            return None;
        }

        // whichever wall the point is nearer to
        let x = to_local_xy(p, self.pos, self.angle).x;
        let (s, c) = self.angle.sin_cos();
        let n = if x < 0.0 { Vec2::new(-c, -s) } else { Vec2::new(c, s) };
        let on_wall = self.pos.xy() + n * self.size.x;
        Some(Vec4::new(n.x, n.y, 0.0, -n.dot(on_wall)))
    }

    fn get_hit_normal(
        &self,
        pos1: Vec3<f32>,
        azimuth1: f32,
        pos2: Vec3<f32>,
        azimuth2: f32,
        width: f32,
        breadth: f32,
        _height: f32,
    ) -> Option<Vec3<f32>> {
        get_hit_normal(
            pos1, azimuth1,
            pos2, azimuth2,
            width, breadth,
            self.pos, self.angle,
            self.size.x, self.size.y, self.size.z,
        ).map(|(_, normal)| normal)
    }
}


#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::f32::consts::PI;

    pub fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    pub fn doorway() -> Teleporter {
        Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.0, 3.0], 0.2, false, PassFlags::default())
    }

    pub fn trapdoor() -> Teleporter {
        Teleporter::new([0.0, 0.0, 5.0], 0.0, [2.0, 2.0, 1.0], 0.5, true, PassFlags::default())
    }

    #[test]
    fn effective_size_inflates_vertical_only() {
        let t = doorway();
        assert_eq!(t.orig_size(), Vec3::new(1.0, 1.0, 3.0));
        assert!(approx(t.size().y, 1.4) && approx(t.size().z, 3.2));
        assert_eq!(t.size().x, 1.0);
        let t = trapdoor();
        assert_eq!(t.size(), t.orig_size());
    }

    #[test]
    fn size_never_below_authored() {
        for t in [doorway(), trapdoor()] {
            let (o, s) = (t.orig_size(), t.size());
            assert!(s.x >= o.x && s.y >= o.y && s.z >= o.z);
        }
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut t = doorway();
        let before = t.clone();
        t.finalize();
        assert_eq!(t, before);
    }

    #[test]
    fn extents_cover_rotated_box() {
        let t = Teleporter::new([0.0, 0.0, 1.0], 0.5 * PI, [1.0, 2.0, 3.0], 0.0, false, PassFlags::default());
        let e = t.extents();
        assert!(approx(e.maxs.x, 2.0) && approx(e.maxs.y, 1.0));
        assert!(approx(e.mins.z, 1.0) && approx(e.maxs.z, 4.0));
    }

    #[test]
    fn thin_teleporter_keeps_minimum_extent() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [0.0, 4.0, 3.0], 2.0, false, PassFlags::default());
        assert!(approx(t.extents().maxs.x, 1.0));
    }

    #[test]
    fn default_has_no_faces() {
        let t = Teleporter::default();
        assert!(t.back_link().is_none() && t.front_link().is_none());
        assert!(!t.is_valid());
    }

    #[test]
    fn faces_are_antiparallel() {
        for angle in [0.0, 0.3, 0.5 * PI, 2.0] {
            for horizontal in [false, true] {
                let t = Teleporter::new([3.0, -1.0, 2.0], angle, [2.0, 2.0, 3.0], 0.5, horizontal, PassFlags::default());
                let back = t.back_link().unwrap().normal();
                let front = t.front_link().unwrap().normal();
                assert!(approx(back.dot(front), -1.0), "angle {} horizontal {}", angle, horizontal);
            }
        }
    }

    #[test]
    fn vertical_faces_point_along_local_x() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.5 * PI, [1.0, 1.0, 3.0], 0.2, false, PassFlags::default());
        let back = t.back_link().unwrap();
        let front = t.front_link().unwrap();
        assert!(approx(back.normal().y, 1.0));
        assert!(approx(front.normal().y, -1.0));
        assert!(approx(back.center().y, 1.0) && approx(front.center().y, -1.0));
        // opening spans the active band only
        assert!(approx(back.extents().maxs.z, 3.0));
        // breadth runs along world X after a quarter turn
        assert!(approx(back.extents().maxs.x, 1.2) && approx(back.extents().mins.x, -1.2));
        assert!(back.is_link());
    }

    #[test]
    fn horizontal_faces() {
        let t = trapdoor();
        let back = t.back_link().unwrap();
        let front = t.front_link().unwrap();
        assert!(approx(back.normal().z, -1.0));
        assert!(approx(front.normal().z, 1.0));
        assert!(approx(back.center().z, 5.5) && approx(front.center().z, 6.0));
        assert!(approx(back.extents().maxs.x, 1.5) && approx(back.extents().maxs.y, 1.5));
    }

    #[test]
    fn shared_texcoords() {
        let t = doorway();
        let v = 3.2 / (2.0 * 1.2);
        for face in [t.back_link().unwrap(), t.front_link().unwrap()] {
            let tc = face.texcoords();
            assert_eq!(tc[0], Vec2::new(0.0, 0.0));
            assert_eq!(tc[1], Vec2::new(1.0, 0.0));
            assert!(approx(tc[2].y, v) && approx(tc[3].y, v));
        }
        // an opening with no breadth falls back to unit texcoords
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.0, 1.0], 1.0, true, PassFlags::default());
        assert_eq!(t.back_link().unwrap().texcoords()[2], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn validity() {
        assert!(doorway().is_valid());
        assert!(trapdoor().is_valid());
        // opening of zero height
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.0, 0.0], 0.2, false, PassFlags::default());
        assert!(!t.is_valid());
        // rim covers the whole trapdoor
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.0, 1.0], 1.0, true, PassFlags::default());
        assert!(!t.is_valid());
        let t = Teleporter::new([f32::NAN, 0.0, 0.0], 0.0, [1.0, 1.0, 3.0], 0.2, false, PassFlags::default());
        assert!(!t.is_valid());
    }

    #[test]
    fn rim_wider_than_trapdoor_is_invalid() {
        // wider than the width but not the breadth, which would flip the faces
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 3.0, 1.0], 1.5, true, PassFlags::default());
        assert!(!t.is_valid());
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [3.0, 1.0, 1.0], 1.0, true, PassFlags::default());
        assert!(!t.is_valid());
        // a thinner rim leaves an opening
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 3.0, 1.0], 0.5, true, PassFlags::default());
        assert!(t.is_valid());
    }

    #[test]
    fn ray_hits_frame_box() {
        let t = doorway();
        let ray = Ray::new([-5.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
        assert!(approx(t.intersect(&ray), 4.0));
        let ray = Ray::new([0.0, -5.0, 1.0], [0.0, 1.0, 0.0]);
        assert!(approx(t.intersect(&ray), 3.6));
        let ray = Ray::new([-5.0, 0.0, 4.0], [1.0, 0.0, 0.0]);
        assert!(t.intersect(&ray) < 0.0);
    }

    #[test]
    fn normal_of_nearer_post() {
        let t = doorway();
        let n = t.get_normal(Vec3::new(0.0, 2.0, 1.0));
        assert!(approx(n.y, 1.0));
        let n = t.get_normal(Vec3::new(0.0, -2.0, 1.0));
        assert!(approx(n.y, -1.0));
        // beside the positive post
        let n = t.get_normal(Vec3::new(-1.0, 1.3, 1.0));
        assert!(approx(n.x, -1.0));
    }

    #[test]
    fn cylinder_queries() {
        let t = doorway();
        assert!(t.in_cylinder(Vec3::new(-1.5, 0.0, 0.0), 0.6, 2.0));
        assert!(!t.in_cylinder(Vec3::new(-1.5, 0.0, 0.0), 0.4, 2.0));
        assert!(!t.in_cylinder(Vec3::new(0.0, 0.0, 4.0), 1.0, 2.0));
        assert!(!t.in_cylinder(Vec3::new(0.0, 0.0, -3.0), 1.0, 2.0));
    }

    #[test]
    fn box_in_opening_is_free() {
        let t = doorway();
        // small tank standing in the doorway
        assert!(!t.in_box(Vec3::new(0.0, 0.0, 0.0), 0.0, 0.5, 0.5, 2.0));
        // same tank pushed into a post
        assert!(t.in_box(Vec3::new(0.0, 1.0, 0.0), 0.0, 0.5, 0.5, 2.0));
        // tall tank reaching the crossbar
        assert!(t.in_box(Vec3::new(0.0, 0.0, 0.0), 0.0, 0.5, 0.5, 3.1));
        // above everything
        assert!(!t.in_box(Vec3::new(0.0, 0.0, 3.5), 0.0, 0.5, 0.5, 2.0));
    }

    #[test]
    fn trapdoor_rim_collides() {
        let t = trapdoor();
        // falling through the middle
        assert!(!t.in_box(Vec3::new(0.0, 0.0, 5.6), 0.0, 0.5, 0.5, 1.0));
        // resting across the rim
        assert!(t.in_box(Vec3::new(1.6, 0.0, 5.6), 0.0, 0.5, 0.5, 1.0));
        // below the rim slab
        assert!(!t.in_box(Vec3::new(1.6, 0.0, 3.0), 0.0, 0.5, 0.5, 1.0));
    }

    #[test]
    fn moving_box_sweeps_vertically() {
        let t = doorway();
        let old = Vec3::new(0.0, 1.0, 10.0);
        let new = Vec3::new(0.0, 1.0, 5.0);
        assert!(!t.in_box(new, 0.0, 0.5, 0.5, 1.0));
        // still hits if it started below and ends above
        assert!(t.in_moving_box(Vec3::new(0.0, 1.0, 0.0), 0.0, new, 0.0, 0.5, 0.5, 1.0));
        assert!(!t.in_moving_box(old, 0.0, new, 0.0, 0.5, 0.5, 1.0));
        // only the new orientation matters
        for old_angle in [0.0, 0.25 * PI, 0.5 * PI] {
            assert!(t.in_moving_box(Vec3::new(0.0, 1.0, 0.0), old_angle, new, 0.0, 0.5, 0.5, 1.0));
            assert!(!t.in_moving_box(Vec3::new(0.0, 0.0, 0.0), old_angle, Vec3::new(0.0, 0.0, 0.5), 0.0, 0.5, 0.5, 1.0));
        }
    }

    #[test]
    fn crossing_plane_picks_nearer_wall() {
        let t = doorway();
        let plane = t.is_crossing(Vec3::new(-0.5, 0.0, 0.0), 0.0, 0.6, 0.6, 2.0).unwrap();
        assert!(approx(plane.x, -1.0) && approx(plane.w, -1.0));
        let plane = t.is_crossing(Vec3::new(0.5, 0.0, 0.0), 0.0, 0.6, 0.6, 2.0).unwrap();
        assert!(approx(plane.x, 1.0) && approx(plane.w, -1.0));
        assert!(t.is_crossing(Vec3::new(-3.0, 0.0, 0.0), 0.0, 0.6, 0.6, 2.0).is_none());
        assert!(t.is_crossing(Vec3::new(0.0, 0.0, 3.5), 0.0, 0.6, 0.6, 2.0).is_none());
    }

    #[test]
    fn trapdoor_crossing_plane() {
        let t = trapdoor();
        let plane = t.is_crossing(Vec3::new(0.0, 0.0, 5.8), 0.0, 0.5, 0.5, 1.0).unwrap();
        assert_eq!(plane, Vec4::new(0.0, 0.0, 1.0, -6.0));
        let plane = t.is_crossing(Vec3::new(0.0, 0.0, 4.8), 0.0, 0.5, 0.5, 1.0).unwrap();
        assert_eq!(plane, Vec4::new(0.0, 0.0, -1.0, 5.5));
    }

    #[test]
    fn hit_normal_against_frame() {
        let t = doorway();
        let n = t.get_hit_normal(
            Vec3::new(-4.0, 0.0, 0.0), 0.0,
            Vec3::new(-1.0, 0.0, 0.0), 0.0,
            0.5, 0.5, 2.0,
        ).unwrap();
        assert!(approx(n.x, -1.0));
        assert!(t.get_hit_normal(
            Vec3::new(-4.0, 0.0, 0.0), 0.0,
            Vec3::new(-3.0, 0.0, 0.0), 0.0,
            0.5, 0.5, 2.0,
        ).is_none());
    }

    #[test]
    fn roofs_ignore_teleporters() {
        use crate::obstacle::roof_height;

        let t = trapdoor();
        let floor = MeshFace::new(
            [
                Vec3::new(-5.0, -5.0, 1.0),
                Vec3::new(5.0, -5.0, 1.0),
                Vec3::new(5.0, 5.0, 1.0),
                Vec3::new(-5.0, 5.0, 1.0),
            ],
            [Vec2::zero(); 4],
            PassFlags::default(),
        );
        let obstacles: [&dyn Obstacle; 2] = [&t, &floor];
        assert_eq!(roof_height(obstacles.iter().copied(), Vec3::new(0.0, 0.0, 10.0)), Some(1.0));
        assert_eq!(roof_height(obstacles.iter().copied(), Vec3::new(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn transformed_copy_is_refinalized() {
        let mut t = doorway();
        t.set_name("gate");
        let mut xform = MeshTransform::new();
        xform.spin(0.5 * PI, [0.0, 0.0, 1.0]).shift([10.0, 0.0, 2.0]);
        let copy = t.copy_with_transform(&xform);
        assert_eq!(copy.name(), "gate");
        assert!(approx(copy.position().x, 10.0) && approx(copy.position().z, 2.0));
        assert!(approx(copy.rotation(), 0.5 * PI));
        assert!(approx(copy.orig_size().y, 1.0));
        assert!(approx(copy.size().y, 1.4));
        assert!(approx(copy.back_link().unwrap().normal().y, 1.0));
        assert!(copy.is_valid());
    }
}
