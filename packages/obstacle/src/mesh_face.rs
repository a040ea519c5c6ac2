//! Flat convex quads.

use crate::{
    ray::Ray,
    extents::Extents,
    obstacle::{
        Obstacle,
        ObstacleKind,
        PassFlags,
    },
};
use vek::*;


/// A planar convex quadrilateral with texture coordinates.
///
/// Vertices wind counter-clockwise when viewed from the side the normal
/// points to. Faces are surfaces, not volumes, so the box and cylinder
/// queries of `Obstacle` never report a collision with one.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFace {
    vertices: [Vec3<f32>; 4],
    texcoords: [Vec2<f32>; 4],
    plane: Vec4<f32>,
    edge_planes: [Vec4<f32>; 4],
    extents: Extents,
    flags: PassFlags,
    link: bool,
}

/// Plane through `v0`, `v1`, `v2` with normal `(v1 - v0) x (v2 - v0)`, or
/// `None` if the points are too close to collinear.
fn make_plane(v1: Vec3<f32>, v2: Vec3<f32>, v0: Vec3<f32>) -> Option<Vec4<f32>> {
    let n = (v1 - v0).cross(v2 - v0);
    let len_sq = n.magnitude_squared();
    if len_sq < 1.0e-20 {
        return None;
    }
    let n = n / len_sq.sqrt();
    Some(Vec4::new(n.x, n.y, n.z, -n.dot(v0)))
}

impl MeshFace {
    pub fn new(vertices: [Vec3<f32>; 4], texcoords: [Vec2<f32>; 4], flags: PassFlags) -> Self {
        let plane = make_plane(vertices[1], vertices[2], vertices[0])
            .unwrap_or(Vec4::zero());
        let normal = plane.xyz();

        // outward-facing planes through each edge
        let mut edge_planes = [Vec4::zero(); 4];
        for q in 0..4 {
            let v = vertices[q];
            let en = (vertices[(q + 1) % 4] - v).cross(normal);
            let len = en.magnitude();
            if len > 0.0 {
                let en = en / len;
                edge_planes[q] = Vec4::new(en.x, en.y, en.z, -en.dot(v));
            }
        }

        MeshFace {
            vertices,
            texcoords,
            plane,
            edge_planes,
            extents: Extents::from_points(vertices),
            flags,
            link: false,
        }
    }

    /// A teleporter opening surface.
    ///
    /// Link faces block neither driving nor shooting on their own, since the
    /// frame around them does that. They exist to be crossed.
    pub fn new_link(vertices: [Vec3<f32>; 4], texcoords: [Vec2<f32>; 4]) -> Self {
        MeshFace {
            link: true,
            ..MeshFace::new(vertices, texcoords, PassFlags::default())
        }
    }

    pub fn vertices(&self) -> &[Vec3<f32>; 4] {
        &self.vertices
    }

    pub fn texcoords(&self) -> &[Vec2<f32>; 4] {
        &self.texcoords
    }

    /// Plane equation `(nx, ny, nz, d)` with a unit normal, or all zeroes if
    /// the face is degenerate.
    pub fn plane(&self) -> Vec4<f32> {
        self.plane
    }

    pub fn normal(&self) -> Vec3<f32> {
        self.plane.xyz()
    }

    pub fn is_link(&self) -> bool {
        self.link
    }

    /// Average of the vertices.
    pub fn center(&self) -> Vec3<f32> {
        self.vertices.iter().fold(Vec3::zero(), |sum, &v| sum + v) / 4.0
    }

    /// Signed distance from the plane, positive on the normal's side.
    pub fn distance(&self, p: Vec3<f32>) -> f32 {
        self.plane.xyz().dot(p) + self.plane.w
    }
}

impl Obstacle for MeshFace {
    fn kind(&self) -> ObstacleKind {
        ObstacleKind::MeshFace
    }

    fn position(&self) -> Vec3<f32> {
        let e = &self.extents;
        Vec3::new(
            (e.maxs.x + e.mins.x) / 2.0,
            (e.maxs.y + e.mins.y) / 2.0,
            e.mins.z,
        )
    }

    fn rotation(&self) -> f32 {
        0.0
    }

    fn size(&self) -> Vec3<f32> {
        let e = &self.extents;
        Vec3::new(
            (e.maxs.x - e.mins.x) / 2.0,
            (e.maxs.y - e.mins.y) / 2.0,
            e.maxs.z - e.mins.z,
        )
    }

    fn extents(&self) -> &Extents {
        &self.extents
    }

    fn flags(&self) -> PassFlags {
        self.flags
    }

    /// A face is valid if it has a plane and every turn between consecutive
    /// edges bends the same way as the normal.
    fn is_valid(&self) -> bool {
        let n = self.normal();
        if n == Vec3::zero() {
            return false;
        }
        (0..4).all(|v| {
            let a = self.vertices[(v + 1) % 4] - self.vertices[v];
            let b = self.vertices[(v + 2) % 4] - self.vertices[(v + 1) % 4];
            a.cross(b).dot(n) >= 0.0
        })
    }

    /// Only hits from the front count.
    fn intersect(&self, ray: &Ray) -> f32 {
        let n = self.normal();
        let line_dot = n.dot(ray.direction);
        if line_dot >= -0.001 {
            return -1.0;
        }
        let t = -(self.plane.w + n.dot(ray.origin)) / line_dot;
        if t < 0.0 {
            return -1.0;
        }

        let point = ray.point_at(t);
        let outside = self.edge_planes
            .iter()
            .any(|e| e.xyz().dot(point) + e.w > 0.001);
        if outside { -1.0 } else { t }
    }

    fn get_normal(&self, _p: Vec3<f32>) -> Vec3<f32> {
        self.normal()
    }

    fn in_cylinder(&self, _p: Vec3<f32>, _radius: f32, _height: f32) -> bool {
        false
    }

    fn in_box(&self, _p: Vec3<f32>, _angle: f32, _dx: f32, _dy: f32, _height: f32) -> bool {
        false
    }

    fn in_moving_box(
        &self,
        _old_p: Vec3<f32>,
        _old_angle: f32,
        _p: Vec3<f32>,
        _angle: f32,
        _dx: f32,
        _dy: f32,
        _height: f32,
    ) -> bool {
        false
    }

    fn is_crossing(
        &self,
        _p: Vec3<f32>,
        _angle: f32,
        _dx: f32,
        _dy: f32,
        _height: f32,
    ) -> Option<Vec4<f32>> {
        None
    }

    fn get_hit_normal(
        &self,
        _pos1: Vec3<f32>,
        _azimuth1: f32,
        _pos2: Vec3<f32>,
        _azimuth2: f32,
        _width: f32,
        _breadth: f32,
        _height: f32,
    ) -> Option<Vec3<f32>> {
        None
    }
}
