//! Common interface for solid map geometry.

use crate::{
    ray::Ray,
    extents::Extents,
};
use std::fmt::{self, Formatter, Display};
use vek::*;


/// Obstacles further than this from the origin on any axis are invalid.
pub const MAX_EXTENT: f32 = 1.0e30;

/// Which kind of obstacle something is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObstacleKind {
    Teleporter,
    MeshFace,
}

impl ObstacleKind {
    /// Name used for this kind in map files and diagnostics.
    pub fn type_name(self) -> &'static str {
        match self {
            ObstacleKind::Teleporter => "Teleporter",
            ObstacleKind::MeshFace => "MeshFace",
        }
    }

    /// Can a tank stand on top of this kind of obstacle?
    ///
    /// Teleporter crossbars are too thin to be landed on, so a tank falling
    /// onto one keeps falling.
    pub fn has_solid_roof(self) -> bool {
        match self {
            ObstacleKind::Teleporter => false,
            ObstacleKind::MeshFace => true,
        }
    }
}

impl Display for ObstacleKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// What may pass through an obstacle, packed in the map wire format as the
/// low bits of a state byte.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PassFlags {
    /// Tanks pass through.
    pub drive_through: bool,
    /// Shots pass through.
    pub shoot_through: bool,
    /// Shots bounce off.
    pub ricochet: bool,
}

impl PassFlags {
    pub const DRIVE_THRU: u8 = 1 << 0;
    pub const SHOOT_THRU: u8 = 1 << 1;
    pub const FLIP_Z: u8 = 1 << 2;
    pub const RICOCHET: u8 = 1 << 3;

    pub fn to_state_byte(self) -> u8 {
        let mut state = 0;
        if self.drive_through {
            state |= Self::DRIVE_THRU;
        }
        if self.shoot_through {
            state |= Self::SHOOT_THRU;
        }
        if self.ricochet {
            state |= Self::RICOCHET;
        }
        state
    }

    /// Bits other than the ones represented here are ignored.
    pub fn from_state_byte(state: u8) -> Self {
        PassFlags {
            drive_through: state & Self::DRIVE_THRU != 0,
            shoot_through: state & Self::SHOOT_THRU != 0,
            ricochet: state & Self::RICOCHET != 0,
        }
    }
}

/// A piece of solid map geometry that movement and shots are tested against.
///
/// Oriented queries describe the tank as a box: base center `p`, rotation
/// `angle` about Z, half extents `dx`, `dy`, and full `height`. Ray hit times
/// follow the convention of the `intersect` module, negative for a miss.
pub trait Obstacle {
    fn kind(&self) -> ObstacleKind;

    /// Base center position.
    fn position(&self) -> Vec3<f32>;

    /// Rotation about Z, in radians.
    fn rotation(&self) -> f32;

    /// Half width, half breadth, and full height.
    fn size(&self) -> Vec3<f32>;

    fn extents(&self) -> &Extents;

    fn flags(&self) -> PassFlags;

    fn is_valid(&self) -> bool;

    /// Time at which `ray` first touches self, or negative if never.
    fn intersect(&self, ray: &Ray) -> f32;

    /// Outward surface normal nearest to `p`.
    fn get_normal(&self, p: Vec3<f32>) -> Vec3<f32>;

    /// Does the upright cylinder based at `p` intersect self?
    fn in_cylinder(&self, p: Vec3<f32>, radius: f32, height: f32) -> bool;

    /// Does the box based at `p` intersect self?
    fn in_box(&self, p: Vec3<f32>, angle: f32, dx: f32, dy: f32, height: f32) -> bool;

    /// Does the box intersect self anywhere along a move from `old_p` to `p`?
    fn in_moving_box(
        &self,
        old_p: Vec3<f32>,
        old_angle: f32,
        p: Vec3<f32>,
        angle: f32,
        dx: f32,
        dy: f32,
        height: f32,
    ) -> bool;

    /// If the box straddles a surface that may be crossed, the plane of that
    /// surface as `(nx, ny, nz, d)` with `n . x + d = 0`.
    fn is_crossing(
        &self,
        p: Vec3<f32>,
        angle: f32,
        dx: f32,
        dy: f32,
        height: f32,
    ) -> Option<Vec4<f32>>;

    /// Outward normal of the surface a tank box moving from `pos1` to `pos2`
    /// ran into, if any.
    fn get_hit_normal(
        &self,
        pos1: Vec3<f32>,
        azimuth1: f32,
        pos2: Vec3<f32>,
        azimuth2: f32,
        width: f32,
        breadth: f32,
        height: f32,
    ) -> Option<Vec3<f32>>;
}

/// Height of the highest solid roof at or below `p` among `obstacles`.
///
/// Only obstacles whose kind has a solid roof, that tanks can't drive through,
/// and whose extents cover `p` horizontally count.
pub fn roof_height<'a, I>(obstacles: I, p: Vec3<f32>) -> Option<f32>
where
    I: IntoIterator<Item=&'a dyn Obstacle>,
{
    obstacles
        .into_iter()
        .filter(|o| o.kind().has_solid_roof() && !o.flags().drive_through)
        .map(|o| o.extents())
        .filter(|e| {
            p.x >= e.mins.x && p.x <= e.maxs.x
                && p.y >= e.mins.y && p.y <= e.maxs.y
                && e.maxs.z <= p.z
        })
        .map(|e| e.maxs.z)
        .fold(None, |best: Option<f32>, z| Some(best.map_or(z, |b| b.max(z))))
}
