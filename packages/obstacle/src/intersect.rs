//! Intersection tests on oriented rectangles and blocks.
//!
//! Shapes are given map-file style. A rectangle is a center, a rotation about
//! Z in radians, and half extents `dx`, `dy` along its local X and Y axes. A
//! block is a rectangle at the block's base plus a full height `dz` above
//! that base. Every test transforms the query into the shape's local frame
//! and then works on an axis-aligned shape centered at the origin.
//!
//! Ray hit times are returned as `f32` with a negative value meaning no hit,
//! since callers routinely compare and minimize them across obstacles.

use crate::ray::Ray;
use std::f32::consts::PI;
use vek::*;


/// Which edge of a rectangle, in its local frame, a ray struck first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RectSide {
    /// The `+x` edge.
    East,
    /// The `+y` edge.
    North,
    /// The `-x` edge.
    West,
    /// The `-y` edge.
    South,
}

impl RectSide {
    /// Angle of the outward normal of this side, in the rectangle's frame.
    pub fn normal_angle(self) -> f32 {
        match self {
            RectSide::East => 0.0,
            RectSide::North => 0.5 * PI,
            RectSide::West => PI,
            RectSide::South => 1.5 * PI,
        }
    }
}

/// Result of casting a ray at a rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RectHit {
    /// The ray's origin is already within the rectangle.
    Inside,
    /// The ray strikes `side` at time `t`.
    Edge {
        t: f32,
        side: RectSide,
    },
}

/// Rotate a 2D vector counter-clockwise by `angle` radians.
pub fn rotate_xy(v: Vec2<f32>, angle: f32) -> Vec2<f32> {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

/// XY of `p` in the frame of a shape centered at `center` with rotation
/// `angle`.
pub fn to_local_xy(p: Vec3<f32>, center: Vec3<f32>, angle: f32) -> Vec2<f32> {
    rotate_xy(Vec2::new(p.x - center.x, p.y - center.y), -angle)
}

/// `ray` in the frame of a block based at `base` with rotation `angle`.
fn to_local_ray(ray: &Ray, base: Vec3<f32>, angle: f32) -> (Vec3<f32>, Vec3<f32>) {
    let p = to_local_xy(ray.origin, base, angle);
    let d = rotate_xy(ray.direction.xy(), -angle);
    (
        Vec3::new(p.x, p.y, ray.origin.z - base.z),
        Vec3::new(d.x, d.y, ray.direction.z),
    )
}

/// Angle of the outward normal of the origin-centered rectangle closest to
/// `p`. Outside the rectangle, corners produce diagonal normals.
fn normal_angle_orig_rect(p: Vec2<f32>, dx: f32, dy: f32) -> f32 {
    if p.x > dx {
        return if p.y > dy {
            (p.y - dy).atan2(p.x - dx)
        } else if p.y < -dy {
            (p.y + dy).atan2(p.x - dx)
        } else {
            0.0
        };
    }
    if p.x < -dx {
        return if p.y > dy {
            (p.y - dy).atan2(p.x + dx)
        } else if p.y < -dy {
            (p.y + dy).atan2(p.x + dx)
        } else {
            PI
        };
    }
    if p.y > dy {
        return 0.5 * PI;
    }
    if p.y < -dy {
        return 1.5 * PI;
    }

    // inside, pick the wall of the quadrant's nearer diagonal side
    if p.x > 0.0 {
        if p.y > 0.0 {
            if dy * p.x > dx * p.y { 0.0 } else { 0.5 * PI }
        } else {
            if dy * p.x > -dx * p.y { 0.0 } else { 1.5 * PI }
        }
    } else {
        if p.y > 0.0 {
            if dy * p.x < -dx * p.y { PI } else { 0.5 * PI }
        } else {
            if dy * p.x < dx * p.y { PI } else { 1.5 * PI }
        }
    }
}

/// Horizontal outward normal of the rectangle centered at `center` that is
/// nearest to `p`.
pub fn get_normal_rect(
    p: Vec3<f32>,
    center: Vec2<f32>,
    angle: f32,
    dx: f32,
    dy: f32,
) -> Vec3<f32> {
    let local = rotate_xy(p.xy() - center, -angle);
    let norm_angle = normal_angle_orig_rect(local, dx, dy) + angle;
    Vec3::new(norm_angle.cos(), norm_angle.sin(), 0.0)
}

/// Does the origin-centered rectangle intersect the circle at `p`?
fn test_orig_rect_circle(dx: f32, dy: f32, p: Vec2<f32>, r: f32) -> bool {
    let rr = r * r;
    let rx = -p.x;
    let ry = -p.y;
    if rx + dx < 0.0 {
        if ry + dy < 0.0 {
            (rx + dx) * (rx + dx) + (ry + dy) * (ry + dy) < rr
        } else if ry - dy > 0.0 {
            (rx + dx) * (rx + dx) + (ry - dy) * (ry - dy) < rr
        } else {
            rx + dx > -r
        }
    } else if rx - dx > 0.0 {
        if ry + dy < 0.0 {
            (rx - dx) * (rx - dx) + (ry + dy) * (ry + dy) < rr
        } else if ry - dy > 0.0 {
            (rx - dx) * (rx - dx) + (ry - dy) * (ry - dy) < rr
        } else {
            rx - dx < r
        }
    } else if ry + dy < 0.0 {
        ry + dy > -r
    } else if ry - dy > 0.0 {
        ry - dy < r
    } else {
        true
    }
}

/// Does the rectangle at `center` intersect the circle of radius `r` at
/// `p`? Only XY are considered.
pub fn test_rect_circle(
    center: Vec3<f32>,
    angle: f32,
    dx: f32,
    dy: f32,
    p: Vec3<f32>,
    r: f32,
) -> bool {
    test_orig_rect_circle(dx, dy, to_local_xy(p, center, angle), r)
}

/// Time at which a ray in local coordinates first touches the box spanning
/// `x` in `[-dx, dx]`, `y` in `[-dy, dy]`, `z` in `[0, dz]`.
fn time_ray_hits_orig_box(p: Vec3<f32>, v: Vec3<f32>, dx: f32, dy: f32, dz: f32) -> f32 {
    if p.x.abs() <= dx && p.y.abs() <= dy && p.z >= 0.0 && p.z <= dz {
        return 0.0;
    }

    let mut tx = if p.x > dx {
        if v.x >= 0.0 {
            return -1.0;
        }
        (dx - p.x) / v.x
    } else if p.x < -dx {
        if v.x <= 0.0 {
            return -1.0;
        }
        -(dx + p.x) / v.x
    } else {
        -1.0
    };

    let mut ty = if p.y > dy {
        if v.y >= 0.0 {
            return -1.0;
        }
        (dy - p.y) / v.y
    } else if p.y < -dy {
        if v.y <= 0.0 {
            return -1.0;
        }
        -(dy + p.y) / v.y
    } else {
        -1.0
    };

    let mut tz = if p.z > dz {
        if v.z >= 0.0 {
            return -1.0;
        }
        (dz - p.z) / v.z
    } else if p.z < 0.0 {
        if v.z <= 0.0 {
            return -1.0;
        }
        -p.z / v.z
    } else {
        -1.0
    };

    // discard wall hits that land outside the box
    if tx < 0.0
        || (p.y + tx * v.y).abs() > dy
        || p.z + tx * v.z < 0.0
        || p.z + tx * v.z > dz
    {
        tx = -1.0;
    }
    if ty < 0.0
        || (p.x + ty * v.x).abs() > dx
        || p.z + ty * v.z < 0.0
        || p.z + ty * v.z > dz
    {
        ty = -1.0;
    }
    if tz < 0.0
        || (p.x + tz * v.x).abs() > dx
        || (p.y + tz * v.y).abs() > dy
    {
        tz = -1.0;
    }

    [tx, ty, tz]
        .into_iter()
        .filter(|&t| t >= 0.0)
        .fold(-1.0, |best, t| if best < 0.0 || t < best { t } else { best })
}

/// Time at which `ray` first touches the block based at `base`, `0.0` if the
/// ray starts inside, or negative if it never does.
pub fn time_ray_hits_block(
    ray: &Ray,
    base: Vec3<f32>,
    angle: f32,
    dx: f32,
    dy: f32,
    dz: f32,
) -> f32 {
    let (p, v) = to_local_ray(ray, base, angle);
    time_ray_hits_orig_box(p, v, dx, dy, dz)
}

fn time_and_side_ray_hits_orig_rect(
    p: Vec2<f32>,
    v: Vec2<f32>,
    dx: f32,
    dy: f32,
) -> Option<RectHit> {
    if p.x.abs() <= dx && p.y.abs() <= dy {
        return Some(RectHit::Inside);
    }

    let mut tx = if p.x > dx {
        if v.x >= 0.0 {
            return None;
        }
        (dx - p.x) / v.x
    } else if p.x < -dx {
        if v.x <= 0.0 {
            return None;
        }
        -(dx + p.x) / v.x
    } else {
        -1.0
    };

    let mut ty = if p.y > dy {
        if v.y >= 0.0 {
            return None;
        }
        (dy - p.y) / v.y
    } else if p.y < -dy {
        if v.y <= 0.0 {
            return None;
        }
        -(dy + p.y) / v.y
    } else {
        -1.0
    };

    if (p.y + tx * v.y).abs() > dy {
        tx = -1.0;
    }
    if (p.x + ty * v.x).abs() > dx {
        ty = -1.0;
    }
    if tx < 0.0 && ty < 0.0 {
        return None;
    }

    Some(if tx < 0.0 || (ty >= 0.0 && ty < tx) {
        RectHit::Edge {
            t: ty,
            side: if p.y > dy { RectSide::North } else { RectSide::South },
        }
    } else {
        RectHit::Edge {
            t: tx,
            side: if p.x > dx { RectSide::East } else { RectSide::West },
        }
    })
}

/// Cast the XY projection of `ray` at the rectangle centered at `center`.
///
/// Returns `None` on a miss. Sides are in the rectangle's own frame.
pub fn time_and_side_ray_hits_rect(
    ray: &Ray,
    center: Vec3<f32>,
    angle: f32,
    dx: f32,
    dy: f32,
) -> Option<RectHit> {
    let (p, v) = to_local_ray(ray, center, angle);
    time_and_side_ray_hits_orig_rect(p.xy(), v.xy(), dx, dy)
}

const BOX_CORNERS: [[f32; 2]; 4] = [
    [1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [-1.0, 1.0],
];

/// Sign-like classification of `v` against the interval `[-d, d]`.
fn region(v: f32, d: f32) -> i8 {
    if v < -d {
        -1
    } else if v > d {
        1
    } else {
        0
    }
}

/// Does the rectangle centered at `p` with rotation `angle` and half extents
/// `dx1`, `dy1` intersect the origin-centered rectangle with half extents
/// `dx2`, `dy2`?
fn test_orig_rect_rect(p: Vec2<f32>, angle: f32, dx1: f32, dy1: f32, dx2: f32, dy2: f32) -> bool {
    let (s, c) = angle.sin_cos();

    // center of the second rect within the first
    let sx = c * p.x + s * p.y;
    let sy = c * p.y - s * p.x;
    if sx.abs() < dx1 && sy.abs() < dy1 {
        return true;
    }

    // corners of the first rect, any inside the second is a hit
    let mut corner = [Vec2::<f32>::zero(); 4];
    let mut reg = [[0i8; 2]; 4];
    for i in 0..4 {
        let [bx, by] = BOX_CORNERS[i];
        corner[i] = Vec2::new(
            p.x + c * dx1 * bx - s * dy1 * by,
            p.y + s * dx1 * bx + c * dy1 * by,
        );
        reg[i] = [region(corner[i].x, dx2), region(corner[i].y, dy2)];
        if reg[i] == [0, 0] {
            return true;
        }
    }

    // edges of the first rect passing through the second
    for i in 0..4 {
        let j = (i + 1) % 4;

        if reg[i][0] == reg[j][0] {
            if reg[i][0] == 0 && reg[i][1] != reg[j][1] {
                return true;
            }
            continue;
        } else if reg[i][1] == reg[j][1] {
            if reg[i][1] == 0 {
                return true;
            }
            continue;
        }

        // corner of the second rect the edge might pass by
        let corner2 = if reg[i][0] == 0 {
            Vec2::new(reg[j][0] as f32 * dx2, reg[i][1] as f32 * dy2)
        } else if reg[j][0] == 0 {
            Vec2::new(reg[i][0] as f32 * dx2, reg[j][1] as f32 * dy2)
        } else if reg[i][1] == 0 {
            Vec2::new(reg[i][0] as f32 * dx2, reg[j][1] as f32 * dy2)
        } else {
            Vec2::new(reg[j][0] as f32 * dx2, reg[i][1] as f32 * dy2)
        };

        let e = corner[j] - corner[i];
        let a = e.y * (corner2.x - corner[i].x) - e.x * (corner2.y - corner[i].y);
        let b = e.y * (corner2.x + corner[i].x) - e.x * (corner2.y + corner[i].y);
        if a * b > 0.0 {
            return true;
        }
    }
    false
}

/// Do two rotated rectangles intersect? Only XY are considered.
pub fn test_rect_rect(
    p1: Vec3<f32>,
    angle1: f32,
    dx1: f32,
    dy1: f32,
    p2: Vec3<f32>,
    angle2: f32,
    dx2: f32,
    dy2: f32,
) -> bool {
    let local = to_local_xy(p2, p1, angle1);
    test_orig_rect_rect(local, angle2 - angle1, dx2, dy2, dx1, dy1)
}

/// Is the second rectangle entirely within the first? Only XY are
/// considered.
pub fn test_rect_in_rect(
    p1: Vec3<f32>,
    angle1: f32,
    dx1: f32,
    dy1: f32,
    p2: Vec3<f32>,
    angle2: f32,
    dx2: f32,
    dy2: f32,
) -> bool {
    let local = to_local_xy(p2, p1, angle1);
    let (s2, c2) = (angle2 - angle1).sin_cos();
    BOX_CORNERS.iter().all(|&[bx, by]| {
        let x = local.x + c2 * dx2 * bx - s2 * dy2 * by;
        let y = local.y + s2 * dx2 * bx + c2 * dy2 * by;
        x.abs() <= dx1 && y.abs() <= dy1
    })
}

/// Swept hit normal of a moving tank box against an obstacle block.
///
/// The tank is a rectangle with half extents `width`, `breadth` moving from
/// `pos1` at `azimuth1` to `pos2` at `azimuth2`. The obstacle is the block
/// based at `o_pos`. Returns the fraction of the move at which contact was
/// first made together with the obstacle's outward normal there, or `None`
/// if the path never touches the block's sides.
pub fn get_hit_normal(
    pos1: Vec3<f32>,
    azimuth1: f32,
    pos2: Vec3<f32>,
    azimuth2: f32,
    width: f32,
    breadth: f32,
    o_pos: Vec3<f32>,
    o_azimuth: f32,
    o_width: f32,
    o_breadth: f32,
    o_height: f32,
) -> Option<(f32, Vec3<f32>)> {
    // starting above means landing on the roof
    if pos1.z >= o_pos.z + o_height && pos2.z < o_pos.z + o_height {
        return Some((0.0, Vec3::unit_z()));
    }

    let mut best: Option<(f32, Vec3<f32>)> = None;
    let mut consider = |t: f32, n: Vec3<f32>| {
        if (0.0..=1.0).contains(&t) && best.map(|(bt, _)| t < bt).unwrap_or(true) {
            best = Some((t, n));
        }
    };

    // tank corners against the obstacle's sides
    for &[bx, by] in &BOX_CORNERS {
        let corner = Vec2::new(bx * width, by * breadth);
        let c1 = pos1.xy() + rotate_xy(corner, azimuth1);
        let c2 = pos2.xy() + rotate_xy(corner, azimuth2);
        let ray = Ray::new(
            Vec3::new(c1.x, c1.y, pos1.z),
            Vec3::new(c2.x - c1.x, c2.y - c1.y, 0.0),
        );
        if let Some(RectHit::Edge { t, side }) =
            time_and_side_ray_hits_rect(&ray, o_pos, o_azimuth, o_width, o_breadth)
        {
            let angle = o_azimuth + side.normal_angle();
            consider(t, Vec3::new(angle.cos(), angle.sin(), 0.0));
        }
    }

    // obstacle corners against the tank's sides, in the tank's frame
    for &[bx, by] in &BOX_CORNERS {
        let corner = o_pos.xy() + rotate_xy(Vec2::new(bx * o_width, by * o_breadth), o_azimuth);
        let k1 = rotate_xy(corner - pos1.xy(), -azimuth1);
        let k2 = rotate_xy(corner - pos2.xy(), -azimuth2);
        let ray = Ray::new(
            Vec3::new(k1.x, k1.y, 0.0),
            Vec3::new(k2.x - k1.x, k2.y - k1.y, 0.0),
        );
        if let Some(RectHit::Edge { t, side }) =
            time_and_side_ray_hits_rect(&ray, Vec3::zero(), 0.0, width, breadth)
        {
            let azimuth = azimuth1 + (azimuth2 - azimuth1) * t;
            let angle = azimuth + side.normal_angle() + PI;
            consider(t, Vec3::new(angle.cos(), angle.sin(), 0.0));
        }
    }

    best
}
