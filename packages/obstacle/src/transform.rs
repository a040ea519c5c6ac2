//! Affine transforms applied to map geometry.

use vek::*;


/// A single step of a `MeshTransform`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TransformOp {
    Shift(Vec3<f32>),
    Scale(Vec3<f32>),
    /// Rotation by an angle in radians about an axis through the origin.
    Spin {
        angle: f32,
        axis: Vec3<f32>,
    },
}

impl TransformOp {
    fn matrix(self) -> Mat4<f32> {
        match self {
            TransformOp::Shift(v) => Mat4::translation_3d(v),
            TransformOp::Scale(v) => Mat4::scaling_3d(v),
            TransformOp::Spin { angle, axis } => Mat4::rotation_3d(angle, axis.normalized()),
        }
    }
}

/// A sequence of shifts, scales, and spins, applied in the order added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshTransform {
    ops: Vec<TransformOp>,
}

/// A map-file style obstacle placement after transformation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OldStyle {
    pub pos: Vec3<f32>,
    pub size: Vec3<f32>,
    pub angle: f32,
    /// Did the transform turn the obstacle upside down?
    pub flipped: bool,
}

impl MeshTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift<V: Into<Vec3<f32>>>(&mut self, v: V) -> &mut Self {
        self.ops.push(TransformOp::Shift(v.into()));
        self
    }

    pub fn scale<V: Into<Vec3<f32>>>(&mut self, v: V) -> &mut Self {
        self.ops.push(TransformOp::Scale(v.into()));
        self
    }

    pub fn spin<V: Into<Vec3<f32>>>(&mut self, angle: f32, axis: V) -> &mut Self {
        self.ops.push(TransformOp::Spin { angle, axis: axis.into() });
        self
    }

    /// Add all of `other`'s steps after self's.
    pub fn append(&mut self, other: &MeshTransform) -> &mut Self {
        self.ops.extend_from_slice(&other.ops);
        self
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The whole sequence as a single matrix.
    pub fn matrix(&self) -> Mat4<f32> {
        self.ops
            .iter()
            .fold(Mat4::identity(), |m, op| op.matrix() * m)
    }

    pub fn modify_vertex(&self, v: Vec3<f32>) -> Vec3<f32> {
        self.matrix().mul_point(v)
    }

    /// Transform a surface normal, keeping it unit length.
    pub fn modify_normal(&self, n: Vec3<f32>) -> Vec3<f32> {
        let m = self.matrix().inverted().transposed();
        let n = m.mul_direction(n);
        let len = n.magnitude();
        if len > 0.0 { n / len } else { n }
    }

    /// Transform an obstacle given as base center, half width, half breadth,
    /// full height, and rotation about Z.
    ///
    /// Only transforms that keep the obstacle's vertical axis vertical give a
    /// meaningful result, since the output still has only a Z rotation.
    pub fn modify_old_style(&self, pos: Vec3<f32>, size: Vec3<f32>, angle: f32) -> OldStyle {
        let m = self.matrix();
        let (s, c) = angle.sin_cos();
        let x_axis = m.mul_direction(Vec3::new(c, s, 0.0) * size.x);
        let y_axis = m.mul_direction(Vec3::new(-s, c, 0.0) * size.y);
        let z_axis = m.mul_direction(Vec3::new(0.0, 0.0, size.z));

        let flipped = z_axis.z < 0.0;
        let mut pos = m.mul_point(pos);
        if flipped {
            pos.z += z_axis.z;
        }

        OldStyle {
            pos,
            size: Vec3::new(x_axis.magnitude(), y_axis.magnitude(), z_axis.magnitude()),
            angle: x_axis.y.atan2(x_axis.x),
            flipped,
        }
    }
}
