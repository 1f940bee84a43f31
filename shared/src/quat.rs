//! Unit quaternion utilities for body and eye attitudes.
//! Composition follows the usual convention: `mul(a, b)` applies `b` first, then `a`.

use crate::vec3::{self, cross, dot, length_sq, normalize, Vec3};

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

pub fn length(q: Quat) -> f64 {
    (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt()
}

/// Normalize to unit length. A zero quaternion becomes the identity.
pub fn normalize_quat(q: Quat) -> Quat {
    let len = length(q);
    if len == 0.0 {
        return Quat::IDENTITY;
    }
    let inv = 1.0 / len;
    Quat::new(q.x * inv, q.y * inv, q.z * inv, q.w * inv)
}

/// Hamilton product `a * b`.
pub fn mul(a: Quat, b: Quat) -> Quat {
    Quat {
        x: a.x * b.w + a.w * b.x + a.y * b.z - a.z * b.y,
        y: a.y * b.w + a.w * b.y + a.z * b.x - a.x * b.z,
        z: a.z * b.w + a.w * b.z + a.x * b.y - a.y * b.x,
        w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
    }
}

/// Inverse of a unit quaternion (its conjugate).
pub fn inverse(q: Quat) -> Quat {
    Quat::new(-q.x, -q.y, -q.z, q.w)
}

/// Rotation of `angle` radians about the unit `axis`.
pub fn from_axis_angle(axis: Vec3, angle: f64) -> Quat {
    let half = angle / 2.0;
    let s = half.sin();
    Quat::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
}

/// Shortest-arc rotation taking unit direction `from` onto unit direction `to`.
pub fn from_unit_vectors(from: Vec3, to: Vec3) -> Quat {
    let r = dot(from, to) + 1.0;

    let q = if r < 1e-6 {
        // Opposite directions: any axis orthogonal to `from` works.
        if from.x.abs() > from.z.abs() {
            Quat::new(-from.y, from.x, 0.0, 0.0)
        } else {
            Quat::new(0.0, -from.z, from.y, 0.0)
        }
    } else {
        let c = cross(from, to);
        Quat::new(c.x, c.y, c.z, r)
    };

    normalize_quat(q)
}

/// Intrinsic Euler rotation applied in Y, X, Z order (yaw, pitch, roll).
pub fn from_euler_yxz(x: f64, y: f64, z: f64) -> Quat {
    let (s1, c1) = (x / 2.0).sin_cos();
    let (s2, c2) = (y / 2.0).sin_cos();
    let (s3, c3) = (z / 2.0).sin_cos();

    Quat {
        x: s1 * c2 * c3 + c1 * s2 * s3,
        y: c1 * s2 * c3 - s1 * c2 * s3,
        z: c1 * c2 * s3 - s1 * s2 * c3,
        w: c1 * c2 * c3 + s1 * s2 * s3,
    }
}

/// Build a quaternion from an orthonormal basis given as matrix columns.
pub fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Quat {
    let (m11, m12, m13) = (x_axis.x, y_axis.x, z_axis.x);
    let (m21, m22, m23) = (x_axis.y, y_axis.y, z_axis.y);
    let (m31, m32, m33) = (x_axis.z, y_axis.z, z_axis.z);

    let trace = m11 + m22 + m33;

    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        Quat::new((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
    } else if m11 > m22 && m11 > m33 {
        let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
        Quat::new(0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
    } else if m22 > m33 {
        let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
        Quat::new((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
    } else {
        let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
        Quat::new((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
    }
}

/// Orientation at `eye` whose forward axis (-Z) points at `target`.
///
/// When `eye == target` the forward axis falls back to -Z. When the view
/// direction is parallel to `up` the basis is nudged so it stays well defined.
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z_axis = vec3::sub(eye, target);
    if length_sq(z_axis) == 0.0 {
        z_axis.z = 1.0;
    }
    z_axis = normalize(z_axis);

    let mut x_axis = cross(up, z_axis);
    if length_sq(x_axis) == 0.0 {
        if up.z.abs() == 1.0 {
            z_axis.x += 0.0001;
        } else {
            z_axis.z += 0.0001;
        }
        z_axis = normalize(z_axis);
        x_axis = cross(up, z_axis);
    }
    x_axis = normalize(x_axis);

    let y_axis = cross(z_axis, x_axis);

    from_basis(x_axis, y_axis, z_axis)
}

/// Rotate vector `v` by unit quaternion `q`.
pub fn rotate_vector(q: Quat, v: Vec3) -> Vec3 {
    let ix = q.w * v.x + q.y * v.z - q.z * v.y;
    let iy = q.w * v.y + q.z * v.x - q.x * v.z;
    let iz = q.w * v.z + q.x * v.y - q.y * v.x;
    let iw = -q.x * v.x - q.y * v.y - q.z * v.z;

    Vec3 {
        x: ix * q.w + iw * -q.x + iy * -q.z - iz * -q.y,
        y: iy * q.w + iw * -q.y + iz * -q.x - ix * -q.z,
        z: iz * q.w + iw * -q.z + ix * -q.y - iy * -q.x,
    }
}

/// Direction the -Z axis faces after applying `q`.
pub fn forward(q: Quat) -> Vec3 {
    rotate_vector(q, Vec3::new(0.0, 0.0, -1.0))
}

/// Angle in radians between two unit orientations.
pub fn angle_between(a: Quat, b: Quat) -> f64 {
    let d = (a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w).abs();
    2.0 * d.clamp(-1.0, 1.0).acos()
}
