/// 3D vector utilities for free flight around the wormhole.
/// Vectors are world-space positions or directions; nothing here assumes unit length
/// unless noted.

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// World "up" used when building look-at bases.
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Vec3::ZERO
    }
}

/// Shorthand constructor
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Dot product
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Cross product
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3 {
        x: a.y * b.z - a.z * b.y,
        y: a.z * b.x - a.x * b.z,
        z: a.x * b.y - a.y * b.x,
    }
}

/// Squared length
pub fn length_sq(v: Vec3) -> f64 {
    v.x * v.x + v.y * v.y + v.z * v.z
}

/// Vector length
pub fn length(v: Vec3) -> f64 {
    length_sq(v).sqrt()
}

/// Normalize vector to unit length. A (near) zero vector stays zero.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len < 1e-12 {
        return Vec3::ZERO;
    }
    Vec3::new(v.x / len, v.y / len, v.z / len)
}

/// Rescale `v` to the given length, keeping its direction.
pub fn with_length(v: Vec3, len: f64) -> Vec3 {
    scale(normalize(v), len)
}

/// Scale vector by scalar
pub fn scale(v: Vec3, s: f64) -> Vec3 {
    Vec3::new(v.x * s, v.y * s, v.z * s)
}

/// Add two vectors
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

/// Subtract vectors (a - b)
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

/// Distance between two points
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(sub(a, b))
}

/// Squared distance between two points
pub fn distance_sq(a: Vec3, b: Vec3) -> f64 {
    length_sq(sub(a, b))
}

/// Reflect `v` off the plane orthogonal to the unit `normal`.
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    sub(v, scale(normal, 2.0 * dot(v, normal)))
}

/// First intersection of a ray with a sphere.
///
/// `direction` must be unit length. Returns the nearest hit in front of the origin;
/// when the origin is inside the sphere that is the exit point. Hits behind the
/// origin are ignored.
pub fn ray_sphere_intersection(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f64,
) -> Option<Vec3> {
    let to_center = sub(center, origin);
    let tca = dot(to_center, direction);
    let d2 = length_sq(to_center) - tca * tca;
    let r2 = radius * radius;
    if d2 > r2 {
        return None;
    }

    let thc = (r2 - d2).sqrt();
    let t0 = tca - thc;
    let t1 = tca + thc;

    if t1 < 0.0 {
        return None;
    }
    let t = if t0 < 0.0 { t1 } else { t0 };
    Some(add(origin, scale(direction, t)))
}
