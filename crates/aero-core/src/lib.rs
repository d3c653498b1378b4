//! Core aero math utilities
//!
//! Includes:
//! - Vector & rotation aliases (nalgebra) and the small helpers the force models share
//! - Response curves (`Curve`, `FloatCurve`)
//! - Physics configuration (`PhysicsGlobals`)
//! - Configuration errors

pub mod config;
pub mod curve;
pub mod error;

pub use config::{PhysicsGlobals, MAX_MACH};
pub use curve::{Curve, FloatCurve, Keyframe};
pub use error::ConfigError;

pub use nalgebra::{Unit, UnitQuaternion, Vector3};

/// World/local vectors. Units follow the caller (m, m/s, N).
pub type Vec3 = Vector3<f64>;
/// Local-to-world orientation of an element.
pub type Rotation = UnitQuaternion<f64>;

/// -------------------------
/// Vector helpers
/// -------------------------

/// Unit vector along `v`, or the zero vector when `v` has no usable length.
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(1e-12).unwrap_or_else(Vec3::zeros)
}

/// Remove the component of `v` along `normal`.
pub fn project_on_plane(v: &Vec3, normal: &Vec3) -> Vec3 {
    let n2 = normal.norm_squared();
    if n2 < 1e-24 {
        return *v;
    }
    v - normal * (v.dot(normal) / n2)
}

/// Unsigned angle between two vectors in degrees, 0 if either is degenerate.
pub fn angle_deg(a: &Vec3, b: &Vec3) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotate `v` about `axis` by `angle_deg` degrees (right-handed).
pub fn rotate_about(v: &Vec3, axis: &Vec3, angle_deg: f64) -> Vec3 {
    match Unit::try_new(*axis, 1e-12) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle_deg.to_radians()) * v,
        None => *v,
    }
}

/// True when every component is finite.
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// -------------------------
/// Scalar helpers
/// -------------------------

/// Linear interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Sign that treats zero as positive (+1 / -1, never 0).
pub fn sign(x: f64) -> f64 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(normalize_or_zero(&Vec3::zeros()), Vec3::zeros());
        let n = normalize_or_zero(&Vec3::new(3.0, 0.0, 4.0));
        assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_removes_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let n = Vec3::new(0.0, 0.0, 2.0);
        let p = project_on_plane(&v, &n);
        assert_abs_diff_eq!(p.dot(&n), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn angles_and_rotation() {
        let x = Vec3::x();
        let y = Vec3::y();
        assert_abs_diff_eq!(angle_deg(&x, &y), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_deg(&x, &-x), 180.0, epsilon = 1e-9);
        assert_eq!(angle_deg(&x, &Vec3::zeros()), 0.0);

        let r = rotate_about(&x, &Vec3::z(), 90.0);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn lerp_clamps_and_sign_of_zero() {
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
        assert_eq!(lerp(1.0, 3.0, 2.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, -1.0), 1.0);
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(-0.1), -1.0);
    }
}
