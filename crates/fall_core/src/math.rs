//! # Scalar Helpers
//!
//! Interpolation and the degree-based angle helpers used by view culling.

/// Linear interpolation from `from` to `to` by `t`.
#[inline]
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Wraps an angle in degrees into `[-180, 180)`.
#[inline]
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else if wrapped < -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Angle in degrees of the vector `(horizontal, vertical)`.
///
/// Called with `(dz, dx)` this is a heading in the same convention as an
/// entity's yaw: 0 faces +X and 90 faces +Z.
#[inline]
#[must_use]
pub fn calc_angle(vertical: f32, horizontal: f32) -> f32 {
    vertical.atan2(horizontal).to_degrees()
}
