//! Vector geometry for isolating rotation about the gravity axis.
//!
//! All functions are pure. Degenerate input (zero-length vectors, collapsed
//! attitudes) produces NaN rather than an error; callers decide how to treat it.

use crate::types::MotionSample;
use glam::{Mat3, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Device axis that is projected onto the gravity plane.
pub const REFERENCE_VECTOR: Vec3 = Vec3::Y;

/// Maximum deviation from horizontal gravity (radians) at which the device
/// counts as held upright.
pub const VERTICAL_THRESHOLD: f32 = FRAC_PI_4;

/// Unsigned angle between two vectors, in `[0, π]`.
///
/// The cosine ratio is clamped to `[-1, 1]` so rounding on (anti)parallel
/// vectors cannot push `acos` out of its domain. Zero-length input still
/// yields NaN.
pub fn angle_between(v1: Vec3, v2: Vec3) -> f32 {
    let joint_magnitudes = v1.length() * v2.length();
    let ratio = v1.dot(v2) / joint_magnitudes;
    // f32::clamp passes NaN through.
    ratio.clamp(-1.0, 1.0).acos()
}

/// Signed angle from `v1` to `v2` in the X-Y plane.
///
/// Both vectors are compared against `v2` rotated -90° about Z. Positive
/// results mean `v2` lies clockwise of `v1` when viewed from +Z.
pub fn directional_angle_difference(v1: Vec3, v2: Vec3) -> f32 {
    let direction_reference = Mat3::from_rotation_z(-FRAC_PI_2) * v2;
    angle_between(v1, direction_reference) - angle_between(v2, direction_reference)
}

/// Projects `reference` through `attitude` onto the plane whose normal is
/// `gravity`, returning the result in the X-Y plane (z is always zero).
///
/// Returns a NaN vector when `gravity` has no usable direction.
pub fn project_onto_gravity_plane(attitude: Mat3, gravity: Vec3, reference: Vec3) -> Vec3 {
    let magnitude_sq = gravity.length_squared();
    if magnitude_sq == 0.0 || !magnitude_sq.is_finite() {
        return Vec3::NAN;
    }

    let tilt = gravity.y.atan2((gravity.x * gravity.x + gravity.z * gravity.z).sqrt());
    let heading = gravity.x.atan2(gravity.z);

    // Both alignment steps are Y-axis rotations.
    let matrix = attitude * Mat3::from_rotation_y(tilt) * Mat3::from_rotation_y(heading);
    let projected = matrix * reference;

    Vec3::new(projected.x, projected.y, 0.0)
}

/// Whether `gravity` is within [`VERTICAL_THRESHOLD`] of the device's X-Y
/// plane, i.e. the device is held upright rather than flat.
pub fn is_vertical(gravity: Vec3) -> bool {
    let angle_to_z = angle_between(gravity, Vec3::Z);
    (angle_to_z - FRAC_PI_2).abs() < VERTICAL_THRESHOLD
}

/// Signed rotation about the gravity axis between two samples.
///
/// When the current sample is held upright both attitudes are turned +90°
/// about their X axis first, so the projected axis stays well away from the
/// gravity direction.
pub fn gravity_axis_rotation_delta(current: &MotionSample, previous: &MotionSample) -> f32 {
    let mut current_attitude = current.attitude;
    let mut previous_attitude = previous.attitude;

    if is_vertical(current.gravity) {
        let rotation = Mat3::from_rotation_x(FRAC_PI_2);
        current_attitude *= rotation;
        previous_attitude *= rotation;
    }

    let projection =
        project_onto_gravity_plane(current_attitude, current.gravity, REFERENCE_VECTOR);
    let previous_projection =
        project_onto_gravity_plane(previous_attitude, previous.gravity, REFERENCE_VECTOR);

    directional_angle_difference(previous_projection, projection)
}
