//! Orientation control
//!
//! Bounded-rate turning toward a heading, the stall turn-around, and the
//! constant-speed forward velocity.

use std::f32::consts::PI;

use glam::{Mat3, Quat, Vec3};

use crate::consts::TURN_RATE;
use crate::{WORLD_UP, forward_of};

/// Rotation whose forward (+Z) faces `direction` with up as close to `up` as possible
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    // Degenerate when looking straight along `up`
    let right = up.cross(forward);
    let right = if right.length_squared() < 1e-8 {
        forward.any_orthonormal_vector()
    } else {
        right.normalize()
    };
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
}

/// Slerp `current` toward facing `heading`, advancing `dt * TURN_RATE` of the way
pub fn turn_toward(current: Quat, heading: Vec3, dt: f32) -> Quat {
    let target = look_rotation(heading, WORLD_UP);
    let t = (dt * TURN_RATE).clamp(0.0, 1.0);
    current.slerp(target, t).normalize()
}

/// Turn around: 180° about the agent's own up axis
pub fn reverse_yaw(current: Quat) -> Quat {
    (current * Quat::from_rotation_y(PI)).normalize()
}

/// Constant-speed velocity along the rotation's forward axis
#[inline]
pub fn forward_velocity(orientation: Quat, speed: f32) -> Vec3 {
    forward_of(orientation) * speed
}
