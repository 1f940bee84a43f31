//! Per-frame integration of the player's body and eyes.
//!
//! The wormhole's pull is a lensing effect for the viewer, not a force law: it only
//! bends the direction of travel and never changes the speed.

use crate::player::PlayerState;
use crate::quat::{self, Quat};
use crate::vec3::{add, length, length_sq, normalize, scale, sub, with_length, Vec3};
use crate::wormhole::WormholeField;

/// Below this squared speed the player counts as stationary.
pub const STATIONARY_SPEED_SQ: f64 = 1e-5;

/// Below this the bent velocity has no usable direction.
const MIN_BENT_LENGTH_SQ: f64 = 1e-24;

/// Bend the velocity toward the wormhole and advance position and body orientation.
///
/// Returns the position before the step, or `None` when the player was stationary and
/// nothing moved.
///
/// The curvature term divides by the distance to the inner boundary
/// (`radius * (1 - gravity_ratio)` from the center). A player sitting exactly on that
/// boundary gets an unbounded acceleration; callers must not place the player there.
pub fn integrate_motion(
    player: &mut PlayerState,
    field: &WormholeField,
    delta: f64,
) -> Option<Vec3> {
    let speed_sq = length_sq(player.velocity);
    if speed_sq <= STATIONARY_SPEED_SQ {
        return None;
    }

    let prev_position = player.position;
    let speed = speed_sq.sqrt();

    let gravity = sub(field.center(), prev_position);
    let ray_distance = length(gravity) - field.curvature_boundary();
    let amount = field.gravity_ratio() / ray_distance;
    let acceleration = scale(
        normalize(gravity),
        field.radius() * speed_sq * amount * amount,
    );

    let mut bent = add(player.velocity, scale(acceleration, delta));
    // The pull can cancel the velocity outright; keep heading rather than stop.
    if length_sq(bent) < MIN_BENT_LENGTH_SQ {
        bent = player.velocity;
    }
    let new_velocity = with_length(bent, speed);

    player.position = add(prev_position, scale(new_velocity, delta));

    let turn = quat::from_unit_vectors(normalize(player.velocity), normalize(new_velocity));
    player.orientation = quat::mul(turn, player.orientation);

    player.velocity = new_velocity;

    Some(prev_position)
}

/// Turn the eyes by the angular velocity intent, in the eye's own frame.
///
/// Uses the small-angle quaternion `(w * delta, 1)` normalized, which is accurate for
/// per-frame increments.
pub fn integrate_eye(player: &mut PlayerState, delta: f64) {
    let w = player.eye_angular_velocity;
    let step = quat::normalize_quat(Quat::new(w.x * delta, w.y * delta, w.z * delta, 1.0));
    player.eye_orientation = quat::mul(player.eye_orientation, step);
}
