use crate::player::PlayerState;
use crate::quat;
use crate::vec3::{
    add, distance_sq, length_sq, normalize, ray_sphere_intersection, reflect, scale, sub, Vec3,
};
use wormhole_shared::config::{ConfigError, Galaxy, WormholeConfig};

/// How far past the mirrored exit point the traveler is placed, as a factor of the radius.
const EXIT_PUSH: f64 = 1.0001;

/// The wormhole sphere and its pseudo-gravity. Validated once, then read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WormholeField {
    center: Vec3,
    radius: f64,
    gravity_ratio: f64,
}

/// A detected pass through the wormhole mouth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Where the travelled segment met the sphere
    pub entry_point: Vec3,
    /// Where the traveler was placed on the other side
    pub exit_position: Vec3,
    /// Galaxy after the crossing
    pub galaxy: Galaxy,
}

impl WormholeField {
    pub fn new(config: &WormholeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            center: config.center,
            radius: config.radius,
            gravity_ratio: config.gravity_ratio,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn gravity_ratio(&self) -> f64 {
        self.gravity_ratio
    }

    /// Radius of the inner boundary where the curvature term diverges.
    pub fn curvature_boundary(&self) -> f64 {
        self.radius * (1.0 - self.gravity_ratio)
    }

    /// Check whether the segment `prev_position -> player.position` went through the
    /// sphere and, if so, carry the player to the other side.
    ///
    /// The segment is tested once against the single sphere, so a step crosses at most once.
    pub fn detect_crossing(
        &self,
        player: &mut PlayerState,
        prev_position: Vec3,
    ) -> Option<Crossing> {
        let travel = sub(player.position, prev_position);
        let travelled_sq = length_sq(travel);
        if travelled_sq == 0.0 {
            return None;
        }
        let direction = normalize(travel);

        let hit = ray_sphere_intersection(prev_position, direction, self.center, self.radius)?;
        if distance_sq(hit, prev_position) > travelled_sq {
            return None;
        }

        // Mirror the heading through the mouth: half a turn about the axis to the hit point.
        let axis = normalize(sub(hit, self.center));
        let half_turn = quat::from_axis_angle(axis, std::f64::consts::PI);
        player.orientation = quat::mul(half_turn, player.orientation);
        player.velocity = scale(reflect(player.velocity, axis), -1.0);
        player.position = add(self.center, scale(sub(self.center, hit), EXIT_PUSH));
        player.galaxy = player.galaxy.flipped();

        Some(Crossing {
            entry_point: hit,
            exit_position: player.position,
            galaxy: player.galaxy,
        })
    }
}
