use crate::protocol::FrameMsg;
use crate::quat::{self, Quat};
use crate::vec3::Vec3;
use wormhole_shared::config::Galaxy;
use wormhole_shared::protocol::round4;

/// The traveler: where it is, how it moves and where its eyes look.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub position: Vec3,
    /// Body attitude, banked along the travel direction
    pub orientation: Quat,
    /// World-space velocity; its length is the current speed
    pub velocity: Vec3,
    /// Look direction relative to the body
    pub eye_orientation: Quat,
    /// Radians per second about the eye's local axes
    pub eye_angular_velocity: Vec3,
    pub galaxy: Galaxy,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            eye_orientation: Quat::IDENTITY,
            eye_angular_velocity: Vec3::ZERO,
            galaxy: Galaxy::Home,
        }
    }
}

impl PlayerState {
    /// Composed orientation of the eyes in world space.
    pub fn world_eye_orientation(&self) -> Quat {
        quat::mul(self.orientation, self.eye_orientation)
    }

    /// Turn the body so that the eyes, with their current local rotation, face `point`.
    pub fn look_at(&mut self, point: Vec3) {
        let facing = quat::look_rotation(self.position, point, Vec3::UP);
        self.orientation = quat::mul(facing, quat::inverse(self.eye_orientation));
    }

    /// Snapshot handed to the renderer.
    pub fn frame(&self) -> FrameMsg {
        FrameMsg {
            position: self.position.to_array().map(round4),
            orientation: self.world_eye_orientation().to_array().map(round4),
            galaxy: self.galaxy,
        }
    }
}
