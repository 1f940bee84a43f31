use super::ControllerInput;
use crate::player::PlayerState;
use crate::quat;
use crate::vec3::{normalize, scale, vec3, Vec3};
use wormhole_shared::config::ControlsConfig;

/// Touch flight: fly toward the point under the fingers, faster with more than one.
#[derive(Debug, Clone)]
pub struct TouchController {
    enabled: bool,
    fov_degrees: f64,
    multi_touch_multiplier: f64,
    /// Eye-space velocity from the last touch event
    velocity: Vec3,
}

impl TouchController {
    pub fn new(settings: &ControlsConfig) -> Self {
        Self {
            enabled: false,
            fov_degrees: settings.fov_degrees,
            multi_touch_multiplier: settings.multi_touch_multiplier,
            velocity: Vec3::ZERO,
        }
    }

    /// Handle a touch start/move/end with the touches still on screen.
    pub fn set_touches(&mut self, touches: &[[f64; 2]], width: f64, height: f64) {
        if !self.enabled {
            return;
        }
        if touches.is_empty() || width <= 0.0 || height <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let n = touches.len() as f64;
        let avg_x = touches.iter().map(|t| t[0]).sum::<f64>() / n;
        let avg_y = touches.iter().map(|t| t[1]).sum::<f64>() / n;

        let vy = (0.5 * self.fov_degrees.to_radians()).tan();
        let vx = (width / height) * vy;

        let direction = normalize(vec3(
            vx * (avg_x * 2.0 / width - 1.0),
            -vy * (avg_y * 2.0 / height - 1.0),
            -1.0,
        ));
        let multiplier = if touches.len() > 1 {
            self.multi_touch_multiplier
        } else {
            1.0
        };
        self.velocity = scale(direction, multiplier);
    }
}

impl ControllerInput for TouchController {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, player: &mut PlayerState) {
        if !self.enabled {
            return;
        }

        let world_eye = player.world_eye_orientation();
        player.velocity = quat::rotate_vector(world_eye, self.velocity);
        // Looking around is left to the device orientation.
        player.eye_angular_velocity = Vec3::ZERO;
    }
}
