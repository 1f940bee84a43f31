use super::ControllerInput;
use crate::player::PlayerState;
use crate::quat;
use crate::vec3::{scale, vec3, Vec3};
use wormhole_shared::config::ControlsConfig;
use wormhole_shared::protocol::KeyCode;

const PRIMARY_BUTTON: u8 = 0;
const SECONDARY_BUTTON: u8 = 2;

/// Held inputs, each 0 or 1 for keys and a signed fraction for pointer steering.
#[derive(Debug, Clone, Copy, Default)]
struct MoveState {
    up: f64,
    down: f64,
    left: f64,
    right: f64,
    forward: f64,
    back: f64,
    pitch_up: f64,
    pitch_down: f64,
    yaw_left: f64,
    yaw_right: f64,
    roll_left: f64,
    roll_right: f64,
}

/// Desktop fly controls: WASD/RF to move, arrows/QE to turn, pointer to steer.
#[derive(Debug, Clone)]
pub struct KeyboardController {
    enabled: bool,
    movement_speed: f64,
    boost_multiplier: f64,
    roll_speed: f64,
    speed_multiplier: f64,
    drag_to_look: bool,
    auto_forward: bool,
    /// Buttons currently held while in drag-to-look mode
    drag_count: i32,
    state: MoveState,
    move_vector: Vec3,
    rotation_vector: Vec3,
}

impl KeyboardController {
    pub fn new(settings: &ControlsConfig) -> Self {
        Self {
            enabled: false,
            movement_speed: settings.movement_speed,
            boost_multiplier: settings.boost_multiplier,
            roll_speed: settings.roll_speed,
            speed_multiplier: 1.0,
            drag_to_look: false,
            auto_forward: settings.auto_forward,
            drag_count: 0,
            state: MoveState::default(),
            move_vector: Vec3::ZERO,
            rotation_vector: Vec3::ZERO,
        }
    }

    pub fn drag_to_look(&self) -> bool {
        self.drag_to_look
    }

    pub fn key_down(&mut self, code: KeyCode, alt: bool) {
        if !self.enabled || alt {
            return;
        }

        let s = &mut self.state;
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.speed_multiplier = self.boost_multiplier,
            KeyCode::KeyW => s.forward = 1.0,
            KeyCode::KeyS => s.back = 1.0,
            KeyCode::KeyA => s.left = 1.0,
            KeyCode::KeyD => s.right = 1.0,
            KeyCode::KeyR => s.up = 1.0,
            KeyCode::KeyF => s.down = 1.0,
            KeyCode::ArrowUp => s.pitch_up = 1.0,
            KeyCode::ArrowDown => s.pitch_down = 1.0,
            KeyCode::ArrowLeft => s.yaw_left = 1.0,
            KeyCode::ArrowRight => s.yaw_right = 1.0,
            KeyCode::KeyQ => s.roll_left = 1.0,
            KeyCode::KeyE => s.roll_right = 1.0,
            KeyCode::Space => {
                self.drag_to_look = !self.drag_to_look;
                self.reset_drag_to_look();
            }
            KeyCode::Escape => {
                self.drag_to_look = true;
                self.reset_drag_to_look();
            }
            KeyCode::KeyT | KeyCode::Other => {}
        }

        self.update_movement_vector();
        self.update_rotation_vector();
    }

    pub fn key_up(&mut self, code: KeyCode) {
        if !self.enabled {
            return;
        }

        let s = &mut self.state;
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.speed_multiplier = 1.0,
            KeyCode::KeyW => s.forward = 0.0,
            KeyCode::KeyS => s.back = 0.0,
            KeyCode::KeyA => s.left = 0.0,
            KeyCode::KeyD => s.right = 0.0,
            KeyCode::KeyR => s.up = 0.0,
            KeyCode::KeyF => s.down = 0.0,
            KeyCode::ArrowUp => s.pitch_up = 0.0,
            KeyCode::ArrowDown => s.pitch_down = 0.0,
            KeyCode::ArrowLeft => s.yaw_left = 0.0,
            KeyCode::ArrowRight => s.yaw_right = 0.0,
            KeyCode::KeyQ => s.roll_left = 0.0,
            KeyCode::KeyE => s.roll_right = 0.0,
            _ => {}
        }

        self.update_movement_vector();
        self.update_rotation_vector();
    }

    pub fn pointer_button(&mut self, button: u8, pressed: bool) {
        if !self.enabled {
            return;
        }

        if self.drag_to_look {
            if pressed {
                self.drag_count += 1;
            } else {
                self.drag_count = (self.drag_count - 1).max(0);
                self.state.yaw_left = 0.0;
                self.state.pitch_down = 0.0;
            }
        } else {
            let value = if pressed { 1.0 } else { 0.0 };
            match button {
                PRIMARY_BUTTON => self.state.forward = value,
                SECONDARY_BUTTON => self.state.back = value,
                _ => {}
            }
            self.update_movement_vector();
        }

        if !pressed {
            self.update_rotation_vector();
        }
    }

    /// Steer by pointer offset from the viewport center.
    pub fn pointer_move(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if !self.enabled || width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.drag_to_look && self.drag_count == 0 {
            return;
        }

        let half_width = width / 2.0;
        let half_height = height / 2.0;
        self.state.yaw_left = -(x - half_width) / half_width;
        self.state.pitch_down = (y - half_height) / half_height;

        self.update_rotation_vector();
    }

    fn reset_drag_to_look(&mut self) {
        if self.drag_to_look {
            self.state.yaw_left = 0.0;
            self.state.pitch_down = 0.0;
        }
    }

    fn update_movement_vector(&mut self) {
        let s = &self.state;
        let forward = if s.forward > 0.0 || (self.auto_forward && s.back == 0.0) {
            1.0
        } else {
            0.0
        };

        self.move_vector = vec3(s.right - s.left, s.up - s.down, s.back - forward);
    }

    fn update_rotation_vector(&mut self) {
        let s = &self.state;
        self.rotation_vector = vec3(
            s.pitch_up - s.pitch_down,
            s.yaw_left - s.yaw_right,
            s.roll_left - s.roll_right,
        );
    }
}

impl ControllerInput for KeyboardController {
    fn enable(&mut self) {
        self.update_movement_vector();
        self.update_rotation_vector();
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
        let speed = self.movement_speed * self.speed_multiplier;
        player.velocity = quat::rotate_vector(world_eye, scale(self.move_vector, speed));
        player.eye_angular_velocity = scale(self.rotation_vector, self.roll_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9
                && (actual.y - expected.y).abs() < 1e-9
                && (actual.z - expected.z).abs() < 1e-9,
            "Expected {:?} to be close to {:?}",
            actual,
            expected
        );
    }

    fn enabled_keyboard() -> KeyboardController {
        let mut keyboard = KeyboardController::new(&ControlsConfig::default());
        keyboard.enable();
        keyboard
    }

    #[test]
    fn auto_forward_flies_without_keys_until_back_is_held() {
        let settings = ControlsConfig {
            auto_forward: true,
            ..Default::default()
        };
        let mut keyboard = KeyboardController::new(&settings);
        keyboard.enable();
        let mut player = PlayerState::default();

        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, -1.0));

        keyboard.key_down(KeyCode::KeyS, false);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, 1.0));

        keyboard.key_up(KeyCode::KeyS);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn w_flies_forward_along_minus_z() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::KeyW, false);

        let mut player = PlayerState::default();
        keyboard.update(&mut player);

        assert_vec3_close(player.velocity, vec3(0.0, 0.0, -1.0));
        assert_vec3_close(player.eye_angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn forward_follows_world_eye_direction() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::KeyW, false);

        let mut player = PlayerState::default();
        player.orientation = quat::from_axis_angle(vec3(0.0, 1.0, 0.0), FRAC_PI_2);
        keyboard.update(&mut player);

        // Body yawed a quarter turn left: forward is now -x.
        assert_vec3_close(player.velocity, vec3(-1.0, 0.0, 0.0));
    }

    #[test]
    fn shift_boosts_speed_until_released() {
        let mut keyboard = enabled_keyboard();
        let mut player = PlayerState::default();

        keyboard.key_down(KeyCode::KeyS, false);
        keyboard.key_down(KeyCode::ShiftLeft, false);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, 10.0));

        keyboard.key_up(KeyCode::ShiftLeft);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn releasing_keys_stops_motion() {
        let mut keyboard = enabled_keyboard();
        let mut player = PlayerState::default();

        keyboard.key_down(KeyCode::KeyD, false);
        keyboard.key_down(KeyCode::KeyR, false);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(1.0, 1.0, 0.0));

        keyboard.key_up(KeyCode::KeyD);
        keyboard.key_up(KeyCode::KeyR);
        keyboard.update(&mut player);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn turn_keys_set_angular_velocity() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::ArrowUp, false);
        keyboard.key_down(KeyCode::ArrowLeft, false);
        keyboard.key_down(KeyCode::KeyE, false);

        let mut player = PlayerState::default();
        keyboard.update(&mut player);

        let r = PI / 3.0;
        assert_vec3_close(player.eye_angular_velocity, vec3(r, r, -r));
    }

    #[test]
    fn alt_modified_keys_are_ignored() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::KeyW, true);
        let mut player = PlayerState::default();
        keyboard.update(&mut player);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn events_while_disabled_are_dropped() {
        let mut keyboard = KeyboardController::new(&ControlsConfig::default());
        keyboard.key_down(KeyCode::KeyW, false);
        keyboard.enable();

        let mut player = PlayerState::default();
        keyboard.update(&mut player);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn disabled_update_leaves_player_alone() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::KeyW, false);
        keyboard.disable();

        let mut player = PlayerState::default();
        player.velocity = vec3(5.0, 0.0, 0.0);
        keyboard.update(&mut player);
        assert_eq!(player.velocity, vec3(5.0, 0.0, 0.0));
    }

    #[test]
    fn pointer_steers_from_viewport_center() {
        let mut keyboard = enabled_keyboard();
        keyboard.pointer_move(0.0, 300.0, 800.0, 600.0);

        let mut player = PlayerState::default();
        keyboard.update(&mut player);

        // Far left edge, vertical middle: full yaw left, no pitch.
        assert_vec3_close(player.eye_angular_velocity, vec3(0.0, PI / 3.0, 0.0));
    }

    #[test]
    fn pointer_buttons_fly_forward_and_back() {
        let mut keyboard = enabled_keyboard();
        let mut player = PlayerState::default();

        keyboard.pointer_button(0, true);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, -1.0));

        keyboard.pointer_button(0, false);
        keyboard.pointer_button(2, true);
        keyboard.update(&mut player);
        assert_vec3_close(player.velocity, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn drag_to_look_only_steers_while_dragging() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::Space, false);
        assert!(keyboard.drag_to_look());

        let mut player = PlayerState::default();
        keyboard.pointer_move(800.0, 600.0, 800.0, 600.0);
        keyboard.update(&mut player);
        assert_eq!(player.eye_angular_velocity, Vec3::ZERO);

        keyboard.pointer_button(0, true);
        keyboard.pointer_move(800.0, 600.0, 800.0, 600.0);
        keyboard.update(&mut player);
        let r = PI / 3.0;
        assert_vec3_close(player.eye_angular_velocity, vec3(-r, -r, 0.0));
        // Dragging does not fly.
        assert_eq!(player.velocity, Vec3::ZERO);

        keyboard.pointer_button(0, false);
        keyboard.update(&mut player);
        assert_vec3_close(player.eye_angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn escape_forces_drag_to_look() {
        let mut keyboard = enabled_keyboard();
        keyboard.key_down(KeyCode::Escape, false);
        assert!(keyboard.drag_to_look());
        keyboard.key_down(KeyCode::Escape, false);
        assert!(keyboard.drag_to_look());
        keyboard.key_down(KeyCode::Space, false);
        assert!(!keyboard.drag_to_look());
    }
}
