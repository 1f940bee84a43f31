//! Input sources that turn device events into motion intent.
//!
//! Every controller buffers the events it receives and writes its intent into the
//! player once per frame in `update`. Controllers run in registration order, so when
//! several are enabled the last one wins for the fields it writes.

mod keyboard;
mod manager;
mod orientation;
mod touch;

pub use keyboard::KeyboardController;
pub use manager::{ControlDevice, ControlsManager};
pub use orientation::{DeviceReading, OrientationController};
pub use touch::TouchController;

use crate::player::PlayerState;
use wormhole_shared::config::ControlsConfig;

/// A source of velocity and look intent.
pub trait ControllerInput: std::fmt::Debug {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
    /// Write this frame's intent into the player. Does nothing while disabled.
    fn update(&mut self, player: &mut PlayerState);
}

/// Phone/tablet controls: device tilt steers the eyes, touches fly.
#[derive(Debug, Clone)]
pub struct MobileController {
    enabled: bool,
    pub orientation: OrientationController,
    pub touch: TouchController,
}

impl MobileController {
    pub fn new(settings: &ControlsConfig) -> Self {
        Self {
            enabled: false,
            orientation: OrientationController::new(),
            touch: TouchController::new(settings),
        }
    }
}

impl ControllerInput for MobileController {
    fn enable(&mut self) {
        self.orientation.enable();
        self.touch.enable();
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.orientation.disable();
        self.touch.disable();
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn update(&mut self, player: &mut PlayerState) {
        if !self.enabled {
            return;
        }
        self.orientation.update(player);
        self.touch.update(player);
    }
}
