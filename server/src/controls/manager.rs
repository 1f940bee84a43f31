use super::{ControllerInput, DeviceReading, KeyboardController, MobileController};
use crate::player::PlayerState;
use crate::quat;
use crate::vec3::Vec3;
use wormhole_shared::config::ControlsConfig;

/// Which family of controls is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlDevice {
    Desktop,
    Mobile,
}

/// Owns the desktop and mobile controllers and switches between them based on which
/// device is actually producing input.
///
/// Extra controllers can be registered; they run after the built-in ones, in the
/// order they were registered.
#[derive(Debug)]
pub struct ControlsManager {
    device: ControlDevice,
    pub keyboard: KeyboardController,
    pub mobile: MobileController,
    registered: Vec<Box<dyn ControllerInput + Send>>,
    /// Re-base the body on the device's eye orientation after the next mobile update
    pending_view_fix: bool,
}

impl ControlsManager {
    pub fn new(settings: &ControlsConfig) -> Self {
        let mut manager = Self {
            device: ControlDevice::Desktop,
            keyboard: KeyboardController::new(settings),
            mobile: MobileController::new(settings),
            registered: Vec::new(),
            pending_view_fix: false,
        };
        manager.set_desktop();
        manager
    }

    pub fn device(&self) -> ControlDevice {
        self.device
    }

    pub fn set_desktop(&mut self) {
        self.keyboard.enable();
        self.mobile.disable();
        self.pending_view_fix = false;
        self.device = ControlDevice::Desktop;
        tracing::debug!("Switched to desktop controls");
    }

    pub fn set_mobile(&mut self, player: &mut PlayerState) {
        self.keyboard.disable();
        self.mobile.enable();
        player.eye_angular_velocity = Vec3::ZERO;
        // The device is probably not pointing where the eyes were looking.
        self.pending_view_fix = true;
        self.device = ControlDevice::Mobile;
        tracing::debug!("Switched to mobile controls");
    }

    /// A physical key was pressed somewhere: the user is on a desktop.
    pub fn observe_key_press(&mut self) {
        if self.device == ControlDevice::Mobile {
            self.set_desktop();
        }
    }

    /// A device orientation sample arrived. A real sensor means the user is on mobile.
    pub fn observe_device_orientation(&mut self, reading: DeviceReading, player: &mut PlayerState) {
        self.mobile.orientation.record(reading);
        if self.device == ControlDevice::Desktop && reading.has_sensor() {
            self.set_mobile(player);
        }
    }

    /// Append a controller. It runs after everything registered before it.
    pub fn register(&mut self, controller: Box<dyn ControllerInput + Send>) {
        self.registered.push(controller);
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Let every controller write its intent, in registration order.
    pub fn update(&mut self, player: &mut PlayerState) {
        self.keyboard.update(player);
        self.mobile.update(player);
        for controller in &mut self.registered {
            controller.update(player);
        }

        if self.pending_view_fix && self.device == ControlDevice::Mobile {
            player.orientation = quat::mul(player.orientation, quat::inverse(player.eye_orientation));
            self.pending_view_fix = false;
        }
    }
}
