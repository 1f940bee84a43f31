use super::ControllerInput;
use crate::player::PlayerState;
use crate::quat::{self, Quat};
use crate::vec3::vec3;
use std::f64::consts::FRAC_1_SQRT_2;

/// The camera looks out of the back of the device, not out of its top: -90 degrees about X.
const CAMERA_FROM_DEVICE: Quat = Quat {
    x: -FRAC_1_SQRT_2,
    y: 0.0,
    z: 0.0,
    w: FRAC_1_SQRT_2,
};

/// One sensor sample, angles in degrees. A missing alpha means the device has no sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceReading {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    /// Screen rotation relative to the device's natural orientation
    pub screen_orientation: f64,
}

impl DeviceReading {
    pub fn has_sensor(&self) -> bool {
        self.alpha.is_some()
    }
}

/// Points the eyes where the device points.
#[derive(Debug, Clone, Default)]
pub struct OrientationController {
    enabled: bool,
    reading: Option<DeviceReading>,
}

impl OrientationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest sample. Samples are kept even while disabled so the first
    /// enabled frame already has one.
    pub fn record(&mut self, reading: DeviceReading) {
        self.reading = Some(reading);
    }

    /// Eye orientation for a sensor sample.
    pub fn eye_orientation_for(reading: &DeviceReading) -> Quat {
        let alpha = reading.alpha.unwrap_or(0.0).to_radians();
        let beta = reading.beta.unwrap_or(0.0).to_radians();
        let gamma = reading.gamma.unwrap_or(0.0).to_radians();
        let screen = reading.screen_orientation.to_radians();

        // The device reports ZXY; in camera space that is YXZ.
        let device = quat::from_euler_yxz(beta, alpha, -gamma);
        let screen_fix = quat::from_axis_angle(vec3(0.0, 0.0, 1.0), -screen);
        quat::mul(quat::mul(device, CAMERA_FROM_DEVICE), screen_fix)
    }
}

impl ControllerInput for OrientationController {
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
        let Some(reading) = self.reading else {
            return;
        };
        if !reading.has_sensor() {
            return;
        }
        player.eye_orientation = Self::eye_orientation_for(&reading);
    }
}
