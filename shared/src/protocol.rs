use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{Galaxy, SimulationConfig};

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// === Server -> Client ===

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome(WelcomeMsg),
    #[serde(rename = "frame")]
    Frame(FrameMsg),
    #[serde(rename = "crossing")]
    Crossing(CrossingMsg),
    #[serde(rename = "teleported")]
    Teleported(TeleportedMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub server_version: String,
    pub config: SimulationConfig,
    pub frame: FrameMsg,
}

/// Everything the renderer reads once per frame.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct FrameMsg {
    pub position: [f64; 3],
    /// World orientation of the eyes (body * eye), as x, y, z, w
    pub orientation: [f64; 4],
    #[ts(type = "number")]
    pub galaxy: Galaxy,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct CrossingMsg {
    pub position: [f64; 3],
    #[ts(type = "number")]
    pub galaxy: Galaxy,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TeleportedMsg {
    pub target_index: u32,
    #[ts(type = "number")]
    pub galaxy: Galaxy,
}

// === Client -> Server ===

/// Physical key, named like `KeyboardEvent.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
pub enum KeyCode {
    KeyW,
    KeyS,
    KeyA,
    KeyD,
    KeyR,
    KeyF,
    KeyQ,
    KeyE,
    KeyT,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ShiftLeft,
    ShiftRight,
    Space,
    Escape,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(tag = "type")]
pub enum ClientMsg {
    #[serde(rename = "key_down")]
    KeyDown {
        code: KeyCode,
        #[serde(default)]
        alt: bool,
    },
    #[serde(rename = "key_up")]
    KeyUp { code: KeyCode },
    /// Pointer position inside a viewport of `width` x `height`
    #[serde(rename = "pointer_move")]
    PointerMove {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Button 0 is primary, 2 is secondary
    #[serde(rename = "pointer_button")]
    PointerButton { button: u8, pressed: bool },
    /// Current touch points; an empty list means all fingers lifted
    #[serde(rename = "touch")]
    Touch {
        touches: Vec<[f64; 2]>,
        width: f64,
        height: f64,
    },
    /// Device orientation in degrees, as reported by the sensor
    #[serde(rename = "device_orientation")]
    DeviceOrientation {
        alpha: Option<f64>,
        beta: Option<f64>,
        gamma: Option<f64>,
        #[serde(default, rename = "screenOrientation")]
        screen_orientation: f64,
    },
    #[serde(rename = "teleport_next")]
    TeleportNext,
}

// === Conversion helpers ===

/// Round to 4 decimal places (sub-millimetre at scene scale, keeps JSON small)
#[inline]
pub fn round4(v: f64) -> f64 {
    (v * 10000.0).round() / 10000.0
}
