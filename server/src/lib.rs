//! Wormhole flight server library.
//!
//! The simulation runs on the server; clients send input events and render the frames
//! it broadcasts.

pub mod config;
pub mod controls;
pub mod error;
pub mod game_loop;
pub mod motion;
pub mod player;
pub mod protocol;
pub mod simulation;
pub mod teleporter;
pub mod wormhole;
pub mod ws;

pub use wormhole_shared::{quat, vec3};
