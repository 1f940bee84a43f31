//! Types shared between the simulation host and its render/input clients.

pub mod config;
pub mod protocol;
pub mod quat;
pub mod vec3;
