use crate::error::SimError;
use wormhole_shared::config::SimulationConfig;

/// Overrides `listen_addr`.
pub const LISTEN_ADDR_ENV: &str = "WORMHOLE_LISTEN_ADDR";
/// Path to a JSON `SimulationConfig`; the built-in scene is used when unset.
pub const SIMULATION_CONFIG_ENV: &str = "WORMHOLE_CONFIG";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub frame_rate_hz: u32,
    pub broadcast_rate_hz: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9001".to_string(),
            frame_rate_hz: 60,
            broadcast_rate_hz: 30,
        }
    }
}

impl ServerConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var(LISTEN_ADDR_ENV) {
            config.listen_addr = addr;
        }
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.listen_addr.is_empty() {
            return Err("listen_addr must not be empty".to_string());
        }
        if self.frame_rate_hz == 0 {
            return Err("frame_rate_hz must be > 0".to_string());
        }
        if self.broadcast_rate_hz == 0 {
            return Err("broadcast_rate_hz must be > 0".to_string());
        }
        if self.broadcast_rate_hz > self.frame_rate_hz {
            return Err(format!(
                "broadcast_rate_hz ({}) must not exceed frame_rate_hz ({})",
                self.broadcast_rate_hz, self.frame_rate_hz
            ));
        }
        Ok(())
    }

    /// Frames between two broadcasts.
    pub fn broadcast_every_n(&self) -> u64 {
        (self.frame_rate_hz / self.broadcast_rate_hz).max(1) as u64
    }
}

/// Read and validate a simulation config file.
pub fn load_simulation_config(path: &str) -> Result<SimulationConfig, SimError> {
    let text = std::fs::read_to_string(path).map_err(|source| SimError::ReadConfig {
        path: path.to_string(),
        source,
    })?;
    let config: SimulationConfig =
        serde_json::from_str(&text).map_err(|source| SimError::ParseConfig {
            path: path.to_string(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// The simulation config named by `WORMHOLE_CONFIG`, or the built-in scene.
pub fn simulation_config_from_env() -> Result<SimulationConfig, SimError> {
    match std::env::var(SIMULATION_CONFIG_ENV) {
        Ok(path) => load_simulation_config(&path),
        Err(_) => Ok(SimulationConfig::default()),
    }
}
