use wormhole_shared::config::ConfigError;

/// Errors surfaced by the simulation and its host.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid simulation config: {0}")]
    Config(#[from] ConfigError),
    #[error("no teleport targets configured")]
    NoTeleportTargets,
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ParseConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
