//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use level_runtime::RuntimeConfig;

/// Configuration required to generate and walk one level.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Directory holding `archetypes.ron` and `generation.toml`.
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub session_id: Option<String>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LEVEL_DATA_DIR` - Content directory (default: built-in catalogue)
    /// - `LEVEL_SEED` - Generation seed (default: random)
    /// - `LEVEL_SESSION_ID` - Session identifier for log files (default: auto-generated)
    ///
    /// Runtime tuning is read by [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            runtime: RuntimeConfig::from_env(),
            data_dir: env::var("LEVEL_DATA_DIR").ok().map(PathBuf::from),
            seed: read_env::<u64>("LEVEL_SEED"),
            session_id: env::var("LEVEL_SESSION_ID").ok(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
