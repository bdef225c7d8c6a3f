//! Process-wide tuning knobs for the materializer engine.
//!
//! The engine has no mandatory configuration; [`Config::default`] is used
//! until a caller installs a different one with [`install`]. Installation
//! happens at most once per process so that nodes built before and after
//! the call agree on their cache layout.
//!
//! ```
//! use ironseq::config::{self, Config};
//!
//! let cfg = Config::from_json_str(r#"{ "map_array_threshold": 128 }"#)?;
//! assert_eq!(cfg.map_array_threshold, 128);
//! assert_eq!(cfg.buffer_capacity, Config::default().buffer_capacity);
//! # let _ = config::current();
//! # Ok::<(), ironseq::SequenceError>(())
//! ```

use crate::error::{require_positive, Result, SequenceError};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Default upper bound on the upstream size for which a map node caches
/// its slots in a dense array rather than a hash map.
pub const DEFAULT_MAP_ARRAY_THRESHOLD: usize = 4096;

/// Default initial capacity of scratch buffers used by full-buffering operators.
pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

static INSTALLED: OnceLock<Config> = OnceLock::new();

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest known upstream size for which map slot caches are array-backed.
    pub map_array_threshold: usize,
    /// Initial capacity of scratch buffers (reverse, fold-right, tail scans).
    pub buffer_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_array_threshold: DEFAULT_MAP_ARRAY_THRESHOLD,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)
            .map_err(|e| SequenceError::InvalidArgument(format!("malformed config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        require_positive("map_array_threshold", self.map_array_threshold)?;
        Ok(())
    }
}

/// Install the process-wide configuration.
///
/// Fails if a configuration was already installed or if `cfg` is invalid.
pub fn install(cfg: Config) -> Result<()> {
    cfg.validate()?;
    INSTALLED
        .set(cfg)
        .map_err(|_| SequenceError::InvalidArgument("configuration already installed".into()))
}

/// The installed configuration, or the default one.
pub fn current() -> &'static Config {
    static DEFAULT: OnceLock<Config> = OnceLock::new();
    INSTALLED
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(Config::default))
}
