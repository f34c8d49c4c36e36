//! Application configuration.
//!
//! Resolves where the timer record lives. The data directory comes from, in
//! order: the `--data-dir` flag, the `DUOTIMER_DATA_DIR` environment variable
//! (both handled by clap), then the platform data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::store::FileStorage;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "duotimer";

/// Name of the persisted timer record.
pub const DEFAULT_RECORD_NAME: &str = "timer-store";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DUOTIMER_DATA_DIR";

/// Countdown cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No data directory was given and the platform has none.
    #[error("could not determine a data directory; pass --data-dir or set {DATA_DIR_ENV}")]
    NoDataDir,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the timer record
    pub data_dir: PathBuf,
    /// Record name (file stem)
    pub record_name: String,
    /// Interval between countdown ticks
    pub tick_period: Duration,
}

impl AppConfig {
    /// Creates a configuration rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            record_name: DEFAULT_RECORD_NAME.to_string(),
            tick_period: TICK_PERIOD,
        }
    }

    /// Resolves the configuration from an optional explicit directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDataDir`] if no directory is given and the
    /// platform data directory cannot be determined.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoDataDir)?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self::new(data_dir))
    }

    /// Returns the storage backing the timer record.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir, &self.record_name)
    }
}
