//! Directory layout for kata applications.

use std::io;
use std::path::PathBuf;

use crate::config::{DEFAULT_BASE_DIR, DEFAULT_CONFIG_FILE};

/// Progress statistics filename under the data directory.
pub const STATS_FILE: &str = "stats.json";

/// Current challenge filename under the data directory.
pub const CHALLENGE_FILE: &str = "current_challenge.json";

/// Provides access to the kata directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Application name.
    pub app_name: String,
    /// Root under which `.kata` lives; the user's home by default.
    pub home_dir: PathBuf,
}

impl Paths {
    /// Creates a new Paths instance rooted at the user's home directory.
    pub fn new(app_name: impl Into<String>) -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self::with_home(app_name, home_dir))
    }

    /// Creates a Paths instance rooted at `home_dir`.
    pub fn with_home(app_name: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Returns the base directory (~/.kata).
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// Returns the app-specific directory (~/.kata/<app>).
    pub fn app_dir(&self) -> PathBuf {
        self.base_dir().join(&self.app_name)
    }

    /// Returns the config file path (~/.kata/<app>/config.yaml).
    pub fn config_file(&self) -> PathBuf {
        self.app_dir().join(DEFAULT_CONFIG_FILE)
    }

    /// Returns the data directory (~/.kata/<app>/data).
    pub fn data_dir(&self) -> PathBuf {
        self.app_dir().join("data")
    }

    /// Returns the stats file (~/.kata/<app>/data/stats.json).
    pub fn stats_file(&self) -> PathBuf {
        self.data_path(STATS_FILE)
    }

    /// Returns the current challenge file.
    pub fn challenge_file(&self) -> PathBuf {
        self.data_path(CHALLENGE_FILE)
    }

    /// Creates the data directory if it doesn't exist.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.data_dir())
    }

    /// Returns a path within the data directory.
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }
}
