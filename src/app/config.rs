//! Application configuration
//!
//! Settings taken from the command line, as opposed to the release
//! configuration file loaded by [`crate::config::ConfigLoader`].

use crate::config::DEFAULT_CONFIG_FILE;
use anyhow::Result;
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Repository the release runs in
    pub working_dir: PathBuf,
    /// Release configuration file, relative paths resolved against `working_dir`
    pub config_path: PathBuf,
}

impl AppConfig {
    /// Configuration for the current directory
    pub fn new(verbose: u8) -> Result<Self> {
        let working_dir = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?;

        Ok(Self {
            verbose,
            working_dir,
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        })
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    /// Config file location with relative paths anchored at the working directory
    pub fn resolved_config_path(&self) -> PathBuf {
        if self.config_path.is_absolute() {
            self.config_path.clone()
        } else {
            self.working_dir.join(&self.config_path)
        }
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("."),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}
