//! Run configuration: one YAML artifact read at startup, immutable after.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ewbg_baryo::TransportOpts;
use ewbg_core::{ErrorInfo, EwbgError};
use ewbg_pt::ScanOpts;

fn default_vw() -> f64 {
    0.1
}

fn default_seed() -> u64 {
    4242
}

fn default_jobs() -> usize {
    1
}

/// Full run configuration consumed by the CLI commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Temperature-scan settings, including the embedded minimizer options.
    #[serde(default)]
    pub scan: ScanOpts,
    /// Transport-engine settings.
    #[serde(default)]
    pub transport: TransportOpts,
    /// Bubble-wall velocity.
    #[serde(default = "default_vw")]
    pub vw: f64,
    /// Master seed; per-row seeds are substreams keyed by line number.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Worker threads for batch execution.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan: ScanOpts::default(),
            transport: TransportOpts::default(),
            vw: default_vw(),
            seed: default_seed(),
            jobs: default_jobs(),
        }
    }
}

impl RunConfig {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, EwbgError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            EwbgError::Config(
                ErrorInfo::new("config_read", "cannot read configuration file")
                    .with_context("path", path.display().to_string())
                    .with_context("cause", err.to_string()),
            )
        })?;
        serde_yaml::from_str(&raw).map_err(|err| {
            EwbgError::Config(
                ErrorInfo::new("config_parse", "cannot parse configuration file")
                    .with_context("path", path.display().to_string())
                    .with_context("cause", err.to_string()),
            )
        })
    }

    /// Loads the configuration when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, EwbgError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
