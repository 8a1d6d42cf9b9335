use std::{
    env, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::Result;

/// The environment variable holding the path of an optional JSON config file.
pub const CONFIG_ENV_VAR: &str = "REGRESSION_CONFIG";

const REPORT_EVERY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// The configuration of both regression runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub synthetic: SyntheticConfig,
    pub voxel: VoxelConfig,
}

impl RunConfig {
    /// Parses a `RunConfig` from a JSON string, missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a `RunConfig` from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reads the config file named by `REGRESSION_CONFIG`, or returns the defaults when the
    /// variable is not set.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("reading config from {}", Path::new(&path).display());
                Self::from_json_file(path)
            }
            None => {
                debug!("{CONFIG_ENV_VAR} is not set, using the default config");
                Ok(Self::default())
            }
        }
    }
}

/// Regression of random targets from random inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub batch_size: usize,
    pub d_in: usize,
    pub hidden: usize,
    pub d_out: usize,
    pub learning_rate: f32,
    pub iterations: usize,
    pub report_every: NonZeroUsize,
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            d_in: 1000,
            hidden: 100,
            d_out: 10,
            learning_rate: 1e-4,
            iterations: 500,
            report_every: REPORT_EVERY,
            seed: None,
        }
    }
}

/// Regression of one imaging channel from the others, over a voxel level CSV dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelConfig {
    pub path: PathBuf,
    pub features: Vec<String>,
    pub targets: Vec<String>,
    pub train_fraction: f64,
    pub hidden: usize,
    pub learning_rate: f32,
    pub iterations: usize,
    pub report_every: NonZeroUsize,
    pub seed: Option<u64>,
    pub predictions_path: Option<PathBuf>,
}

impl Default for VoxelConfig {
    fn default() -> Self {
        let features = ["PD", "T1", "T2", "FLAIR_10", "T1_10", "T2_10", "FLAIR_20"];

        Self {
            path: PathBuf::from("oasis.csv"),
            features: features.into_iter().map(String::from).collect(),
            targets: vec!["FLAIR".to_string()],
            train_fraction: 0.75,
            hidden: 10,
            learning_rate: 1e-4,
            iterations: 500,
            report_every: REPORT_EVERY,
            seed: None,
            predictions_path: None,
        }
    }
}
