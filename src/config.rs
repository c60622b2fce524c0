//! Runtime Configuration
//!
//! Read from environment variables:
//! - `AGRI_DATA` - JSON dataset file or directory holding crops.csv/regions.csv
//!   (default: builtin dataset)
//! - `AGRI_SEED` - simulator seed (default: 42)
//! - `AGRI_SOIL_QUALITY`, `AGRI_FERTILIZER_BOOST`, `AGRI_IRRIGATION_EFFICIENCY` -
//!   default yield inputs (70, 0, 0.9)
//!
//! Unparseable values fall back to the default with a warning.

use std::path::PathBuf;
use std::str::FromStr;

use crate::data::ReferenceDataStore;
use crate::model::YieldInputs;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub data_path: Option<PathBuf>,
    pub seed: u64,
    pub yield_inputs: YieldInputs,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            data_path: None,
            seed: DEFAULT_SEED,
            yield_inputs: YieldInputs::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EstimatorConfig::default();
        let inputs = defaults.yield_inputs;

        EstimatorConfig {
            data_path: lookup("AGRI_DATA")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            seed: parse_or(&lookup, "AGRI_SEED", defaults.seed),
            yield_inputs: YieldInputs {
                soil_quality: parse_or(&lookup, "AGRI_SOIL_QUALITY", inputs.soil_quality),
                fertilizer_boost: parse_or(&lookup, "AGRI_FERTILIZER_BOOST", inputs.fertilizer_boost),
                irrigation_efficiency: parse_or(
                    &lookup,
                    "AGRI_IRRIGATION_EFFICIENCY",
                    inputs.irrigation_efficiency,
                ),
            },
        }
    }

    /// Load the configured dataset, or the builtin one when none is set
    pub fn load_store(&self) -> anyhow::Result<ReferenceDataStore> {
        match &self.data_path {
            None => {
                tracing::info!("Using builtin reference dataset");
                Ok(ReferenceDataStore::builtin())
            }
            Some(path) if path.is_dir() => ReferenceDataStore::from_csv_dir(path),
            Some(path) => ReferenceDataStore::from_json_file(path),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {}={:?}, using default {:?}", key, raw, default);
            default
        }),
    }
}
