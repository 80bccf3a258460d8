//! Configuration file support for coursepath.
//!
//! Loads settings from `~/.coursepath/config.toml` (or the file named by
//! `--config` / `COURSEPATH_CONFIG`) with the following precedence:
//! CLI arguments > Environment variables > Config file > built-in defaults.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.coursepath/config.toml
//! dataset = "data/dataset.json"
//!
//! [run]
//! threshold = 0.8
//! k = 2
//! policy = "greedy"
//! runs = 1
//! results_dir = "results"
//!
//! [catalog]
//! granularity = "leaf"
//! max_learner_skills = 15
//!
//! [catalog.unknown_defaults]
//! learner = 1
//! job = 3
//! course = 2
//!
//! [catalog.sample]
//! learners = 100
//! seed = 42
//! ```

use anyhow::{bail, Context, Result};
use coursepath_catalog::CatalogConfig;
use coursepath_engine::Policy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{DatasetArgs, RunArgs};

/// Matching threshold used when nothing else sets one.
pub const DEFAULT_THRESHOLD: f64 = 0.8;
/// Courses recommended per learner when nothing else sets `k`.
pub const DEFAULT_K: usize = 2;
/// Report directory used when nothing else sets one.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON dataset path.
    pub dataset: Option<PathBuf>,
    /// Run command configuration.
    pub run: RunSection,
    /// Catalog construction options.
    pub catalog: CatalogConfig,
}

/// Configuration for the run command.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub threshold: Option<f64>,
    pub k: Option<usize>,
    pub policy: Option<Policy>,
    pub runs: Option<usize>,
    pub results_dir: Option<PathBuf>,
}

/// Returns the path to the default config file (~/.coursepath/config.toml).
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".coursepath").join("config.toml"))
}

/// Loads the configuration file.
///
/// An explicit path must exist. The default location is optional: returns
/// `Ok(None)` when there is no such file. Returns `Err` if the file exists
/// but fails to parse.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<Config>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!(
        target: "coursepath::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Settings needed to load a dataset and query its market.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSettings {
    pub dataset: PathBuf,
    pub threshold: f64,
    pub catalog: CatalogConfig,
}

impl DatasetSettings {
    /// Merge command-line values over the config file.
    pub fn resolve(args: &DatasetArgs, config: &Config) -> Result<Self> {
        let Some(dataset) = args.dataset.clone().or_else(|| config.dataset.clone()) else {
            bail!("No dataset given: pass --dataset, set COURSEPATH_DATASET or add `dataset` to the config file");
        };

        let mut catalog = config.catalog.clone();
        if let Some(granularity) = args.granularity {
            catalog.granularity = granularity.into();
        }
        if let Some(cap) = args.max_learner_skills {
            catalog.max_learner_skills = Some(cap);
        }
        if let Some(seed) = args.seed {
            catalog.sample.seed = seed;
        }

        Ok(Self {
            dataset,
            threshold: args
                .threshold
                .or(config.run.threshold)
                .unwrap_or(DEFAULT_THRESHOLD),
            catalog,
        })
    }
}

/// Fully resolved settings of the run command.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub dataset: DatasetSettings,
    pub policy: Policy,
    pub k: usize,
    pub runs: usize,
    pub results_dir: PathBuf,
}

impl RunSettings {
    pub fn resolve(args: &RunArgs, config: &Config) -> Result<Self> {
        let run = &config.run;
        Ok(Self {
            dataset: DatasetSettings::resolve(&args.dataset, config)?,
            policy: args.policy.or(run.policy).unwrap_or_default(),
            k: args.k.or(run.k).unwrap_or(DEFAULT_K),
            runs: args.runs.or(run.runs).unwrap_or(1),
            results_dir: args
                .results_dir
                .clone()
                .or_else(|| run.results_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR)),
        })
    }
}
