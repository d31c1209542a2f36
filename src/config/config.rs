// src/config/config.rs
use crate::miner::scheduler::{DEFAULT_MAX_NONCE, DEFAULT_POLL_INTERVAL};
use crate::stats::sampler::DEFAULT_SAMPLE_INTERVAL;
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the simulator
///
/// Every section and field has a default, so an empty file is a valid
/// configuration. Command-line flags override whatever is loaded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Mining simulation settings
    #[serde(default)]
    pub mining: MiningConfig,

    /// Throughput benchmark settings
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Resource sampler settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// `[mining]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Number of worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub worker_threads: usize,

    /// Exclusive upper bound of the nonce space
    #[serde(default = "default_max_nonce")]
    pub max_nonce: u64,

    /// Coordinator wait between liveness checks, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Block payload used when none is given on the command line
    #[serde(default = "default_payload")]
    pub default_payload: String,

    /// Difficulty used when none is given on the command line
    #[serde(default = "default_difficulty")]
    pub default_difficulty: u32,
}

/// `[benchmark]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Seconds per measurement
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Multi-core worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub worker_threads: usize,
}

/// `[monitor]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Milliseconds between utilization snapshots
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

fn default_max_nonce() -> u64 {
    DEFAULT_MAX_NONCE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_payload() -> String {
    "sim_block_1".into()
}

fn default_difficulty() -> u32 {
    4
}

fn default_duration_secs() -> u64 {
    5
}

fn default_sample_interval_ms() -> u64 {
    DEFAULT_SAMPLE_INTERVAL.as_millis() as u64
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            worker_threads: 0,
            max_nonce: default_max_nonce(),
            poll_interval_ms: default_poll_interval_ms(),
            default_payload: default_payload(),
            default_difficulty: default_difficulty(),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            duration_secs: default_duration_secs(),
            worker_threads: 0,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

impl MiningConfig {
    /// Worker count with 0 resolved to the number of CPU cores
    pub fn workers(&self) -> usize {
        resolve_workers(self.worker_threads)
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl BenchmarkConfig {
    /// Worker count with 0 resolved to the number of CPU cores
    pub fn workers(&self) -> usize {
        resolve_workers(self.worker_threads)
    }
}

impl MonitorConfig {
    /// Sample interval as a `Duration`
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }
}

fn resolve_workers(configured: usize) -> usize {
    if configured == 0 {
        num_cpus::get()
    } else {
        configured
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MinerError)` - If file couldn't be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(toml::from_str(&config_str)?)
    }

    /// Loads `path` if it exists, otherwise returns the defaults
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Generates a commented configuration template string
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Mining Simulator Configuration\n\n");
        template.push_str("[mining]\n");
        template.push_str("# Number of worker threads (0 = auto-detect)\n");
        template.push_str("worker_threads = 0\n");
        template.push_str("# Size of the simulated nonce space\n");
        template.push_str(&format!("max_nonce = {}\n", DEFAULT_MAX_NONCE));
        template.push_str("# Coordinator liveness check interval (ms)\n");
        template.push_str(&format!(
            "poll_interval_ms = {}\n",
            default_poll_interval_ms()
        ));
        template.push_str(&format!("default_payload = \"{}\"\n", default_payload()));
        template.push_str("# Leading hex zeros required (0-64)\n");
        template.push_str(&format!(
            "default_difficulty = {}\n\n",
            default_difficulty()
        ));

        template.push_str("[benchmark]\n");
        template.push_str("# Seconds per single/multi-core measurement\n");
        template.push_str(&format!("duration_secs = {}\n", default_duration_secs()));
        template.push_str("# Multi-core worker threads (0 = auto-detect)\n");
        template.push_str("worker_threads = 0\n\n");

        template.push_str("[monitor]\n");
        template.push_str("# Utilization sample interval (ms)\n");
        template.push_str(&format!(
            "sample_interval_ms = {}\n",
            default_sample_interval_ms()
        ));

        template
    }
}
