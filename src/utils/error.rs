// src/utils/error.rs
use crate::miner::scheduler;
use std::io;
use thiserror::Error;

/// Main error type for the mining simulator
///
/// Search exhaustion and unavailable hardware readings are *not* errors;
/// they surface as ordinary values in results and reports. Everything that
/// aborts a mining or benchmark run lands here.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Standard I/O operation errors (config files, reports)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors when rendering reports
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input, rejected before any worker starts
    #[error("Invalid input: {0}")]
    InputError(String),

    /// A worker thread or thread pool could not be launched
    #[error("Worker launch failed: {0}")]
    WorkerSpawn(String),

    /// Thread communication channel errors
    #[error("Thread communication error: {0}")]
    ChannelError(String),

    /// Background thread execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

/// Converts crossbeam channel send errors for worker reports into MinerError
///
/// Raised when a worker finishes after the coordinator has already dropped
/// its receiver.
impl From<crossbeam_channel::SendError<scheduler::WorkerReport>> for MinerError {
    fn from(e: crossbeam_channel::SendError<scheduler::WorkerReport>) -> Self {
        MinerError::ChannelError(format!("Worker report send failed: {}", e))
    }
}

/// Converts rayon thread pool build failures into MinerError
///
/// The benchmark builds a dedicated pool per run; failing to build one is
/// a launch failure for the whole run.
impl From<rayon::ThreadPoolBuildError> for MinerError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        MinerError::WorkerSpawn(format!("Thread pool build failed: {}", e))
    }
}

/// Converts TOML parse errors into MinerError
impl From<toml::de::Error> for MinerError {
    fn from(e: toml::de::Error) -> Self {
        MinerError::ConfigError(format!("Invalid config format: {}", e))
    }
}
