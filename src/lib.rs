//! Mining simulator - parallel SHA-256 nonce search and hash benchmarking
//!
//! This crate provides:
//! - A coordinator that races worker threads over a partitioned nonce space
//!   and returns the first hash with the requested leading hex zeros
//! - Single- versus multi-core hash throughput benchmarks
//! - Background CPU/GPU utilization sampling
//! - Text and JSON reports

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner core: hashing, workers, coordination and benchmarking
pub mod miner;

/// Hardware queries, utilization sampling and reports
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{
    Algorithm, Benchmark, Coordinator, MiningResult, MiningTask, NonceRange, Sha256Algo,
};
pub use stats::{HardwareQuery, ResourceSampler, SystemProbe, UtilizationSnapshot};
pub use types::{BenchmarkMode, ReportFormat};
pub use utils::{MinerError, init_logging};
