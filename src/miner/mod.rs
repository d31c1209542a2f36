// src/miner/mod.rs
//! Core mining functionality
//!
//! This module contains all components related to the simulated search:
//! - The hashing primitive and difficulty check
//! - Range workers
//! - The search coordinator that races workers
//! - The hash throughput benchmark

/// Hashing algorithm implementations
///
/// SHA-256 over `payload || decimal(nonce)` plus the leading-zero check.
pub mod algorithm;

/// Throughput benchmark
///
/// Single- versus multi-core hash rate measurement.
pub mod benchmark;

/// Search coordinator
///
/// Partitions the nonce space, launches workers and returns the first match.
pub mod scheduler;

/// Range worker
///
/// Walks one nonce range until a match, exhaustion or cancellation.
pub mod worker;

// Re-export main components for cleaner imports
pub use self::algorithm::{Algorithm, Sha256Algo, meets_difficulty};
pub use self::benchmark::{Benchmark, BenchmarkSample, BenchmarkSummary};
pub use self::scheduler::{Coordinator, MiningResult, MiningTask, partition};
pub use self::worker::{NonceRange, WorkerOutcome, find_nonce};
