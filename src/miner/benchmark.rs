// src/miner/benchmark.rs
//! Hash throughput benchmark
//!
//! Measures how many digests the machine computes per second, first on a
//! single worker and then on one worker per core. Each measurement runs in
//! its own rayon pool sized for the mode, with the resource sampler active
//! for exactly the measured interval.

use crate::miner::algorithm::{Algorithm, Sha256Algo};
use crate::stats::sampler::{ResourceSampler, UtilizationSnapshot};
use crate::types::BenchmarkMode;
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Constant payload hashed by every benchmark worker
pub const BENCHMARK_PAYLOAD: &[u8] = b"benchmark_data";

/// Hashes computed between deadline checks
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// One throughput measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    /// Mode measured
    pub mode: BenchmarkMode,
    /// Worker threads used
    pub workers: usize,
    /// Hashes computed by all workers together
    pub hashes_counted: u64,
    /// Measured interval in seconds
    pub duration_seconds: f64,
}

impl BenchmarkSample {
    /// Hashes per second
    pub fn hash_rate(&self) -> f64 {
        if self.duration_seconds > 0.0 {
            self.hashes_counted as f64 / self.duration_seconds
        } else {
            0.0
        }
    }
}

/// Both measurements of a benchmark run plus the sampled utilization
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    /// Single worker measurement
    pub single: BenchmarkSample,
    /// One worker per core measurement
    pub multi: BenchmarkSample,
    /// Snapshots from both measurements, in order
    pub snapshots: Vec<UtilizationSnapshot>,
}

impl BenchmarkSummary {
    /// Multi-core rate divided by single-core rate
    pub fn speedup(&self) -> Option<f64> {
        let single = self.single.hash_rate();
        (single > 0.0).then(|| self.multi.hash_rate() / single)
    }

    /// Percent by which the multi-core rate exceeds the single-core rate
    pub fn efficiency_gain_percent(&self) -> Option<f64> {
        let single = self.single.hash_rate();
        (single > 0.0).then(|| (self.multi.hash_rate() - single) / single * 100.0)
    }
}

/// Single- versus multi-core throughput benchmark
pub struct Benchmark {
    sampler: ResourceSampler,
    multi_workers: usize,
}

impl Benchmark {
    /// Creates a benchmark using every logical core for the multi-core run
    pub fn new(sampler: ResourceSampler) -> Self {
        Benchmark {
            sampler,
            multi_workers: num_cpus::get(),
        }
    }

    /// Overrides the multi-core worker count (0 keeps the core count)
    pub fn workers(mut self, workers: usize) -> Self {
        if workers > 0 {
            self.multi_workers = workers;
        }
        self
    }

    /// Worker threads used for `mode`
    pub fn workers_for(&self, mode: BenchmarkMode) -> usize {
        match mode {
            BenchmarkMode::SingleCore => 1,
            BenchmarkMode::MultiCore => self.multi_workers,
        }
    }

    /// Snapshots from the most recent measurement
    pub fn snapshots(&self) -> Vec<UtilizationSnapshot> {
        self.sampler.data()
    }

    /// Hashes for `duration` in the given mode and reports the total count
    ///
    /// # Returns
    /// * `Ok(BenchmarkSample)` - Count and nominal duration
    /// * `Err(MinerError::InputError)` - Zero duration
    /// * `Err(MinerError::WorkerSpawn)` - Pool or sampler failed to start
    pub fn measure(
        &mut self,
        mode: BenchmarkMode,
        duration: Duration,
    ) -> Result<BenchmarkSample, MinerError> {
        if duration.is_zero() {
            return Err(MinerError::InputError(
                "benchmark duration must be positive".into(),
            ));
        }

        let workers = self.workers_for(mode);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("bench-{}-{}", mode, i))
            .build()?;

        log::info!(
            "Running {} benchmark on {} workers for {:.1}s",
            mode,
            workers,
            duration.as_secs_f64()
        );

        self.sampler.start()?;
        let deadline = Instant::now() + duration;
        let counts = pool.broadcast(|_| count_hashes(&Sha256Algo, BENCHMARK_PAYLOAD, deadline));
        self.sampler.stop();

        let sample = BenchmarkSample {
            mode,
            workers,
            hashes_counted: counts.iter().sum(),
            duration_seconds: duration.as_secs_f64(),
        };
        log::info!("{} result: {:.2} H/s", mode, sample.hash_rate());
        log::debug!("Per-worker hash counts: {:?}", counts);

        Ok(sample)
    }

    /// Measures single-core then multi-core throughput
    pub fn run(&mut self, duration: Duration) -> Result<BenchmarkSummary, MinerError> {
        let single = self.measure(BenchmarkMode::SingleCore, duration)?;
        let mut snapshots = self.sampler.data();

        let multi = self.measure(BenchmarkMode::MultiCore, duration)?;
        snapshots.extend(self.sampler.data());

        Ok(BenchmarkSummary {
            single,
            multi,
            snapshots,
        })
    }
}

/// Hashes `payload` with increasing nonces until `deadline`, never checking a target
fn count_hashes<A: Algorithm + ?Sized>(algorithm: &A, payload: &[u8], deadline: Instant) -> u64 {
    let mut nonce = 0u64;
    while Instant::now() < deadline {
        for _ in 0..DEADLINE_CHECK_INTERVAL {
            black_box(algorithm.hash(payload, nonce));
            nonce = nonce.wrapping_add(1);
        }
    }
    nonce
}
