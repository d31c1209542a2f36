// src/miner/scheduler.rs
//! Mining search coordinator
//!
//! Splits the nonce space into one contiguous range per worker, runs the
//! workers on their own OS threads and returns as soon as any of them
//! reports a match. Remaining workers are cancelled and joined before the
//! call returns.

use crate::miner::algorithm::{Algorithm, MAX_DIFFICULTY, Sha256Algo};
use crate::miner::worker::{self, NonceRange, WorkerOutcome};
use crate::utils::error::MinerError;
use crossbeam_channel::{RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default size of the simulated nonce space
pub const DEFAULT_MAX_NONCE: u64 = 100_000_000;

/// Default wait between liveness checks while no worker has reported
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single mining invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningTask {
    /// Block payload hashed ahead of the nonce
    pub payload: Vec<u8>,
    /// Required number of leading hex zeros
    pub difficulty: u32,
    /// Exclusive upper bound of the nonce space
    pub max_nonce: u64,
}

impl MiningTask {
    /// Creates a task over `[0, DEFAULT_MAX_NONCE)`
    pub fn new(payload: impl Into<Vec<u8>>, difficulty: u32) -> Self {
        MiningTask {
            payload: payload.into(),
            difficulty,
            max_nonce: DEFAULT_MAX_NONCE,
        }
    }

    /// Overrides the size of the nonce space
    pub fn with_max_nonce(mut self, max_nonce: u64) -> Self {
        self.max_nonce = max_nonce;
        self
    }

    fn validate(&self, worker_count: usize) -> Result<(), MinerError> {
        if worker_count == 0 {
            return Err(MinerError::InputError(
                "worker count must be at least 1".into(),
            ));
        }
        if self.max_nonce == 0 {
            return Err(MinerError::InputError("max_nonce must be positive".into()));
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(MinerError::InputError(format!(
                "difficulty {} exceeds the {} hex digits of a SHA-256 digest",
                self.difficulty, MAX_DIFFICULTY
            )));
        }
        Ok(())
    }
}

/// Outcome of one [`Coordinator::mine`] call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningResult {
    /// Winning nonce, if any
    pub nonce: Option<u64>,
    /// Lowercase hex digest of the winning candidate
    pub hash: Option<String>,
    /// Worker that reported the match
    pub worker_id: Option<usize>,
    /// Wall-clock seconds from launch to the coordinator's decision
    pub elapsed_seconds: f64,
    /// Hashes computed across all workers
    pub hashes_tried: u64,
    /// Ranges whose worker crashed before finishing
    pub unexplored: Vec<NonceRange>,
}

impl MiningResult {
    /// True when both a nonce and its hash are present
    pub fn found(&self) -> bool {
        self.nonce.is_some() && self.hash.is_some()
    }

    /// Average hash rate over the run, all workers combined
    pub fn approx_hashrate(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.hashes_tried as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

/// How a worker thread terminated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker finished its search (found, exhausted or cancelled)
    Finished(WorkerOutcome),
    /// The worker panicked; its range was not fully searched
    Crashed,
}

/// Message posted by each worker exactly once when it stops
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Reporting worker
    pub worker_id: usize,
    /// Termination reason
    pub exit: WorkerExit,
}

/// Splits `[0, max_nonce)` into `worker_count` contiguous ranges
///
/// Every range has `max_nonce / worker_count` nonces except the last, which
/// also takes the remainder. When `max_nonce < worker_count` all but the last
/// range are empty.
pub fn partition(max_nonce: u64, worker_count: usize) -> Vec<NonceRange> {
    if worker_count == 0 {
        return Vec::new();
    }
    let workers = worker_count as u64;
    let chunk = max_nonce / workers;

    (0..workers)
        .map(|i| NonceRange {
            worker_id: i as usize,
            start: i * chunk,
            end: if i + 1 == workers {
                max_nonce
            } else {
                (i + 1) * chunk
            },
        })
        .collect()
}

/// Races worker threads over a partitioned nonce space
pub struct Coordinator<A: Algorithm + 'static = Sha256Algo> {
    algorithm: Arc<A>,
    poll_interval: Duration,
}

impl Coordinator<Sha256Algo> {
    /// Creates a SHA-256 coordinator with the default poll interval
    pub fn new() -> Self {
        Coordinator::with_algorithm(Sha256Algo::new())
    }
}

impl Default for Coordinator<Sha256Algo> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Algorithm + 'static> Coordinator<A> {
    /// Creates a coordinator for any hashing algorithm
    pub fn with_algorithm(algorithm: A) -> Self {
        Coordinator {
            algorithm: Arc::new(algorithm),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how long the coordinator waits for a report before re-checking
    /// for workers that died without reporting
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Runs the search and returns the first observed match
    ///
    /// # Arguments
    /// * `task` - Payload, difficulty and nonce space
    /// * `worker_count` - Number of worker threads (one range each)
    ///
    /// # Returns
    /// * `Ok(MiningResult)` - Found or exhausted; both are normal outcomes
    /// * `Err(MinerError::InputError)` - Invalid task, nothing was launched
    /// * `Err(MinerError::WorkerSpawn)` - A worker thread could not start
    pub fn mine(&self, task: &MiningTask, worker_count: usize) -> Result<MiningResult, MinerError> {
        task.validate(worker_count)?;

        let ranges = partition(task.max_nonce, worker_count);
        let payload: Arc<[u8]> = Arc::from(task.payload.as_slice());
        let cancel = Arc::new(AtomicBool::new(false));
        let (report_tx, report_rx) = crossbeam_channel::unbounded();

        log::info!(
            "Mining with {} workers over [0, {}) at difficulty {}",
            worker_count,
            task.max_nonce,
            task.difficulty
        );

        let started = Instant::now();
        let mut handles = Vec::with_capacity(ranges.len());
        for range in &ranges {
            match self.spawn_worker(
                *range,
                &payload,
                task.difficulty,
                &cancel,
                report_tx.clone(),
            ) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    cancel.store(true, Ordering::SeqCst);
                    join_all(handles);
                    return Err(e);
                }
            }
        }
        // Only workers hold senders now, so disconnect means they are all gone.
        drop(report_tx);

        let mut reported = vec![false; ranges.len()];
        let mut pending = ranges.len();
        let mut hashes_tried = 0u64;
        let mut unexplored = Vec::new();
        let mut winner: Option<(usize, u64, String)> = None;

        while pending > 0 && winner.is_none() {
            match report_rx.recv_timeout(self.poll_interval) {
                Ok(report) => {
                    pending -= 1;
                    reported[report.worker_id] = true;
                    hashes_tried += record_exit(&report, &ranges, &mut unexplored);
                    if let WorkerExit::Finished(WorkerOutcome::Found { nonce, hash, .. }) =
                        report.exit
                    {
                        winner = Some((report.worker_id, nonce, hash));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::trace!("{} workers still searching", pending);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Threads gone without a report: treat as crashed.
                    for (id, done) in reported.iter_mut().enumerate() {
                        if !*done {
                            *done = true;
                            log::warn!("Worker {} exited without reporting", id);
                            unexplored.push(ranges[id]);
                        }
                    }
                    pending = 0;
                }
            }
        }

        let elapsed_seconds = started.elapsed().as_secs_f64();

        if winner.is_some() {
            cancel.store(true, Ordering::SeqCst);
        }
        join_all(handles);

        // Late reports from cancelled workers only contribute hash counts.
        for report in report_rx.try_iter() {
            hashes_tried += record_exit(&report, &ranges, &mut unexplored);
        }

        let result = match winner {
            Some((worker_id, nonce, hash)) => {
                log::info!(
                    "Worker {} found nonce {} in {:.4}s ({})",
                    worker_id,
                    nonce,
                    elapsed_seconds,
                    hash
                );
                MiningResult {
                    nonce: Some(nonce),
                    hash: Some(hash),
                    worker_id: Some(worker_id),
                    elapsed_seconds,
                    hashes_tried,
                    unexplored,
                }
            }
            None => {
                log::info!(
                    "Search space exhausted after {:.4}s ({} hashes, {} ranges unexplored)",
                    elapsed_seconds,
                    hashes_tried,
                    unexplored.len()
                );
                MiningResult {
                    nonce: None,
                    hash: None,
                    worker_id: None,
                    elapsed_seconds,
                    hashes_tried,
                    unexplored,
                }
            }
        };

        Ok(result)
    }

    fn spawn_worker(
        &self,
        range: NonceRange,
        payload: &Arc<[u8]>,
        difficulty: u32,
        cancel: &Arc<AtomicBool>,
        reports: Sender<WorkerReport>,
    ) -> Result<JoinHandle<()>, MinerError> {
        let algorithm = Arc::clone(&self.algorithm);
        let payload = Arc::clone(payload);
        let cancel = Arc::clone(cancel);

        thread::Builder::new()
            .name(format!("miner-{}", range.worker_id))
            .spawn(move || {
                if let Err(e) =
                    run_worker(&*algorithm, &payload, difficulty, range, &cancel, &reports)
                {
                    log::debug!("Worker {}: {}", range.worker_id, e);
                }
            })
            .map_err(|e| MinerError::WorkerSpawn(format!("worker {}: {}", range.worker_id, e)))
    }
}

/// Thread body: search, then post exactly one report
fn run_worker<A: Algorithm + ?Sized>(
    algorithm: &A,
    payload: &[u8],
    difficulty: u32,
    range: NonceRange,
    cancel: &AtomicBool,
    reports: &Sender<WorkerReport>,
) -> Result<(), MinerError> {
    let exit = match panic::catch_unwind(AssertUnwindSafe(|| {
        worker::search(algorithm, payload, difficulty, range, cancel)
    })) {
        Ok(outcome) => WorkerExit::Finished(outcome),
        Err(_) => WorkerExit::Crashed,
    };

    reports.send(WorkerReport {
        worker_id: range.worker_id,
        exit,
    })?;
    Ok(())
}

/// Logs a worker exit and returns its hash count
fn record_exit(
    report: &WorkerReport,
    ranges: &[NonceRange],
    unexplored: &mut Vec<NonceRange>,
) -> u64 {
    match &report.exit {
        WorkerExit::Finished(outcome) => {
            log::debug!("Worker {} finished: {:?}", report.worker_id, outcome);
            outcome.hashes()
        }
        WorkerExit::Crashed => {
            let range = ranges[report.worker_id];
            log::warn!(
                "Worker {} crashed; range [{}, {}) left unexplored",
                report.worker_id,
                range.start,
                range.end
            );
            unexplored.push(range);
            0
        }
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        // Panics are already caught inside the worker.
        let _ = handle.join();
    }
}
