// src/miner/worker.rs
//! Worker implementation
//!
//! A worker walks one contiguous nonce range in increasing order and stops
//! at the first nonce whose digest meets the difficulty target, at the end
//! of its range, or when the coordinator cancels it.

use crate::miner::algorithm::{Algorithm, Sha256Algo, meets_difficulty};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Nonces hashed between two checks of the cancellation flag
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Contiguous nonce range assigned to a single worker
///
/// `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceRange {
    /// Worker this range belongs to
    pub worker_id: usize,
    /// First nonce to try
    pub start: u64,
    /// One past the last nonce to try
    pub end: u64,
}

impl NonceRange {
    /// Number of nonces in the range
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True when the range holds no nonces
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a worker's search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// A nonce meeting the target was found
    Found {
        /// The winning nonce
        nonce: u64,
        /// Lowercase hex digest of `payload || nonce`
        hash: String,
        /// Hashes computed, including the winning one
        hashes: u64,
    },
    /// Every nonce in the range was tried without a match
    Exhausted {
        /// Hashes computed
        hashes: u64,
    },
    /// The cancellation flag was raised before the range was finished
    Cancelled {
        /// Hashes computed before noticing cancellation
        hashes: u64,
    },
}

impl WorkerOutcome {
    /// Number of hashes the worker computed
    pub fn hashes(&self) -> u64 {
        match self {
            WorkerOutcome::Found { hashes, .. }
            | WorkerOutcome::Exhausted { hashes }
            | WorkerOutcome::Cancelled { hashes } => *hashes,
        }
    }
}

/// Searches `[range.start, range.end)` for the lowest nonce meeting `difficulty`
///
/// The cancellation flag is polled once every [`CANCEL_CHECK_INTERVAL`]
/// nonces, so a cancelled worker may hash up to that many more before
/// returning.
pub fn search<A: Algorithm + ?Sized>(
    algorithm: &A,
    payload: &[u8],
    difficulty: u32,
    range: NonceRange,
    cancel: &AtomicBool,
) -> WorkerOutcome {
    let mut hashes = 0u64;

    for nonce in range.start..range.end {
        if hashes % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return WorkerOutcome::Cancelled { hashes };
        }

        let digest = algorithm.hash(payload, nonce);
        hashes += 1;

        if meets_difficulty(&digest, difficulty) {
            return WorkerOutcome::Found {
                nonce,
                hash: hex::encode(digest),
                hashes,
            };
        }
    }

    WorkerOutcome::Exhausted { hashes }
}

/// Single-threaded SHA-256 search without cancellation
///
/// # Returns
/// `Some((nonce, hex_hash))` for the lowest matching nonce in
/// `[start, end)`, or `None` if the range is exhausted.
pub fn find_nonce(payload: &[u8], difficulty: u32, start: u64, end: u64) -> Option<(u64, String)> {
    let range = NonceRange {
        worker_id: 0,
        start,
        end,
    };
    match search(&Sha256Algo, payload, difficulty, range, &AtomicBool::new(false)) {
        WorkerOutcome::Found { nonce, hash, .. } => Some((nonce, hash)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u64, end: u64) -> NonceRange {
        NonceRange {
            worker_id: 0,
            start,
            end,
        }
    }

    #[test]
    fn zero_difficulty_matches_at_range_start() {
        let outcome = search(
            &Sha256Algo,
            b"anything",
            0,
            range(500, 1000),
            &AtomicBool::new(false),
        );
        match outcome {
            WorkerOutcome::Found { nonce, hashes, .. } => {
                assert_eq!(nonce, 500);
                assert_eq!(hashes, 1);
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn finds_lowest_nonce_in_range() {
        assert_eq!(
            find_nonce(b"sim_block_1", 1, 0, 10_000).map(|(n, _)| n),
            Some(34)
        );
        assert_eq!(
            find_nonce(b"sim_block_1", 2, 0, 10_000),
            Some((
                528,
                "0034cca67502a3c5f50f85b11fcc43a2a2d1223cfd3e835bee990e54f6272c4f".to_string()
            ))
        );
        assert_eq!(
            find_nonce(b"sim_block_1", 3, 0, 10_000).map(|(n, _)| n),
            Some(1594)
        );
    }

    #[test]
    fn range_start_skips_earlier_matches() {
        // 34 is the first difficulty-1 match; starting past it must not report it
        let (nonce, hash) = find_nonce(b"sim_block_1", 1, 35, 10_000).expect("match");
        assert!(nonce > 34);
        assert!(hash.starts_with('0'));
    }

    #[test]
    fn end_is_exclusive() {
        assert_eq!(find_nonce(b"sim_block_1", 2, 0, 528), None);
        assert!(find_nonce(b"sim_block_1", 2, 0, 529).is_some());
    }

    #[test]
    fn exhausts_when_target_is_unreachable() {
        let outcome = search(
            &Sha256Algo,
            b"x",
            64,
            range(0, 2_000),
            &AtomicBool::new(false),
        );
        assert_eq!(outcome, WorkerOutcome::Exhausted { hashes: 2_000 });
    }

    #[test]
    fn empty_range_is_exhausted_immediately() {
        let outcome = search(&Sha256Algo, b"x", 0, range(7, 7), &AtomicBool::new(false));
        assert_eq!(outcome, WorkerOutcome::Exhausted { hashes: 0 });
        assert!(range(7, 7).is_empty());
    }

    #[test]
    fn honours_cancellation_flag() {
        let outcome = search(
            &Sha256Algo,
            b"x",
            64,
            range(0, 1_000_000),
            &AtomicBool::new(true),
        );
        assert_eq!(outcome, WorkerOutcome::Cancelled { hashes: 0 });
    }
}
