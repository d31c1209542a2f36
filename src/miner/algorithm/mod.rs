// src/miner/algorithm/mod.rs
//! Hashing algorithm implementations
//!
//! The simulator hashes `payload || decimal(nonce)` and accepts a digest
//! when its hex rendering starts with `difficulty` zeros. Only SHA-256 is
//! implemented, but workers and the coordinator are generic over
//! [`Algorithm`] so tests can substitute their own.

/// SHA-256 algorithm implementation
pub mod sha256;

pub use self::sha256::Sha256Algo;

/// Largest difficulty a 32-byte digest can ever satisfy (64 hex chars)
pub const MAX_DIFFICULTY: u32 = 64;

/// Common interface for all hashing algorithms
///
/// Implementations must be cheap to call from many threads at once.
pub trait Algorithm: Send + Sync {
    /// Compute the digest of `input` followed by the decimal rendering of `nonce`
    fn hash(&self, input: &[u8], nonce: u64) -> [u8; 32];

    /// Verify that `nonce` produces a digest meeting `difficulty`
    fn verify(&self, input: &[u8], nonce: u64, difficulty: u32) -> bool {
        meets_difficulty(&self.hash(input, nonce), difficulty)
    }
}

/// Checks whether the lowercase hex form of `hash` starts with `difficulty` zeros
///
/// Works on raw bytes: every full byte must be zero, and for an odd
/// difficulty the high nibble of the next byte must be zero too.
pub fn meets_difficulty(hash: &[u8; 32], difficulty: u32) -> bool {
    if difficulty > MAX_DIFFICULTY {
        return false;
    }
    let full = (difficulty / 2) as usize;
    if hash[..full].iter().any(|b| *b != 0) {
        return false;
    }
    difficulty % 2 == 0 || hash[full] >> 4 == 0
}
