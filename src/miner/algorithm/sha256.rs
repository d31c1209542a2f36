// src/miner/algorithm/sha256.rs
//! SHA-256 hashing for the mining simulator
//!
//! A candidate block is the payload bytes followed by the ASCII decimal
//! form of the nonce, e.g. `b"sim_block_1"` + `b"528"`.

use crate::miner::algorithm::Algorithm;
use sha2::{Digest, Sha256};
use std::io::Write;

/// SHA-256 over `payload || decimal(nonce)`
///
/// Stateless; one instance can be shared by every worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Algo;

impl Sha256Algo {
    /// Creates a new SHA-256 algorithm instance
    pub fn new() -> Self {
        Self
    }
}

impl Algorithm for Sha256Algo {
    fn hash(&self, input: &[u8], nonce: u64) -> [u8; 32] {
        // u64::MAX has 20 decimal digits
        let mut digits = [0u8; 20];
        let mut cursor = &mut digits[..];
        let _ = write!(cursor, "{}", nonce);
        let written = 20 - cursor.len();

        let mut hasher = Sha256::new();
        hasher.update(input);
        hasher.update(&digits[..written]);
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn hashes_payload_then_decimal_nonce() {
        let algo = Sha256Algo::new();
        // sha256("0")
        assert_eq!(
            algo.hash(b"", 0),
            hex!("5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9")
        );
        // sha256("sim_block_11")
        assert_eq!(
            algo.hash(b"sim_block_1", 1),
            hex!("99930bed8e136774a8a837380ce5bd88f34a29e8e8e3eb2101dabfc0bd5b891a")
        );
    }

    #[test]
    fn multi_digit_nonce_is_rendered_in_decimal() {
        let algo = Sha256Algo::new();
        // sha256("sim_block_1528")
        assert_eq!(
            hex::encode(algo.hash(b"sim_block_1", 528)),
            "0034cca67502a3c5f50f85b11fcc43a2a2d1223cfd3e835bee990e54f6272c4f"
        );
        assert_eq!(algo.hash(b"sim_block_1", 528), {
            let mut h = Sha256::new();
            h.update(b"sim_block_1528");
            <[u8; 32]>::from(h.finalize())
        });
    }

    #[test]
    fn largest_nonce_fits_digit_buffer() {
        let algo = Sha256Algo::new();
        let mut h = Sha256::new();
        h.update(format!("x{}", u64::MAX).as_bytes());
        assert_eq!(algo.hash(b"x", u64::MAX), <[u8; 32]>::from(h.finalize()));
    }

    #[test]
    fn verify_uses_leading_hex_zeros() {
        let algo = Sha256Algo::new();
        assert!(algo.verify(b"sim_block_1", 528, 2));
        assert!(!algo.verify(b"sim_block_1", 528, 3));
    }
}
