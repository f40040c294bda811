//! DRBG-style counter-mode output expansion built on keyed BLAKE2b — the
//! "digest-as-PRF" glue the hash core needs for unbounded-length output
//! (KDF/stream-cipher-style use), as opposed to the fixed-length MAC tag
//! BLAKE2b's own keyed mode already produces.
//!
//! Each output block is one BLAKE2b compression of a 128-byte input built
//! from a 32-bit little-endian counter (zero-padded to fill the first half
//! of the block) followed by the previous call's digest (zero for the
//! first call). The counter increments by one between calls; the digest
//! feeds forward so output blocks are chained, not independent. Output
//! length is arbitrary — a short final request just truncates the last
//! digest.

#![no_std]

use blake2b_simd::{Params, State};
use hash_core_primitives::Zeroize;

const BLOCKBYTES: usize = 128;
const OUTBYTES: usize = 64;

/// A keyed BLAKE2b counter-mode generator. Construct with [`Drbg::new`],
/// then repeatedly call [`Drbg::fill`] to expand arbitrarily much output;
/// each call continues the counter/feedback chain from where the last one
/// left off.
pub struct Drbg {
    params: Params,
    counter: u32,
    previous: [u8; OUTBYTES],
}

impl Drbg {
    /// `key`, if non-empty, seeds BLAKE2b's own keyed-MAC mode (≤ 64
    /// bytes, same limit as [`Params::key`]); this is the PRF's secret
    /// seed, distinct from the public counter/feedback state.
    pub fn new(key: &[u8]) -> Self {
        let mut params = Params::new();
        if !key.is_empty() {
            params.key(key);
        }
        Self {
            params,
            counter: 0,
            previous: [0; OUTBYTES],
        }
    }

    fn next_block(&mut self) -> [u8; OUTBYTES] {
        let mut block = [0u8; BLOCKBYTES];
        block[..4].copy_from_slice(&self.counter.to_le_bytes());
        block[64..].copy_from_slice(&self.previous);

        let mut state: State = self.params.to_state();
        state.update(&block);
        let hash = state.finalize();
        let mut out = [0u8; OUTBYTES];
        out.copy_from_slice(hash.as_bytes());

        self.counter = self.counter.wrapping_add(1);
        self.previous = out;
        out
    }

    /// Fill `output` with DRBG bytes, continuing the counter/feedback
    /// chain. Truncates the final digest if `output.len()` isn't a
    /// multiple of 64.
    pub fn fill(&mut self, output: &mut [u8]) {
        let mut written = 0;
        while written < output.len() {
            let block = self.next_block();
            let take = core::cmp::min(OUTBYTES, output.len() - written);
            output[written..written + take].copy_from_slice(&block[..take]);
            written += take;
        }
    }
}

impl Drop for Drbg {
    fn drop(&mut self) {
        self.previous.zeroize();
        self.counter = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fill_is_deterministic_for_the_same_key() {
        let mut a = Drbg::new(b"seed");
        let mut b = Drbg::new(b"seed");
        let mut out_a = [0u8; 200];
        let mut out_b = [0u8; 200];
        a.fill(&mut out_a);
        b.fill(&mut out_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn different_keys_diverge() {
        let mut a = Drbg::new(b"seed-a");
        let mut b = Drbg::new(b"seed-b");
        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.fill(&mut out_a);
        b.fill(&mut out_b);
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn chained_calls_continue_the_counter() {
        let mut one_shot = Drbg::new(b"seed");
        let mut expected = [0u8; 128];
        one_shot.fill(&mut expected);

        let mut chained = Drbg::new(b"seed");
        let mut actual = [0u8; 128];
        chained.fill(&mut actual[..64]);
        chained.fill(&mut actual[64..]);
        assert_eq!(expected, actual);
    }

    #[test]
    fn short_request_truncates_cleanly() {
        let mut drbg = Drbg::new(b"seed");
        let mut short = [0u8; 10];
        drbg.fill(&mut short);
        assert_ne!(short, [0u8; 10]);
    }
}
