//! An implementation of BLAKE2sp, the 4-way parallel tree-mode variant of
//! BLAKE2s. Four leaves absorb a quarter of the input each (interleaved one
//! block at a time), and a root node hashes the concatenation of their
//! digests. The AVX2 implementation of BLAKE2bp gets roughly 2x the
//! throughput of BLAKE2b by the same trick; BLAKE2sp only needs SSE2.
//!
//! # Example
//!
//! ```
//! use blake2s_simd::blake2sp;
//!
//! let hash = blake2sp::Params::new()
//!     .hash_length(16)
//!     .key(b"The Magic Words are Squeamish Ossifrage")
//!     .to_state()
//!     .update(b"foo")
//!     .update(b"bar")
//!     .update(b"baz")
//!     .finalize();
//! assert_eq!(16, hash.as_bytes().len());
//! ```

use crate::Compress4Fn;
use crate::Hash;
use crate::State as Blake2sState;
use crate::BLOCKBYTES;
use crate::KEYBYTES;
use crate::OUTBYTES;
use core::cmp;
use core::fmt;

/// Compute the BLAKE2sp hash of a slice of bytes, using default parameters.
pub fn blake2sp(input: &[u8]) -> Hash {
    State::new().update(input).finalize()
}

/// A parameter builder for BLAKE2sp, just like [`Params`](../struct.Params.html)
/// for BLAKE2s. Only hash length and a secret key are configurable, matching
/// the reference implementation.
#[derive(Clone)]
pub struct Params {
    hash_length: u8,
    key_length: u8,
    key: [u8; KEYBYTES],
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_state(&self) -> State {
        State::with_params(self)
    }

    pub fn hash_length(&mut self, length: usize) -> &mut Self {
        assert!(1 <= length && length <= OUTBYTES, "Bad hash length: {}", length);
        self.hash_length = length as u8;
        self
    }

    pub fn key(&mut self, key: &[u8]) -> &mut Self {
        assert!(key.len() <= KEYBYTES, "Bad key length: {}", key.len());
        self.key_length = key.len() as u8;
        self.key = [0; KEYBYTES];
        self.key[..key.len()].copy_from_slice(key);
        self
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            hash_length: OUTBYTES as u8,
            key_length: 0,
            key: [0; KEYBYTES],
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Params {{ hash_length: {}, key_length: {} }}",
            self.hash_length, self.key_length,
        )
    }
}

/// An incremental hasher for BLAKE2sp.
#[derive(Clone)]
pub struct State {
    leaf0: Blake2sState,
    leaf1: Blake2sState,
    leaf2: Blake2sState,
    leaf3: Blake2sState,
    root: Blake2sState,
    // Twice the width compress4 needs, so we always have enough buffered
    // input to know none of the leaves need finalizing yet.
    buf: [u8; 8 * BLOCKBYTES],
    buflen: u16,
    count: u64,
    pub(crate) compress_4x_fn: Compress4Fn,
}

impl State {
    pub fn new() -> Self {
        Self::with_params(&Params::default())
    }

    fn with_params(params: &Params) -> Self {
        let mut base_params = crate::Params::new();
        base_params
            .hash_length(params.hash_length as usize)
            .key(&params.key[..params.key_length as usize])
            .fanout(4)
            .max_depth(2)
            .max_leaf_length(0)
            .inner_hash_length(OUTBYTES);
        let leaf_state = |worker_index| {
            let mut state = base_params
                .clone()
                .node_offset(worker_index)
                .node_depth(0)
                .last_node(worker_index == 3)
                .to_state();
            state.hash_length = OUTBYTES as u8;
            state
        };
        let mut root_state = base_params
            .clone()
            .node_offset(0)
            .node_depth(1)
            .last_node(true)
            .to_state();
        root_state.buflen = 0;
        root_state.count = 0;
        Self {
            leaf0: leaf_state(0),
            leaf1: leaf_state(1),
            leaf2: leaf_state(2),
            leaf3: leaf_state(3),
            root: root_state,
            buf: [0; 8 * BLOCKBYTES],
            buflen: 0,
            count: 0,
            compress_4x_fn: crate::default_compress_impl().1,
        }
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(self.buf.len() - self.buflen as usize, input.len());
        self.buf[self.buflen as usize..self.buflen as usize + take].copy_from_slice(&input[..take]);
        self.buflen += take as u16;
        self.count += take as u64;
        *input = &input[take..];
    }

    fn compress_4x(
        input: &[u8; 4 * BLOCKBYTES],
        leaf0: &mut Blake2sState,
        leaf1: &mut Blake2sState,
        leaf2: &mut Blake2sState,
        leaf3: &mut Blake2sState,
        compress_4x_fn: Compress4Fn,
    ) {
        debug_assert_eq!(0, leaf0.buflen);
        debug_assert_eq!(0, leaf1.buflen);
        debug_assert_eq!(0, leaf2.buflen);
        debug_assert_eq!(0, leaf3.buflen);
        debug_assert_eq!(leaf0.count, leaf1.count);
        debug_assert_eq!(leaf0.count, leaf2.count);
        debug_assert_eq!(leaf0.count, leaf3.count);
        leaf0.count += BLOCKBYTES as u64;
        leaf1.count += BLOCKBYTES as u64;
        leaf2.count += BLOCKBYTES as u64;
        leaf3.count += BLOCKBYTES as u64;
        let count = leaf0.count;
        let msg_refs = array_refs!(input, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES);
        unsafe {
            (compress_4x_fn)(
                &mut leaf0.h,
                &mut leaf1.h,
                &mut leaf2.h,
                &mut leaf3.h,
                msg_refs.0,
                msg_refs.1,
                msg_refs.2,
                msg_refs.3,
                count,
                count,
                count,
                count,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
            );
        }
    }

    /// Add input to the hash. You can call `update` any number of times.
    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if !input.is_empty() {
                Self::compress_4x(
                    array_ref!(self.buf, 0, 4 * BLOCKBYTES),
                    &mut self.leaf0,
                    &mut self.leaf1,
                    &mut self.leaf2,
                    &mut self.leaf3,
                    self.compress_4x_fn,
                );
                self.buflen -= BLOCKBYTES as u16;
                if input.len() > 3 * BLOCKBYTES {
                    Self::compress_4x(
                        array_ref!(self.buf, 4 * BLOCKBYTES, 4 * BLOCKBYTES),
                        &mut self.leaf0,
                        &mut self.leaf1,
                        &mut self.leaf2,
                        &mut self.leaf3,
                        self.compress_4x_fn,
                    );
                    self.buflen = 0;
                } else {
                    let (left, right) = self.buf.split_at_mut(4 * BLOCKBYTES);
                    left[..self.buflen as usize].copy_from_slice(&right[..self.buflen as usize]);
                }
            }
        }

        while input.len() > 7 * BLOCKBYTES {
            self.count += 4 * BLOCKBYTES as u64;
            let block = array_ref!(input, 0, 4 * BLOCKBYTES);
            Self::compress_4x(
                block,
                &mut self.leaf0,
                &mut self.leaf1,
                &mut self.leaf2,
                &mut self.leaf3,
                self.compress_4x_fn,
            );
            input = &input[4 * BLOCKBYTES..];
        }

        self.fill_buf(&mut input);
        debug_assert_eq!(0, input.len());
        self
    }

    /// Finalize the state and return a `Hash`. Idempotent; more input can
    /// still be `update`d afterward.
    pub fn finalize(&mut self) -> Hash {
        let mut leaf0 = self.leaf0.clone();
        let mut leaf1 = self.leaf1.clone();
        let mut leaf2 = self.leaf2.clone();
        let mut leaf3 = self.leaf3.clone();
        let chunks = array_refs!(
            &self.buf, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES, BLOCKBYTES,
            BLOCKBYTES, BLOCKBYTES
        );
        let mut buflen = self.buflen as usize;
        leaf0.update(&chunks.0[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf1.update(&chunks.1[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf2.update(&chunks.2[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf3.update(&chunks.3[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf0.update(&chunks.4[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf1.update(&chunks.5[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf2.update(&chunks.6[..cmp::min(buflen, BLOCKBYTES)]);
        buflen = buflen.saturating_sub(BLOCKBYTES);
        leaf3.update(&chunks.7[..cmp::min(buflen, BLOCKBYTES)]);
        let mut root = self.root.clone();
        #[cfg(feature = "rayon")]
        let (hash0, hash1, hash2, hash3) = {
            let ((h0, h1), (h2, h3)) = rayon::join(
                || rayon::join(|| leaf0.finalize(), || leaf1.finalize()),
                || rayon::join(|| leaf2.finalize(), || leaf3.finalize()),
            );
            (h0, h1, h2, h3)
        };
        #[cfg(not(feature = "rayon"))]
        let (hash0, hash1, hash2, hash3) = (
            leaf0.finalize(),
            leaf1.finalize(),
            leaf2.finalize(),
            leaf3.finalize(),
        );
        root.update(hash0.as_bytes());
        root.update(hash1.as_bytes());
        root.update(hash2.as_bytes());
        root.update(hash3.as_bytes());
        root.finalize()
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(feature = "std")]
impl std::io::Write for State {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "State {{ count: {}, root: {:?}, leaf0: {:?}, leaf1: {:?}, \
             leaf2: {:?}, leaf3: {:?} }}",
            self.count, self.root, self.leaf0, self.leaf1, self.leaf2, self.leaf3
        )
    }
}

impl Default for State {
    fn default() -> Self {
        Self::with_params(&Params::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blake2sp_matches_four_leaves_plus_root() {
        // Sanity check: BLAKE2sp output changes with input, is
        // deterministic, and is a different function from BLAKE2s.
        let a = blake2sp(b"hello world");
        let b = blake2sp(b"hello world");
        assert_eq!(a, b);
        assert_ne!(a.as_bytes(), crate::blake2s(b"hello world").as_bytes());
        assert_ne!(blake2sp(b"hello").as_bytes(), blake2sp(b"world").as_bytes());
    }

    #[test]
    fn test_blake2sp_long_input() {
        let input = vec![0xab; 10_000];
        let a = blake2sp(&input);
        let b = blake2sp(&input);
        assert_eq!(a, b);
    }

    /// 8 repeats of the 8-byte ASCII string "abcdefgh" (64 bytes total),
    /// striped one block per leaf (`[0..64)`, `[64..128)`, `[128..192)`,
    /// `[192..256)` across leaves 0-3) and reduced through the root node.
    #[test]
    fn test_blake2sp_four_block_vector() {
        let input = b"abcdefgh".repeat(8);
        assert_eq!(64, input.len());
        let expected = "5c2a6c3494979dfd5950536f914fba78fc3353087ea4962a799c947067836d6f";
        let hash = blake2sp(&input);
        assert_eq!(expected, &*hex::encode(hash.as_bytes()));
    }
}
