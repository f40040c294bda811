//! A pure Rust implementation of BLAKE2b and its 4-way parallel tree-mode
//! variant BLAKE2bp, with a portable scalar compression path and dynamically
//! detected AVX2 (4-way independent hashing) / SSE2 (2-way) acceleration.
//!
//! ```
//! let hash = blake2b_simd::blake2b(b"abc");
//! assert_eq!(64, hash.as_bytes().len());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate arrayref;

use arrayvec::ArrayString;
use core::cmp;
use core::fmt;
use hash_core_primitives::CoreError;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod avx2;
pub mod blake2bp;
pub mod many;
mod portable;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse2;

#[cfg(test)]
mod test;

pub const BLOCKBYTES: usize = 128;
pub const OUTBYTES: usize = 64;
pub const KEYBYTES: usize = 64;
pub const SALTBYTES: usize = 16;
pub const PERSONALBYTES: usize = 16;

const IV: [u64; 8] = [
    0x6A09_E667_F3BC_C908,
    0xBB67_AE85_84CA_A73B,
    0x3C6E_F372_FE94_F82B,
    0xA54F_F53A_5F1D_36F1,
    0x510E_527F_ADE6_82D1,
    0x9B05_688C_2B3E_6C1F,
    0x1F83_D9AB_FB41_BD6B,
    0x5BE0_CD19_137E_2179,
];

pub(crate) const SIGMA: [[u8; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

// Safety note: the AVX2/SSE2 paths are unsafe in general, because calling
// them on a platform that doesn't support the feature is undefined
// behavior. `default_compress_impl` only ever hands out a pointer to one of
// them after a successful runtime feature check (or a build-time one, for
// `target-cpu=native`-style builds), and that selection happens once, at
// `State` construction, never per-block.
pub(crate) type CompressFn =
    unsafe fn(&mut StateWords, &Block, count: u128, lastblock: u64, lastnode: u64);
pub(crate) type Compress2Fn = unsafe fn(
    &mut StateWords,
    &mut StateWords,
    &Block,
    &Block,
    u128,
    u128,
    u64,
    u64,
    u64,
    u64,
);
pub(crate) type Compress4Fn = unsafe fn(
    &mut StateWords,
    &mut StateWords,
    &mut StateWords,
    &mut StateWords,
    &Block,
    &Block,
    &Block,
    &Block,
    u128,
    u128,
    u128,
    u128,
    u64,
    u64,
    u64,
    u64,
    u64,
    u64,
    u64,
    u64,
);

pub(crate) type StateWords = [u64; 8];
pub(crate) type Block = [u8; BLOCKBYTES];

/// Compute the BLAKE2b hash of a slice of bytes, using default parameters.
pub fn blake2b(input: &[u8]) -> Hash {
    let mut state = State::new();
    state.update(input);
    state.finalize()
}

/// A parameter builder for BLAKE2b, covering everything in the external
/// interface table: hash length, key, salt, personalization, and the tree
/// parameters used for BLAKE2bp and other parallel/Merkle constructions.
///
/// The plain setters here panic on out-of-range arguments, matching the
/// reference implementation's own behavior for what are fundamentally
/// programmer errors (a literal digest length baked into the call site).
/// [`Params::try_hash_length`] and friends return a [`CoreError`] instead,
/// for callers building a `Params` from untrusted configuration.
#[derive(Clone)]
pub struct Params {
    pub(crate) hash_length: u8,
    key_length: u8,
    key: [u8; KEYBYTES],
    salt: [u8; SALTBYTES],
    personal: [u8; PERSONALBYTES],
    fanout: u8,
    max_depth: u8,
    max_leaf_length: u32,
    node_offset: u64,
    node_depth: u8,
    inner_hash_length: u8,
    pub(crate) last_node: bool,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn to_words(&self) -> StateWords {
        let mut words = IV;
        words[0] ^= self.hash_length as u64;
        words[0] ^= (self.key_length as u64) << 8;
        words[0] ^= (self.fanout as u64) << 16;
        words[0] ^= (self.max_depth as u64) << 24;
        words[0] ^= (self.max_leaf_length as u64) << 32;
        words[1] ^= self.node_offset;
        words[2] ^= self.node_depth as u64;
        words[2] ^= (self.inner_hash_length as u64) << 8;
        words[4] ^= hash_core_primitives::load_le_u64(array_ref!(self.salt, 0, 8));
        words[5] ^= hash_core_primitives::load_le_u64(array_ref!(self.salt, 8, 8));
        words[6] ^= hash_core_primitives::load_le_u64(array_ref!(self.personal, 0, 8));
        words[7] ^= hash_core_primitives::load_le_u64(array_ref!(self.personal, 8, 8));
        words
    }

    pub(crate) fn key_block(&self) -> Option<Block> {
        if self.key_length > 0 {
            let mut block = [0; BLOCKBYTES];
            block[..KEYBYTES].copy_from_slice(&self.key);
            Some(block)
        } else {
            None
        }
    }

    pub fn to_state(&self) -> State {
        State::with_params(self)
    }

    pub fn hash_length(&mut self, length: usize) -> &mut Self {
        assert!(1 <= length && length <= OUTBYTES, "Bad hash length: {}", length);
        self.hash_length = length as u8;
        self
    }

    /// Fallible counterpart to [`Params::hash_length`], for callers parsing
    /// a digest length out of untrusted configuration.
    pub fn try_hash_length(&mut self, length: usize) -> Result<&mut Self, CoreError> {
        if 1 <= length && length <= OUTBYTES {
            self.hash_length = length as u8;
            Ok(self)
        } else {
            Err(CoreError::InvalidParameter("hash length out of range"))
        }
    }

    pub fn key(&mut self, key: &[u8]) -> &mut Self {
        assert!(key.len() <= KEYBYTES, "Bad key length: {}", key.len());
        self.key_length = key.len() as u8;
        self.key = [0; KEYBYTES];
        self.key[..key.len()].copy_from_slice(key);
        self
    }

    pub fn try_key(&mut self, key: &[u8]) -> Result<&mut Self, CoreError> {
        if key.len() > KEYBYTES {
            return Err(CoreError::InvalidParameter("key longer than block size"));
        }
        Ok(self.key(key))
    }

    pub fn salt(&mut self, salt: &[u8]) -> &mut Self {
        assert!(salt.len() <= SALTBYTES, "Bad salt length: {}", salt.len());
        self.salt = [0; SALTBYTES];
        self.salt[..salt.len()].copy_from_slice(salt);
        self
    }

    pub fn personal(&mut self, personalization: &[u8]) -> &mut Self {
        assert!(
            personalization.len() <= PERSONALBYTES,
            "Bad personalization length: {}",
            personalization.len()
        );
        self.personal = [0; PERSONALBYTES];
        self.personal[..personalization.len()].copy_from_slice(personalization);
        self
    }

    pub fn fanout(&mut self, fanout: u8) -> &mut Self {
        self.fanout = fanout;
        self
    }

    pub fn max_depth(&mut self, depth: u8) -> &mut Self {
        assert!(depth != 0, "Bad max depth: {}", depth);
        self.max_depth = depth;
        self
    }

    pub fn max_leaf_length(&mut self, length: u32) -> &mut Self {
        self.max_leaf_length = length;
        self
    }

    pub fn node_offset(&mut self, offset: u64) -> &mut Self {
        self.node_offset = offset;
        self
    }

    pub fn node_depth(&mut self, depth: u8) -> &mut Self {
        self.node_depth = depth;
        self
    }

    pub fn inner_hash_length(&mut self, length: usize) -> &mut Self {
        assert!(length <= OUTBYTES, "Bad inner hash length: {}", length);
        self.inner_hash_length = length as u8;
        self
    }

    /// Mark the node built from this `Params` as the last (rightmost) node
    /// at its depth, setting `F[1]` on its final compression. Sequential
    /// hashing never needs this; tree-mode root and rightmost-leaf nodes do.
    pub fn last_node(&mut self, last_node: bool) -> &mut Self {
        self.last_node = last_node;
        self
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            hash_length: OUTBYTES as u8,
            key_length: 0,
            key: [0; KEYBYTES],
            salt: [0; SALTBYTES],
            personal: [0; PERSONALBYTES],
            fanout: 1,
            max_depth: 1,
            max_leaf_length: 0,
            node_offset: 0,
            node_depth: 0,
            inner_hash_length: 0,
            last_node: false,
        }
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Params {{ hash_length: {}, key_length: {}, salt: {:?}, personal: {:?}, \
             fanout: {}, max_depth: {}, max_leaf_length: {}, node_offset: {}, \
             node_depth: {}, inner_hash_length: {}, last_node: {} }}",
            self.hash_length,
            // NB: never print the key itself.
            self.key_length,
            self.salt,
            self.personal,
            self.fanout,
            self.max_depth,
            self.max_leaf_length,
            self.node_offset,
            self.node_depth,
            self.inner_hash_length,
            self.last_node,
        )
    }
}

/// An incremental BLAKE2b hasher. Absorbs bytes with repeated calls to
/// [`update`](State::update), and produces a [`Hash`] from exactly one call
/// to [`finalize`](State::finalize). [`reset`](State::reset) re-runs
/// `init` with the parameters this state was originally built from.
#[derive(Clone)]
pub struct State {
    pub(crate) h: StateWords,
    buf: Block,
    pub(crate) buflen: u8,
    pub(crate) count: u128,
    pub(crate) compress_fn: CompressFn,
    last_node: bool,
    pub(crate) hash_length: u8,
    params: Params,
    finalized: bool,
}

impl State {
    pub fn new() -> Self {
        Self::with_params(&Params::default())
    }

    fn with_params(params: &Params) -> Self {
        let mut state = Self {
            h: params.to_words(),
            compress_fn: default_compress_impl().0,
            buf: [0; BLOCKBYTES],
            buflen: 0,
            count: 0,
            last_node: params.last_node,
            hash_length: params.hash_length,
            params: params.clone(),
            finalized: false,
        };
        if let Some(key_block) = params.key_block() {
            state.update(&key_block);
        }
        state
    }

    pub fn set_last_node(&mut self, val: bool) -> &mut Self {
        self.last_node = val;
        self
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(BLOCKBYTES - self.buflen as usize, input.len());
        self.buf[self.buflen as usize..self.buflen as usize + take].copy_from_slice(&input[..take]);
        self.buflen += take as u8;
        self.count = self.count.wrapping_add(take as u128);
        *input = &input[take..];
    }

    /// Add input to the hash. Returns [`CoreError::UsedAfterFinalize`] if
    /// called after [`finalize`](State::finalize) without an intervening
    /// [`reset`](State::reset).
    pub fn try_update(&mut self, input: &[u8]) -> Result<&mut Self, CoreError> {
        if self.finalized {
            return Err(CoreError::UsedAfterFinalize);
        }
        Ok(self.update(input))
    }

    #[allow(unused_unsafe)]
    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if !input.is_empty() {
                unsafe {
                    (self.compress_fn)(&mut self.h, &self.buf, self.count, 0, 0);
                }
                self.buflen = 0;
            }
        }
        while input.len() > BLOCKBYTES {
            self.count = self.count.wrapping_add(BLOCKBYTES as u128);
            let block = array_ref!(input, 0, BLOCKBYTES);
            unsafe {
                (self.compress_fn)(&mut self.h, block, self.count, 0, 0);
            }
            input = &input[BLOCKBYTES..];
        }
        self.fill_buf(&mut input);
        self
    }

    /// Finish hashing and return a [`Hash`]. Idempotent: calling this
    /// multiple times returns the same answer, and it remains legal to
    /// `update` with more input afterward.
    pub fn finalize(&mut self) -> Hash {
        for i in self.buflen as usize..BLOCKBYTES {
            self.buf[i] = 0;
        }
        let last_node = if self.last_node { !0u64 } else { 0 };
        let mut h_copy = self.h;
        unsafe {
            (self.compress_fn)(&mut h_copy, &self.buf, self.count, !0, last_node);
        }
        self.finalized = true;
        let mut hash = Hash {
            bytes: [0; OUTBYTES],
            len: self.hash_length,
        };
        for (word, chunk) in h_copy.iter().zip(hash.bytes.chunks_exact_mut(8)) {
            chunk.copy_from_slice(&hash_core_primitives::store_le_u64(*word));
        }
        hash
    }

    /// Re-run `init` with the `Params` this state was built from, as if it
    /// were freshly constructed. Bit-identical to building a new `State`
    /// from the same `Params`.
    pub fn reset(&mut self) {
        *self = Self::with_params(&self.params.clone());
    }

    pub fn count(&self) -> u128 {
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
            "State {{ count: {}, hash_length: {}, last_node: {} }}",
            self.count, self.hash_length, self.last_node
        )
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for State {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.h.zeroize();
        self.buf.zeroize();
    }
}

#[allow(unreachable_code)]
pub(crate) fn default_compress_impl() -> (CompressFn, Compress4Fn) {
    #[cfg(all(target_feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        return (avx2::compress, avx2::compress4);
    }
    #[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("avx2") {
            return (avx2::compress, avx2::compress4);
        }
    }
    (portable::compress, portable::compress4_fallback)
}

#[allow(unreachable_code)]
pub(crate) fn default_compress2_impl() -> Compress2Fn {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        #[cfg(target_arch = "x86_64")]
        {
            // SSE2 is part of the x86_64 baseline ABI.
            return sse2::compress2;
        }
        #[cfg(all(feature = "std", target_arch = "x86"))]
        {
            if is_x86_feature_detected!("sse2") {
                return sse2::compress2;
            }
        }
    }
    portable::compress2_fallback
}

/// A finalized BLAKE2b hash. Supports constant-time equality, for use as a
/// MAC tag.
#[derive(Clone)]
pub struct Hash {
    pub(crate) bytes: [u8; OUTBYTES],
    pub(crate) len: u8,
}

impl Hash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[cfg(feature = "std")]
    pub fn to_hex(&self) -> ArrayString<128> {
        let mut s = ArrayString::new();
        let table = b"0123456789abcdef";
        for &b in self.as_bytes() {
            s.push(table[(b >> 4) as usize] as char);
            s.push(table[(b & 0xf) as usize] as char);
        }
        s
    }
}

impl PartialEq for Hash {
    fn eq(&self, other: &Hash) -> bool {
        constant_time_eq::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for Hash {}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[cfg(feature = "std")]
        {
            write!(f, "Hash({})", self.to_hex())
        }
        #[cfg(not(feature = "std"))]
        {
            write!(f, "Hash({} bytes)", self.len)
        }
    }
}

impl Drop for Hash {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.bytes.zeroize();
    }
}

// Exposed for internal benchmarking and cross-checking only.
#[doc(hidden)]
pub mod benchmarks {
    pub use crate::portable::compress as compress_portable;
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub use crate::avx2::compress as compress_avx2;

    pub fn force_portable(state: &mut super::State) {
        state.compress_fn = super::portable::compress;
    }
}
