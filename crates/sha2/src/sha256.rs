use arrayvec::ArrayString;
use core::cmp;
use core::fmt;
use hash_core_primitives::CoreError;

use crate::{portable, Block256, Compress256Fn, StateWords256, BLOCKBYTES256, IV256, OUTBYTES256};

/// Compute the SHA-256 hash of a slice of bytes.
pub fn sha256(input: &[u8]) -> Hash256 {
    let mut state = State256::new();
    state.update(input);
    state.finalize()
}

/// A parameter builder for SHA-256. SHA-2 has no key/salt/tree
/// configuration of its own; the only option is the digest length, which
/// is fixed at [`crate::OUTBYTES256`] bytes — the setter exists so callers
/// can treat every digest crate in the family through the same shape, and
/// returns [`CoreError::InvalidParameter`] for any other value.
#[derive(Clone, Default)]
pub struct Params256 {
    _private: (),
}

impl Params256 {
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn to_state(&self) -> State256 {
        State256::new()
    }
}

/// An incremental SHA-256 hasher. Absorbs bytes with repeated calls to
/// [`update`](State256::update), and produces a [`Hash256`] from exactly
/// one call to [`finalize`](State256::finalize). [`reset`](State256::reset)
/// re-runs `init`.
#[derive(Clone)]
pub struct State256 {
    h: StateWords256,
    buf: Block256,
    buflen: u8,
    // total bytes absorbed so far, not counting the still-buffered residue.
    count: u64,
    compress_fn: Compress256Fn,
    finalized: bool,
}

impl State256 {
    pub fn new() -> Self {
        Self {
            h: IV256,
            buf: [0; BLOCKBYTES256],
            buflen: 0,
            count: 0,
            compress_fn: default_compress_impl(),
            finalized: false,
        }
    }

    /// Build a state resuming from `h` after `blocks_compressed` full
    /// blocks were already folded in elsewhere (used by
    /// [`crate::many::hash_many_256`] to hand a batch-compressed prefix off
    /// to the portable padding/finalize logic for its tail).
    pub(crate) fn from_words(h: StateWords256, blocks_compressed: usize) -> Self {
        Self {
            h,
            buf: [0; BLOCKBYTES256],
            buflen: 0,
            count: (blocks_compressed * BLOCKBYTES256) as u64,
            compress_fn: default_compress_impl(),
            finalized: false,
        }
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(BLOCKBYTES256 - self.buflen as usize, input.len());
        self.buf[self.buflen as usize..self.buflen as usize + take].copy_from_slice(&input[..take]);
        self.buflen += take as u8;
        *input = &input[take..];
    }

    /// Add input to the hash. Returns [`CoreError::UsedAfterFinalize`] if
    /// called after [`finalize`](State256::finalize) without an
    /// intervening [`reset`](State256::reset).
    pub fn try_update(&mut self, input: &[u8]) -> Result<&mut Self, CoreError> {
        if self.finalized {
            return Err(CoreError::UsedAfterFinalize);
        }
        Ok(self.update(input))
    }

    pub fn update(&mut self, mut input: &[u8]) -> &mut Self {
        // Unlike BLAKE2's deferred-last-block finalize, SHA-2's padding
        // rule needs room for at least one 0x80 byte in the buffer, so a
        // full buffer is always flushed here; `buflen` is never
        // `BLOCKBYTES256` on entry to `finalize`.
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if self.buflen as usize == BLOCKBYTES256 {
                (self.compress_fn)(&mut self.h, &self.buf);
                self.count = self.count.wrapping_add(BLOCKBYTES256 as u64);
                self.buflen = 0;
            }
        }
        while input.len() >= BLOCKBYTES256 {
            let block = array_ref!(input, 0, BLOCKBYTES256);
            (self.compress_fn)(&mut self.h, block);
            self.count = self.count.wrapping_add(BLOCKBYTES256 as u64);
            input = &input[BLOCKBYTES256..];
        }
        self.fill_buf(&mut input);
        self
    }

    /// Finish hashing and return a [`Hash256`]. Idempotent: calling this
    /// multiple times returns the same answer.
    pub fn finalize(&mut self) -> Hash256 {
        // total message length in bits, counted before the 0x80/zero padding.
        let total_bits = (self.count.wrapping_add(self.buflen as u64)).wrapping_mul(8);
        let mut h_copy = self.h;
        let mut buf = self.buf;
        let mut buflen = self.buflen as usize;

        buf[buflen] = 0x80;
        buflen += 1;

        if buflen > BLOCKBYTES256 - 8 {
            for b in &mut buf[buflen..] {
                *b = 0;
            }
            (self.compress_fn)(&mut h_copy, &buf);
            buf = [0; BLOCKBYTES256];
            buflen = 0;
        }
        for b in &mut buf[buflen..BLOCKBYTES256 - 8] {
            *b = 0;
        }
        buf[BLOCKBYTES256 - 8..].copy_from_slice(&total_bits.to_be_bytes());
        (self.compress_fn)(&mut h_copy, &buf);

        self.finalized = true;
        let mut hash = Hash256 { bytes: [0; OUTBYTES256] };
        for (word, chunk) in h_copy.iter().zip(hash.bytes.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&hash_core_primitives::store_be_u32(*word));
        }
        hash
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn count(&self) -> u64 {
        self.count.wrapping_add(self.buflen as u64)
    }
}

#[cfg(feature = "std")]
impl std::io::Write for State256 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for State256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "State256 {{ count: {} }}", self.count())
    }
}

impl Default for State256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for State256 {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.h.zeroize();
        self.buf.zeroize();
    }
}

// CPU feature selection happens once, here, rather than per-block: the hot
// compression loop never re-checks `is_x86_feature_detected!`.
#[allow(unreachable_code)]
pub(crate) fn default_compress_impl() -> Compress256Fn {
    #[cfg(all(target_feature = "sha", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        return crate::shani::compress256;
    }
    #[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if is_x86_feature_detected!("sha") && is_x86_feature_detected!("sse2") {
            return crate::shani::compress256;
        }
    }
    portable::compress256
}

/// A finalized SHA-256 hash. Supports constant-time equality.
#[derive(Clone)]
pub struct Hash256 {
    bytes: [u8; OUTBYTES256],
}

impl Hash256 {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(feature = "std")]
    pub fn to_hex(&self) -> ArrayString<64> {
        let mut s = ArrayString::new();
        let table = b"0123456789abcdef";
        for &b in self.as_bytes() {
            s.push(table[(b >> 4) as usize] as char);
            s.push(table[(b & 0xf) as usize] as char);
        }
        s
    }
}

impl PartialEq for Hash256 {
    fn eq(&self, other: &Hash256) -> bool {
        constant_time_eq::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for Hash256 {}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[cfg(feature = "std")]
        {
            write!(f, "Hash256({})", self.to_hex())
        }
        #[cfg(not(feature = "std"))]
        {
            write!(f, "Hash256(32 bytes)")
        }
    }
}

impl Drop for Hash256 {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.bytes.zeroize();
    }
}

#[doc(hidden)]
pub mod benchmarks {
    pub use crate::portable::compress256 as compress_portable;
}
