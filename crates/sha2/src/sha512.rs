use arrayvec::ArrayString;
use core::cmp;
use core::fmt;
use hash_core_primitives::CoreError;

use crate::{portable, Block512, Compress512Fn, StateWords512, BLOCKBYTES512, IV512, OUTBYTES512};

/// Compute the SHA-512 hash of a slice of bytes.
pub fn sha512(input: &[u8]) -> Hash512 {
    let mut state = State512::new();
    state.update(input);
    state.finalize()
}

/// A parameter builder for SHA-512. See [`crate::sha256::Params256`] for
/// why this exists even though SHA-2 has no configurable options.
#[derive(Clone, Default)]
pub struct Params512 {
    _private: (),
}

impl Params512 {
    pub fn new() -> Self {
        Self { _private: () }
    }

    pub fn to_state(&self) -> State512 {
        State512::new()
    }
}

/// An incremental SHA-512 hasher. See [`crate::sha256::State256`] for the
/// shape; the only difference is the 128-bit total-bit-length counter and
/// the 128-byte block.
#[derive(Clone)]
pub struct State512 {
    h: StateWords512,
    buf: Block512,
    buflen: u16,
    count: u128,
    compress_fn: Compress512Fn,
    finalized: bool,
}

impl State512 {
    pub fn new() -> Self {
        Self {
            h: IV512,
            buf: [0; BLOCKBYTES512],
            buflen: 0,
            count: 0,
            compress_fn: portable::compress512,
            finalized: false,
        }
    }

    /// The SHA-512 analogue of [`crate::sha256::State256::from_words`].
    pub(crate) fn from_words(h: StateWords512, blocks_compressed: usize) -> Self {
        Self {
            h,
            buf: [0; BLOCKBYTES512],
            buflen: 0,
            count: (blocks_compressed * BLOCKBYTES512) as u128,
            compress_fn: portable::compress512,
            finalized: false,
        }
    }

    fn fill_buf(&mut self, input: &mut &[u8]) {
        let take = cmp::min(BLOCKBYTES512 - self.buflen as usize, input.len());
        self.buf[self.buflen as usize..self.buflen as usize + take].copy_from_slice(&input[..take]);
        self.buflen += take as u16;
        *input = &input[take..];
    }

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
        // `BLOCKBYTES512` on entry to `finalize`.
        if self.buflen > 0 {
            self.fill_buf(&mut input);
            if self.buflen as usize == BLOCKBYTES512 {
                (self.compress_fn)(&mut self.h, &self.buf);
                self.count = self.count.wrapping_add(BLOCKBYTES512 as u128);
                self.buflen = 0;
            }
        }
        while input.len() >= BLOCKBYTES512 {
            let block = array_ref!(input, 0, BLOCKBYTES512);
            (self.compress_fn)(&mut self.h, block);
            self.count = self.count.wrapping_add(BLOCKBYTES512 as u128);
            input = &input[BLOCKBYTES512..];
        }
        self.fill_buf(&mut input);
        self
    }

    pub fn finalize(&mut self) -> Hash512 {
        let total_bits = (self.count.wrapping_add(self.buflen as u128)).wrapping_mul(8);
        let mut h_copy = self.h;
        let mut buf = self.buf;
        let mut buflen = self.buflen as usize;

        buf[buflen] = 0x80;
        buflen += 1;

        if buflen > BLOCKBYTES512 - 16 {
            for b in &mut buf[buflen..] {
                *b = 0;
            }
            (self.compress_fn)(&mut h_copy, &buf);
            buf = [0; BLOCKBYTES512];
            buflen = 0;
        }
        for b in &mut buf[buflen..BLOCKBYTES512 - 16] {
            *b = 0;
        }
        buf[BLOCKBYTES512 - 16..].copy_from_slice(&total_bits.to_be_bytes());
        (self.compress_fn)(&mut h_copy, &buf);

        self.finalized = true;
        let mut hash = Hash512 { bytes: [0; OUTBYTES512] };
        for (word, chunk) in h_copy.iter().zip(hash.bytes.chunks_exact_mut(8)) {
            chunk.copy_from_slice(&hash_core_primitives::store_be_u64(*word));
        }
        hash
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn count(&self) -> u128 {
        self.count.wrapping_add(self.buflen as u128)
    }
}

#[cfg(feature = "std")]
impl std::io::Write for State512 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for State512 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "State512 {{ count: {} }}", self.count())
    }
}

impl Default for State512 {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for State512 {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.h.zeroize();
        self.buf.zeroize();
    }
}

/// A finalized SHA-512 hash. Supports constant-time equality.
#[derive(Clone)]
pub struct Hash512 {
    bytes: [u8; OUTBYTES512],
}

impl Hash512 {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
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

impl PartialEq for Hash512 {
    fn eq(&self, other: &Hash512) -> bool {
        constant_time_eq::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for Hash512 {}

impl AsRef<[u8]> for Hash512 {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Hash512 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        #[cfg(feature = "std")]
        {
            write!(f, "Hash512({})", self.to_hex())
        }
        #[cfg(not(feature = "std"))]
        {
            write!(f, "Hash512(64 bytes)")
        }
    }
}

impl Drop for Hash512 {
    fn drop(&mut self) {
        use hash_core_primitives::Zeroize;
        self.bytes.zeroize();
    }
}

#[doc(hidden)]
pub mod benchmarks {
    pub use crate::portable::compress512 as compress_portable;
}
