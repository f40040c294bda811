//! Byte <-> word marshalling that never depends on the host's native
//! endianness. These are total functions: every input byte slice of the
//! right length produces a word, every word produces bytes, full stop.

#[inline(always)]
pub fn load_le_u32(bytes: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*bytes)
}

#[inline(always)]
pub fn load_le_u64(bytes: &[u8; 8]) -> u64 {
    u64::from_le_bytes(*bytes)
}

#[inline(always)]
pub fn load_be_u32(bytes: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*bytes)
}

#[inline(always)]
pub fn load_be_u64(bytes: &[u8; 8]) -> u64 {
    u64::from_be_bytes(*bytes)
}

#[inline(always)]
pub fn store_le_u32(word: u32) -> [u8; 4] {
    word.to_le_bytes()
}

#[inline(always)]
pub fn store_le_u64(word: u64) -> [u8; 8] {
    word.to_le_bytes()
}

#[inline(always)]
pub fn store_be_u32(word: u32) -> [u8; 4] {
    word.to_be_bytes()
}

#[inline(always)]
pub fn store_be_u64(word: u64) -> [u8; 8] {
    word.to_be_bytes()
}

/// Load 16 little-endian `u32` words out of a 64-byte block, as BLAKE2s does
/// with its message schedule.
#[inline(always)]
pub fn load_block_le_u32(block: &[u8; 64]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Load 16 little-endian `u64` words out of a 128-byte block, as BLAKE2b does
/// with its message schedule.
#[inline(always)]
pub fn load_block_le_u64(block: &[u8; 128]) -> [u64; 16] {
    let mut words = [0u64; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }
    words
}

/// Load 16 big-endian `u32` words out of a 64-byte block, as SHA-256 does.
#[inline(always)]
pub fn load_block_be_u32(block: &[u8; 64]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Load 16 big-endian `u64` words out of a 128-byte block, as SHA-512 does.
#[inline(always)]
pub fn load_block_be_u64(block: &[u8; 128]) -> [u64; 16] {
    let mut words = [0u64; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_be_bytes(buf);
    }
    words
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn le_round_trip() {
        let w = 0xdead_beef_u32;
        assert_eq!(w, load_le_u32(&store_le_u32(w)));
        let w = 0x0123_4567_89ab_cdef_u64;
        assert_eq!(w, load_le_u64(&store_le_u64(w)));
    }

    #[test]
    fn be_round_trip() {
        let w = 0xdead_beef_u32;
        assert_eq!(w, load_be_u32(&store_be_u32(w)));
        let w = 0x0123_4567_89ab_cdef_u64;
        assert_eq!(w, load_be_u64(&store_be_u64(w)));
    }
}
