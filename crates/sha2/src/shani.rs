//! SHA-256 compression accelerated by the x86 SHA extensions. The message
//! schedule itself is expanded on the scalar path (`portable::schedule_256`
//! is already the verified, bit-exact recipe); what SHA-NI buys here is the
//! round function, where a single `sha256rnds2` instruction-pair folds two
//! rounds of the Davies-Meyer compression into one. Selected once at
//! [`State256::new`](crate::sha256::State256::new) via
//! [`is_x86_feature_detected!`] and never re-checked per block.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::portable::{schedule_256, K256};
use crate::{Block256, StateWords256};

#[target_feature(enable = "sha,sse2,ssse3,sse4.1")]
unsafe fn compress256_inner(state: &mut StateWords256, block: &Block256) {
    let w = schedule_256(block);

    // abcd holds {a,b,c,d}, efgh holds {e,f,g,h}, both packed high-to-low.
    let mut abcd = _mm_loadu_si128(state.as_ptr() as *const __m128i);
    let mut efgh = _mm_loadu_si128(state.as_ptr().add(4) as *const __m128i);
    abcd = _mm_shuffle_epi32(abcd, 0xB1); // CDAB
    efgh = _mm_shuffle_epi32(efgh, 0x1B); // EFGH -> HGFE
    let tmp = _mm_alignr_epi8(abcd, efgh, 8);
    efgh = _mm_blend_epi16(efgh, abcd, 0xF0);
    abcd = tmp;

    let abcd_save = abcd;
    let efgh_save = efgh;

    // Two scalar schedule words (plus their round constants) packed into one
    // 128-bit lane at a time, high word first, feeding one `rnds2` call for
    // each half of a quad-round.
    for t in (0..64).step_by(2) {
        let lo = w[t].wrapping_add(K256[t]);
        let hi = w[t + 1].wrapping_add(K256[t + 1]);
        let msg = _mm_set_epi32(0, 0, hi as i32, lo as i32);
        abcd = _mm_sha256rnds2_epu32(abcd, efgh, msg);
        let msg = _mm_shuffle_epi32(msg, 0x0E);
        efgh = _mm_sha256rnds2_epu32(efgh, abcd, msg);
    }

    abcd = _mm_add_epi32(abcd, abcd_save);
    efgh = _mm_add_epi32(efgh, efgh_save);

    let tmp = _mm_shuffle_epi32(abcd, 0x1B); // FEBA
    let efgh_shuf = _mm_shuffle_epi32(efgh, 0xB1); // DCHG
    abcd = _mm_blend_epi16(tmp, efgh_shuf, 0xF0); // DCBA
    efgh = _mm_alignr_epi8(efgh_shuf, tmp, 8); // ABEF

    _mm_storeu_si128(state.as_mut_ptr() as *mut __m128i, abcd);
    _mm_storeu_si128(state.as_mut_ptr().add(4) as *mut __m128i, efgh);
}

/// Compress one 64-byte block using the SHA-NI instructions. Caller must
/// only reach this after a successful `is_x86_feature_detected!("sha")`
/// check (or an equivalent build-time guarantee); calling it otherwise is
/// undefined behavior, same caveat as the AVX2/SSE2 paths in the BLAKE2
/// crates.
pub fn compress256(state: &mut StateWords256, block: &Block256) {
    unsafe {
        compress256_inner(state, block);
    }
}
