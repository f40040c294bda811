// A 4-way batched compression function for BLAKE2s: four independent hash
// computations, one per 32-bit lane of a 128-bit SSE2 register. Mechanically
// the same idea as blake2b_simd's AVX2 compress4, just one tier down in
// both word width and lane count, which happens to line up so that a single
// __m128i carries exactly four BLAKE2s words. Rotations are done with
// shift-and-or rather than `_mm_shuffle_epi8`, so this only ever needs the
// SSE2 baseline.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use core::mem;

use crate::Block;
use crate::StateWords;
use crate::IV;
use crate::SIGMA;

#[inline(always)]
unsafe fn add(a: __m128i, b: __m128i) -> __m128i {
    _mm_add_epi32(a, b)
}

#[inline(always)]
unsafe fn xor(a: __m128i, b: __m128i) -> __m128i {
    _mm_xor_si128(a, b)
}

#[inline(always)]
unsafe fn rot_right(x: __m128i, n: u32) -> __m128i {
    _mm_or_si128(_mm_srli_epi32(x, n as i32), _mm_slli_epi32(x, 32 - n as i32))
}

#[inline(always)]
unsafe fn rot16(x: __m128i) -> __m128i {
    rot_right(x, 16)
}

#[inline(always)]
unsafe fn rot12(x: __m128i) -> __m128i {
    rot_right(x, 12)
}

#[inline(always)]
unsafe fn rot8(x: __m128i) -> __m128i {
    rot_right(x, 8)
}

#[inline(always)]
unsafe fn rot7(x: __m128i) -> __m128i {
    rot_right(x, 7)
}

#[inline(always)]
unsafe fn load_128_from_u32(x: u32) -> __m128i {
    _mm_set1_epi32(x as i32)
}

#[inline(always)]
unsafe fn load_128_from_4xu32(x0: u32, x1: u32, x2: u32, x3: u32) -> __m128i {
    _mm_set_epi32(x3 as i32, x2 as i32, x1 as i32, x0 as i32)
}

#[inline(always)]
unsafe fn load_msg4_words(msg0: &Block, msg1: &Block, msg2: &Block, msg3: &Block, i: usize) -> __m128i {
    let word = |msg: &Block| {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&msg[4 * i..4 * i + 4]);
        u32::from_le_bytes(buf)
    };
    load_128_from_4xu32(word(msg0), word(msg1), word(msg2), word(msg3))
}

#[inline(always)]
unsafe fn blake2s_round_4x(v: &mut [__m128i; 16], m: &[__m128i; 16], r: usize) {
    let s = SIGMA[r];

    v[0] = add(v[0], m[s[0] as usize]);
    v[1] = add(v[1], m[s[2] as usize]);
    v[2] = add(v[2], m[s[4] as usize]);
    v[3] = add(v[3], m[s[6] as usize]);
    v[0] = add(v[0], v[4]);
    v[1] = add(v[1], v[5]);
    v[2] = add(v[2], v[6]);
    v[3] = add(v[3], v[7]);
    v[12] = xor(v[12], v[0]);
    v[13] = xor(v[13], v[1]);
    v[14] = xor(v[14], v[2]);
    v[15] = xor(v[15], v[3]);
    v[12] = rot16(v[12]);
    v[13] = rot16(v[13]);
    v[14] = rot16(v[14]);
    v[15] = rot16(v[15]);
    v[8] = add(v[8], v[12]);
    v[9] = add(v[9], v[13]);
    v[10] = add(v[10], v[14]);
    v[11] = add(v[11], v[15]);
    v[4] = xor(v[4], v[8]);
    v[5] = xor(v[5], v[9]);
    v[6] = xor(v[6], v[10]);
    v[7] = xor(v[7], v[11]);
    v[4] = rot12(v[4]);
    v[5] = rot12(v[5]);
    v[6] = rot12(v[6]);
    v[7] = rot12(v[7]);

    v[0] = add(v[0], m[s[1] as usize]);
    v[1] = add(v[1], m[s[3] as usize]);
    v[2] = add(v[2], m[s[5] as usize]);
    v[3] = add(v[3], m[s[7] as usize]);
    v[0] = add(v[0], v[4]);
    v[1] = add(v[1], v[5]);
    v[2] = add(v[2], v[6]);
    v[3] = add(v[3], v[7]);
    v[12] = xor(v[12], v[0]);
    v[13] = xor(v[13], v[1]);
    v[14] = xor(v[14], v[2]);
    v[15] = xor(v[15], v[3]);
    v[12] = rot8(v[12]);
    v[13] = rot8(v[13]);
    v[14] = rot8(v[14]);
    v[15] = rot8(v[15]);
    v[8] = add(v[8], v[12]);
    v[9] = add(v[9], v[13]);
    v[10] = add(v[10], v[14]);
    v[11] = add(v[11], v[15]);
    v[4] = xor(v[4], v[8]);
    v[5] = xor(v[5], v[9]);
    v[6] = xor(v[6], v[10]);
    v[7] = xor(v[7], v[11]);
    v[4] = rot7(v[4]);
    v[5] = rot7(v[5]);
    v[6] = rot7(v[6]);
    v[7] = rot7(v[7]);

    v[0] = add(v[0], m[s[8] as usize]);
    v[1] = add(v[1], m[s[10] as usize]);
    v[2] = add(v[2], m[s[12] as usize]);
    v[3] = add(v[3], m[s[14] as usize]);
    v[0] = add(v[0], v[5]);
    v[1] = add(v[1], v[6]);
    v[2] = add(v[2], v[7]);
    v[3] = add(v[3], v[4]);
    v[15] = xor(v[15], v[0]);
    v[12] = xor(v[12], v[1]);
    v[13] = xor(v[13], v[2]);
    v[14] = xor(v[14], v[3]);
    v[15] = rot16(v[15]);
    v[12] = rot16(v[12]);
    v[13] = rot16(v[13]);
    v[14] = rot16(v[14]);
    v[10] = add(v[10], v[15]);
    v[11] = add(v[11], v[12]);
    v[8] = add(v[8], v[13]);
    v[9] = add(v[9], v[14]);
    v[5] = xor(v[5], v[10]);
    v[6] = xor(v[6], v[11]);
    v[7] = xor(v[7], v[8]);
    v[4] = xor(v[4], v[9]);
    v[5] = rot12(v[5]);
    v[6] = rot12(v[6]);
    v[7] = rot12(v[7]);
    v[4] = rot12(v[4]);

    v[0] = add(v[0], m[s[9] as usize]);
    v[1] = add(v[1], m[s[11] as usize]);
    v[2] = add(v[2], m[s[13] as usize]);
    v[3] = add(v[3], m[s[15] as usize]);
    v[0] = add(v[0], v[5]);
    v[1] = add(v[1], v[6]);
    v[2] = add(v[2], v[7]);
    v[3] = add(v[3], v[4]);
    v[15] = xor(v[15], v[0]);
    v[12] = xor(v[12], v[1]);
    v[13] = xor(v[13], v[2]);
    v[14] = xor(v[14], v[3]);
    v[15] = rot8(v[15]);
    v[12] = rot8(v[12]);
    v[13] = rot8(v[13]);
    v[14] = rot8(v[14]);
    v[10] = add(v[10], v[15]);
    v[11] = add(v[11], v[12]);
    v[8] = add(v[8], v[13]);
    v[9] = add(v[9], v[14]);
    v[5] = xor(v[5], v[10]);
    v[6] = xor(v[6], v[11]);
    v[7] = xor(v[7], v[8]);
    v[4] = xor(v[4], v[9]);
    v[5] = rot7(v[5]);
    v[6] = rot7(v[6]);
    v[7] = rot7(v[7]);
    v[4] = rot7(v[4]);
}

#[inline(always)]
unsafe fn export_state_words_4x(
    orig_vec: __m128i,
    low_state: __m128i,
    high_state: __m128i,
    h0: &mut StateWords,
    h1: &mut StateWords,
    h2: &mut StateWords,
    h3: &mut StateWords,
    i: usize,
) {
    let parts: [u32; 4] = mem::transmute(xor(xor(orig_vec, low_state), high_state));
    h0[i] = parts[0];
    h1[i] = parts[1];
    h2[i] = parts[2];
    h3[i] = parts[3];
}

#[allow(clippy::too_many_arguments)]
#[target_feature(enable = "sse2")]
pub unsafe fn compress4(
    h0: &mut StateWords,
    h1: &mut StateWords,
    h2: &mut StateWords,
    h3: &mut StateWords,
    msg0: &Block,
    msg1: &Block,
    msg2: &Block,
    msg3: &Block,
    count0: u64,
    count1: u64,
    count2: u64,
    count3: u64,
    lastblock0: u32,
    lastblock1: u32,
    lastblock2: u32,
    lastblock3: u32,
    lastnode0: u32,
    lastnode1: u32,
    lastnode2: u32,
    lastnode3: u32,
) {
    let h_vecs = [
        load_128_from_4xu32(h0[0], h1[0], h2[0], h3[0]),
        load_128_from_4xu32(h0[1], h1[1], h2[1], h3[1]),
        load_128_from_4xu32(h0[2], h1[2], h2[2], h3[2]),
        load_128_from_4xu32(h0[3], h1[3], h2[3], h3[3]),
        load_128_from_4xu32(h0[4], h1[4], h2[4], h3[4]),
        load_128_from_4xu32(h0[5], h1[5], h2[5], h3[5]),
        load_128_from_4xu32(h0[6], h1[6], h2[6], h3[6]),
        load_128_from_4xu32(h0[7], h1[7], h2[7], h3[7]),
    ];
    let count_low = load_128_from_4xu32(count0 as u32, count1 as u32, count2 as u32, count3 as u32);
    let count_high = load_128_from_4xu32(
        (count0 >> 32) as u32,
        (count1 >> 32) as u32,
        (count2 >> 32) as u32,
        (count3 >> 32) as u32,
    );
    let lastblock = load_128_from_4xu32(lastblock0, lastblock1, lastblock2, lastblock3);
    let lastnode = load_128_from_4xu32(lastnode0, lastnode1, lastnode2, lastnode3);
    let mut v = [
        h_vecs[0],
        h_vecs[1],
        h_vecs[2],
        h_vecs[3],
        h_vecs[4],
        h_vecs[5],
        h_vecs[6],
        h_vecs[7],
        load_128_from_u32(IV[0]),
        load_128_from_u32(IV[1]),
        load_128_from_u32(IV[2]),
        load_128_from_u32(IV[3]),
        xor(load_128_from_u32(IV[4]), count_low),
        xor(load_128_from_u32(IV[5]), count_high),
        xor(load_128_from_u32(IV[6]), lastblock),
        xor(load_128_from_u32(IV[7]), lastnode),
    ];
    let m = [
        load_msg4_words(msg0, msg1, msg2, msg3, 0),
        load_msg4_words(msg0, msg1, msg2, msg3, 1),
        load_msg4_words(msg0, msg1, msg2, msg3, 2),
        load_msg4_words(msg0, msg1, msg2, msg3, 3),
        load_msg4_words(msg0, msg1, msg2, msg3, 4),
        load_msg4_words(msg0, msg1, msg2, msg3, 5),
        load_msg4_words(msg0, msg1, msg2, msg3, 6),
        load_msg4_words(msg0, msg1, msg2, msg3, 7),
        load_msg4_words(msg0, msg1, msg2, msg3, 8),
        load_msg4_words(msg0, msg1, msg2, msg3, 9),
        load_msg4_words(msg0, msg1, msg2, msg3, 10),
        load_msg4_words(msg0, msg1, msg2, msg3, 11),
        load_msg4_words(msg0, msg1, msg2, msg3, 12),
        load_msg4_words(msg0, msg1, msg2, msg3, 13),
        load_msg4_words(msg0, msg1, msg2, msg3, 14),
        load_msg4_words(msg0, msg1, msg2, msg3, 15),
    ];

    blake2s_round_4x(&mut v, &m, 0);
    blake2s_round_4x(&mut v, &m, 1);
    blake2s_round_4x(&mut v, &m, 2);
    blake2s_round_4x(&mut v, &m, 3);
    blake2s_round_4x(&mut v, &m, 4);
    blake2s_round_4x(&mut v, &m, 5);
    blake2s_round_4x(&mut v, &m, 6);
    blake2s_round_4x(&mut v, &m, 7);
    blake2s_round_4x(&mut v, &m, 8);
    blake2s_round_4x(&mut v, &m, 9);

    export_state_words_4x(h_vecs[0], v[0], v[8], h0, h1, h2, h3, 0);
    export_state_words_4x(h_vecs[1], v[1], v[9], h0, h1, h2, h3, 1);
    export_state_words_4x(h_vecs[2], v[2], v[10], h0, h1, h2, h3, 2);
    export_state_words_4x(h_vecs[3], v[3], v[11], h0, h1, h2, h3, 3);
    export_state_words_4x(h_vecs[4], v[4], v[12], h0, h1, h2, h3, 4);
    export_state_words_4x(h_vecs[5], v[5], v[13], h0, h1, h2, h3, 5);
    export_state_words_4x(h_vecs[6], v[6], v[14], h0, h1, h2, h3, 6);
    export_state_words_4x(h_vecs[7], v[7], v[15], h0, h1, h2, h3, 7);
}
