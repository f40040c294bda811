// A 2-way batched compression function, for platforms with SSE2 but no
// AVX2. Mechanically the same idea as avx2::compress4, just with __m128i
// lanes holding two independent hash computations instead of __m256i lanes
// holding four. Rotations are done with shift-and-or rather than
// `_mm_shuffle_epi8`, so that this module only ever needs the SSE2 baseline
// (guaranteed on x86_64, detected at runtime on x86) instead of SSSE3.

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
    _mm_add_epi64(a, b)
}

#[inline(always)]
unsafe fn xor(a: __m128i, b: __m128i) -> __m128i {
    _mm_xor_si128(a, b)
}

#[inline(always)]
unsafe fn rot_right(x: __m128i, n: u32) -> __m128i {
    _mm_or_si128(_mm_srli_epi64(x, n as i32), _mm_slli_epi64(x, 64 - n as i32))
}

#[inline(always)]
unsafe fn rot32(x: __m128i) -> __m128i {
    rot_right(x, 32)
}

#[inline(always)]
unsafe fn rot24(x: __m128i) -> __m128i {
    rot_right(x, 24)
}

#[inline(always)]
unsafe fn rot16(x: __m128i) -> __m128i {
    rot_right(x, 16)
}

#[inline(always)]
unsafe fn rot63(x: __m128i) -> __m128i {
    rot_right(x, 63)
}

#[inline(always)]
unsafe fn load_128_from_u64(x: u64) -> __m128i {
    _mm_set1_epi64x(x as i64)
}

#[inline(always)]
unsafe fn load_128_from_2xu64(x1: u64, x2: u64) -> __m128i {
    _mm_set_epi64x(x2 as i64, x1 as i64)
}

#[inline(always)]
unsafe fn load_msg2_words(msg0: &Block, msg1: &Block, i: usize) -> __m128i {
    let mut buf0 = [0u8; 8];
    buf0.copy_from_slice(&msg0[8 * i..8 * i + 8]);
    let mut buf1 = [0u8; 8];
    buf1.copy_from_slice(&msg1[8 * i..8 * i + 8]);
    load_128_from_2xu64(u64::from_le_bytes(buf0), u64::from_le_bytes(buf1))
}

#[inline(always)]
unsafe fn blake2b_round_2x(v: &mut [__m128i; 16], m: &[__m128i; 16], r: usize) {
    v[0] = add(v[0], m[SIGMA[r][0] as usize]);
    v[1] = add(v[1], m[SIGMA[r][2] as usize]);
    v[2] = add(v[2], m[SIGMA[r][4] as usize]);
    v[3] = add(v[3], m[SIGMA[r][6] as usize]);
    v[0] = add(v[0], v[4]);
    v[1] = add(v[1], v[5]);
    v[2] = add(v[2], v[6]);
    v[3] = add(v[3], v[7]);
    v[12] = xor(v[12], v[0]);
    v[13] = xor(v[13], v[1]);
    v[14] = xor(v[14], v[2]);
    v[15] = xor(v[15], v[3]);
    v[12] = rot32(v[12]);
    v[13] = rot32(v[13]);
    v[14] = rot32(v[14]);
    v[15] = rot32(v[15]);
    v[8] = add(v[8], v[12]);
    v[9] = add(v[9], v[13]);
    v[10] = add(v[10], v[14]);
    v[11] = add(v[11], v[15]);
    v[4] = xor(v[4], v[8]);
    v[5] = xor(v[5], v[9]);
    v[6] = xor(v[6], v[10]);
    v[7] = xor(v[7], v[11]);
    v[4] = rot24(v[4]);
    v[5] = rot24(v[5]);
    v[6] = rot24(v[6]);
    v[7] = rot24(v[7]);
    v[0] = add(v[0], m[SIGMA[r][1] as usize]);
    v[1] = add(v[1], m[SIGMA[r][3] as usize]);
    v[2] = add(v[2], m[SIGMA[r][5] as usize]);
    v[3] = add(v[3], m[SIGMA[r][7] as usize]);
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
    v[4] = rot63(v[4]);
    v[5] = rot63(v[5]);
    v[6] = rot63(v[6]);
    v[7] = rot63(v[7]);

    v[0] = add(v[0], m[SIGMA[r][8] as usize]);
    v[1] = add(v[1], m[SIGMA[r][10] as usize]);
    v[2] = add(v[2], m[SIGMA[r][12] as usize]);
    v[3] = add(v[3], m[SIGMA[r][14] as usize]);
    v[0] = add(v[0], v[5]);
    v[1] = add(v[1], v[6]);
    v[2] = add(v[2], v[7]);
    v[3] = add(v[3], v[4]);
    v[15] = xor(v[15], v[0]);
    v[12] = xor(v[12], v[1]);
    v[13] = xor(v[13], v[2]);
    v[14] = xor(v[14], v[3]);
    v[15] = rot32(v[15]);
    v[12] = rot32(v[12]);
    v[13] = rot32(v[13]);
    v[14] = rot32(v[14]);
    v[10] = add(v[10], v[15]);
    v[11] = add(v[11], v[12]);
    v[8] = add(v[8], v[13]);
    v[9] = add(v[9], v[14]);
    v[5] = xor(v[5], v[10]);
    v[6] = xor(v[6], v[11]);
    v[7] = xor(v[7], v[8]);
    v[4] = xor(v[4], v[9]);
    v[5] = rot24(v[5]);
    v[6] = rot24(v[6]);
    v[7] = rot24(v[7]);
    v[4] = rot24(v[4]);
    v[0] = add(v[0], m[SIGMA[r][9] as usize]);
    v[1] = add(v[1], m[SIGMA[r][11] as usize]);
    v[2] = add(v[2], m[SIGMA[r][13] as usize]);
    v[3] = add(v[3], m[SIGMA[r][15] as usize]);
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
    v[5] = rot63(v[5]);
    v[6] = rot63(v[6]);
    v[7] = rot63(v[7]);
    v[4] = rot63(v[4]);
}

#[inline(always)]
unsafe fn export_state_words_2x(
    orig_vec: __m128i,
    low_state: __m128i,
    high_state: __m128i,
    h0: &mut StateWords,
    h1: &mut StateWords,
    i: usize,
) {
    let parts: [u64; 2] = mem::transmute(xor(xor(orig_vec, low_state), high_state));
    h0[i] = parts[0];
    h1[i] = parts[1];
}

#[allow(clippy::too_many_arguments)]
#[target_feature(enable = "sse2")]
pub unsafe fn compress2(
    h0: &mut StateWords,
    h1: &mut StateWords,
    msg0: &Block,
    msg1: &Block,
    count0: u128,
    count1: u128,
    lastblock0: u64,
    lastblock1: u64,
    lastnode0: u64,
    lastnode1: u64,
) {
    let h_vecs = [
        load_128_from_2xu64(h0[0], h1[0]),
        load_128_from_2xu64(h0[1], h1[1]),
        load_128_from_2xu64(h0[2], h1[2]),
        load_128_from_2xu64(h0[3], h1[3]),
        load_128_from_2xu64(h0[4], h1[4]),
        load_128_from_2xu64(h0[5], h1[5]),
        load_128_from_2xu64(h0[6], h1[6]),
        load_128_from_2xu64(h0[7], h1[7]),
    ];
    let count_low = load_128_from_2xu64(count0 as u64, count1 as u64);
    let count_high = load_128_from_2xu64((count0 >> 64) as u64, (count1 >> 64) as u64);
    let lastblock = load_128_from_2xu64(lastblock0, lastblock1);
    let lastnode = load_128_from_2xu64(lastnode0, lastnode1);
    let mut v = [
        h_vecs[0],
        h_vecs[1],
        h_vecs[2],
        h_vecs[3],
        h_vecs[4],
        h_vecs[5],
        h_vecs[6],
        h_vecs[7],
        load_128_from_u64(IV[0]),
        load_128_from_u64(IV[1]),
        load_128_from_u64(IV[2]),
        load_128_from_u64(IV[3]),
        xor(load_128_from_u64(IV[4]), count_low),
        xor(load_128_from_u64(IV[5]), count_high),
        xor(load_128_from_u64(IV[6]), lastblock),
        xor(load_128_from_u64(IV[7]), lastnode),
    ];
    let m = [
        load_msg2_words(msg0, msg1, 0),
        load_msg2_words(msg0, msg1, 1),
        load_msg2_words(msg0, msg1, 2),
        load_msg2_words(msg0, msg1, 3),
        load_msg2_words(msg0, msg1, 4),
        load_msg2_words(msg0, msg1, 5),
        load_msg2_words(msg0, msg1, 6),
        load_msg2_words(msg0, msg1, 7),
        load_msg2_words(msg0, msg1, 8),
        load_msg2_words(msg0, msg1, 9),
        load_msg2_words(msg0, msg1, 10),
        load_msg2_words(msg0, msg1, 11),
        load_msg2_words(msg0, msg1, 12),
        load_msg2_words(msg0, msg1, 13),
        load_msg2_words(msg0, msg1, 14),
        load_msg2_words(msg0, msg1, 15),
    ];

    blake2b_round_2x(&mut v, &m, 0);
    blake2b_round_2x(&mut v, &m, 1);
    blake2b_round_2x(&mut v, &m, 2);
    blake2b_round_2x(&mut v, &m, 3);
    blake2b_round_2x(&mut v, &m, 4);
    blake2b_round_2x(&mut v, &m, 5);
    blake2b_round_2x(&mut v, &m, 6);
    blake2b_round_2x(&mut v, &m, 7);
    blake2b_round_2x(&mut v, &m, 8);
    blake2b_round_2x(&mut v, &m, 9);
    blake2b_round_2x(&mut v, &m, 10);
    blake2b_round_2x(&mut v, &m, 11);

    export_state_words_2x(h_vecs[0], v[0], v[8], h0, h1, 0);
    export_state_words_2x(h_vecs[1], v[1], v[9], h0, h1, 1);
    export_state_words_2x(h_vecs[2], v[2], v[10], h0, h1, 2);
    export_state_words_2x(h_vecs[3], v[3], v[11], h0, h1, 3);
    export_state_words_2x(h_vecs[4], v[4], v[12], h0, h1, 4);
    export_state_words_2x(h_vecs[5], v[5], v[13], h0, h1, 5);
    export_state_words_2x(h_vecs[6], v[6], v[14], h0, h1, 6);
    export_state_words_2x(h_vecs[7], v[7], v[15], h0, h1, 7);
}
