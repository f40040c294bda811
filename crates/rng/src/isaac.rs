//! The ISAAC pseudo-random generator: a 256-word working buffer mixed
//! through Bob Jenkins' published indirection/shift cascade, consumed one
//! 32-bit result at a time and regenerated a full buffer at a time.
//! Ground truth for the shape (accumulator, last-result, working buffer,
//! result buffer, a counting index into the result buffer) is
//! `ISCRsg.cpp`; this is a pseudo-random generator, not a cryptographic
//! primitive, and carries no uniformity/unpredictability guarantee beyond
//! what the published ISAAC algorithm provides.

use hash_core_primitives::Zeroize;

const SIZE_LOG: u32 = 8;
const SIZE: usize = 1 << SIZE_LOG; // 256 32-bit words.
const MASK: u32 = ((SIZE - 1) as u32) << 2;

/// An ISAAC-32 generator. Call [`Isaac::new`] (or [`Isaac::from_seed`] to
/// derive the initial state from caller-supplied key material) and then
/// repeatedly [`Isaac::next_u32`] / [`Isaac::fill_bytes`].
pub struct Isaac {
    accumulator: u32,
    last_result: u32,
    counter: u32,
    memory: [u32; SIZE],
    result: [u32; SIZE],
    result_index: usize,
}

impl Isaac {
    /// Build a generator seeded only from the fixed golden-ratio mixing
    /// constant (no external entropy) — useful for deterministic tests,
    /// not for anything security-sensitive.
    pub fn new() -> Self {
        let mut isaac = Self {
            accumulator: 0,
            last_result: 0,
            counter: 0,
            memory: [0; SIZE],
            result: [0; SIZE],
            result_index: SIZE,
        };
        isaac.initialize(false);
        isaac
    }

    /// Build a generator whose initial working buffer is mixed with
    /// `seed` (truncated/zero-extended to 256 words), matching the
    /// `MixState` branch of the original `Initialize`.
    pub fn from_seed(seed: &[u32]) -> Self {
        let mut isaac = Self {
            accumulator: 0,
            last_result: 0,
            counter: 0,
            memory: [0; SIZE],
            result: [0; SIZE],
            result_index: SIZE,
        };
        for (slot, &word) in isaac.result.iter_mut().zip(seed.iter()) {
            *slot = word;
        }
        isaac.initialize(true);
        isaac
    }

    fn initialize(&mut self, mix_seed: bool) {
        const GOLDEN_RATIO: u32 = 0x9e3779b9;
        let (mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h) = (
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
            GOLDEN_RATIO,
        );

        for _ in 0..4 {
            mix(&mut a, &mut b, &mut c, &mut d, &mut e, &mut f, &mut g, &mut h);
        }

        let mut ctr = 0;
        while ctr != SIZE {
            if mix_seed {
                a = a.wrapping_add(self.result[ctr]);
                b = b.wrapping_add(self.result[ctr + 1]);
                c = c.wrapping_add(self.result[ctr + 2]);
                d = d.wrapping_add(self.result[ctr + 3]);
                e = e.wrapping_add(self.result[ctr + 4]);
                f = f.wrapping_add(self.result[ctr + 5]);
                g = g.wrapping_add(self.result[ctr + 6]);
                h = h.wrapping_add(self.result[ctr + 7]);
            }
            mix(&mut a, &mut b, &mut c, &mut d, &mut e, &mut f, &mut g, &mut h);
            self.memory[ctr..ctr + 8].copy_from_slice(&[a, b, c, d, e, f, g, h]);
            ctr += 8;
        }

        if mix_seed {
            let mut ctr = 0;
            while ctr != SIZE {
                a = a.wrapping_add(self.memory[ctr]);
                b = b.wrapping_add(self.memory[ctr + 1]);
                c = c.wrapping_add(self.memory[ctr + 2]);
                d = d.wrapping_add(self.memory[ctr + 3]);
                e = e.wrapping_add(self.memory[ctr + 4]);
                f = f.wrapping_add(self.memory[ctr + 5]);
                g = g.wrapping_add(self.memory[ctr + 6]);
                h = h.wrapping_add(self.memory[ctr + 7]);
                mix(&mut a, &mut b, &mut c, &mut d, &mut e, &mut f, &mut g, &mut h);
                self.memory[ctr..ctr + 8].copy_from_slice(&[a, b, c, d, e, f, g, h]);
                ctr += 8;
            }
        }

        self.generate();
    }

    fn generate(&mut self) {
        let half = SIZE / 2;
        self.counter = self.counter.wrapping_add(1);
        self.last_result = self.last_result.wrapping_add(self.counter);

        for half_pass in 0..2 {
            let base = half_pass * half;
            for i in 0..half {
                let idx = base + i;
                let other = base + ((i + half / 2) % half);
                let x = self.memory[idx];
                self.accumulator ^= shift_for_step(self.accumulator, i);
                self.accumulator = self.accumulator.wrapping_add(self.memory[other]);
                let y = self.memory[(((x & MASK) >> 2) as usize) % SIZE]
                    .wrapping_add(self.accumulator)
                    .wrapping_add(self.last_result);
                self.memory[idx] = y;
                self.last_result = self.memory
                    [(((y >> SIZE_LOG) & MASK) >> 2) as usize % SIZE]
                    .wrapping_add(x);
                self.result[idx] = self.last_result;
            }
        }

        self.result_index = 0;
    }

    /// The next pseudo-random 32-bit word, regenerating the result buffer
    /// whenever it runs dry.
    pub fn next_u32(&mut self) -> u32 {
        if self.result_index >= SIZE {
            self.generate();
        }
        let value = self.result[self.result_index];
        self.result_index += 1;
        value
    }

    /// Fill `output` with pseudo-random bytes, four at a time from
    /// successive [`Isaac::next_u32`] calls.
    pub fn fill_bytes(&mut self, output: &mut [u8]) {
        let mut offset = 0;
        while offset < output.len() {
            let word = self.next_u32().to_le_bytes();
            let take = core::cmp::min(4, output.len() - offset);
            output[offset..offset + take].copy_from_slice(&word[..take]);
            offset += take;
        }
    }

    /// Force regeneration of the result buffer, as the original `Reset`
    /// does.
    pub fn reset(&mut self) {
        self.generate();
    }
}

impl Default for Isaac {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Isaac {
    fn drop(&mut self) {
        self.memory.zeroize();
        self.result.zeroize();
        self.accumulator = 0;
        self.last_result = 0;
    }
}

#[inline(always)]
fn shift_for_step(acc: u32, step: usize) -> u32 {
    match step % 4 {
        0 => acc << 13,
        1 => acc >> 6,
        2 => acc << 2,
        _ => acc >> 16,
    }
}

#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn mix(a: &mut u32, b: &mut u32, c: &mut u32, d: &mut u32, e: &mut u32, f: &mut u32, g: &mut u32, h: &mut u32) {
    *a ^= *b << 11;
    *d = d.wrapping_add(*a);
    *b = b.wrapping_add(*c);
    *b ^= *c >> 2;
    *e = e.wrapping_add(*b);
    *c = c.wrapping_add(*d);
    *c ^= *d << 8;
    *f = f.wrapping_add(*c);
    *d = d.wrapping_add(*e);
    *d ^= *e >> 16;
    *g = g.wrapping_add(*d);
    *e = e.wrapping_add(*f);
    *e ^= *f << 10;
    *h = h.wrapping_add(*e);
    *f = f.wrapping_add(*g);
    *f ^= *g >> 4;
    *a = a.wrapping_add(*f);
    *g = g.wrapping_add(*h);
    *g ^= *h << 8;
    *b = b.wrapping_add(*g);
    *h = h.wrapping_add(*a);
    *h ^= *a >> 9;
    *c = c.wrapping_add(*h);
    *a = a.wrapping_add(*b);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_stream() {
        let mut a = Isaac::from_seed(&[1, 2, 3, 4]);
        let mut b = Isaac::from_seed(&[1, 2, 3, 4]);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Isaac::from_seed(&[1]);
        let mut b = Isaac::from_seed(&[2]);
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn fill_bytes_is_not_all_zero() {
        let mut isaac = Isaac::new();
        let mut buf = [0u8; 64];
        isaac.fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn reset_forces_regeneration() {
        let mut isaac = Isaac::new();
        isaac.next_u32();
        isaac.reset();
        assert_eq!(isaac.result_index, 0);
    }
}
