//! Hash several independent messages at once, batching their block
//! compressions N at a time instead of driving one
//! [`State256`](crate::sha256::State256) at a time — the SHA-2 analogue of
//! `blake2b_simd::many`, used for throughput workloads like verifying a
//! batch of digests or expanding many KDF blocks.
//!
//! Inputs in a batch don't need to be the same length: each job drops out
//! of the wide group as soon as it runs out of non-final blocks, finishing
//! alone through the portable scalar path.

use crate::{portable, Block256, Block512, Hash256, Hash512, StateWords256, StateWords512};
use crate::{BLOCKBYTES256, BLOCKBYTES512, IV256, IV512};

/// The widest SIMD lane count this batch ever packs into one register; a
/// job count above this is split into consecutive groups of at most this
/// many, the same way the BLAKE2 `many` module drops from groups of four
/// to two to one instead of growing its buffers without bound.
const MAX_GROUP: usize = 16;

/// One unit of work for [`hash_many_256`]: an input slice and a slot for
/// the resulting digest.
pub struct Job256<'a> {
    input: &'a [u8],
    result: Option<Hash256>,
}

impl<'a> Job256<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, result: None }
    }

    /// The digest computed by [`hash_many_256`]. Panics if called before
    /// that.
    pub fn into_hash(self) -> Hash256 {
        self.result.expect("job was not hashed")
    }
}

/// One unit of work for [`hash_many_512`].
pub struct Job512<'a> {
    input: &'a [u8],
    result: Option<Hash512>,
}

impl<'a> Job512<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, result: None }
    }

    pub fn into_hash(self) -> Hash512 {
        self.result.expect("job was not hashed")
    }
}

fn non_final_blocks(len: usize, blockbytes: usize) -> usize {
    if len == 0 {
        0
    } else if len % blockbytes == 0 {
        len / blockbytes - 1
    } else {
        len / blockbytes
    }
}

fn finish_256(job: &mut Job256, h: StateWords256, blocks_done: usize) {
    // Hand the batch-compressed prefix off to a state seeded at the same
    // chaining value and byte count, so its own `update`/`finalize` can
    // apply the SHA-2 padding rule to the remaining tail.
    let mut state = crate::sha256::State256::from_words(h, blocks_done);
    state.update(&job.input[blocks_done * BLOCKBYTES256..]);
    job.result = Some(state.finalize());
}

fn finish_512(job: &mut Job512, h: StateWords512, blocks_done: usize) {
    let mut state = crate::sha512::State512::from_words(h, blocks_done);
    state.update(&job.input[blocks_done * BLOCKBYTES512..]);
    job.result = Some(state.finalize());
}

/// Hash every job in `jobs`, batching full-block compressions across all
/// jobs that still have a shared run of non-final blocks. Jobs beyond
/// [`MAX_GROUP`] are hashed in a later group rather than packed into one
/// over-wide batch.
pub fn hash_many_256(jobs: &mut [Job256]) {
    for group in jobs.chunks_mut(MAX_GROUP) {
        hash_group_256(group);
    }
}

fn hash_group_256(jobs: &mut [Job256]) {
    let mut states: arrayvec::ArrayVec<StateWords256, MAX_GROUP> = arrayvec::ArrayVec::new();
    for _ in jobs.iter() {
        states.push(IV256);
    }
    let mut blocks_done = vec![0usize; jobs.len()];

    loop {
        let shared = jobs
            .iter()
            .zip(blocks_done.iter())
            .map(|(job, &done)| non_final_blocks(job.input.len(), BLOCKBYTES256).saturating_sub(done))
            .min()
            .unwrap_or(0);
        if shared == 0 {
            break;
        }
        let blocks: arrayvec::ArrayVec<Block256, MAX_GROUP> = jobs
            .iter()
            .zip(blocks_done.iter())
            .map(|(job, &done)| {
                *array_ref!(job.input, done * BLOCKBYTES256, BLOCKBYTES256)
            })
            .collect();
        portable::compress256_many_fallback(&mut states, &blocks);
        for done in blocks_done.iter_mut() {
            *done += 1;
        }
    }

    for ((job, h), &done) in jobs.iter_mut().zip(states.into_iter()).zip(blocks_done.iter()) {
        finish_256(job, h, done);
    }
}

/// The SHA-512 analogue of [`hash_many_256`].
pub fn hash_many_512(jobs: &mut [Job512]) {
    for group in jobs.chunks_mut(MAX_GROUP) {
        hash_group_512(group);
    }
}

fn hash_group_512(jobs: &mut [Job512]) {
    let mut states: arrayvec::ArrayVec<StateWords512, MAX_GROUP> = arrayvec::ArrayVec::new();
    for _ in jobs.iter() {
        states.push(IV512);
    }
    let mut blocks_done = vec![0usize; jobs.len()];

    loop {
        let shared = jobs
            .iter()
            .zip(blocks_done.iter())
            .map(|(job, &done)| non_final_blocks(job.input.len(), BLOCKBYTES512).saturating_sub(done))
            .min()
            .unwrap_or(0);
        if shared == 0 {
            break;
        }
        let blocks: arrayvec::ArrayVec<Block512, MAX_GROUP> = jobs
            .iter()
            .zip(blocks_done.iter())
            .map(|(job, &done)| {
                *array_ref!(job.input, done * BLOCKBYTES512, BLOCKBYTES512)
            })
            .collect();
        portable::compress512_many_fallback(&mut states, &blocks);
        for done in blocks_done.iter_mut() {
            *done += 1;
        }
    }

    for ((job, h), &done) in jobs.iter_mut().zip(states.into_iter()).zip(blocks_done.iter()) {
        finish_512(job, h, done);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_sequential_hashing_256() {
        let inputs: &[&[u8]] = &[b"", b"a", b"abc", &[7u8; 63], &[9u8; 64], &[3u8; 65], &[1u8; 200]];
        let mut jobs: arrayvec::ArrayVec<Job256, 16> =
            inputs.iter().map(|input| Job256::new(input)).collect();
        hash_many_256(&mut jobs);
        for (input, job) in inputs.iter().zip(jobs.into_iter()) {
            assert_eq!(crate::sha256(input), job.into_hash());
        }
    }

    #[test]
    fn matches_sequential_hashing_512() {
        let inputs: &[&[u8]] = &[b"", b"a", b"abc", &[7u8; 127], &[9u8; 128], &[3u8; 129], &[1u8; 300]];
        let mut jobs: arrayvec::ArrayVec<Job512, 16> =
            inputs.iter().map(|input| Job512::new(input)).collect();
        hash_many_512(&mut jobs);
        for (input, job) in inputs.iter().zip(jobs.into_iter()) {
            assert_eq!(crate::sha512(input), job.into_hash());
        }
    }

    /// More jobs than fit in one `MAX_GROUP`-wide batch: this must split
    /// into multiple groups rather than overflow a fixed-capacity buffer.
    #[test]
    fn more_than_one_group_256() {
        let inputs: Vec<Vec<u8>> = (0..40u32).map(|i| vec![i as u8; i as usize]).collect();
        let mut jobs: Vec<Job256> = inputs.iter().map(|input| Job256::new(input)).collect();
        hash_many_256(&mut jobs);
        for (input, job) in inputs.iter().zip(jobs.into_iter()) {
            assert_eq!(crate::sha256(input), job.into_hash());
        }
    }

    #[test]
    fn more_than_one_group_512() {
        let inputs: Vec<Vec<u8>> = (0..40u32).map(|i| vec![i as u8; i as usize]).collect();
        let mut jobs: Vec<Job512> = inputs.iter().map(|input| Job512::new(input)).collect();
        hash_many_512(&mut jobs);
        for (input, job) in inputs.iter().zip(jobs.into_iter()) {
            assert_eq!(crate::sha512(input), job.into_hash());
        }
    }
}
