//! Hash several independent messages at once, batching their block
//! compressions four (or two) at a time instead of driving one
//! [`State`](crate::State) at a time. This is a throughput optimization for
//! workloads that already have many independent inputs on hand, e.g.
//! hashing the leaves of a Merkle tree or verifying a batch of MACs.
//!
//! Inputs in a batch don't need to be the same length. Each job tracks its
//! own block count and drops out of the wide batch (and finishes with a
//! narrower one, then scalar) as soon as it runs out of non-final blocks,
//! so nothing is read past the end of a short input.

use crate::{Block, Compress2Fn, Compress4Fn, CompressFn, Hash, Params, StateWords, BLOCKBYTES, OUTBYTES};

/// One unit of work for [`hash_many`]: an input slice, the parameters to
/// hash it with, and a slot for the resulting digest.
pub struct Job<'a> {
    input: &'a [u8],
    params: &'a Params,
    result: Option<Hash>,
}

impl<'a> Job<'a> {
    pub fn new(input: &'a [u8], params: &'a Params) -> Self {
        Self {
            input,
            params,
            result: None,
        }
    }

    /// The digest computed by [`hash_many`]. Panics if called before that.
    pub fn into_hash(self) -> Hash {
        self.result.expect("job was not hashed")
    }
}

// Number of full, non-final blocks in `len` bytes of input, matching the
// chunking `State::update`/`State::finalize` do: the loop in `update` only
// compresses blocks it knows aren't the last one, so an input that's an
// exact multiple of BLOCKBYTES still holds one block back for `finalize`.
fn non_final_blocks(len: usize) -> usize {
    if len == 0 {
        0
    } else if len % BLOCKBYTES == 0 {
        len / BLOCKBYTES - 1
    } else {
        len / BLOCKBYTES
    }
}

fn zero_block() -> Block {
    [0; BLOCKBYTES]
}

fn final_block(input: &[u8]) -> Block {
    let mut block = zero_block();
    block[..input.len()].copy_from_slice(input);
    block
}

fn words_to_hash(h: &StateWords, hash_length: u8) -> Hash {
    let mut bytes = [0u8; OUTBYTES];
    for (word, chunk) in h.iter().zip(bytes.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&hash_core_primitives::store_le_u64(*word));
    }
    Hash {
        bytes,
        len: hash_length,
    }
}

fn init_job(job: &Job, compress1: CompressFn) -> (StateWords, u128) {
    let mut h = job.params.to_words();
    let mut count = 0u128;
    if let Some(key_block) = job.params.key_block() {
        count += BLOCKBYTES as u128;
        unsafe {
            compress1(&mut h, &key_block, count, 0, 0);
        }
    }
    (h, count)
}

fn finish_job(job: &mut Job, mut h: StateWords, mut count: u128, compress1: CompressFn) {
    let non_final = non_final_blocks(job.input.len());
    let mut rest = job.input;
    for _ in 0..non_final {
        count += BLOCKBYTES as u128;
        let (block, remainder) = rest.split_at(BLOCKBYTES);
        let mut b = zero_block();
        b.copy_from_slice(block);
        unsafe {
            compress1(&mut h, &b, count, 0, 0);
        }
        rest = remainder;
    }
    count += rest.len() as u128;
    let last_node = if job.params.last_node { !0u64 } else { 0 };
    unsafe {
        compress1(&mut h, &final_block(rest), count, !0, last_node);
    }
    job.result = Some(words_to_hash(&h, job.params.hash_length));
}

/// Hash every job in `jobs`, batching compressions four, then two, then one
/// at a time as jobs of unequal length drop out of the wide batches.
pub fn hash_many(jobs: &mut [Job]) {
    let (compress1, compress4) = crate::default_compress_impl();
    let compress2 = crate::default_compress2_impl();

    let mut i = 0;
    while i + 4 <= jobs.len() {
        hash_group4(&mut jobs[i..i + 4], compress1, compress4);
        i += 4;
    }
    while i + 2 <= jobs.len() {
        hash_group2(&mut jobs[i..i + 2], compress1, compress2);
        i += 2;
    }
    while i < jobs.len() {
        hash_one(&mut jobs[i], compress1);
        i += 1;
    }
}

fn hash_one(job: &mut Job, compress1: CompressFn) {
    let (h, count) = init_job(job, compress1);
    finish_job(job, h, count, compress1);
}

fn hash_group2(jobs: &mut [Job], compress1: CompressFn, compress2: Compress2Fn) {
    let (mut h0, mut count0) = init_job(&jobs[0], compress1);
    let (mut h1, mut count1) = init_job(&jobs[1], compress1);

    let shared = non_final_blocks(jobs[0].input.len()).min(non_final_blocks(jobs[1].input.len()));
    let mut rest0 = jobs[0].input;
    let mut rest1 = jobs[1].input;
    for _ in 0..shared {
        count0 += BLOCKBYTES as u128;
        count1 += BLOCKBYTES as u128;
        let (b0, r0) = rest0.split_at(BLOCKBYTES);
        let (b1, r1) = rest1.split_at(BLOCKBYTES);
        let block0 = array_ref!(b0, 0, BLOCKBYTES);
        let block1 = array_ref!(b1, 0, BLOCKBYTES);
        unsafe {
            compress2(&mut h0, &mut h1, block0, block1, count0, count1, 0, 0, 0, 0);
        }
        rest0 = r0;
        rest1 = r1;
    }

    jobs[0].input = rest0;
    finish_job(&mut jobs[0], h0, count0, compress1);
    jobs[1].input = rest1;
    finish_job(&mut jobs[1], h1, count1, compress1);
}

fn hash_group4(jobs: &mut [Job], compress1: CompressFn, compress4: Compress4Fn) {
    let (mut h0, mut count0) = init_job(&jobs[0], compress1);
    let (mut h1, mut count1) = init_job(&jobs[1], compress1);
    let (mut h2, mut count2) = init_job(&jobs[2], compress1);
    let (mut h3, mut count3) = init_job(&jobs[3], compress1);

    let shared = [
        non_final_blocks(jobs[0].input.len()),
        non_final_blocks(jobs[1].input.len()),
        non_final_blocks(jobs[2].input.len()),
        non_final_blocks(jobs[3].input.len()),
    ]
    .iter()
    .copied()
    .min()
    .unwrap();

    let mut rest0 = jobs[0].input;
    let mut rest1 = jobs[1].input;
    let mut rest2 = jobs[2].input;
    let mut rest3 = jobs[3].input;
    for _ in 0..shared {
        count0 += BLOCKBYTES as u128;
        count1 += BLOCKBYTES as u128;
        count2 += BLOCKBYTES as u128;
        count3 += BLOCKBYTES as u128;
        let (b0, r0) = rest0.split_at(BLOCKBYTES);
        let (b1, r1) = rest1.split_at(BLOCKBYTES);
        let (b2, r2) = rest2.split_at(BLOCKBYTES);
        let (b3, r3) = rest3.split_at(BLOCKBYTES);
        unsafe {
            compress4(
                &mut h0,
                &mut h1,
                &mut h2,
                &mut h3,
                array_ref!(b0, 0, BLOCKBYTES),
                array_ref!(b1, 0, BLOCKBYTES),
                array_ref!(b2, 0, BLOCKBYTES),
                array_ref!(b3, 0, BLOCKBYTES),
                count0,
                count1,
                count2,
                count3,
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
        rest0 = r0;
        rest1 = r1;
        rest2 = r2;
        rest3 = r3;
    }

    jobs[0].input = rest0;
    finish_job(&mut jobs[0], h0, count0, compress1);
    jobs[1].input = rest1;
    finish_job(&mut jobs[1], h1, count1, compress1);
    jobs[2].input = rest2;
    finish_job(&mut jobs[2], h2, count2, compress1);
    jobs[3].input = rest3;
    finish_job(&mut jobs[3], h3, count3, compress1);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matches_sequential_hashing() {
        let inputs: &[&[u8]] = &[
            b"",
            b"a",
            b"abc",
            &[7u8; 127],
            &[9u8; 128],
            &[3u8; 129],
            &[1u8; 1025],
        ];
        let params = Params::new();
        let mut jobs: Vec<Job> = inputs.iter().map(|input| Job::new(input, &params)).collect();
        hash_many(&mut jobs);
        for (input, job) in inputs.iter().zip(jobs.into_iter()) {
            let expected = crate::blake2b(input);
            assert_eq!(expected, job.into_hash());
        }
    }
}
