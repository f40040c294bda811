//! Exhaustive small-N coverage for [`blake2b_simd::many::hash_many`]: every
//! combination of a handful of short/boundary input lengths and randomized
//! `Params`, checked against the sequential one-state API.

use arrayvec::ArrayVec;
use blake2b_simd::{many, Hash, Params, BLOCKBYTES, KEYBYTES, OUTBYTES};
use rand::Rng;
use rand::RngCore;
use rand::SeedableRng;

const INPUT_LENGTHS: &[usize] = &[0, 1, BLOCKBYTES, BLOCKBYTES + 1, 2 * BLOCKBYTES];

const MAX_N: usize = 5;
const MAX_LEN: usize = 3 * BLOCKBYTES;

type SizeVec = ArrayVec<usize, MAX_N>;

fn with_length_permutations_n(n: usize, buf: &mut SizeVec, f: &mut dyn FnMut(&mut SizeVec)) {
    if n == 0 {
        f(buf);
        return;
    }
    for &len in INPUT_LENGTHS {
        buf.push(len);
        with_length_permutations_n(n - 1, buf, f);
        buf.pop();
    }
}

fn all_length_permutations(max_n: usize, f: &mut dyn FnMut(&mut SizeVec)) {
    let mut buf = SizeVec::new();
    for n in 0..=max_n {
        with_length_permutations_n(n, &mut buf, f);
    }
}

fn random_params(rng: &mut rand_chacha::ChaChaRng) -> Params {
    let mut params = Params::new();
    params.hash_length(rng.gen_range(1, OUTBYTES + 1));
    if rng.gen() {
        let len: usize = rng.gen_range(1, KEYBYTES + 1);
        let key_buf = [1u8; KEYBYTES];
        params.key(&key_buf[..len]);
    }
    params.last_node(rng.gen());
    params
}

#[test]
fn test_hash_many() {
    let mut rng = rand_chacha::ChaChaRng::seed_from_u64(0);
    let mut input_bufs = [[0u8; MAX_LEN]; MAX_N];
    for input in input_bufs.iter_mut() {
        rng.fill_bytes(input);
    }

    all_length_permutations(MAX_N, &mut |lengths| {
        let mut inputs: ArrayVec<&[u8], MAX_N> = ArrayVec::new();
        for i in 0..lengths.len() {
            inputs.push(&input_bufs[i][..lengths[i]]);
        }

        let mut params: ArrayVec<Params, MAX_N> = ArrayVec::new();
        for _ in 0..lengths.len() {
            params.push(random_params(&mut rng));
        }

        let mut expected: ArrayVec<Hash, MAX_N> = ArrayVec::new();
        for (param, input) in params.iter().zip(inputs.iter()) {
            expected.push(param.to_state().update(input).finalize());
        }

        let mut jobs: Vec<many::Job> = inputs
            .iter()
            .zip(params.iter())
            .map(|(input, param)| many::Job::new(input, param))
            .collect();
        many::hash_many(&mut jobs);
        for (i, job) in jobs.into_iter().enumerate() {
            assert_eq!(expected[i], job.into_hash(), "job {} mismatch", i);
        }
    });
}
