//! Randomized coverage for [`blake2b_simd::many::hash_many`] across a wide
//! spread of job counts and input lengths, checked against the sequential
//! one-state API.

use blake2b_simd::{many, Hash, Params, BLOCKBYTES, KEYBYTES, OUTBYTES};
use rand::Rng;
use rand::RngCore;
use rand::SeedableRng;

const MAX_N: usize = 9;
const MAX_LEN: usize = 3 * BLOCKBYTES;

fn random_params(rng: &mut rand_chacha::ChaChaRng) -> Params {
    let mut params = Params::new();
    // hash_length, key, and last_node are all things that need to be passed
    // from Params through to State and through the batched path alike.
    // Everything else just winds up in the state words and doesn't need
    // separate coverage here.
    params.hash_length(rng.gen_range(1, OUTBYTES + 1));
    if rng.gen() {
        let len: usize = rng.gen_range(1, KEYBYTES + 1);
        let key_buf = [1u8; KEYBYTES];
        params.key(&key_buf[..len]);
    }
    params.last_node(rng.gen());
    params
}

// Do more tests in release mode, but try to keep execution time under 1 sec.
#[cfg(debug_assertions)]
const NUM_TESTS: usize = 1_000;
#[cfg(not(debug_assertions))]
const NUM_TESTS: usize = 100_000;

fn with_random_inputs(mut f: impl FnMut(&[Params], &[&[u8]])) {
    let mut rng = rand_chacha::ChaChaRng::seed_from_u64(0);

    let mut input_bufs = vec![[0u8; MAX_LEN]; MAX_N];
    for input in input_bufs.iter_mut() {
        rng.fill_bytes(input);
    }

    for _ in 0..NUM_TESTS {
        let num_inputs: usize = rng.gen_range(0, MAX_N + 1);
        let mut inputs: Vec<&[u8]> = Vec::with_capacity(num_inputs);
        for buf in input_bufs.iter().take(num_inputs) {
            let input_length = rng.gen_range(0, MAX_LEN + 1);
            inputs.push(&buf[..input_length]);
        }

        let mut params = Vec::with_capacity(num_inputs);
        for _ in 0..num_inputs {
            params.push(random_params(&mut rng));
        }

        f(&params, &inputs);
    }
}

#[test]
fn fuzz_hash_many() {
    with_random_inputs(|params, inputs| {
        let expected: Vec<Hash> = params
            .iter()
            .zip(inputs.iter())
            .map(|(param, input)| param.to_state().update(input).finalize())
            .collect();

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
