use super::*;

fn eq(h1: &Hash, s2: &str) {
    let s1 = hex::encode(h1.as_bytes());
    assert_eq!(s1, s2, "hash mismatch");
}

#[test]
fn test_vectors() {
    // From RFC 7693, Appendix B.
    let io = &[
        (
            &b""[..],
            "69217a3079908094e11121d042354a7c1f55b6482ca1a51e1b250dfd1ed0eef9",
        ),
        (
            &b"abc"[..],
            "508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982",
        ),
    ];
    for &(input, output) in io {
        let hash = blake2s(input);
        eq(&hash, output);
    }
}

#[test]
fn test_a_thousand_one_by_one_matches_one_shot() {
    let mut state = State::new();
    for _ in 0..1000 {
        state.update(&[0]);
    }
    let incremental = state.finalize();
    let one_shot = blake2s(&[0; 1000]);
    assert_eq!(incremental, one_shot);
}

#[test]
fn test_two_times_five_hundred_matches_one_shot() {
    let mut state = State::new();
    state.update(&[0; 500]);
    state.update(&[0; 500]);
    let incremental = state.finalize();
    let one_shot = blake2s(&[0; 1000]);
    assert_eq!(incremental, one_shot);
}

#[test]
fn keyed_mac_changes_the_hash_and_is_deterministic() {
    let key: Vec<u8> = (0..KEYBYTES as u8).collect();
    let keyed_a = Params::new().key(&key).to_state().update(b"abc").finalize();
    let keyed_b = Params::new().key(&key).to_state().update(b"abc").finalize();
    let unkeyed = blake2s(b"abc");
    assert_eq!(keyed_a, keyed_b);
    assert_ne!(keyed_a, unkeyed);
}

#[test]
fn reset_matches_fresh_state() {
    let params = Params::new().hash_length(16).clone();
    let mut state = params.to_state();
    state.update(b"some input");
    let first = state.finalize();
    state.reset();
    state.update(b"some input");
    let second = state.finalize();
    assert_eq!(first, second);
}

#[test]
fn try_update_after_finalize_errors() {
    let mut state = State::new();
    state.update(b"hello");
    state.finalize();
    assert_eq!(
        Err(CoreError::UsedAfterFinalize),
        state.try_update(b"world").map(|_| ())
    );
}

#[test]
fn last_node_changes_the_hash() {
    let plain = Params::new().to_state().update(b"x").finalize();
    let mut last = Params::new();
    last.last_node(true);
    let last_node = last.to_state().update(b"x").finalize();
    assert_ne!(plain, last_node);
}

#[test]
fn empty_input_hash_length_is_respected() {
    let hash = Params::new().hash_length(16).to_state().finalize();
    assert_eq!(16, hash.as_bytes().len());
}

#[test]
fn many_matches_one_at_a_time() {
    let inputs: &[&[u8]] = &[b"", b"abc", &[0x42; 1000]];
    let params = Params::new();
    let mut jobs: Vec<many::Job> = inputs.iter().map(|i| many::Job::new(i, &params)).collect();
    many::hash_many(&mut jobs);
    for (input, job) in inputs.iter().zip(jobs.into_iter()) {
        assert_eq!(blake2s(input), job.into_hash());
    }
}
