use super::*;

fn eq(h1: &Hash, s2: &str) {
    let s1 = hex::encode(h1.as_bytes());
    assert_eq!(s1, s2, "hash mismatch");
}

#[test]
fn test_vectors() {
    let io = &[
        (
            &b""[..],
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce",
        ),
        (
            &b"abc"[..],
            "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923",
        ),
        (
            &[0; 1000],
            "1ee4e51ecab5210a518f26150e882627ec839967f19d763e1508b12cfefed14858f6a1c9d1f969bc224dc9440f5a6955277e755b9c513f9ba4421c5e50c8d787",
        ),
    ];
    for &(input, output) in io {
        let hash = blake2b(input);
        eq(&hash, output);
    }
}

#[test]
fn test_a_thousand_one_by_one() {
    let mut state = State::new();
    for _ in 0..1000 {
        state.update(&[0]);
    }
    let hash = state.finalize();
    eq(
        &hash,
        "1ee4e51ecab5210a518f26150e882627ec839967f19d763e1508b12cfefed14858f6a1c9d1f969bc224dc9440f5a6955277e755b9c513f9ba4421c5e50c8d787",
    );
}

#[test]
fn test_two_times_five_hundred() {
    let mut state = State::new();
    state.update(&[0; 500]);
    state.update(&[0; 500]);
    let hash = state.finalize();
    eq(
        &hash,
        "1ee4e51ecab5210a518f26150e882627ec839967f19d763e1508b12cfefed14858f6a1c9d1f969bc224dc9440f5a6955277e755b9c513f9ba4421c5e50c8d787",
    );
}

#[test]
fn keyed_mac_changes_the_hash_and_is_deterministic() {
    let key: Vec<u8> = (0..KEYBYTES as u8).collect();
    let keyed_a = Params::new().key(&key).to_state().update(b"abc").finalize();
    let keyed_b = Params::new().key(&key).to_state().update(b"abc").finalize();
    let unkeyed = blake2b(b"abc");
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
    assert_eq!(Err(CoreError::UsedAfterFinalize), state.try_update(b"world").map(|_| ()));
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
        assert_eq!(blake2b(input), job.into_hash());
    }
}
