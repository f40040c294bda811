//! Cross-checks against the published RFC 7693 test vectors for BLAKE2b and
//! BLAKE2bp, run through both the one-shot and incremental APIs.

use blake2b_simd::{blake2bp, Params};

#[test]
fn blake2b_abc() {
    let expected = "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d\
                     17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923";
    assert_eq!(expected, &*blake2b_simd::blake2b(b"abc").to_hex());

    let mut state = Params::new().to_state();
    state.update(b"a").update(b"b").update(b"c");
    assert_eq!(expected, &*state.finalize().to_hex());
}

#[test]
fn blake2b_empty() {
    let expected = "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f54\
                     19d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce";
    assert_eq!(expected, &*blake2b_simd::blake2b(b"").to_hex());
}

/// RFC 7693 Appendix A's keyed test vector: a 64-byte key `00 01 .. 3f`
/// hashing an empty message.
#[test]
fn blake2b_keyed_empty_matches_rfc_vector() {
    let key: Vec<u8> = (0u8..64).collect();
    let expected = "10ebb67700b1868efb4417987acf4690ae9d972fb7a590c2f02871799aaa47\
                     86b5e996e8f0f4eb981fc214b005f42d2ff4233499391653df7aefcbc13fc51568";
    let hash = Params::new().key(&key).to_state().finalize();
    assert_eq!(expected, &*hash.to_hex());
}

#[test]
fn blake2bp_foo() {
    let expected = "8ca9ccee7946afcb686fe7556628b5ba1bf9a691da37ca58cd049354d99f3704\
                     2c007427e5f219b9ab5063707ec6823872dee413ee014b4d02f2ebb6abb5f643";
    let hash = blake2bp::blake2bp(b"foo");
    assert_eq!(expected, &*hash.to_hex());

    let mut state = blake2bp::Params::new().to_state();
    state.update(b"f").update(b"o").update(b"o");
    assert_eq!(expected, &*state.finalize().to_hex());
}

#[test]
fn blake2bp_keyed_matches_readme_example() {
    let expected = "e69c7d2c42a5ac14948772231c68c552";
    let hash = blake2bp::Params::new()
        .hash_length(16)
        .key(b"The Magic Words are Squeamish Ossifrage")
        .to_state()
        .update(b"foo")
        .update(b"bar")
        .update(b"baz")
        .finalize();
    assert_eq!(expected, &hash.to_hex());
}

#[test]
fn blake2b_split_points_match_one_shot() {
    let message: Vec<u8> = (0u32..2000).map(|i| (i % 251) as u8).collect();
    let expected = blake2b_simd::blake2b(&message);
    for split in [0usize, 1, 127, 128, 129, 1000, 1999] {
        let (a, b) = message.split_at(split);
        let mut state = Params::new().to_state();
        state.update(a).update(b);
        assert_eq!(expected, state.finalize());
    }
}

#[test]
fn blake2bp_split_points_match_one_shot() {
    let message: Vec<u8> = (0u32..2000).map(|i| (i % 251) as u8).collect();
    let expected = blake2bp::blake2bp(&message);
    for split in [0usize, 1, 127, 128, 129, 1000, 1999] {
        let (a, b) = message.split_at(split);
        let mut state = blake2bp::Params::new().to_state();
        state.update(a).update(b);
        assert_eq!(expected, state.finalize());
    }
}
