//! Standard multi-block NIST test vectors for SHA-256 and SHA-512, run
//! through both the one-shot and incremental APIs.

extern crate hex;
extern crate sha2_simd;

#[test]
fn sha256_two_block_message() {
    let input = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
    let expected = "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1";
    let expected = &expected[expected.len() - 64..];
    assert_eq!(hex::encode(sha2_simd::sha256(input).as_bytes()), expected);

    let mut state = sha2_simd::State256::new();
    state.update(&input[..20]);
    state.update(&input[20..]);
    assert_eq!(hex::encode(state.finalize().as_bytes()), expected);
}

#[test]
fn sha512_two_block_message() {
    let input = b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu";
    let expected = "8e959b75dae313da8cf4f72814fc143f8f7779c6eb9f7fa17299aeadb68890\
        18501d289e4900f7e4331b99dec4b5433ac7d329eeb6dd26545e96e55b874be909";
    assert_eq!(hex::encode(sha2_simd::sha512(input).as_bytes()), expected);
}

#[test]
fn sha256_one_shot_matches_incremental_across_split_points() {
    let message: Vec<u8> = (0u32..2000).map(|i| (i % 251) as u8).collect();
    let expected = sha2_simd::sha256(&message);
    for split in [0usize, 1, 63, 64, 65, 1000, 1999] {
        let (a, b) = message.split_at(split);
        let mut state = sha2_simd::State256::new();
        state.update(a);
        state.update(b);
        assert_eq!(expected, state.finalize());
    }
}
