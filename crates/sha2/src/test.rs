use super::*;

fn eq256(h: &Hash256, hex_str: &str) {
    assert_eq!(hex::encode(h.as_bytes()), hex_str, "SHA-256 mismatch");
}

fn eq512(h: &Hash512, hex_str: &str) {
    assert_eq!(hex::encode(h.as_bytes()), hex_str, "SHA-512 mismatch");
}

#[test]
fn sha256_test_vectors() {
    let io: &[(&[u8], &str)] = &[
        (
            b"",
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        (
            b"abc",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
    ];
    for &(input, expected) in io {
        let hash = sha256(input);
        eq256(&hash, expected);
    }
}

#[test]
fn sha512_of_abc() {
    let hash = sha512(b"abc");
    eq512(
        &hash,
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
    );
}

#[test]
fn sha512_empty() {
    let hash = sha512(b"");
    eq512(
        &hash,
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
    );
}

#[test]
fn split_points_match_one_shot() {
    let message: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
    let expected256 = sha256(&message);
    let expected512 = sha512(&message);
    for split in [0usize, 1, 63, 64, 65, 128, 129, 200] {
        if split > message.len() {
            continue;
        }
        let (a, b) = message.split_at(split);
        let mut s256 = State256::new();
        s256.update(a);
        s256.update(b);
        assert_eq!(expected256, s256.finalize());

        let mut s512 = State512::new();
        s512.update(a);
        s512.update(b);
        assert_eq!(expected512, s512.finalize());
    }
}

/// Inputs that are an exact multiple of the block size must not panic:
/// the buffer is flushed during `update`, never left completely full at
/// `finalize`.
#[test]
fn exact_block_multiples_do_not_panic() {
    for blocks in 1..=3usize {
        let message256 = vec![0x5au8; blocks * crate::BLOCKBYTES256];
        let one_shot256 = sha256(&message256);
        let mut state256 = State256::new();
        state256.update(&message256);
        assert_eq!(one_shot256, state256.finalize());

        let message512 = vec![0x5au8; blocks * crate::BLOCKBYTES512];
        let one_shot512 = sha512(&message512);
        let mut state512 = State512::new();
        state512.update(&message512);
        assert_eq!(one_shot512, state512.finalize());
    }
}

/// The same boundary, fed in two `update` calls that land exactly on the
/// block edge, so the first call alone leaves a completely full buffer.
#[test]
fn exact_block_boundary_split_does_not_panic() {
    let message256 = vec![0x7bu8; 2 * crate::BLOCKBYTES256];
    let expected256 = sha256(&message256);
    let (a, b) = message256.split_at(crate::BLOCKBYTES256);
    let mut state256 = State256::new();
    state256.update(a);
    state256.update(b);
    assert_eq!(expected256, state256.finalize());

    let message512 = vec![0x7bu8; 2 * crate::BLOCKBYTES512];
    let expected512 = sha512(&message512);
    let (a, b) = message512.split_at(crate::BLOCKBYTES512);
    let mut state512 = State512::new();
    state512.update(a);
    state512.update(b);
    assert_eq!(expected512, state512.finalize());
}

#[test]
fn reset_matches_fresh_state() {
    let mut state = State256::new();
    state.update(b"some input");
    let first = state.finalize();
    state.reset();
    state.update(b"some input");
    let second = state.finalize();
    assert_eq!(first, second);
}

#[test]
fn try_update_after_finalize_errors() {
    let mut state = State256::new();
    state.update(b"hello");
    state.finalize();
    assert_eq!(
        Err(hash_core_primitives::CoreError::UsedAfterFinalize),
        state.try_update(b"world").map(|_| ())
    );
}

#[test]
fn many_matches_one_at_a_time_256() {
    let inputs: &[&[u8]] = &[b"", b"abc", &[0x42; 1000]];
    let mut jobs: Vec<many::Job256> = inputs.iter().map(|i| many::Job256::new(i)).collect();
    many::hash_many_256(&mut jobs);
    for (input, job) in inputs.iter().zip(jobs.into_iter()) {
        assert_eq!(sha256(input), job.into_hash());
    }
}

#[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
#[test]
fn shani_matches_portable_when_available() {
    if !is_x86_feature_detected!("sha") {
        return;
    }
    let mut h_portable = IV256;
    let mut h_shani = IV256;
    let block = [0x61u8; 64];
    portable::compress256(&mut h_portable, &block);
    shani::compress256(&mut h_shani, &block);
    assert_eq!(h_portable, h_shani);
}
