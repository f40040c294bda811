//! PBKDF2 key stretching driven by a keyed BLAKE2 digest standing in for
//! CEX's generic `IMac`, grounded on `PBKDF2.cpp`: the same three
//! `Initialize` overloads (IKM-only splits the input into key ‖ salt;
//! salt+IKM; salt+IKM+nonce), the same big-endian 4-byte block counter,
//! and the same iterate-and-XOR stretching loop.

use hash_core_primitives::CoreError;

/// Which BLAKE2 variant backs the underlying keyed MAC. The two differ
/// only in block/digest width; the stretching loop above them is
/// identical.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Algorithm {
    Blake2b,
    Blake2s,
}

impl Algorithm {
    fn hash_size(self) -> usize {
        match self {
            Algorithm::Blake2b => blake2b_simd::OUTBYTES,
            Algorithm::Blake2s => blake2s_simd::OUTBYTES,
        }
    }

    fn block_size(self) -> usize {
        match self {
            Algorithm::Blake2b => blake2b_simd::BLOCKBYTES,
            Algorithm::Blake2s => blake2s_simd::BLOCKBYTES,
        }
    }

    fn mac(self, key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Algorithm::Blake2b => {
                let mut state = blake2b_simd::Params::new().key(key).to_state();
                for part in parts {
                    state.update(part);
                }
                state.finalize().as_bytes().to_vec()
            }
            Algorithm::Blake2s => {
                let mut state = blake2s_simd::Params::new().key(key).to_state();
                for part in parts {
                    state.update(part);
                }
                state.finalize().as_bytes().to_vec()
            }
        }
    }
}

/// An initialized PBKDF2 generator: a MAC key, an (optional) MAC salt, and
/// an iteration count. Build with one of the `initialize_*` constructors,
/// matching the original's three `Initialize` overloads, then call
/// [`Pbkdf2::generate`].
pub struct Pbkdf2 {
    algorithm: Algorithm,
    mac_key: Vec<u8>,
    mac_salt: Vec<u8>,
    iterations: u32,
}

impl Pbkdf2 {
    /// `Ikm`-only initialization: the first `hash_size` bytes become the
    /// MAC key, the rest becomes the MAC salt. Requires at least two
    /// digest widths of input key material.
    pub fn initialize_from_ikm(
        algorithm: Algorithm,
        iterations: u32,
        ikm: &[u8],
    ) -> Result<Self, CoreError> {
        let hash_size = algorithm.hash_size();
        if ikm.len() < hash_size * 2 {
            return Err(CoreError::InvalidParameter(
                "IKM too small; must be at least two digest widths",
            ));
        }
        Ok(Self {
            algorithm,
            mac_key: ikm[..hash_size].to_vec(),
            mac_salt: ikm[hash_size..].to_vec(),
            iterations,
        })
    }

    /// `Salt` + `Ikm` initialization: `Salt` must be at least one MAC
    /// block, `Ikm` at least one digest width.
    pub fn initialize_with_salt(
        algorithm: Algorithm,
        iterations: u32,
        salt: &[u8],
        ikm: &[u8],
    ) -> Result<Self, CoreError> {
        if salt.len() < algorithm.block_size() {
            return Err(CoreError::InvalidParameter("salt shorter than one MAC block"));
        }
        if ikm.len() < algorithm.hash_size() {
            return Err(CoreError::InvalidParameter("IKM shorter than one digest width"));
        }
        Ok(Self {
            algorithm,
            mac_key: ikm.to_vec(),
            mac_salt: salt.to_vec(),
            iterations,
        })
    }

    /// `Salt` + `Ikm` + `Nonce` initialization: the nonce is appended to
    /// the salt; `Salt ‖ Nonce` combined must be at least one MAC block.
    pub fn initialize_with_salt_and_nonce(
        algorithm: Algorithm,
        iterations: u32,
        salt: &[u8],
        ikm: &[u8],
        nonce: &[u8],
    ) -> Result<Self, CoreError> {
        if salt.len() + nonce.len() < algorithm.block_size() {
            return Err(CoreError::InvalidParameter(
                "salt+nonce shorter than one MAC block",
            ));
        }
        if ikm.len() < algorithm.hash_size() {
            return Err(CoreError::InvalidParameter("IKM shorter than one digest width"));
        }
        let mut mac_salt = salt.to_vec();
        mac_salt.extend_from_slice(nonce);
        Ok(Self {
            algorithm,
            mac_key: ikm.to_vec(),
            mac_salt,
            iterations,
        })
    }

    fn int_to_octet(counter: u32) -> [u8; 4] {
        counter.to_be_bytes()
    }

    fn process(&self, counter_block: &[u8; 4], output: &mut [u8]) {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(2);
        if !self.mac_salt.is_empty() {
            parts.push(&self.mac_salt);
        }
        parts.push(counter_block);
        let mut state = self.algorithm.mac(&self.mac_key, &parts);
        output.copy_from_slice(&state[..output.len()]);

        for _ in 1..self.iterations {
            state = self.algorithm.mac(&self.mac_key, &[&state]);
            for (o, s) in output.iter_mut().zip(state.iter()) {
                *o ^= *s;
            }
        }
    }

    /// Fill `output` with `output.len()` bytes of derived key material.
    pub fn generate(&self, output: &mut [u8]) {
        let hash_size = self.algorithm.hash_size();
        let full_blocks = output.len() / hash_size;
        let remainder = output.len() % hash_size;
        let mut counter = 0u32;

        for block in output[..full_blocks * hash_size].chunks_mut(hash_size) {
            counter += 1;
            self.process(&Self::int_to_octet(counter), block);
        }

        if remainder > 0 {
            counter += 1;
            let mut tail = vec![0u8; hash_size];
            self.process(&Self::int_to_octet(counter), &mut tail);
            let start = full_blocks * hash_size;
            output[start..].copy_from_slice(&tail[..remainder]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_is_deterministic() {
        let ikm = [7u8; 200];
        let kdf = Pbkdf2::initialize_from_ikm(Algorithm::Blake2b, 10, &ikm).unwrap();
        let mut a = [0u8; 100];
        let mut b = [0u8; 100];
        kdf.generate(&mut a);
        kdf.generate(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn different_iteration_counts_diverge() {
        let ikm = [7u8; 200];
        let kdf10 = Pbkdf2::initialize_from_ikm(Algorithm::Blake2b, 10, &ikm).unwrap();
        let kdf11 = Pbkdf2::initialize_from_ikm(Algorithm::Blake2b, 11, &ikm).unwrap();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        kdf10.generate(&mut a);
        kdf11.generate(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn non_multiple_length_output_is_handled() {
        let ikm = [3u8; 200];
        let kdf = Pbkdf2::initialize_from_ikm(Algorithm::Blake2s, 4, &ikm).unwrap();
        let mut out = [0u8; 50]; // not a multiple of blake2s's 32-byte digest
        kdf.generate(&mut out);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn short_ikm_is_rejected() {
        let ikm = [1u8; 10];
        assert!(Pbkdf2::initialize_from_ikm(Algorithm::Blake2b, 1, &ikm).is_err());
    }

    #[test]
    fn salt_and_nonce_initialization_matches_manual_concatenation() {
        let salt = [1u8; 64];
        let nonce = [2u8; 16];
        let ikm = [3u8; 64];
        let via_nonce =
            Pbkdf2::initialize_with_salt_and_nonce(Algorithm::Blake2b, 5, &salt, &ikm, &nonce)
                .unwrap();
        let mut combined_salt = salt.to_vec();
        combined_salt.extend_from_slice(&nonce);
        let via_salt =
            Pbkdf2::initialize_with_salt(Algorithm::Blake2b, 5, &combined_salt, &ikm).unwrap();

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        via_nonce.generate(&mut a);
        via_salt.generate(&mut b);
        assert_eq!(a, b);
    }
}
