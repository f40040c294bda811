//! SPHINCS+ key records, grounded on `SphincsPrivateKey.cpp`/
//! `SphincsPublicKey.cpp`: `u8` parameter-set tag, `u32` little-endian
//! byte length. The private key's WOTS+ chain/secret-seed material is
//! packed as `u16` little-endian words; the public key's packed bytes are
//! stored as-is.

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{
    pack_u16_le, read_u8_tag_u32_len, unpack_u16_le, write_u8_tag_u32_len,
};

/// Mirrors CEX's `SphincsParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SphincsParameterSet {
    Spxs128,
    Spxs256,
}

impl SphincsParameterSet {
    fn to_tag(self) -> u8 {
        match self {
            SphincsParameterSet::Spxs128 => 1,
            SphincsParameterSet::Spxs256 => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(SphincsParameterSet::Spxs128),
            2 => Ok(SphincsParameterSet::Spxs256),
            _ => Err(CoreError::Deserialization("unknown SPHINCS+ parameter set tag")),
        }
    }
}

pub struct SphincsPrivateKey {
    pub parameter_set: SphincsParameterSet,
    pub coefficients: Vec<u16>,
}

impl Drop for SphincsPrivateKey {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}

#[derive(Clone)]
pub struct SphincsPublicKey {
    pub parameter_set: SphincsParameterSet,
    pub packed_bytes: Vec<u8>,
}

pub fn private_key_to_bytes(key: &SphincsPrivateKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &pack_u16_le(&key.coefficients))
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<SphincsPrivateKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(SphincsPrivateKey {
        parameter_set: SphincsParameterSet::from_tag(tag)?,
        coefficients: unpack_u16_le(payload)?,
    })
}

pub fn public_key_to_bytes(key: &SphincsPublicKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &key.packed_bytes)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<SphincsPublicKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(SphincsPublicKey {
        parameter_set: SphincsParameterSet::from_tag(tag)?,
        packed_bytes: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = SphincsPrivateKey {
            parameter_set: SphincsParameterSet::Spxs256,
            coefficients: (0..32).collect(),
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = SphincsPublicKey {
            parameter_set: SphincsParameterSet::Spxs128,
            packed_bytes: vec![8u8; 32],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.packed_bytes, key.packed_bytes);
    }
}
