//! Ring-LWE key records, grounded on `RLWEPrivateKey.cpp`/
//! `RLWEPublicKey.cpp`: `u16` little-endian parameter-set tag, `u16`
//! little-endian byte length. The private key's ring-element coefficients
//! are packed as `u16` little-endian words; the public key's packed bytes
//! are stored as-is.

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{
    pack_u16_le, read_u16_tag_u16_len, unpack_u16_le, write_u16_tag_u16_len,
};

/// Mirrors CEX's `RLWEParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RlweParameterSet {
    Q12289N1024,
}

impl RlweParameterSet {
    fn to_tag(self) -> u16 {
        match self {
            RlweParameterSet::Q12289N1024 => 1,
        }
    }

    fn from_tag(tag: u16) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(RlweParameterSet::Q12289N1024),
            _ => Err(CoreError::Deserialization("unknown RLWE parameter set tag")),
        }
    }
}

pub struct RlwePrivateKey {
    pub parameter_set: RlweParameterSet,
    pub coefficients: Vec<u16>,
}

impl Drop for RlwePrivateKey {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}

#[derive(Clone)]
pub struct RlwePublicKey {
    pub parameter_set: RlweParameterSet,
    pub packed_bytes: Vec<u8>,
}

pub fn private_key_to_bytes(key: &RlwePrivateKey) -> Vec<u8> {
    write_u16_tag_u16_len(key.parameter_set.to_tag(), &pack_u16_le(&key.coefficients))
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<RlwePrivateKey, CoreError> {
    let (tag, payload) = read_u16_tag_u16_len(bytes)?;
    Ok(RlwePrivateKey {
        parameter_set: RlweParameterSet::from_tag(tag)?,
        coefficients: unpack_u16_le(payload)?,
    })
}

pub fn public_key_to_bytes(key: &RlwePublicKey) -> Vec<u8> {
    write_u16_tag_u16_len(key.parameter_set.to_tag(), &key.packed_bytes)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<RlwePublicKey, CoreError> {
    let (tag, payload) = read_u16_tag_u16_len(bytes)?;
    Ok(RlwePublicKey {
        parameter_set: RlweParameterSet::from_tag(tag)?,
        packed_bytes: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = RlwePrivateKey {
            parameter_set: RlweParameterSet::Q12289N1024,
            coefficients: (0..1024).collect(),
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = RlwePublicKey {
            parameter_set: RlweParameterSet::Q12289N1024,
            packed_bytes: vec![2u8; 1792],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.packed_bytes, key.packed_bytes);
    }
}
