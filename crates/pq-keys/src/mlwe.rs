//! Module-LWE key records, grounded on `MLWEPrivateKey.cpp`/
//! `MLWEPublicKey.cpp`: `u8` parameter-set tag, `u32` little-endian byte
//! length. The private key stores its polynomial coefficients as `u16`
//! little-endian words (small-integer ring elements); the public key
//! stores its packed bytes as-is.

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{
    pack_u16_le, read_u8_tag_u32_len, unpack_u16_le, write_u8_tag_u32_len,
};

/// Mirrors CEX's `MLWEParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MlweParameterSet {
    Q3329N256,
    Q3329N512,
}

impl MlweParameterSet {
    fn to_tag(self) -> u8 {
        match self {
            MlweParameterSet::Q3329N256 => 1,
            MlweParameterSet::Q3329N512 => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(MlweParameterSet::Q3329N256),
            2 => Ok(MlweParameterSet::Q3329N512),
            _ => Err(CoreError::Deserialization("unknown MLWE parameter set tag")),
        }
    }
}

pub struct MlwePrivateKey {
    pub parameter_set: MlweParameterSet,
    pub coefficients: Vec<u16>,
}

impl Drop for MlwePrivateKey {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}

#[derive(Clone)]
pub struct MlwePublicKey {
    pub parameter_set: MlweParameterSet,
    pub packed_bytes: Vec<u8>,
}

pub fn private_key_to_bytes(key: &MlwePrivateKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &pack_u16_le(&key.coefficients))
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<MlwePrivateKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(MlwePrivateKey {
        parameter_set: MlweParameterSet::from_tag(tag)?,
        coefficients: unpack_u16_le(payload)?,
    })
}

pub fn public_key_to_bytes(key: &MlwePublicKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &key.packed_bytes)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<MlwePublicKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(MlwePublicKey {
        parameter_set: MlweParameterSet::from_tag(tag)?,
        packed_bytes: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = MlwePrivateKey {
            parameter_set: MlweParameterSet::Q3329N256,
            coefficients: (0..256).collect(),
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.parameter_set, MlweParameterSet::Q3329N256);
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = MlwePublicKey {
            parameter_set: MlweParameterSet::Q3329N512,
            packed_bytes: vec![7u8; 800],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.packed_bytes, key.packed_bytes);
    }

    #[test]
    fn odd_length_coefficient_payload_is_rejected() {
        let bytes = write_u8_tag_u32_len(1, &[1, 2, 3]);
        assert!(private_key_from_bytes(&bytes).is_err());
    }
}
