//! Dilithium key records, grounded on `DilithiumPrivateKey.cpp`/
//! `DilithiumPublicKey.cpp`: `u8` parameter-set tag, `u32` little-endian
//! byte length. The private key's polynomial-vector coefficients are
//! packed as `u16` little-endian words; the public key's packed bytes are
//! stored as-is.

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{
    pack_u16_le, read_u8_tag_u32_len, unpack_u16_le, write_u8_tag_u32_len,
};

/// Mirrors CEX's `DilithiumParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DilithiumParameterSet {
    DLMS1N256Q8380417,
    DLMS2N256Q8380417,
}

impl DilithiumParameterSet {
    fn to_tag(self) -> u8 {
        match self {
            DilithiumParameterSet::DLMS1N256Q8380417 => 1,
            DilithiumParameterSet::DLMS2N256Q8380417 => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(DilithiumParameterSet::DLMS1N256Q8380417),
            2 => Ok(DilithiumParameterSet::DLMS2N256Q8380417),
            _ => Err(CoreError::Deserialization(
                "unknown Dilithium parameter set tag",
            )),
        }
    }
}

pub struct DilithiumPrivateKey {
    pub parameter_set: DilithiumParameterSet,
    pub coefficients: Vec<u16>,
}

impl Drop for DilithiumPrivateKey {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}

#[derive(Clone)]
pub struct DilithiumPublicKey {
    pub parameter_set: DilithiumParameterSet,
    pub packed_bytes: Vec<u8>,
}

pub fn private_key_to_bytes(key: &DilithiumPrivateKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &pack_u16_le(&key.coefficients))
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<DilithiumPrivateKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(DilithiumPrivateKey {
        parameter_set: DilithiumParameterSet::from_tag(tag)?,
        coefficients: unpack_u16_le(payload)?,
    })
}

pub fn public_key_to_bytes(key: &DilithiumPublicKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &key.packed_bytes)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<DilithiumPublicKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(DilithiumPublicKey {
        parameter_set: DilithiumParameterSet::from_tag(tag)?,
        packed_bytes: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = DilithiumPrivateKey {
            parameter_set: DilithiumParameterSet::DLMS2N256Q8380417,
            coefficients: (0..256).collect(),
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(
            back.parameter_set,
            DilithiumParameterSet::DLMS2N256Q8380417
        );
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = DilithiumPublicKey {
            parameter_set: DilithiumParameterSet::DLMS1N256Q8380417,
            packed_bytes: vec![4u8; 1472],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.packed_bytes, key.packed_bytes);
    }
}
