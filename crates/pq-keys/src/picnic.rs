//! Picnic key records, grounded on `PicnicPrivateKey.cpp`/
//! `PicnicPublicKey.cpp`: `u8` parameter-set tag, `u32` little-endian byte
//! length. The private key's seed/share coefficients are packed as `u16`
//! little-endian words; the public key's packed bytes are stored as-is.

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{
    pack_u16_le, read_u8_tag_u32_len, unpack_u16_le, write_u8_tag_u32_len,
};

/// Mirrors CEX's `PicnicParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PicnicParameterSet {
    PicnicFs1,
    PicnicFs2,
}

impl PicnicParameterSet {
    fn to_tag(self) -> u8 {
        match self {
            PicnicParameterSet::PicnicFs1 => 1,
            PicnicParameterSet::PicnicFs2 => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(PicnicParameterSet::PicnicFs1),
            2 => Ok(PicnicParameterSet::PicnicFs2),
            _ => Err(CoreError::Deserialization("unknown Picnic parameter set tag")),
        }
    }
}

pub struct PicnicPrivateKey {
    pub parameter_set: PicnicParameterSet,
    pub coefficients: Vec<u16>,
}

impl Drop for PicnicPrivateKey {
    fn drop(&mut self) {
        self.coefficients.zeroize();
    }
}

#[derive(Clone)]
pub struct PicnicPublicKey {
    pub parameter_set: PicnicParameterSet,
    pub packed_bytes: Vec<u8>,
}

pub fn private_key_to_bytes(key: &PicnicPrivateKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &pack_u16_le(&key.coefficients))
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<PicnicPrivateKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(PicnicPrivateKey {
        parameter_set: PicnicParameterSet::from_tag(tag)?,
        coefficients: unpack_u16_le(payload)?,
    })
}

pub fn public_key_to_bytes(key: &PicnicPublicKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &key.packed_bytes)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<PicnicPublicKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(PicnicPublicKey {
        parameter_set: PicnicParameterSet::from_tag(tag)?,
        packed_bytes: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = PicnicPrivateKey {
            parameter_set: PicnicParameterSet::PicnicFs1,
            coefficients: (0..64).collect(),
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = PicnicPublicKey {
            parameter_set: PicnicParameterSet::PicnicFs2,
            packed_bytes: vec![6u8; 128],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.packed_bytes, key.packed_bytes);
    }
}
