//! McEliece key records, grounded on `MPKCPrivateKey.cpp`/`MPKCPublicKey.cpp`:
//! a `u16` parameter-set tag, a `u16` byte-length field, and the raw
//! coefficient bytes (the private key's scrambled generator-matrix columns
//! for `S`, the public key's systematic parity bits for `P`).

use hash_core_primitives::CoreError;
use zeroize::Zeroize;

use crate::wire::{read_u16_tag_u16_len, write_u16_tag_u16_len};

/// The McEliece parameter set a key record was generated under, mirroring
/// CEX's `MPKCParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MpkcParameterSet {
    M12T62,
    M13T64,
}

impl MpkcParameterSet {
    fn to_tag(self) -> u16 {
        match self {
            MpkcParameterSet::M12T62 => 1,
            MpkcParameterSet::M13T64 => 2,
        }
    }

    fn from_tag(tag: u16) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(MpkcParameterSet::M12T62),
            2 => Ok(MpkcParameterSet::M13T64),
            _ => Err(CoreError::Deserialization("unknown McEliece parameter set tag")),
        }
    }
}

/// A private key record: the scrambled generator-matrix `S` coefficients.
pub struct McEliecePrivateKey {
    pub parameter_set: MpkcParameterSet,
    pub s_coefficients: Vec<u8>,
}

impl Drop for McEliecePrivateKey {
    fn drop(&mut self) {
        self.s_coefficients.zeroize();
    }
}

/// A public key record: the systematic parity-check `P` coefficients.
#[derive(Clone)]
pub struct McEliecePublicKey {
    pub parameter_set: MpkcParameterSet,
    pub p_coefficients: Vec<u8>,
}

pub fn private_key_to_bytes(key: &McEliecePrivateKey) -> Vec<u8> {
    write_u16_tag_u16_len(key.parameter_set.to_tag(), &key.s_coefficients)
}

pub fn private_key_from_bytes(bytes: &[u8]) -> Result<McEliecePrivateKey, CoreError> {
    let (tag, payload) = read_u16_tag_u16_len(bytes)?;
    Ok(McEliecePrivateKey {
        parameter_set: MpkcParameterSet::from_tag(tag)?,
        s_coefficients: payload.to_vec(),
    })
}

pub fn public_key_to_bytes(key: &McEliecePublicKey) -> Vec<u8> {
    write_u16_tag_u16_len(key.parameter_set.to_tag(), &key.p_coefficients)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<McEliecePublicKey, CoreError> {
    let (tag, payload) = read_u16_tag_u16_len(bytes)?;
    Ok(McEliecePublicKey {
        parameter_set: MpkcParameterSet::from_tag(tag)?,
        p_coefficients: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn private_key_round_trips() {
        let key = McEliecePrivateKey {
            parameter_set: MpkcParameterSet::M13T64,
            s_coefficients: vec![9u8; 128],
        };
        let bytes = private_key_to_bytes(&key);
        let back = private_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.parameter_set, MpkcParameterSet::M13T64);
        assert_eq!(back.s_coefficients, key.s_coefficients);
    }

    #[test]
    fn public_key_round_trips() {
        let key = McEliecePublicKey {
            parameter_set: MpkcParameterSet::M12T62,
            p_coefficients: vec![3u8; 64],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.parameter_set, MpkcParameterSet::M12T62);
        assert_eq!(back.p_coefficients, key.p_coefficients);
    }

    #[test]
    fn truncated_record_is_rejected() {
        assert!(private_key_from_bytes(&[0, 1]).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let bytes = write_u16_tag_u16_len(99, &[1, 2, 3]);
        assert!(private_key_from_bytes(&bytes).is_err());
    }
}
