//! NTRU key records, grounded on `NTRUPublicKey.cpp`. No `NTRUPrivateKey`
//! source was available to ground a private-key shape against, so only
//! the public key record is modeled here: a `u8` parameter-set tag, a
//! `u32` little-endian byte length, and the raw public coefficient bytes.

use hash_core_primitives::CoreError;

use crate::wire::{read_u8_tag_u32_len, write_u8_tag_u32_len};

/// The NTRU parameter set a key record was generated under, mirroring
/// CEX's `NTRUParams` enumeration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NtruParameterSet {
    EES439EP1,
    EES743EP1,
}

impl NtruParameterSet {
    fn to_tag(self) -> u8 {
        match self {
            NtruParameterSet::EES439EP1 => 1,
            NtruParameterSet::EES743EP1 => 2,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            1 => Ok(NtruParameterSet::EES439EP1),
            2 => Ok(NtruParameterSet::EES743EP1),
            _ => Err(CoreError::Deserialization("unknown NTRU parameter set tag")),
        }
    }
}

#[derive(Clone)]
pub struct NtruPublicKey {
    pub parameter_set: NtruParameterSet,
    pub coefficients: Vec<u8>,
}

pub fn public_key_to_bytes(key: &NtruPublicKey) -> Vec<u8> {
    write_u8_tag_u32_len(key.parameter_set.to_tag(), &key.coefficients)
}

pub fn public_key_from_bytes(bytes: &[u8]) -> Result<NtruPublicKey, CoreError> {
    let (tag, payload) = read_u8_tag_u32_len(bytes)?;
    Ok(NtruPublicKey {
        parameter_set: NtruParameterSet::from_tag(tag)?,
        coefficients: payload.to_vec(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn public_key_round_trips() {
        let key = NtruPublicKey {
            parameter_set: NtruParameterSet::EES743EP1,
            coefficients: vec![5u8; 743],
        };
        let bytes = public_key_to_bytes(&key);
        let back = public_key_from_bytes(&bytes).unwrap();
        assert_eq!(back.parameter_set, NtruParameterSet::EES743EP1);
        assert_eq!(back.coefficients, key.coefficients);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let bytes = write_u8_tag_u32_len(200, &[1, 2]);
        assert!(public_key_from_bytes(&bytes).is_err());
    }
}
