//! Shared tag+length+payload packing for the record shapes in this crate.
//! Every scheme module below is a thin, named wrapper around one of these
//! four header shapes, matching the tag/length widths its corresponding
//! CEX key class used.

use hash_core_primitives::CoreError;

/// `u8` tag, `u32` little-endian length, followed by a raw byte payload.
pub(crate) fn write_u8_tag_u32_len(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 4 + payload.len());
    out.push(tag);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub(crate) fn read_u8_tag_u32_len(bytes: &[u8]) -> Result<(u8, &[u8]), CoreError> {
    if bytes.len() < 5 {
        return Err(CoreError::Deserialization(
            "record shorter than the 5-byte tag+length header",
        ));
    }
    let tag = bytes[0];
    let len = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;
    let payload = bytes
        .get(5..)
        .filter(|rest| rest.len() == len)
        .ok_or(CoreError::Deserialization(
            "declared length does not match the remaining bytes",
        ))?;
    Ok((tag, payload))
}

/// `u16` little-endian tag, `u16` little-endian length, raw byte payload.
pub(crate) fn write_u16_tag_u16_len(tag: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + 2 + payload.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub(crate) fn read_u16_tag_u16_len(bytes: &[u8]) -> Result<(u16, &[u8]), CoreError> {
    if bytes.len() < 4 {
        return Err(CoreError::Deserialization(
            "record shorter than the 4-byte tag+length header",
        ));
    }
    let tag = u16::from_le_bytes([bytes[0], bytes[1]]);
    let len = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
    let payload = bytes
        .get(4..)
        .filter(|rest| rest.len() == len)
        .ok_or(CoreError::Deserialization(
            "declared length does not match the remaining bytes",
        ))?;
    Ok((tag, payload))
}

/// Little-endian `u16` coefficient packing, used by the lattice/signature
/// schemes whose private keys store small-integer coefficient vectors
/// rather than raw bytes.
pub(crate) fn pack_u16_le(coefficients: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(coefficients.len() * 2);
    for c in coefficients {
        out.extend_from_slice(&c.to_le_bytes());
    }
    out
}

pub(crate) fn unpack_u16_le(bytes: &[u8]) -> Result<Vec<u16>, CoreError> {
    if bytes.len() % 2 != 0 {
        return Err(CoreError::Deserialization(
            "coefficient payload length is not a multiple of 2",
        ));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect())
}
