//! A pure Rust implementation of SHA-256 and SHA-512, with a portable
//! scalar compression path, a dynamically detected SHA-NI path (SHA-256
//! only), and a wide-SIMD `many` module for N-way independent-block
//! batch hashing.
//!
//! ```
//! let hash = sha2_simd::sha256(b"abc");
//! assert_eq!(32, hash.as_bytes().len());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate arrayref;

pub mod many;
mod portable;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shani;

pub mod sha256;
pub mod sha512;

#[cfg(test)]
mod test;

pub use sha256::{sha256, Hash256, Params256, State256};
pub use sha512::{sha512, Hash512, Params512, State512};

pub(crate) const BLOCKBYTES256: usize = 64;
pub(crate) const BLOCKBYTES512: usize = 128;
pub const OUTBYTES256: usize = 32;
pub const OUTBYTES512: usize = 64;

pub(crate) const IV256: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

pub(crate) const IV512: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

pub(crate) type StateWords256 = [u32; 8];
pub(crate) type StateWords512 = [u64; 8];
pub(crate) type Block256 = [u8; BLOCKBYTES256];
pub(crate) type Block512 = [u8; BLOCKBYTES512];

pub(crate) type Compress256Fn = fn(&mut StateWords256, &Block256);
pub(crate) type Compress512Fn = fn(&mut StateWords512, &Block512);
