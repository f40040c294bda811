//! Shared, dependency-light building blocks for the hash-core family of
//! crates: total (never-failing) byte/word marshalling, fixed-shift
//! rotations, constant-time comparison/selection primitives, and the one
//! error type every fallible entry point in the family returns.
//!
//! None of this is hashing logic. It's the plumbing that `blake2b_simd`,
//! `blake2s_simd` and `sha2_simd` would otherwise each reimplement.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod ct;
mod endian;
mod error;
mod zeroize_glue;

pub use ct::{bytes_increment_be, ct_eq, ct_is_zero, ct_select, expand_mask};
pub use endian::{
    load_be_u32, load_be_u64, load_block_be_u32, load_block_be_u64, load_block_le_u32,
    load_block_le_u64, load_le_u32, load_le_u64, store_be_u32, store_be_u64, store_le_u32,
    store_le_u64,
};
pub use error::CoreError;
pub use zeroize_glue::Zeroize;
