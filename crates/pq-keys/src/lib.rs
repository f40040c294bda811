//! Wire-level shapes for a handful of post-quantum key types: a tagged
//! parameter set, a length, and a coefficient payload, one module per
//! scheme. These are record shapes only — no key generation, encryption,
//! or signing lives here, per the interface-shape-only scope this crate
//! was carried in under.
//!
//! Every record provides free `to_bytes`/`from_bytes` functions (not
//! methods) and zeroizes any coefficient material that constitutes a
//! private key on drop.

mod wire;

pub mod dilithium;
pub mod mceliece;
pub mod mlwe;
pub mod ntru;
pub mod picnic;
pub mod rlwe;
pub mod sphincs;
