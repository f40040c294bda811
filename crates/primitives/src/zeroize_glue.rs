//! Re-exports the `zeroize` crate's trait so every hash-core crate wipes
//! secret-carrying state (digest chaining values once a MAC key has been
//! absorbed, PQ key-record coefficients) the same way on drop, instead of
//! each crate hand-rolling its own memset-after-free call.

pub use zeroize::Zeroize;
