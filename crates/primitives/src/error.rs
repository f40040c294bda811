use core::fmt;

/// The one error type returned by every fallible entry point across the
/// hash-core family: bad configuration, undersized output buffers, reuse
/// after finalization, and malformed serialized key records.
///
/// Programmer errors that a caller could only trigger by passing literal
/// out-of-range constants (e.g. a hard-coded digest length) stay `assert!`s
/// on the builder setters, matching upstream; `CoreError` is for paths that
/// see untrusted or data-dependent input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreError {
    /// A configuration value was out of range: digest length, key length,
    /// salt/personalization length, or an inconsistent tree-mode setting.
    InvalidParameter(&'static str),
    /// The caller-supplied output buffer is smaller than the digest length.
    ShortBuffer,
    /// `update` was called on a state that has already been finalized,
    /// without an intervening `reset`.
    UsedAfterFinalize,
    /// An asymmetric key record's serialized bytes were truncated, carried
    /// an unknown tag, or had a length field inconsistent with the
    /// remaining bytes.
    Deserialization(&'static str),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidParameter(why) => write!(f, "invalid parameter: {}", why),
            CoreError::ShortBuffer => write!(f, "output buffer shorter than the digest length"),
            CoreError::UsedAfterFinalize => {
                write!(f, "update() called after finalize() without an intervening reset()")
            }
            CoreError::Deserialization(why) => write!(f, "malformed key record: {}", why),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
