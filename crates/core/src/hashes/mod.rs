//! Holds utilites for working with cryptographic digests.
//!
//! Both digests are exposed as `std::io::Write` implementors so that callers may stream
//! serialized data into them, as well as one-shot helper functions.

/// Tooling for bitcoin-style double-sha2
pub mod hash256;

/// Tooling for bitcoin-style ripemd160(sha2)
pub mod hash160;

pub use hash160::*;
pub use hash256::*;

pub use digest::Digest;

/// A trait for writers that consume themselves to produce a fixed-size digest.
pub trait DigestWriter<T> {
    /// Consumes the writer, returning the digest of all data written to it.
    fn finish(self) -> T;
}
