//! Re-exports of common traits.
pub use crate::{
    enc::AddressEncoder,
    hashes::{DigestWriter, Hash160Digest, Hash256Digest},
    ser::{ByteFormat, SerError, SerResult},
};
