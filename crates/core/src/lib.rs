//! # Cashcoins Core
//!
//! `cashcoins-core` contains utilities and traits used by the `cashcoins`
//! crate.
//!
//! ## Crate Layout
//!
//! ### Hashes
//!
//! The hashes module provides writers for the two digests Bitcoin-style
//! chains use when building addresses: `Hash256` is Bitcoin's double-sha2,
//! used for Base58Check checksums, while `Hash160` is Bitcoin's
//! `ripemd160(sha2(x))`, used for public key and script hashes.
//!
//! ### ByteFormat trait
//!
//! The `ByteFormat` trait is a simple serialization API using
//! `std::io::{Read, Write}`. Implementers define the binary serialization
//! format of the type. It also provides helpers for the Bitcoin compact-int
//! (VarInt) encoding used to length-prefix scripts.
//!
//! `ByteFormat` has an associated `Error` type. Most basic types can simply use
//! the provided `SerError`.
//!
//! ### Encoders
//!
//! The `AddressEncoder` trait describes translation between a network's
//! human-facing addresses and the in-protocol recipient identifier (usually a
//! script).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
pub mod macros;

pub mod enc;
pub mod hashes;
pub mod ser;

pub mod prelude;
