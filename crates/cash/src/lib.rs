//! This crate provides Bitcoin Cash addresses in both text formats, CashAddr and legacy
//! Base58Check, together with the transaction output type that binds a value to a locking
//! script.
//!
//! ```
//! use cashcoins::prelude::*;
//!
//! let legacy = Address::parse(None, "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu").unwrap();
//! assert_eq!(
//!     legacy.to_cashaddr_string(),
//!     "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a",
//! );
//!
//! let output = TxOut::pay_to(5000, &legacy);
//! let hex = output.serialize_hex();
//! let parsed = TxOut::deserialize_hex(&hex).unwrap();
//! assert_eq!(parsed.address_for(&MAINNET), Some(legacy));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod enc;
pub mod nets;
pub mod types;

/// Common re-exports
pub mod prelude;

#[doc(hidden)]
#[cfg(any(feature = "mainnet", feature = "testnet", feature = "regtest"))]
pub mod defaults;

#[cfg(any(feature = "mainnet", feature = "testnet", feature = "regtest"))]
pub use defaults::network::{Encoder, Params};

pub use nets::*;
