//! Contains the two address codecs, the `Address` type that unifies them, and parameterized
//! `AddressEncoder`s for each network.

pub mod bases;
pub mod cashaddr;
pub mod encoder;

pub use bases::*;
pub use cashaddr::{AddressKind, HashSize};
pub use encoder::*;
