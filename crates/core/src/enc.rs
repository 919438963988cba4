//! Holds the `AddressEncoder` trait. Concrete encoders for Bitcoin Cash networks live in the
//! `cashcoins` crate.

/// An AddressEncoder encodes and decodes addresses. It handles converting addresses to
/// recipient identifiers (scripts) and vice versa. It also contains a function that parses a
/// string into the appropriate address type.
///
/// The associated type defines what the encoder considers to be an "address."
pub trait AddressEncoder {
    /// A type representing the encoded address
    type Address;
    /// An error type that will be returned in case of encoding errors
    type Error;
    /// A type representing the in-protocol recipient. This is usually different from the
    /// Address type.
    type RecipientIdentifier;

    /// Encode a script as an address.
    fn encode_address(s: &Self::RecipientIdentifier) -> Result<Self::Address, Self::Error>;

    /// Decode a script from an address.
    fn decode_address(addr: &Self::Address) -> Self::RecipientIdentifier;

    /// Convert a string into an address.
    fn string_to_address(s: &str) -> Result<Self::Address, Self::Error>;
}
