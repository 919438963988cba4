//! Contains the address error type and simplified access to Base58Check for legacy addresses.

use cashcoins_core::hashes::hash256;
use thiserror::Error;

/// The Base58 alphabet. Omits `0`, `O`, `I` and `l`.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Errors that can be returned by the address codecs. Each decode failure reports exactly one
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A character outside the format's alphabet.
    #[error("Invalid character: {0:?}")]
    InvalidCharacter(char),

    /// A 5-bit symbol value above 31 was supplied to the CashAddr encoder.
    #[error("Invalid 5-bit symbol: {0}")]
    InvalidSymbol(u8),

    /// The recomputed checksum disagrees with the embedded one.
    #[error("Checksum mismatch")]
    ChecksumMismatch,

    /// The padding bits of the final 5-bit group are not zero.
    #[error("Non-zero padding bits")]
    InvalidPadding,

    /// The symbol count does not correspond to a whole number of bytes.
    #[error("Excess padding bits")]
    ExcessPadding,

    /// The CashAddr version byte has its reserved bit set, or an unknown type. Also returned for
    /// Base58 version bytes that no known network uses.
    #[error("Unknown version byte: {0:#04x}")]
    UnknownVersionByte(u8),

    /// The decoded hash length does not match the length the version byte declares.
    #[error("Hash of {0} bytes does not match the declared size")]
    HashSizeMismatch(usize),

    /// CashAddr strings must be all-lowercase or all-uppercase.
    #[error("Mixed-case address")]
    MixedCase,

    /// The explicit prefix or version contradicts the supplied or known networks.
    #[error("Network mismatch: {0}")]
    PrefixMismatch(String),

    /// Neither CashAddr nor Base58Check accepts the input.
    #[error("Unrecognized address format")]
    UnrecognizedFormat,

    /// The Base58 payload is shorter than a version byte plus checksum.
    #[error("Base58 payload of {0} bytes is too short")]
    TooShort(usize),

    /// The script is not one of the standard address-bearing shapes.
    #[error("Non-standard script, no address")]
    UnknownScriptType,

    /// Legacy addresses can only carry 20-byte hashes.
    #[error("Legacy addresses require a 20-byte hash, got {0} bytes")]
    NonStandardHashLength(usize),

    /// A bare legacy address matches more than one registered network.
    #[error("Version byte {0:#04x} is shared by several networks")]
    AmbiguousNetwork(u8),

    /// Two profiles in a registry share a CashAddr prefix.
    #[error("Duplicate network prefix: {0}")]
    DuplicateProfile(String),
}

/// A simple result type alias
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Encode `version || payload || checksum` as Base58. The checksum is the first 4 bytes of the
/// double-sha2 of `version || payload`.
pub fn encode_base58_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = hash256(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).into_string()
}

/// Decode a Base58Check string to its version byte and payload.
pub fn decode_base58_check(s: &str) -> EncodingResult<(u8, Vec<u8>)> {
    let data = decode_base58(s)?;
    if data.len() < 5 {
        return Err(EncodingError::TooShort(data.len()));
    }

    let (body, checksum) = data.split_at(data.len() - 4);
    if hash256(body)[..4] != *checksum {
        return Err(EncodingError::ChecksumMismatch);
    }
    Ok((body[0], body[1..].to_vec()))
}

/// Decode Base58 digits to bytes, without checksum verification.
pub fn decode_base58(s: &str) -> EncodingResult<Vec<u8>> {
    if let Some(c) = s.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
        return Err(EncodingError::InvalidCharacter(c));
    }
    bs58::decode(s)
        .into_vec()
        .map_err(|_| EncodingError::UnrecognizedFormat)
}
