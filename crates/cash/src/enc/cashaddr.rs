//! CashAddr encoding and decoding.
//!
//! A CashAddr string is `prefix ":" payload checksum`. The payload is a version byte followed by
//! a hash, repacked from 8-bit bytes into 5-bit symbols and spelled with a 32-character
//! alphabet. The 8-symbol checksum is a 40-bit BCH code computed over the lower 5 bits of each
//! prefix character, a zero separator, and the payload symbols.
//!
//! The checksum and the padding rules differ from bech32, so only `bech32::Fe32` is used here,
//! for symbol/character mapping. Bit packing and the polymod are implemented in this module.
//!
//! The version byte packs the address kind and the hash size:
//!
//! ```text
//!  bit 7     bits 6..3     bits 2..0
//!  reserved  type          size code
//!  (0)       0 = P2PKH     0..7 => 20, 24, 28, 32, 40, 48, 56, 64 bytes
//!            1 = P2SH
//! ```

use bech32::Fe32;

use crate::{
    enc::bases::{EncodingError, EncodingResult},
    nets::MAINNET,
};

/// The CashAddr symbol alphabet, indexed by symbol value.
pub const CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// The prefix assumed when a string carries none.
pub const DEFAULT_PREFIX: &str = MAINNET.cashaddr_prefix;

/// Number of 5-bit checksum symbols.
pub const CHECKSUM_LEN: usize = 8;

const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// The two standard address kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressKind {
    /// Pay to public key hash
    PubKeyHash,
    /// Pay to script hash
    ScriptHash,
}

impl AddressKind {
    fn type_bits(self) -> u8 {
        match self {
            AddressKind::PubKeyHash => 0,
            AddressKind::ScriptHash => 1,
        }
    }
}

/// The hash lengths a version byte can declare. Only `Bytes20` is standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashSize {
    /// 160 bits
    Bytes20,
    /// 192 bits
    Bytes24,
    /// 224 bits
    Bytes28,
    /// 256 bits
    Bytes32,
    /// 320 bits
    Bytes40,
    /// 384 bits
    Bytes48,
    /// 448 bits
    Bytes56,
    /// 512 bits
    Bytes64,
}

impl HashSize {
    /// Map the low 3 bits of a version byte to a size.
    pub fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => HashSize::Bytes20,
            1 => HashSize::Bytes24,
            2 => HashSize::Bytes28,
            3 => HashSize::Bytes32,
            4 => HashSize::Bytes40,
            5 => HashSize::Bytes48,
            6 => HashSize::Bytes56,
            _ => HashSize::Bytes64,
        }
    }

    /// The size code for a hash of `len` bytes, if that length is representable.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            20 => Some(HashSize::Bytes20),
            24 => Some(HashSize::Bytes24),
            28 => Some(HashSize::Bytes28),
            32 => Some(HashSize::Bytes32),
            40 => Some(HashSize::Bytes40),
            48 => Some(HashSize::Bytes48),
            56 => Some(HashSize::Bytes56),
            64 => Some(HashSize::Bytes64),
            _ => None,
        }
    }

    /// The 3-bit size code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The hash length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            HashSize::Bytes20 => 20,
            HashSize::Bytes24 => 24,
            HashSize::Bytes28 => 28,
            HashSize::Bytes32 => 32,
            HashSize::Bytes40 => 40,
            HashSize::Bytes48 => 48,
            HashSize::Bytes56 => 56,
            HashSize::Bytes64 => 64,
        }
    }
}

/// Pack an address kind and hash size into a version byte.
pub fn version_byte(kind: AddressKind, size: HashSize) -> u8 {
    (kind.type_bits() << 3) | size.code()
}

/// Split a version byte into kind and size. Fails with `UnknownVersionByte` if the reserved bit
/// is set or the type is neither P2PKH nor P2SH.
pub fn parse_version_byte(version: u8) -> EncodingResult<(AddressKind, HashSize)> {
    if version & 0x80 != 0 {
        return Err(EncodingError::UnknownVersionByte(version));
    }
    let kind = match (version >> 3) & 0x0f {
        0 => AddressKind::PubKeyHash,
        1 => AddressKind::ScriptHash,
        _ => return Err(EncodingError::UnknownVersionByte(version)),
    };
    Ok((kind, HashSize::from_code(version)))
}

/// The CashAddr checksum function. Returns 0 for a string whose trailing checksum is valid.
fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ (d as u64);

        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

/// The lower 5 bits of each prefix character, then a zero separator.
fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut result: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    result.push(0);
    result
}

/// Repack bytes into 5-bit symbols, MSB first. The final symbol is padded with zero bits.
fn bytes_to_symbols(data: &[u8]) -> Vec<u8> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::with_capacity((data.len() * 8 + 4) / 5);

    for &byte in data {
        acc = ((acc << 8) | byte as u32) & 0xfff;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            result.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        result.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    result
}

/// Repack 5-bit symbols into bytes. At most 4 pad bits may remain, and they must be zero.
fn symbols_to_bytes(symbols: &[u8]) -> EncodingResult<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::with_capacity(symbols.len() * 5 / 8);

    for &symbol in symbols {
        acc = ((acc << 5) | symbol as u32) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            result.push(((acc >> bits) & 0xff) as u8);
        }
    }

    if bits >= 5 {
        return Err(EncodingError::ExcessPadding);
    }
    if acc & ((1 << bits) - 1) != 0 {
        return Err(EncodingError::InvalidPadding);
    }
    Ok(result)
}

/// Spell `symbols` under `prefix` and append the checksum. Every symbol must be below 32.
fn encode_checked(prefix: &str, symbols: &[u8]) -> String {
    let charset = CHARSET.as_bytes();
    debug_assert!(symbols.iter().all(|&s| (s as usize) < charset.len()));

    let mut values = expand_prefix(prefix);
    values.extend_from_slice(symbols);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let checksum = polymod(&values);

    let mut result = String::with_capacity(prefix.len() + 1 + symbols.len() + CHECKSUM_LEN);
    result.push_str(prefix);
    result.push(':');
    result.extend(symbols.iter().map(|&s| charset[s as usize & 0x1f] as char));
    for i in 0..CHECKSUM_LEN {
        let value = (checksum >> (5 * (CHECKSUM_LEN - 1 - i))) & 0x1f;
        result.push(charset[value as usize] as char);
    }
    result
}

/// Encode raw 5-bit symbols under `prefix`, appending the checksum. No repacking or version
/// checks are performed, so this can produce strings the decoder rejects. Fails with
/// `InvalidSymbol` for values of 32 or more.
pub fn encode_symbols(prefix: &str, symbols: &[u8]) -> EncodingResult<String> {
    if let Some(&bad) = symbols.iter().find(|&&s| Fe32::try_from(s).is_err()) {
        return Err(EncodingError::InvalidSymbol(bad));
    }
    Ok(encode_checked(prefix, symbols))
}

/// Encode a payload (version byte followed by hash) under `prefix`.
pub fn encode(prefix: &str, payload: &[u8]) -> String {
    encode_checked(prefix, &bytes_to_symbols(payload))
}

/// Validate case, characters and checksum. Returns the lowercase prefix and the payload symbols
/// with the checksum stripped. `default_prefix` is used when the string has no `:`.
pub fn decode_symbols(default_prefix: &str, address: &str) -> EncodingResult<(String, Vec<u8>)> {
    let has_lower = address.chars().any(char::is_lowercase);
    let has_upper = address.chars().any(char::is_uppercase);
    if has_lower && has_upper {
        return Err(EncodingError::MixedCase);
    }

    let address = address.to_lowercase();
    let (prefix, body) = match address.rfind(':') {
        Some(i) => (address[..i].to_owned(), &address[i + 1..]),
        None => (default_prefix.to_lowercase(), address.as_str()),
    };

    let mut symbols = body
        .chars()
        .map(|c| {
            Fe32::from_char(c)
                .map(Fe32::to_u8)
                .map_err(|_| EncodingError::InvalidCharacter(c))
        })
        .collect::<EncodingResult<Vec<u8>>>()?;

    if symbols.len() < CHECKSUM_LEN {
        return Err(EncodingError::ChecksumMismatch);
    }
    let mut values = expand_prefix(&prefix);
    values.extend_from_slice(&symbols);
    if polymod(&values) != 0 {
        return Err(EncodingError::ChecksumMismatch);
    }

    symbols.truncate(symbols.len() - CHECKSUM_LEN);
    Ok((prefix, symbols))
}

/// Decode a CashAddr string to `(prefix, version byte, hash)`. Strings without a prefix are
/// read as mainnet.
pub fn decode(address: &str) -> EncodingResult<(String, u8, Vec<u8>)> {
    decode_with_prefix(DEFAULT_PREFIX, address)
}

/// Decode a CashAddr string, using `default_prefix` when the string carries none.
pub fn decode_with_prefix(
    default_prefix: &str,
    address: &str,
) -> EncodingResult<(String, u8, Vec<u8>)> {
    let (prefix, symbols) = decode_symbols(default_prefix, address)?;
    let payload = symbols_to_bytes(&symbols)?;

    let (&version, hash) = payload
        .split_first()
        .ok_or(EncodingError::HashSizeMismatch(0))?;
    let (_, size) = parse_version_byte(version)?;
    if hash.len() != size.byte_len() {
        return Err(EncodingError::HashSizeMismatch(hash.len()));
    }
    Ok((prefix, version, hash.to_vec()))
}
