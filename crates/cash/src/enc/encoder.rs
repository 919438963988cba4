//! Defines the `Address` value type, which unifies CashAddr and legacy Base58Check addresses,
//! and parameterized encoders for mainnet, testnet and regtest.

use std::{fmt, marker::PhantomData};

use cashcoins_core::{
    enc::AddressEncoder,
    hashes::{hash160, Hash160Digest},
};
use tracing::{debug, trace};

use crate::{
    enc::{
        bases::{
            decode_base58, decode_base58_check, encode_base58_check, EncodingError,
            EncodingResult,
        },
        cashaddr::{self, AddressKind, HashSize},
    },
    nets::{NetworkKind, NetworkParams, NetworkProfile, NetworkRegistry},
    types::script::{ScriptPubkey, ScriptType},
};

/// A Bitcoin Cash address: a network, a kind, and a hash. The same address can be rendered as
/// CashAddr or, for 20-byte hashes, as legacy Base58Check. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    network: NetworkProfile,
    kind: AddressKind,
    size: HashSize,
    hash: Vec<u8>,
}

impl Address {
    /// Instantiate an address. Fails with `HashSizeMismatch` if CashAddr cannot represent a
    /// hash of that length.
    pub fn new(network: NetworkProfile, kind: AddressKind, hash: &[u8]) -> EncodingResult<Self> {
        let size =
            HashSize::from_len(hash.len()).ok_or(EncodingError::HashSizeMismatch(hash.len()))?;
        Ok(Self {
            network,
            kind,
            size,
            hash: hash.to_vec(),
        })
    }

    fn standard(network: NetworkProfile, kind: AddressKind, hash: &Hash160Digest) -> Self {
        Self {
            network,
            kind,
            size: HashSize::Bytes20,
            hash: hash.to_vec(),
        }
    }

    /// A pay-to-pubkey-hash address.
    pub fn p2pkh(network: NetworkProfile, hash: &Hash160Digest) -> Self {
        Self::standard(network, AddressKind::PubKeyHash, hash)
    }

    /// A pay-to-script-hash address.
    pub fn p2sh(network: NetworkProfile, hash: &Hash160Digest) -> Self {
        Self::standard(network, AddressKind::ScriptHash, hash)
    }

    /// The P2PKH address of a serialized public key.
    pub fn p2pkh_from_pubkey(network: NetworkProfile, pubkey: &[u8]) -> Self {
        Self::p2pkh(network, &hash160(pubkey))
    }

    /// The P2SH address of a serialized redeem script.
    pub fn p2sh_from_script(network: NetworkProfile, redeem_script: &[u8]) -> Self {
        Self::p2sh(network, &hash160(redeem_script))
    }

    /// The address a locking script pays to, if it has one of the standard shapes.
    pub fn from_script(network: NetworkProfile, script: &ScriptPubkey) -> Option<Self> {
        match script.standard_type() {
            ScriptType::Pkh(hash) => Some(Self::p2pkh(network, &hash)),
            ScriptType::Sh(hash) => Some(Self::p2sh(network, &hash)),
            ScriptType::OpReturn | ScriptType::NonStandard => None,
        }
    }

    /// The network this address belongs to.
    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    /// P2PKH or P2SH.
    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// The hash, 20 bytes for standard addresses.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// The declared hash size.
    pub fn hash_size(&self) -> HashSize {
        self.size
    }

    /// The CashAddr version byte.
    pub fn version_byte(&self) -> u8 {
        cashaddr::version_byte(self.kind, self.size)
    }

    /// True for pay-to-pubkey-hash addresses.
    pub fn is_p2pkh(&self) -> bool {
        self.kind == AddressKind::PubKeyHash
    }

    /// True for pay-to-script-hash addresses.
    pub fn is_p2sh(&self) -> bool {
        self.kind == AddressKind::ScriptHash
    }

    /// True if the address belongs to mainnet.
    pub fn is_mainnet(&self) -> bool {
        self.network.kind == NetworkKind::Main
    }

    /// True if the address belongs to any test-like network.
    pub fn is_testnet(&self) -> bool {
        self.network.is_test_like()
    }

    /// The locking script paying to this address.
    pub fn script_pubkey(&self) -> ScriptPubkey {
        match self.kind {
            AddressKind::PubKeyHash => ScriptPubkey::p2pkh(&self.hash),
            AddressKind::ScriptHash => ScriptPubkey::p2sh(&self.hash),
        }
    }

    /// Render as `prefix:payload`.
    pub fn to_cashaddr_string(&self) -> String {
        let mut payload = Vec::with_capacity(self.hash.len() + 1);
        payload.push(self.version_byte());
        payload.extend_from_slice(&self.hash);
        cashaddr::encode(self.network.cashaddr_prefix, &payload)
    }

    /// Render as legacy Base58Check. Fails with `NonStandardHashLength` for hashes other than
    /// 20 bytes.
    pub fn to_base58_string(&self) -> EncodingResult<String> {
        if self.size != HashSize::Bytes20 {
            return Err(EncodingError::NonStandardHashLength(self.hash.len()));
        }
        Ok(encode_base58_check(
            self.network.base58_version(self.kind),
            &self.hash,
        ))
    }

    /// Parse either format against the standard registry. See `parse_with`.
    pub fn parse(network: Option<&NetworkProfile>, text: &str) -> EncodingResult<Self> {
        Self::parse_with(NetworkRegistry::standard(), network, text)
    }

    /// Parse either format.
    ///
    /// Text containing `:` is CashAddr with an explicit prefix. The prefix must match `network`
    /// if one is supplied, or else a profile in `registry`.
    ///
    /// Bare text is tried as CashAddr under the supplied network's prefix, or under each
    /// registered prefix in order. If the checksum validates under some prefix, the result of
    /// that decode is final. Otherwise the text is tried as Base58Check, and the network is the
    /// supplied one or the only registered profile using the decoded version byte. If neither
    /// format accepts the text, fails with `UnrecognizedFormat`.
    pub fn parse_with(
        registry: &NetworkRegistry,
        network: Option<&NetworkProfile>,
        text: &str,
    ) -> EncodingResult<Self> {
        if let Some(i) = text.rfind(':') {
            let prefix = &text[..i];
            let profile = match network {
                Some(n) if n.cashaddr_prefix.eq_ignore_ascii_case(prefix) => n,
                Some(n) => {
                    return Err(EncodingError::PrefixMismatch(format!(
                        "expected {}, got {}",
                        n.cashaddr_prefix, prefix
                    )))
                }
                None => registry.by_cashaddr_prefix(prefix).ok_or_else(|| {
                    EncodingError::PrefixMismatch(format!("unknown prefix {}", prefix))
                })?,
            };
            return Self::from_cashaddr(profile, text);
        }

        let candidates: Vec<&NetworkProfile> = match network {
            Some(n) => vec![n],
            None => registry.profiles().iter().collect(),
        };
        for profile in candidates {
            match Self::from_cashaddr(profile, text) {
                Ok(address) => return Ok(address),
                Err(
                    EncodingError::MixedCase
                    | EncodingError::InvalidCharacter(_)
                    | EncodingError::ChecksumMismatch,
                ) => {
                    trace!(network = profile.name, "not a cashaddr under this prefix");
                }
                Err(e) => return Err(e),
            }
        }

        debug!("no cashaddr prefix matched, trying base58check");
        let (version, payload) = decode_base58_check(text).map_err(|e| {
            debug!(error = %e, "base58check rejected input");
            EncodingError::UnrecognizedFormat
        })?;

        let profile = match network {
            Some(n) => n,
            None => match registry.unique_by_base58_version(version) {
                Some(p) => p,
                None if registry.knows_base58_version(version) => {
                    return Err(EncodingError::AmbiguousNetwork(version))
                }
                None => {
                    return Err(EncodingError::PrefixMismatch(format!(
                        "no known network uses version byte {:#04x}",
                        version
                    )))
                }
            },
        };
        Self::from_legacy_parts(profile, version, &payload)
    }

    /// Decode a CashAddr string for `network`. A bare string is read under the network's
    /// prefix. An explicit prefix must be the network's.
    pub fn from_cashaddr(network: &NetworkProfile, text: &str) -> EncodingResult<Self> {
        let (prefix, version, hash) =
            cashaddr::decode_with_prefix(network.cashaddr_prefix, text)?;
        if prefix != network.cashaddr_prefix {
            return Err(EncodingError::PrefixMismatch(format!(
                "expected {}, got {}",
                network.cashaddr_prefix, prefix
            )));
        }
        let (kind, _) = cashaddr::parse_version_byte(version)?;
        Self::new(*network, kind, &hash)
    }

    /// Decode a legacy Base58Check string for `network`.
    pub fn from_legacy(network: &NetworkProfile, text: &str) -> EncodingResult<Self> {
        let (version, payload) = decode_base58_check(text)?;
        Self::from_legacy_parts(network, version, &payload)
    }

    fn from_legacy_parts(
        network: &NetworkProfile,
        version: u8,
        payload: &[u8],
    ) -> EncodingResult<Self> {
        let kind = network.kind_for_base58_version(version).ok_or_else(|| {
            EncodingError::PrefixMismatch(format!(
                "version byte {:#04x} is not used by {}",
                version, network.name
            ))
        })?;
        if payload.len() != 20 {
            return Err(EncodingError::HashSizeMismatch(payload.len()));
        }
        Self::new(*network, kind, payload)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cashaddr_string())
    }
}

/// Infer the network of an address string against the standard registry. See
/// `classify_network_with`.
pub fn classify_network(text: &str) -> Option<NetworkProfile> {
    classify_network_with(NetworkRegistry::standard(), text).copied()
}

/// Best-effort network inference, for routing. CashAddr text is matched by checksum only, the
/// payload is not validated. Base58 text is matched by its version byte only, the checksum is
/// not verified. Returns `None` if no registered profile matches, or if several do.
pub fn classify_network_with<'a>(
    registry: &'a NetworkRegistry,
    text: &str,
) -> Option<&'a NetworkProfile> {
    if let Some(i) = text.rfind(':') {
        let profile = registry.by_cashaddr_prefix(&text[..i])?;
        return cashaddr::decode_symbols(profile.cashaddr_prefix, text)
            .ok()
            .map(|_| profile);
    }

    if let Some(profile) = registry
        .profiles()
        .iter()
        .find(|p| cashaddr::decode_symbols(p.cashaddr_prefix, text).is_ok())
    {
        return Some(profile);
    }

    let data = decode_base58(text).ok()?;
    let version = *data.first()?;
    let profile = registry.unique_by_base58_version(version);
    if profile.is_none() {
        trace!(version, "no unique network for base58 version byte");
    }
    profile
}

/// The standard encoder for Bitcoin Cash networks. Parameterized by a `NetworkParams` type.
/// Addresses it produces are P2PKH or P2SH, and it accepts either string format.
#[derive(Debug, Clone)]
pub struct CashAddrEncoder<P: NetworkParams>(PhantomData<fn(P) -> P>);

impl<P: NetworkParams> AddressEncoder for CashAddrEncoder<P> {
    type Address = Address;
    type Error = EncodingError;
    type RecipientIdentifier = ScriptPubkey;

    fn encode_address(s: &ScriptPubkey) -> EncodingResult<Address> {
        Address::from_script(P::PROFILE, s).ok_or(EncodingError::UnknownScriptType)
    }

    fn decode_address(addr: &Address) -> ScriptPubkey {
        addr.script_pubkey()
    }

    fn string_to_address(s: &str) -> EncodingResult<Address> {
        let profile = P::PROFILE;
        Address::parse_with(&NetworkRegistry::single(profile), Some(&profile), s)
    }
}

/// An encoder for Bitcoin Cash mainnet
pub type MainnetEncoder = CashAddrEncoder<crate::nets::Main>;

/// An encoder for Bitcoin Cash testnet
pub type TestnetEncoder = CashAddrEncoder<crate::nets::Test>;

/// An encoder for a Bitcoin Cash regtest network
pub type RegtestEncoder = CashAddrEncoder<crate::nets::Reg>;
