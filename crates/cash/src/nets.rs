//! The `nets` module holds the per-network constants every codec consults: Base58Check version
//! bytes and the CashAddr prefix. Profiles are plain `Copy` data, known at compile time.
//!
//! A `NetworkRegistry` is the set of profiles a caller is willing to recognize. Lookups by
//! CashAddr prefix are always unambiguous, because the registry refuses duplicate prefixes.
//! Lookups by Base58 version byte are not: testnet and regtest share version bytes.
//!
//! ```
//! use cashcoins::nets::{NetworkRegistry, MAINNET, REGTEST, TESTNET};
//!
//! let standard = NetworkRegistry::standard();
//! assert_eq!(standard.by_cashaddr_prefix("bchtest"), Some(&TESTNET));
//! assert_eq!(standard.unique_by_base58_version(0x6f), Some(&TESTNET));
//!
//! let with_regtest = NetworkRegistry::new(vec![MAINNET, TESTNET, REGTEST]).unwrap();
//! assert_eq!(with_regtest.unique_by_base58_version(0x6f), None);
//! ```

use once_cell::sync::Lazy;

use crate::enc::{
    bases::{EncodingError, EncodingResult},
    cashaddr::AddressKind,
};

/// Discriminates production networks from test-like ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// Any other network, e.g. a local regression-test chain.
    Other,
}

/// Immutable per-network address constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkProfile {
    /// A short human name, used in logs and error messages.
    pub name: &'static str,
    /// Main, test, or other.
    pub kind: NetworkKind,
    /// The Base58Check version byte for pay-to-pubkey-hash addresses.
    pub pubkey_hash_version: u8,
    /// The Base58Check version byte for pay-to-script-hash addresses.
    pub script_hash_version: u8,
    /// The CashAddr human-readable prefix, always lowercase.
    pub cashaddr_prefix: &'static str,
}

impl NetworkProfile {
    /// Instantiate a profile. `cashaddr_prefix` must be lowercase.
    pub const fn new(
        name: &'static str,
        kind: NetworkKind,
        pubkey_hash_version: u8,
        script_hash_version: u8,
        cashaddr_prefix: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            pubkey_hash_version,
            script_hash_version,
            cashaddr_prefix,
        }
    }

    /// True for every network except mainnet.
    pub fn is_test_like(&self) -> bool {
        self.kind != NetworkKind::Main
    }

    /// The Base58Check version byte used for addresses of `kind`.
    pub fn base58_version(&self, kind: AddressKind) -> u8 {
        match kind {
            AddressKind::PubKeyHash => self.pubkey_hash_version,
            AddressKind::ScriptHash => self.script_hash_version,
        }
    }

    /// The address kind a Base58Check version byte denotes on this network, if any.
    pub fn kind_for_base58_version(&self, version: u8) -> Option<AddressKind> {
        if version == self.pubkey_hash_version {
            Some(AddressKind::PubKeyHash)
        } else if version == self.script_hash_version {
            Some(AddressKind::ScriptHash)
        } else {
            None
        }
    }
}

/// Bitcoin Cash mainnet.
pub const MAINNET: NetworkProfile =
    NetworkProfile::new("mainnet", NetworkKind::Main, 0x00, 0x05, "bitcoincash");

/// Bitcoin Cash testnet.
pub const TESTNET: NetworkProfile =
    NetworkProfile::new("testnet", NetworkKind::Test, 0x6f, 0xc4, "bchtest");

/// A local regression-test network. Shares Base58 version bytes with testnet.
pub const REGTEST: NetworkProfile =
    NetworkProfile::new("regtest", NetworkKind::Other, 0x6f, 0xc4, "bchreg");

static STANDARD: Lazy<NetworkRegistry> = Lazy::new(|| NetworkRegistry {
    profiles: vec![MAINNET, TESTNET],
});

/// The set of profiles a caller recognizes, in lookup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
    profiles: Vec<NetworkProfile>,
}

impl NetworkRegistry {
    /// Build a registry. Fails with `DuplicateProfile` if two profiles share a CashAddr prefix.
    pub fn new(profiles: Vec<NetworkProfile>) -> EncodingResult<Self> {
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i]
                .iter()
                .any(|p| p.cashaddr_prefix == profile.cashaddr_prefix)
            {
                return Err(EncodingError::DuplicateProfile(
                    profile.cashaddr_prefix.to_owned(),
                ));
            }
        }
        Ok(Self { profiles })
    }

    /// A registry holding only `profile`.
    pub fn single(profile: NetworkProfile) -> Self {
        Self {
            profiles: vec![profile],
        }
    }

    /// The process-wide registry of mainnet and testnet.
    pub fn standard() -> &'static NetworkRegistry {
        &STANDARD
    }

    /// The registered profiles, in lookup order.
    pub fn profiles(&self) -> &[NetworkProfile] {
        &self.profiles
    }

    /// Find the profile using `prefix`. Matching is case-insensitive.
    pub fn by_cashaddr_prefix(&self, prefix: &str) -> Option<&NetworkProfile> {
        self.profiles
            .iter()
            .find(|p| p.cashaddr_prefix.eq_ignore_ascii_case(prefix))
    }

    /// Find the first profile that uses `version` for either address kind. Several networks may
    /// share a version byte. Callers that need certainty should use `unique_by_base58_version`.
    pub fn by_base58_version(&self, version: u8) -> Option<&NetworkProfile> {
        self.profiles
            .iter()
            .find(|p| p.kind_for_base58_version(version).is_some())
    }

    /// Find the only profile that uses `version`. `None` if no profile or several profiles do.
    pub fn unique_by_base58_version(&self, version: u8) -> Option<&NetworkProfile> {
        let mut matches = self
            .profiles
            .iter()
            .filter(|p| p.kind_for_base58_version(version).is_some());
        match (matches.next(), matches.next()) {
            (Some(p), None) => Some(p),
            _ => None,
        }
    }

    /// True if at least one registered profile uses `version`.
    pub fn knows_base58_version(&self, version: u8) -> bool {
        self.by_base58_version(version).is_some()
    }
}

/// NetworkParams binds a marker type to a `NetworkProfile`, so that encoders can be selected at
/// compile time.
pub trait NetworkParams {
    /// The network's address constants.
    const PROFILE: NetworkProfile;
}

/// A param struct for Bitcoin Cash mainnet
#[derive(Debug, Clone)]
pub struct Main;

impl NetworkParams for Main {
    const PROFILE: NetworkProfile = MAINNET;
}

/// A param struct for Bitcoin Cash testnet
#[derive(Debug, Clone)]
pub struct Test;

impl NetworkParams for Test {
    const PROFILE: NetworkProfile = TESTNET;
}

/// A param struct for a regtest network
#[derive(Debug, Clone)]
pub struct Reg;

impl NetworkParams for Reg {
    const PROFILE: NetworkProfile = REGTEST;
}
