use cashcoins_core::enc::AddressEncoder;

#[cfg(feature = "mainnet")]
pub mod network {
    /// The default network parameters, selected by feature flag
    pub type Params = crate::nets::Main;
    /// The default encoder, selected by feature flag
    pub type Encoder = crate::enc::MainnetEncoder;
}

#[cfg(all(feature = "testnet", not(feature = "mainnet")))]
pub mod network {
    /// The default network parameters, selected by feature flag
    pub type Params = crate::nets::Test;
    /// The default encoder, selected by feature flag
    pub type Encoder = crate::enc::TestnetEncoder;
}

#[cfg(all(feature = "regtest", not(any(feature = "mainnet", feature = "testnet"))))]
pub mod network {
    /// The default network parameters, selected by feature flag
    pub type Params = crate::nets::Reg;
    /// The default encoder, selected by feature flag
    pub type Encoder = crate::enc::RegtestEncoder;
}

impl std::str::FromStr for crate::enc::Address {
    type Err = <network::Encoder as AddressEncoder>::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        network::Encoder::string_to_address(s)
    }
}

impl std::str::FromStr for crate::types::ScriptPubkey {
    type Err = <network::Encoder as AddressEncoder>::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(network::Encoder::decode_address(
            &network::Encoder::string_to_address(s)?,
        ))
    }
}

impl serde::Serialize for crate::enc::Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_cashaddr_string())
    }
}

impl<'de> serde::Deserialize<'de> for crate::enc::Address {
    fn deserialize<D>(deserializer: D) -> Result<crate::enc::Address, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        network::Encoder::string_to_address(&s).map_err(serde::de::Error::custom)
    }
}
