//! Bitcoin Cash TxOut type.

use std::{
    hash::{Hash, Hasher},
    io::{Read, Write},
};

use cashcoins_core::ser::{ByteFormat, SerError, SerResult, MAX_PREFIX_VEC_LEN};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    enc::{cashaddr::AddressKind, encoder::Address},
    nets::NetworkProfile,
    types::script::{ScriptPubkey, ScriptType},
};

/// An Output. This describes a new UTXO to be created. The value is encoded as an LE i64. The
/// script pubkey encodes the spending constraints.
///
/// `TxOut::null()` and `TxOut::default()` return the "null" TxOut, which has a value of -1
/// (0xffff_ffff_ffff_ffff), and an empty `script_pubkey`. This null output is used within legacy
/// sighash calculations.
///
/// The script's standard shape is classified on first use and remembered. Equality and hashing
/// ignore the remembered shape.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct TxOut {
    value: i64,
    script_pubkey: ScriptPubkey,
    #[serde(skip)]
    script_type: OnceCell<ScriptType>,
}

impl PartialEq for TxOut {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.script_pubkey == other.script_pubkey
    }
}

impl Eq for TxOut {}

impl Hash for TxOut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.script_pubkey.hash(state);
    }
}

impl Default for TxOut {
    fn default() -> Self {
        Self::null()
    }
}

impl TxOut {
    /// Instantiate a new TxOut.
    pub fn new<T>(value: i64, script_pubkey: T) -> Self
    where
        T: Into<ScriptPubkey>,
    {
        TxOut {
            value,
            script_pubkey: script_pubkey.into(),
            script_type: OnceCell::new(),
        }
    }

    /// Instantiate an output paying `value` to `address`.
    pub fn pay_to(value: i64, address: &Address) -> Self {
        Self::new(value, address.script_pubkey())
    }

    /// Instantiate an output paying `value` to a raw public key, `<pubkey> OP_CHECKSIG`.
    pub fn pay_to_pubkey(value: i64, pubkey: &[u8]) -> Self {
        Self::new(value, ScriptPubkey::p2pk(pubkey))
    }

    /// Instantiate the null TxOut, which is used in Legacy Sighash.
    pub fn null() -> Self {
        Self::new(-1, ScriptPubkey::null())
    }

    /// Instantiate a zero-value OP_RETURN output carrying `data` in a single push.
    pub fn op_return(data: &[u8]) -> Self {
        Self::new(0, ScriptPubkey::op_return(data))
    }

    /// The value in satoshis.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The locking script.
    pub fn script_pubkey(&self) -> &ScriptPubkey {
        &self.script_pubkey
    }

    /// Inspect the TxOut's script pubkey to determine its type.
    pub fn standard_type(&self) -> ScriptType {
        *self
            .script_type
            .get_or_init(|| self.script_pubkey.standard_type())
    }

    /// True if the script starts with `OP_RETURN`.
    pub fn is_op_return(&self) -> bool {
        self.standard_type() == ScriptType::OpReturn
    }

    /// Extract the op return payload. None if not an op return.
    pub fn op_return_data(&self) -> Option<Vec<u8>> {
        self.script_pubkey.extract_op_return_data()
    }

    /// The address this output pays to on `network`. None for data-carrier and non-standard
    /// scripts.
    pub fn address_for(&self, network: &NetworkProfile) -> Option<Address> {
        match self.standard_type() {
            ScriptType::Pkh(hash) => Some(Address::p2pkh(*network, &hash)),
            ScriptType::Sh(hash) => Some(Address::p2sh(*network, &hash)),
            ScriptType::OpReturn | ScriptType::NonStandard => None,
        }
    }

    /// The address, if this output is P2PKH.
    pub fn address_from_p2pkh(&self, network: &NetworkProfile) -> Option<Address> {
        self.address_for(network)
            .filter(|a| a.kind() == AddressKind::PubKeyHash)
    }

    /// The address, if this output is P2SH.
    pub fn address_from_p2sh(&self, network: &NetworkProfile) -> Option<Address> {
        self.address_for(network)
            .filter(|a| a.kind() == AddressKind::ScriptHash)
    }
}

impl ByteFormat for TxOut {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        let mut len = 8; // value
        len += self.script_pubkey.serialized_length();
        len
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let value = Self::read_i64_le(reader)?;
        let script_pubkey = ScriptPubkey::read_from(reader, 0).map_err(|e| {
            debug!(
                error = %e,
                max = MAX_PREFIX_VEC_LEN,
                "rejected txout script"
            );
            e
        })?;
        Ok(Self::new(value, script_pubkey))
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        let mut len = Self::write_i64_le(writer, self.value)?;
        len += self.script_pubkey.write_to(writer)?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nets::{MAINNET, TESTNET};

    #[test]
    fn it_serializes_and_derializes_outputs() {
        let p2pkh = "76a91429335d5ee0757c6df39c75f32f9e99fbefea509588ac";
        let cases = [
            (TxOut::new(0, vec![]), "000000000000000000".to_owned(), 9),
            (TxOut::null(), "ffffffffffffffff00".to_owned(), 9),
            (TxOut::op_return(&[]), "0000000000000000026a00".to_owned(), 11),
            (
                TxOut::new(0x1234, hex::decode(p2pkh).unwrap()),
                format!("341200000000000019{}", p2pkh),
                34,
            ),
            (
                TxOut::new(5, vec![0u8; 0xfd]),
                format!("0500000000000000fdfd00{}", "00".repeat(0xfd)),
                8 + 3 + 0xfd,
            ),
        ];
        for case in cases.iter() {
            assert_eq!(case.0.serialized_length(), case.2);
            assert_eq!(case.0.serialize_hex(), case.1);
            assert_eq!(TxOut::deserialize_hex(&case.1).unwrap(), case.0);
        }
        assert_eq!(TxOut::null().value(), -1);
    }

    #[test]
    fn it_rejects_truncated_and_hostile_outputs() {
        let cases = [
            "",
            "00000000",
            "0000000000000000",
            "000000000000000019",
            "000000000000000005aabbcc",
            "0000000000000000fd",
        ];
        for case in cases.iter() {
            match TxOut::deserialize_hex(case) {
                Err(SerError::TruncatedInput) => {}
                r => panic!("{}: expected truncated input, got {:?}", case, r),
            }
        }

        match TxOut::deserialize_hex("0000000000000000ffffffffffffffff7faabb") {
            Err(SerError::ProtocolViolation(_)) => {}
            r => panic!("expected protocol violation, got {:?}", r),
        }
        match TxOut::deserialize_hex("0000000000000000fe00000004") {
            Err(SerError::ProtocolViolation(_)) => {}
            r => panic!("expected protocol violation, got {:?}", r),
        }

        // script lengths must be minimally encoded
        let non_minimal = ["0000000000000000fd0000", "0000000000000000fd0100aa"];
        for case in non_minimal.iter() {
            match TxOut::deserialize_hex(case) {
                Err(SerError::ProtocolViolation(_)) => {}
                r => panic!("{}: expected protocol violation, got {:?}", case, r),
            }
        }
    }

    #[test]
    fn it_derives_addresses() {
        let address = Address::parse(None, "14krEkSaKoTkbFT9iUCfUYARo4EXA8co6M").unwrap();
        let out = TxOut::pay_to(1000, &address);
        assert_eq!(out.address_for(&MAINNET), Some(address.clone()));
        assert_eq!(out.address_from_p2pkh(&MAINNET), Some(address));
        assert_eq!(out.address_from_p2sh(&MAINNET), None);

        let sh = Address::parse(None, "2N3LHb1H2NNUbrB87ySxVCu7FfkaLbJkxFa").unwrap();
        let out = TxOut::pay_to(1000, &sh);
        assert_eq!(out.address_from_p2sh(&TESTNET), Some(sh));
        assert_eq!(out.address_from_p2pkh(&TESTNET), None);

        let data = TxOut::new(0, vec![0x6a, 0x00]);
        assert!(data.is_op_return());
        assert_eq!(data.address_for(&MAINNET), None);
        assert_eq!(data.op_return_data(), Some(vec![]));

        let pubkey =
            hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
                .unwrap();
        let p2pk = TxOut::pay_to_pubkey(1, &pubkey);
        assert_eq!(p2pk.script_pubkey().len(), 35);
        assert_eq!(p2pk.standard_type(), ScriptType::NonStandard);
        assert_eq!(p2pk.address_for(&MAINNET), None);
    }

    #[test]
    fn it_ignores_the_memo_in_equality() {
        let a = TxOut::op_return(&[1, 2, 3]);
        let b = TxOut::op_return(&[1, 2, 3]);
        assert!(a.is_op_return());
        assert_eq!(a, b);
        assert_ne!(a, TxOut::op_return(&[1, 2]));
        assert_ne!(a, TxOut::new(1, a.script_pubkey().clone()));

        let mut set = std::collections::HashSet::new();
        assert!(set.insert(a.clone()));
        assert!(!set.insert(b));
        assert!(set.insert(TxOut::op_return(&[1, 2])));
        assert!(set.contains(&a));
    }

    #[test]
    fn it_round_trips_through_serde() {
        let out = TxOut::op_return(&[0xab]);
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"value":0,"script_pubkey":"036a01ab"}"#);
        let back: TxOut = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
    }
}
