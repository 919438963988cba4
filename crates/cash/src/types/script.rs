//! Output scripts, and recognition of the standard address-bearing script shapes.

use cashcoins_core::{hashes::Hash160Digest, wrap_prefixed_byte_vector};

/// Script opcodes used by the standard output shapes.
pub mod opcodes {
    /// Push an empty byte vector
    pub const OP_0: u8 = 0x00;
    /// Largest opcode that directly pushes that many bytes
    pub const OP_PUSHBYTES_75: u8 = 0x4b;
    /// Push with a 1-byte length
    pub const OP_PUSHDATA1: u8 = 0x4c;
    /// Push with a 2-byte LE length
    pub const OP_PUSHDATA2: u8 = 0x4d;
    /// Push with a 4-byte LE length
    pub const OP_PUSHDATA4: u8 = 0x4e;
    /// Mark the output unspendable
    pub const OP_RETURN: u8 = 0x6a;
    /// Duplicate the top stack item
    pub const OP_DUP: u8 = 0x76;
    /// Compare the top two stack items
    pub const OP_EQUAL: u8 = 0x87;
    /// `OP_EQUAL` then `OP_VERIFY`
    pub const OP_EQUALVERIFY: u8 = 0x88;
    /// ripemd160(sha256(x))
    pub const OP_HASH160: u8 = 0xa9;
    /// Verify a signature against a public key
    pub const OP_CHECKSIG: u8 = 0xac;
}

use opcodes::*;

wrap_prefixed_byte_vector!(
    /// A ScriptPubkey is the locking script of a transaction output. It is serialized with a
    /// compact-int length prefix. `ScriptPubkey::null()` and `ScriptPubkey::default()` return
    /// the empty script.
    ScriptPubkey
);

/// The standard shapes an output script can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    Pkh(Hash160Digest),
    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    Sh(Hash160Digest),
    /// Any script starting with `OP_RETURN`. Carries data, never an address.
    OpReturn,
    /// Anything else.
    NonStandard,
}

impl ScriptType {
    /// The 20-byte hash of a P2PKH or P2SH script.
    pub fn hash(&self) -> Option<&Hash160Digest> {
        match self {
            ScriptType::Pkh(h) | ScriptType::Sh(h) => Some(h),
            _ => None,
        }
    }
}

/// Append `data` to `script` as a single minimal push.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len <= OP_PUSHBYTES_75 as usize {
        script.push(len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// Read the push starting at `script[0]`. `None` if the first opcode is not a push, or if the
/// script ends before the pushed data does.
fn read_push(script: &[u8]) -> Option<&[u8]> {
    let (&op, rest) = script.split_first()?;
    let (len, rest) = match op {
        OP_0..=OP_PUSHBYTES_75 => (op as usize, rest),
        OP_PUSHDATA1 => {
            let (&n, rest) = rest.split_first()?;
            (n as usize, rest)
        }
        OP_PUSHDATA2 => {
            let n = rest.get(..2)?;
            (u16::from_le_bytes([n[0], n[1]]) as usize, &rest[2..])
        }
        OP_PUSHDATA4 => {
            let n = rest.get(..4)?;
            (
                u32::from_le_bytes([n[0], n[1], n[2], n[3]]) as usize,
                &rest[4..],
            )
        }
        _ => return None,
    };
    rest.get(..len)
}

impl ScriptPubkey {
    /// Build `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn p2pkh(hash: &[u8]) -> Self {
        let mut v = vec![OP_DUP, OP_HASH160];
        push_data(&mut v, hash);
        v.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        v.into()
    }

    /// Build `OP_HASH160 <hash> OP_EQUAL`.
    pub fn p2sh(hash: &[u8]) -> Self {
        let mut v = vec![OP_HASH160];
        push_data(&mut v, hash);
        v.push(OP_EQUAL);
        v.into()
    }

    /// Build `<pubkey> OP_CHECKSIG`.
    pub fn p2pk(pubkey: &[u8]) -> Self {
        let mut v = vec![];
        push_data(&mut v, pubkey);
        v.push(OP_CHECKSIG);
        v.into()
    }

    /// Build `OP_RETURN <data>`.
    pub fn op_return(data: &[u8]) -> Self {
        let mut v = vec![OP_RETURN];
        push_data(&mut v, data);
        v.into()
    }

    /// True if the script starts with `OP_RETURN`.
    pub fn is_op_return(&self) -> bool {
        self.items().first() == Some(&OP_RETURN)
    }

    /// Extract the first push following `OP_RETURN`. None if not an op return, if nothing
    /// follows the `OP_RETURN`, or if the push is incomplete.
    pub fn extract_op_return_data(&self) -> Option<Vec<u8>> {
        if !self.is_op_return() {
            return None;
        }
        read_push(&self.items()[1..]).map(<[u8]>::to_vec)
    }

    /// Inspect the script to determine its type.
    pub fn standard_type(&self) -> ScriptType {
        let items = self.items();
        if self.is_op_return() {
            return ScriptType::OpReturn;
        }

        let mut hash = Hash160Digest::default();
        match items.len() {
            0x19 => {
                if items[0..3] == [OP_DUP, OP_HASH160, 0x14]
                    && items[0x17..] == [OP_EQUALVERIFY, OP_CHECKSIG]
                {
                    hash.copy_from_slice(&items[3..0x17]);
                    ScriptType::Pkh(hash)
                } else {
                    ScriptType::NonStandard
                }
            }
            0x17 => {
                if items[0..2] == [OP_HASH160, 0x14] && items[0x16] == OP_EQUAL {
                    hash.copy_from_slice(&items[2..0x16]);
                    ScriptType::Sh(hash)
                } else {
                    ScriptType::NonStandard
                }
            }
            _ => ScriptType::NonStandard,
        }
    }
}
