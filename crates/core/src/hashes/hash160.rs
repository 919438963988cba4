use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::io::{Result as IOResult, Write};

use crate::hashes::DigestWriter;

/// A 20-byte Bitcoin-style ripemd160(sha2) digest. Public key hashes and script hashes are
/// `Hash160Digest`s.
pub type Hash160Digest = [u8; 20];

/// A struct that exposes a Bitcoin-style Hash160 `Write` interface by wrapping an internal SHA2
/// instance.
#[derive(Default)]
pub struct Hash160Writer {
    internal: Sha256,
}

impl Write for Hash160Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl DigestWriter<Hash160Digest> for Hash160Writer {
    fn finish(self) -> Hash160Digest {
        let first = self.internal.finalize();
        let second = Ripemd160::digest(first);
        let mut digest = Hash160Digest::default();
        digest.copy_from_slice(&second[..]);
        digest
    }
}

/// Compute the ripemd160(sha2) of `data` in one shot.
pub fn hash160(data: &[u8]) -> Hash160Digest {
    let mut w = Hash160Writer::default();
    w.internal.update(data);
    w.finish()
}
