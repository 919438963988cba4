//! A simple trait for binary (de)Serialization using std `Read` and `Write` traits.

use std::io::{Cursor, Error as IOError, ErrorKind, Read, Write};

use hex::FromHexError;
use thiserror::Error;

/// The largest length prefix we will honor when reading a prefixed byte vector. This matches the
/// peer message size limit, so no well-formed message can declare a longer field.
pub const MAX_PREFIX_VEC_LEN: u64 = 0x0200_0000;

/// Errors related to serialization of types.
#[derive(Debug, Error)]
pub enum SerError {
    /// The reader ran out of bytes before the structure was complete.
    #[error("Input ended before the expected number of bytes could be read")]
    TruncatedInput,

    /// The input declares something implausible, e.g. a length prefix larger than any valid
    /// message, or a compact int that is not minimally encoded.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IoError(IOError),

    /// `deserialize_hex` encountered an error on its input.
    #[error(transparent)]
    FromHexError(#[from] FromHexError),
}

impl From<IOError> for SerError {
    fn from(e: IOError) -> Self {
        match e.kind() {
            ErrorKind::UnexpectedEof => SerError::TruncatedInput,
            _ => SerError::IoError(e),
        }
    }
}

/// Type alias for serialization errors
pub type SerResult<T> = Result<T, SerError>;

/// Calculates the minimum prefix length for a VarInt encoding `number`
pub fn prefix_byte_len(number: u64) -> u8 {
    match number {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Matches the length of the VarInt to the 1-byte flag
pub fn first_byte_from_len(number: u8) -> Option<u8> {
    match number {
        3 => Some(0xfd),
        5 => Some(0xfe),
        9 => Some(0xff),
        _ => None,
    }
}

/// Matches the VarInt prefix flag to the serialized length
pub fn prefix_len_from_first_byte(number: u8) -> u8 {
    match number {
        0..=0xfc => 1,
        0xfd => 3,
        0xfe => 5,
        0xff => 9,
    }
}

/// A simple trait for deserializing from `std::io::Read` and serializing to `std::io::Write`.
///
/// `ByteFormat` is used for transaction output serialization and deserialization, and for the
/// script types contained within them.
pub trait ByteFormat {
    /// An associated error type
    type Error: From<SerError> + From<IOError> + std::error::Error;

    /// Returns the byte-length of the serialized data structure.
    fn serialized_length(&self) -> usize;

    /// Read a Bitcoin compact int. Rejects non-minimal encodings.
    fn read_compact_int<R>(reader: &mut R) -> Result<u64, Self::Error>
    where
        R: Read,
    {
        let mut prefix = [0u8; 1];
        reader.read_exact(&mut prefix).map_err(SerError::from)?; // read at most one byte
        let prefix_len = prefix_len_from_first_byte(prefix[0]);

        // Get the byte(s) representing the number, and parse as u64
        let number = if prefix_len > 1 {
            let mut buf = [0u8; 8];
            // minus 1 to account for prefix
            reader
                .read_exact(&mut buf[..prefix_len as usize - 1])
                .map_err(SerError::from)?;
            u64::from_le_bytes(buf)
        } else {
            prefix[0] as u64
        };

        let minimal_length = prefix_byte_len(number);
        if minimal_length < prefix_len {
            Err(SerError::ProtocolViolation(format!(
                "non-minimal compact int: {} encoded in {} bytes",
                number, prefix_len
            ))
            .into())
        } else {
            Ok(number)
        }
    }

    /// Write a Bitcoin compact int using the minimal encoding.
    fn write_compact_int<W>(writer: &mut W, number: u64) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        let prefix_len = prefix_byte_len(number);
        let written = match first_byte_from_len(prefix_len) {
            None => writer.write(&[number as u8])?,
            Some(prefix) => {
                let body = number.to_le_bytes();
                let mut written = writer.write(&[prefix])?;
                written += writer.write(&body[..prefix_len as usize - 1])?;
                written
            }
        };
        Ok(written)
    }

    /// Read a compact-int prefixed byte vector. The declared length is capped at
    /// `MAX_PREFIX_VEC_LEN`, and bytes are read through a bounded `take`, so a hostile prefix
    /// never causes a large allocation.
    fn read_prefix_vec<R>(reader: &mut R) -> Result<Vec<u8>, Self::Error>
    where
        R: Read,
    {
        let declared = Self::read_compact_int(reader)?;
        if declared > MAX_PREFIX_VEC_LEN {
            return Err(SerError::ProtocolViolation(format!(
                "declared length {} exceeds maximum {}",
                declared, MAX_PREFIX_VEC_LEN
            ))
            .into());
        }

        let mut buf = Vec::new();
        let read = reader
            .take(declared)
            .read_to_end(&mut buf)
            .map_err(SerError::from)?;
        if (read as u64) < declared {
            return Err(SerError::TruncatedInput.into());
        }
        Ok(buf)
    }

    /// Write a compact-int prefixed byte vector.
    fn write_prefix_vec<W>(writer: &mut W, items: &[u8]) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        let mut written = Self::write_compact_int(writer, items.len() as u64)?;
        writer.write_all(items)?;
        written += items.len();
        Ok(written)
    }

    /// Convenience function for reading a LE u64
    fn read_u64_le<R>(reader: &mut R) -> Result<u64, Self::Error>
    where
        R: Read,
    {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf).map_err(SerError::from)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Convenience function for writing a LE u64
    fn write_u64_le<W>(writer: &mut W, number: u64) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        Ok(writer.write(&number.to_le_bytes())?)
    }

    /// Convenience function for reading a LE i64
    fn read_i64_le<R>(reader: &mut R) -> Result<i64, Self::Error>
    where
        R: Read,
    {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf).map_err(SerError::from)?;
        Ok(i64::from_le_bytes(buf))
    }

    /// Convenience function for writing a LE i64
    fn write_i64_le<W>(writer: &mut W, number: i64) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        Ok(writer.write(&number.to_le_bytes())?)
    }

    /// Deserializes an instance of `Self` from a `std::io::Read`.
    /// The `limit` argument is used only when deserializing collections, and specifies a maximum
    /// number of instances of the underlying type to read.
    fn read_from<R>(reader: &mut R, limit: usize) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized;

    /// Serializes `self` to a `std::io::Write`. Following `Write` trait conventions, its `Ok`
    /// type is a `usize` denoting the number of bytes written.
    fn write_to<W>(&self, writer: &mut W) -> Result<usize, <Self as ByteFormat>::Error>
    where
        W: Write;

    /// Decodes a hex string to a `Vec<u8>`, deserializes an instance of `Self` from that vector.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = hex::decode(s).map_err(SerError::from)?;
        let mut cursor = Cursor::new(v);
        Self::read_from(&mut cursor, 0)
    }

    /// Serializes `self` to a vector, returns the hex-encoded vector
    fn serialize_hex(&self) -> String {
        let mut v: Vec<u8> = vec![];
        self.write_to(&mut v).expect("No error on heap write");
        hex::encode(v)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Blob(Vec<u8>);

    impl ByteFormat for Blob {
        type Error = SerError;

        fn serialized_length(&self) -> usize {
            prefix_byte_len(self.0.len() as u64) as usize + self.0.len()
        }

        fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
        where
            R: Read,
        {
            Ok(Blob(Self::read_prefix_vec(reader)?))
        }

        fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
        where
            W: Write,
        {
            Self::write_prefix_vec(writer, &self.0)
        }
    }

    #[test]
    fn it_matches_byte_len_and_prefix() {
        let cases = [
            (1, 1, None),
            (0xfc, 1, None),
            (0xfd, 3, Some(0xfd)),
            (0xffff, 3, Some(0xfd)),
            (0x1_0000, 5, Some(0xfe)),
            (0xffff_ffff, 5, Some(0xfe)),
            (0x1_0000_0000, 9, Some(0xff)),
            (0xffff_ffff_ffff_ffff, 9, Some(0xff)),
        ];
        for case in cases.iter() {
            assert_eq!(prefix_byte_len(case.0), case.1);
            assert_eq!(first_byte_from_len(case.1), case.2);
        }
    }

    #[test]
    fn it_writes_and_reads_compact_ints() {
        let cases: [(u64, &str); 6] = [
            (0, "00"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xffff, "fdffff"),
            (0x1_0000, "fe00000100"),
            (0x1_0000_0000, "ff0000000001000000"),
        ];
        for (number, expected) in cases.iter() {
            let mut buf = vec![];
            let written = Blob::write_compact_int(&mut buf, *number).unwrap();
            assert_eq!(hex::encode(&buf), *expected);
            assert_eq!(written, buf.len());
            assert_eq!(Blob::read_compact_int(&mut buf.as_slice()).unwrap(), *number);
        }
    }

    #[test]
    fn it_rejects_non_minimal_compact_ints() {
        let cases = ["fd0100", "fe01000000", "ff0100000000000000"];
        for case in cases.iter() {
            let bytes = hex::decode(case).unwrap();
            match Blob::read_compact_int(&mut bytes.as_slice()) {
                Err(SerError::ProtocolViolation(m)) => assert!(m.starts_with("non-minimal")),
                e => panic!("expected ProtocolViolation, got {:?}", e),
            }
        }

        // short body is truncation, not minimality
        let bytes = hex::decode("fe0000").unwrap();
        assert!(matches!(
            Blob::read_compact_int(&mut bytes.as_slice()),
            Err(SerError::TruncatedInput)
        ));
    }

    #[test]
    fn it_serializes_and_deserializes_prefix_vecs() {
        let cases = [
            (Blob(vec![]), "00", 1),
            (Blob(vec![0xab; 3]), "03ababab", 4),
        ];
        for case in cases.iter() {
            assert_eq!(case.0.serialized_length(), case.2);
            assert_eq!(case.0.serialize_hex(), case.1);
            assert_eq!(Blob::deserialize_hex(case.1).unwrap(), case.0);
        }

        let long = Blob(vec![0x01; 0x100]);
        assert_eq!(long.serialized_length(), 3 + 0x100);
        assert!(long.serialize_hex().starts_with("fd0001"));
    }

    #[test]
    fn it_reports_truncated_prefix_vecs() {
        match Blob::deserialize_hex("05abab") {
            Err(SerError::TruncatedInput) => {}
            e => panic!("expected TruncatedInput, got {:?}", e),
        }
        match Blob::deserialize_hex("") {
            Err(SerError::TruncatedInput) => {}
            e => panic!("expected TruncatedInput, got {:?}", e),
        }
    }

    #[test]
    fn it_rejects_implausible_lengths() {
        // declares 0xffff_ffff bytes, has two
        match Blob::deserialize_hex("feffffffffabab") {
            Err(SerError::ProtocolViolation(_)) => {}
            e => panic!("expected ProtocolViolation, got {:?}", e),
        }
    }

    #[test]
    fn it_rejects_bad_hex() {
        assert!(matches!(
            Blob::deserialize_hex("zz"),
            Err(SerError::FromHexError(_))
        ));
    }
}
