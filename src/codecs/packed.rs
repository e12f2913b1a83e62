//! Hand-framed little-endian layout.
//!
//! ```text
//! id:        u64
//! age:       u8
//! flags:     u8     bit 0 = is_active, other bits must be zero
//! name_len:  u16
//! name:      [u8; name_len]   UTF-8
//! email_len: u16
//! email:     [u8; email_len]  UTF-8
//! ```

use super::{bool_field, int_field, str_field, Codec, StrategyInfo};
use crate::error::CodecError;
use crate::record::RawRecord;

/// id + age + flags.
const FIXED_LEN: usize = 8 + 1 + 1;
const LEN_PREFIX: usize = 2;
const FLAG_ACTIVE: u8 = 0b0000_0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedUser {
    pub id: u64,
    pub age: u8,
    pub is_active: bool,
    pub name: String,
    pub email: String,
}

fn short_string(field: &str, value: &str, err: fn(String) -> CodecError) -> Result<u16, CodecError> {
    u16::try_from(value.len())
        .map_err(|_| err(format!("`{field}` is {} bytes, max {}", value.len(), u16::MAX)))
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.buf.len() < n {
            return Err(CodecError::Decoding(format!(
                "truncated input: need {n} bytes, have {}",
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let mut b = [0u8; 2];
        b.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(b))
    }

    fn u64(&mut self) -> Result<u64, CodecError> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(b))
    }

    fn string(&mut self) -> Result<String, CodecError> {
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::Decoding(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackedCodec;

impl Codec for PackedCodec {
    type Instance = PackedUser;

    fn name(&self) -> &str {
        "packed"
    }

    fn info(&self) -> StrategyInfo {
        StrategyInfo {
            name: self.name().to_string(),
            description: "Hand-written little-endian framing, no serde",
            format: "binary",
            features: vec!["fixed header", "length-prefixed strings", "size computed without encoding"],
        }
    }

    fn instantiate(&self, record: &RawRecord) -> Result<PackedUser, CodecError> {
        let id = int_field(record, "id")?;
        let age = int_field(record, "age")?;
        let name = str_field(record, "name")?;
        let email = str_field(record, "email")?;
        short_string("name", name, CodecError::Instantiation)?;
        short_string("email", email, CodecError::Instantiation)?;

        Ok(PackedUser {
            id: u64::try_from(id)
                .map_err(|_| CodecError::Instantiation(format!("id {id} must be non-negative")))?,
            age: u8::try_from(age)
                .map_err(|_| CodecError::Instantiation(format!("age {age} out of range for u8")))?,
            is_active: bool_field(record, "is_active")?,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn encode(&self, instance: &PackedUser) -> Result<Vec<u8>, CodecError> {
        let name_len = short_string("name", &instance.name, CodecError::Encoding)?;
        let email_len = short_string("email", &instance.email, CodecError::Encoding)?;

        let mut out = Vec::with_capacity(self.measure_size(instance)?);
        out.extend_from_slice(&instance.id.to_le_bytes());
        out.push(instance.age);
        out.push(if instance.is_active { FLAG_ACTIVE } else { 0 });
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(instance.name.as_bytes());
        out.extend_from_slice(&email_len.to_le_bytes());
        out.extend_from_slice(instance.email.as_bytes());
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<PackedUser, CodecError> {
        let mut r = Reader { buf: bytes };
        let id = r.u64()?;
        let age = r.u8()?;
        let flags = r.u8()?;
        if flags & !FLAG_ACTIVE != 0 {
            return Err(CodecError::Decoding(format!("unknown flag bits {flags:#04x}")));
        }
        let name = r.string()?;
        let email = r.string()?;
        if !r.buf.is_empty() {
            return Err(CodecError::Decoding(format!(
                "{} trailing bytes",
                r.buf.len()
            )));
        }

        Ok(PackedUser {
            id,
            age,
            is_active: flags & FLAG_ACTIVE != 0,
            name,
            email,
        })
    }

    fn measure_size(&self, instance: &PackedUser) -> Result<usize, CodecError> {
        Ok(FIXED_LEN + LEN_PREFIX + instance.name.len() + LEN_PREFIX + instance.email.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::contract;

    fn alice() -> PackedUser {
        PackedUser {
            id: 1,
            age: 30,
            is_active: true,
            name: "Alice".into(),
            email: "alice1@mail.com".into(),
        }
    }

    #[test]
    fn test_contract() {
        contract::assert_round_trip_and_size(&PackedCodec);
        contract::assert_rejects_bad_records(&PackedCodec);
        contract::assert_rejects_garbage(&PackedCodec);
    }

    #[test]
    fn test_layout() {
        let bytes = PackedCodec.encode(&alice()).unwrap();
        assert_eq!(&bytes[..8], &1u64.to_le_bytes());
        assert_eq!(bytes[8], 30);
        assert_eq!(bytes[9], FLAG_ACTIVE);
        assert_eq!(&bytes[10..12], &5u16.to_le_bytes());
        assert_eq!(&bytes[12..17], b"Alice");
        assert_eq!(bytes.len(), 10 + 2 + 5 + 2 + 15);
    }

    #[test]
    fn test_truncated_and_trailing_rejected() {
        let bytes = PackedCodec.encode(&alice()).unwrap();
        for cut in [1, 9, 11, bytes.len() - 1] {
            assert!(matches!(
                PackedCodec.decode(&bytes[..cut]),
                Err(CodecError::Decoding(_))
            ));
        }

        let mut longer = bytes.clone();
        longer.push(0);
        assert!(PackedCodec.decode(&longer).is_err());
    }

    #[test]
    fn test_unknown_flags_rejected() {
        let mut bytes = PackedCodec.encode(&alice()).unwrap();
        bytes[9] = 0b10;
        assert!(PackedCodec.decode(&bytes).is_err());
    }

    #[test]
    fn test_oversized_string_is_an_encoding_error() {
        let mut user = alice();
        user.name = "x".repeat(u16::MAX as usize + 1);
        assert!(matches!(
            PackedCodec.encode(&user),
            Err(CodecError::Encoding(_))
        ));
    }
}
