//! Compact typed struct encoded with `bincode` (varint integers).

use super::{bool_field, int_field, str_field, Codec, StrategyInfo};
use crate::error::CodecError;
use crate::record::RawRecord;
use ::bincode::Options;
use serde::{Deserialize, Serialize};

/// Upper bound on a single encoded instance.
const MAX_ENCODED_LEN: u64 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactUser {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub age: u8,
    pub is_active: bool,
}

fn options() -> impl Options {
    ::bincode::DefaultOptions::new()
        .with_varint_encoding()
        .with_little_endian()
        .with_limit(MAX_ENCODED_LEN)
        .reject_trailing_bytes()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    type Instance = CompactUser;

    fn name(&self) -> &str {
        "bincode"
    }

    fn info(&self) -> StrategyInfo {
        StrategyInfo {
            name: self.name().to_string(),
            description: "Narrow integer struct encoded with bincode",
            format: "binary",
            features: vec!["varint integers", "range checked on construction", "no field names on the wire"],
        }
    }

    fn instantiate(&self, record: &RawRecord) -> Result<CompactUser, CodecError> {
        let id = int_field(record, "id")?;
        let age = int_field(record, "age")?;
        Ok(CompactUser {
            id: u32::try_from(id)
                .map_err(|_| CodecError::Instantiation(format!("id {id} out of range for u32")))?,
            name: str_field(record, "name")?.to_string(),
            email: str_field(record, "email")?.to_string(),
            age: u8::try_from(age)
                .map_err(|_| CodecError::Instantiation(format!("age {age} out of range for u8")))?,
            is_active: bool_field(record, "is_active")?,
        })
    }

    fn encode(&self, instance: &CompactUser) -> Result<Vec<u8>, CodecError> {
        options()
            .serialize(instance)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CompactUser, CodecError> {
        options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Decoding(e.to_string()))
    }

    fn measure_size(&self, instance: &CompactUser) -> Result<usize, CodecError> {
        options()
            .serialized_size(instance)
            .map(|n| n as usize)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }
}
