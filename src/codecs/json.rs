//! Typed struct encoded as JSON with `serde_json`.

use super::{bool_field, int_field, str_field, Codec, StrategyInfo};
use crate::error::CodecError;
use crate::record::RawRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Instance = JsonUser;

    fn name(&self) -> &str {
        "json"
    }

    fn info(&self) -> StrategyInfo {
        StrategyInfo {
            name: self.name().to_string(),
            description: "Typed struct with derived serde impls, encoded as JSON",
            format: "json",
            features: vec!["type checked fields", "human readable", "schema via derive"],
        }
    }

    fn instantiate(&self, record: &RawRecord) -> Result<JsonUser, CodecError> {
        Ok(JsonUser {
            id: int_field(record, "id")?,
            name: str_field(record, "name")?.to_string(),
            email: str_field(record, "email")?.to_string(),
            age: int_field(record, "age")?,
            is_active: bool_field(record, "is_active")?,
        })
    }

    fn encode(&self, instance: &JsonUser) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(instance).map_err(|e| CodecError::Encoding(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<JsonUser, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decoding(e.to_string()))
    }

    fn measure_size(&self, instance: &JsonUser) -> Result<usize, CodecError> {
        self.encode(instance).map(|bytes| bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::contract;

    #[test]
    fn test_contract() {
        contract::assert_round_trip_and_size(&JsonCodec);
        contract::assert_rejects_bad_records(&JsonCodec);
        contract::assert_rejects_garbage(&JsonCodec);
    }

    #[test]
    fn test_unknown_fields_rejected_on_decode() {
        let bytes = br#"{"id":1,"name":"a","email":"b","age":3,"is_active":true,"x":0}"#;
        assert!(matches!(
            JsonCodec.decode(bytes),
            Err(CodecError::Decoding(_))
        ));
    }
}
