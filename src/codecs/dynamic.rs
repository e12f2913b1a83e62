//! Untyped field map: the plain-dictionary baseline.
//!
//! Instances keep every field of the source record, not only the required
//! ones, so this strategy pays for whatever the record carries.

use super::{bool_field, int_field, str_field, Codec, StrategyInfo};
use crate::error::CodecError;
use crate::record::{Field, RawRecord, USER_FIELDS};
use serde_json::Value;
use std::collections::BTreeMap;

pub type DynamicUser = BTreeMap<String, Value>;

fn to_value(field: &Field) -> Value {
    match field {
        Field::Bool(v) => Value::Bool(*v),
        Field::Int(v) => Value::from(*v),
        Field::Str(v) => Value::String(v.clone()),
        Field::List(items) => Value::Array(items.iter().map(to_value).collect()),
        Field::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_value(v)))
                .collect(),
        ),
    }
}

fn check_decoded(map: &DynamicUser) -> Result<(), CodecError> {
    for name in USER_FIELDS {
        let ok = match (name, map.get(name)) {
            ("name" | "email", Some(v)) => v.is_string(),
            ("is_active", Some(v)) => v.is_boolean(),
            (_, Some(v)) => v.is_i64(),
            (_, None) => false,
        };
        if !ok {
            return Err(CodecError::Decoding(format!(
                "field `{name}` missing or of the wrong kind"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicCodec;

impl Codec for DynamicCodec {
    type Instance = DynamicUser;

    fn name(&self) -> &str {
        "dynamic"
    }

    fn info(&self) -> StrategyInfo {
        StrategyInfo {
            name: self.name().to_string(),
            description: "Untyped string-keyed map of JSON values (baseline)",
            format: "json",
            features: vec!["no schema type", "keeps extra fields", "baseline performance"],
        }
    }

    fn instantiate(&self, record: &RawRecord) -> Result<DynamicUser, CodecError> {
        int_field(record, "id")?;
        str_field(record, "name")?;
        str_field(record, "email")?;
        int_field(record, "age")?;
        bool_field(record, "is_active")?;

        Ok(record
            .iter()
            .map(|(k, v)| (k.to_string(), to_value(v)))
            .collect())
    }

    fn encode(&self, instance: &DynamicUser) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(instance).map_err(|e| CodecError::Encoding(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicUser, CodecError> {
        let map: DynamicUser =
            serde_json::from_slice(bytes).map_err(|e| CodecError::Decoding(e.to_string()))?;
        check_decoded(&map)?;
        Ok(map)
    }

    fn measure_size(&self, instance: &DynamicUser) -> Result<usize, CodecError> {
        self.encode(instance).map(|bytes| bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::contract;

    #[test]
    fn test_contract() {
        contract::assert_round_trip_and_size(&DynamicCodec);
        contract::assert_rejects_bad_records(&DynamicCodec);
        contract::assert_rejects_garbage(&DynamicCodec);
    }

    #[test]
    fn test_extra_nested_fields_survive_round_trip() {
        let tags = Field::List(vec![Field::from("admin"), Field::from("tester")]);
        let mut address = BTreeMap::new();
        address.insert("city".to_string(), Field::from("Springfield"));

        let record = RawRecord::new()
            .with("id", 1i64)
            .with("name", "Alice")
            .with("email", "alice1@mail.com")
            .with("age", 30i64)
            .with("is_active", true)
            .with("tags", tags)
            .with("address", Field::Map(address));

        let instance = DynamicCodec.instantiate(&record).unwrap();
        assert_eq!(instance.len(), 7);

        let bytes = DynamicCodec.encode(&instance).unwrap();
        assert_eq!(DynamicCodec.decode(&bytes).unwrap(), instance);
        assert_eq!(DynamicCodec.measure_size(&instance).unwrap(), bytes.len());
    }

    #[test]
    fn test_decoded_map_must_carry_user_fields() {
        assert!(matches!(
            DynamicCodec.decode(br#"{"id":1}"#),
            Err(CodecError::Decoding(_))
        ));
    }
}
