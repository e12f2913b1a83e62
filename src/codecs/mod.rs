//! Interchangeable record representations under comparison.
//!
//! Each representation implements [`Codec`] with its own typed instance. The
//! orchestrator only sees the object-safe [`Strategy`] view, which every codec
//! gets through a blanket impl, so strategies can be registered in an ordered
//! `Vec<Box<dyn Strategy>>` without any lookup by name at measurement time.

pub mod bincode;
pub mod dynamic;
pub mod json;
pub mod packed;

use crate::accumulator::IterationSample;
use crate::error::{BenchError, CodecError, StrategyFailure};
use crate::harness::PhaseTimer;
use crate::record::{Field, RawRecord, RecordBatch};
use crate::runner;
use serde::Serialize;

/// Descriptor shown when listing the available strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyInfo {
    pub name: String,
    pub description: &'static str,
    pub format: &'static str,
    pub features: Vec<&'static str>,
}

/// A typed record representation with a byte encoding.
///
/// Implementations must satisfy two properties for every valid record `r`:
/// `decode(encode(instantiate(r)))` equals `instantiate(r)` field for field, and
/// `measure_size(i) == encode(i).len()`.
pub trait Codec: Send + Sync {
    type Instance: Send;

    fn name(&self) -> &str;

    fn info(&self) -> StrategyInfo;

    /// Build a typed instance. The record is only borrowed and never mutated.
    fn instantiate(&self, record: &RawRecord) -> Result<Self::Instance, CodecError>;

    fn encode(&self, instance: &Self::Instance) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Instance, CodecError>;

    /// Encoded size of `instance` in bytes.
    fn measure_size(&self, instance: &Self::Instance) -> Result<usize, CodecError>;
}

/// Type-erased view of a codec, as driven by the orchestrator.
pub trait Strategy: Send + Sync {
    fn id(&self) -> &str;

    fn describe(&self) -> StrategyInfo;

    /// Run the three timed phases over `batch` and return the iteration's sample.
    fn sample(
        &self,
        batch: &RecordBatch,
        timer: &dyn PhaseTimer,
    ) -> Result<IterationSample, StrategyFailure>;
}

impl<C: Codec> Strategy for C {
    fn id(&self) -> &str {
        self.name()
    }

    fn describe(&self) -> StrategyInfo {
        self.info()
    }

    fn sample(
        &self,
        batch: &RecordBatch,
        timer: &dyn PhaseTimer,
    ) -> Result<IterationSample, StrategyFailure> {
        runner::measure_codec(self, batch, timer)
    }
}

/// All built-in strategies, in registration (tie-break) order.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(json::JsonCodec),
        Box::new(bincode::BincodeCodec),
        Box::new(dynamic::DynamicCodec),
        Box::new(packed::PackedCodec),
    ]
}

/// Pick built-in strategies by name, keeping the requested order.
///
/// An empty selection returns every built-in strategy.
pub fn select_strategies(names: &[String]) -> Result<Vec<Box<dyn Strategy>>, BenchError> {
    if names.is_empty() {
        return Ok(default_strategies());
    }

    let mut available: Vec<Option<Box<dyn Strategy>>> =
        default_strategies().into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(names.len());

    for name in names {
        let slot = available
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|s| s.id() == name.as_str()));
        match slot.and_then(Option::take) {
            Some(strategy) => selected.push(strategy),
            None if default_strategies().iter().any(|s| s.id() == name.as_str()) => {
                return Err(BenchError::InvalidArgument(format!(
                    "strategy `{name}` selected more than once"
                )));
            }
            None => {
                return Err(BenchError::InvalidArgument(format!(
                    "unknown strategy `{name}`"
                )));
            }
        }
    }

    Ok(selected)
}

pub(crate) fn required<'a>(record: &'a RawRecord, name: &str) -> Result<&'a Field, CodecError> {
    record
        .get(name)
        .ok_or_else(|| CodecError::Instantiation(format!("missing required field `{name}`")))
}

fn wrong_kind(name: &str, expected: &str, got: &Field) -> CodecError {
    CodecError::Instantiation(format!(
        "field `{name}` must be {expected}, got {}",
        got.kind()
    ))
}

pub(crate) fn int_field(record: &RawRecord, name: &str) -> Result<i64, CodecError> {
    match required(record, name)? {
        Field::Int(v) => Ok(*v),
        other => Err(wrong_kind(name, "an integer", other)),
    }
}

pub(crate) fn str_field<'a>(record: &'a RawRecord, name: &str) -> Result<&'a str, CodecError> {
    match required(record, name)? {
        Field::Str(v) => Ok(v),
        other => Err(wrong_kind(name, "a string", other)),
    }
}

pub(crate) fn bool_field(record: &RawRecord, name: &str) -> Result<bool, CodecError> {
    match required(record, name)? {
        Field::Bool(v) => Ok(*v),
        other => Err(wrong_kind(name, "a boolean", other)),
    }
}
