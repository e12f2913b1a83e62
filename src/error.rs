//! Error taxonomy for codec phases and benchmark runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A timed unit of work performed by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Instantiation,
    Serialization,
    Deserialization,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Instantiation => "instantiation",
            Phase::Serialization => "serialization",
            Phase::Deserialization => "deserialization",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a codec while handling a single record or payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("instantiation error: {0}")]
    Instantiation(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// A codec error tagged with the strategy and phase it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("strategy `{strategy}` failed during {phase}: {cause}")]
pub struct StrategyFailure {
    pub strategy: String,
    pub phase: Phase,
    #[source]
    pub cause: CodecError,
}

impl StrategyFailure {
    pub fn new(strategy: impl Into<String>, phase: Phase, cause: CodecError) -> Self {
        Self {
            strategy: strategy.into(),
            phase,
            cause,
        }
    }
}

/// Errors surfaced by [`crate::orchestrator::Orchestrator::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Strategy(#[from] StrategyFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_names_strategy_and_phase() {
        let failure = StrategyFailure::new(
            "packed",
            Phase::Deserialization,
            CodecError::Decoding("truncated".into()),
        );
        let msg = BenchError::from(failure).to_string();
        assert!(msg.contains("packed"));
        assert!(msg.contains("deserialization"));
        assert!(msg.contains("truncated"));
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Serialization).unwrap();
        assert_eq!(json, "\"serialization\"");
    }
}
