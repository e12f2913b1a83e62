use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod accumulator;
pub mod codecs;
pub mod error;
pub mod harness;
pub mod orchestrator;
pub mod record;
pub mod runner;
pub mod schema;
pub mod summary;

pub use error::{BenchError, CodecError, Phase, StrategyFailure};
pub use orchestrator::Orchestrator;
pub use schema::BenchmarkReport;

/// How strategies are scheduled within one iteration.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One strategy at a time, in registration order.
    #[default]
    Sequential,
    /// All strategies as parallel tasks, joined before the next iteration.
    Concurrent,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "sequential"),
            ExecutionMode::Concurrent => write!(f, "concurrent"),
        }
    }
}
