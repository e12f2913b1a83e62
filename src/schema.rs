use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ExecutionMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub seed: u64,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    pub batch_size: usize,
    pub iterations: usize,
}

/// Averages for one strategy. Times are seconds per batch, sizes are bytes per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub strategy: String,
    pub avg_instantiation_time: f64,
    pub avg_serialization_time: f64,
    pub avg_deserialization_time: f64,
    pub avg_memory_usage: f64,
    pub total_operations: u64,
    pub content_digest: String,
}

/// Winning strategy per metric; `None` when nothing ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub fastest_instantiation: Option<String>,
    pub fastest_serialization: Option<String>,
    pub fastest_deserialization: Option<String>,
    pub lowest_memory_usage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub parameters: RunParameters,
    pub mode: ExecutionMode,
    pub results: BTreeMap<String, StrategyStats>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonDocument {
    pub run: RunMeta,
    pub report: BenchmarkReport,
}
