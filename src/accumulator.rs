//! Per-strategy, append-only store of timing and size samples.

use crate::schema::StrategyStats;
use sha2::{Digest, Sha256};

/// Everything one strategy measured in one iteration.
///
/// Built in full before it touches an accumulator, so an iteration is either
/// recorded completely or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationSample {
    /// Seconds spent instantiating the whole batch.
    pub instantiation: f64,
    /// Seconds spent encoding the whole batch.
    pub serialization: f64,
    /// Seconds spent decoding the whole batch.
    pub deserialization: f64,
    /// Sum of `measure_size` over every instance in the batch.
    pub encoded_bytes: u64,
    /// SHA-256 over the batch's encoded bytes, in record order.
    pub content_digest: [u8; 32],
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[derive(Debug, Clone)]
pub struct ResultAccumulator {
    strategy: String,
    instantiation: Vec<f64>,
    serialization: Vec<f64>,
    deserialization: Vec<f64>,
    sizes: Vec<u64>,
    digest: Sha256,
}

impl ResultAccumulator {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            instantiation: Vec::new(),
            serialization: Vec::new(),
            deserialization: Vec::new(),
            sizes: Vec::new(),
            digest: Sha256::new(),
        }
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Append one iteration's samples to all four series at once.
    pub fn record(&mut self, sample: IterationSample) {
        self.instantiation.push(sample.instantiation);
        self.serialization.push(sample.serialization);
        self.deserialization.push(sample.deserialization);
        self.sizes.push(sample.encoded_bytes);
        self.digest.update(sample.content_digest);
    }

    /// Number of iterations recorded.
    pub fn len(&self) -> usize {
        self.serialization.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn instantiation_samples(&self) -> &[f64] {
        &self.instantiation
    }

    pub fn serialization_samples(&self) -> &[f64] {
        &self.serialization
    }

    pub fn deserialization_samples(&self) -> &[f64] {
        &self.deserialization
    }

    pub fn size_samples(&self) -> &[u64] {
        &self.sizes
    }

    pub fn avg_instantiation_time(&self) -> f64 {
        mean(&self.instantiation)
    }

    pub fn avg_serialization_time(&self) -> f64 {
        mean(&self.serialization)
    }

    pub fn avg_deserialization_time(&self) -> f64 {
        mean(&self.deserialization)
    }

    pub fn avg_memory_usage(&self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        self.sizes.iter().map(|&s| s as f64).sum::<f64>() / self.sizes.len() as f64
    }

    pub fn total_encoded_bytes(&self) -> u64 {
        self.sizes.iter().sum()
    }

    /// Hex digest chained over every recorded iteration's content digest.
    pub fn content_digest(&self) -> String {
        let digest: [u8; 32] = self.digest.clone().finalize().into();
        let mut s = String::with_capacity(64);
        for b in digest {
            s.push_str(&format!("{:02x}", b));
        }
        s
    }

    pub fn to_stats(&self) -> StrategyStats {
        StrategyStats {
            strategy: self.strategy.clone(),
            avg_instantiation_time: self.avg_instantiation_time(),
            avg_serialization_time: self.avg_serialization_time(),
            avg_deserialization_time: self.avg_deserialization_time(),
            avg_memory_usage: self.avg_memory_usage(),
            total_operations: self.len() as u64,
            content_digest: self.content_digest(),
        }
    }
}
