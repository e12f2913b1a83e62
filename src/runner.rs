//! One strategy, one batch: the three timed phases.

use std::hint::black_box;

use sha2::{Digest, Sha256};

use crate::accumulator::{IterationSample, ResultAccumulator};
use crate::codecs::{Codec, Strategy};
use crate::error::{Phase, StrategyFailure};
use crate::harness::PhaseTimer;
use crate::record::RecordBatch;

/// Instantiate, encode and decode the whole batch, timing each phase as one unit.
///
/// Size measurement and content hashing run after the serialization window
/// closes and are not timed.
pub fn measure_codec<C: Codec + ?Sized>(
    codec: &C,
    batch: &RecordBatch,
    timer: &dyn PhaseTimer,
) -> Result<IterationSample, StrategyFailure> {
    let fail = |phase, cause| StrategyFailure::new(codec.name(), phase, cause);

    let (instances, instantiation) = timer.time(|| {
        batch
            .records()
            .iter()
            .map(|record| codec.instantiate(record))
            .collect::<Result<Vec<_>, _>>()
    });
    let instances = instances.map_err(|e| fail(Phase::Instantiation, e))?;

    let (encoded, serialization) = timer.time(|| {
        instances
            .iter()
            .map(|instance| codec.encode(instance))
            .collect::<Result<Vec<_>, _>>()
    });
    let encoded = encoded.map_err(|e| fail(Phase::Serialization, e))?;

    let mut encoded_bytes = 0u64;
    for instance in &instances {
        let size = codec
            .measure_size(instance)
            .map_err(|e| fail(Phase::Serialization, e))?;
        encoded_bytes += size as u64;
    }
    let mut hasher = Sha256::new();
    for bytes in &encoded {
        hasher.update(bytes);
    }

    let (decoded, deserialization) = timer.time(|| {
        encoded
            .iter()
            .map(|bytes| codec.decode(bytes))
            .collect::<Result<Vec<_>, _>>()
    });
    let decoded = decoded.map_err(|e| fail(Phase::Deserialization, e))?;
    black_box(decoded);

    Ok(IterationSample {
        instantiation,
        serialization,
        deserialization,
        encoded_bytes,
        content_digest: hasher.finalize().into(),
    })
}

/// Run `strategy` over its own copy of the batch and record the result.
///
/// On failure the accumulator is left untouched.
pub fn run(
    batch: RecordBatch,
    strategy: &dyn Strategy,
    timer: &dyn PhaseTimer,
    accumulator: &mut ResultAccumulator,
) -> Result<(), StrategyFailure> {
    let sample = strategy.sample(&batch, timer)?;
    accumulator.record(sample);
    Ok(())
}
