//! Per-strategy codec benchmark suite
//!
//! Criterion view of the same three phases the orchestrator times:
//! - Instantiation of a seeded record batch
//! - Encoding of the resulting instances
//! - Decoding of the encoded payloads
//! - A full sequential vs concurrent orchestrator iteration

use codec_contract_bench::codecs::bincode::BincodeCodec;
use codec_contract_bench::codecs::dynamic::DynamicCodec;
use codec_contract_bench::codecs::json::JsonCodec;
use codec_contract_bench::codecs::packed::PackedCodec;
use codec_contract_bench::codecs::{default_strategies, Codec};
use codec_contract_bench::record::{RecordBatch, RecordSource, UserRecordSource};
use codec_contract_bench::{ExecutionMode, Orchestrator};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const BATCH_SIZES: [usize; 3] = [100, 1_000, 10_000];

fn seeded_batch(size: usize) -> RecordBatch {
    UserRecordSource::new(42)
        .generate(size)
        .expect("non-zero batch size")
}

fn bench_codec<C: Codec>(c: &mut Criterion, codec: &C) {
    let mut group = c.benchmark_group(format!("codec_{}", codec.name()));

    for size in BATCH_SIZES {
        let batch = seeded_batch(size);
        let instances: Vec<C::Instance> = batch
            .records()
            .iter()
            .map(|r| codec.instantiate(r).expect("valid record"))
            .collect();
        let encoded: Vec<Vec<u8>> = instances
            .iter()
            .map(|i| codec.encode(i).expect("encodable"))
            .collect();
        let total_bytes: usize = encoded.iter().map(Vec::len).sum();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("instantiate", size), &batch, |b, batch| {
            b.iter(|| {
                let out: Vec<C::Instance> = batch
                    .records()
                    .iter()
                    .map(|r| codec.instantiate(black_box(r)).expect("valid record"))
                    .collect();
                black_box(out)
            })
        });

        group.bench_with_input(BenchmarkId::new("encode", size), &instances, |b, instances| {
            b.iter(|| {
                let out: Vec<Vec<u8>> = instances
                    .iter()
                    .map(|i| codec.encode(black_box(i)).expect("encodable"))
                    .collect();
                black_box(out)
            })
        });

        group.throughput(Throughput::Bytes(total_bytes as u64));
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| {
                let out: Vec<C::Instance> = encoded
                    .iter()
                    .map(|e| codec.decode(black_box(e)).expect("decodable"))
                    .collect();
                black_box(out)
            })
        });
    }

    group.finish();
}

fn bench_codecs(c: &mut Criterion) {
    bench_codec(c, &JsonCodec);
    bench_codec(c, &BincodeCodec);
    bench_codec(c, &DynamicCodec);
    bench_codec(c, &PackedCodec);
}

/// Benchmark one orchestrator iteration in each execution mode
fn bench_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("orchestrator_iteration");
    group.sample_size(10);

    let strategies = default_strategies();
    for mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
        group.bench_function(BenchmarkId::new("iteration", mode), |b| {
            let mut orchestrator = Orchestrator::new(UserRecordSource::new(42));
            b.iter(|| {
                black_box(
                    orchestrator
                        .execute(&strategies, 1_000, 1, mode)
                        .expect("run succeeds"),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codecs, bench_modes);
criterion_main!(benches);
