//! Winner selection and final report assembly.

use crate::accumulator::ResultAccumulator;
use crate::schema::{BenchmarkReport, RunParameters, Summary};
use crate::ExecutionMode;

/// Name of the accumulator with the smallest `metric`.
///
/// Accumulators are scanned in registration order and only a strictly smaller
/// value replaces the current best, so ties go to the earliest strategy.
fn lowest(
    accumulators: &[ResultAccumulator],
    metric: impl Fn(&ResultAccumulator) -> f64,
) -> Option<String> {
    let mut best: Option<(&ResultAccumulator, f64)> = None;
    for acc in accumulators {
        let value = metric(acc);
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((acc, value)),
        }
    }
    best.map(|(acc, _)| acc.strategy().to_string())
}

pub fn summarize(accumulators: &[ResultAccumulator]) -> Summary {
    Summary {
        fastest_instantiation: lowest(accumulators, ResultAccumulator::avg_instantiation_time),
        fastest_serialization: lowest(accumulators, ResultAccumulator::avg_serialization_time),
        fastest_deserialization: lowest(accumulators, ResultAccumulator::avg_deserialization_time),
        lowest_memory_usage: lowest(accumulators, ResultAccumulator::avg_memory_usage),
    }
}

pub fn build_report(
    parameters: RunParameters,
    mode: ExecutionMode,
    accumulators: &[ResultAccumulator],
) -> BenchmarkReport {
    BenchmarkReport {
        parameters,
        mode,
        results: accumulators
            .iter()
            .map(|acc| (acc.strategy().to_string(), acc.to_stats()))
            .collect(),
        summary: summarize(accumulators),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::IterationSample;

    fn acc(name: &str, times: (f64, f64, f64), bytes: u64) -> ResultAccumulator {
        let mut acc = ResultAccumulator::new(name);
        acc.record(IterationSample {
            instantiation: times.0,
            serialization: times.1,
            deserialization: times.2,
            encoded_bytes: bytes,
            content_digest: [0; 32],
        });
        acc
    }

    #[test]
    fn test_picks_minimum_per_metric() {
        let accs = [
            acc("a", (1.0, 5.0, 3.0), 900),
            acc("b", (2.0, 4.0, 1.0), 1_000),
            acc("c", (3.0, 6.0, 2.0), 100),
        ];
        let summary = summarize(&accs);
        assert_eq!(summary.fastest_instantiation.as_deref(), Some("a"));
        assert_eq!(summary.fastest_serialization.as_deref(), Some("b"));
        assert_eq!(summary.fastest_deserialization.as_deref(), Some("b"));
        assert_eq!(summary.lowest_memory_usage.as_deref(), Some("c"));
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let accs = [
            acc("b", (1.0, 1.0, 1.0), 10),
            acc("a", (1.0, 1.0, 1.0), 10),
        ];
        let summary = summarize(&accs);
        assert_eq!(summary.fastest_instantiation.as_deref(), Some("b"));
        assert_eq!(summary.fastest_serialization.as_deref(), Some("b"));
        assert_eq!(summary.fastest_deserialization.as_deref(), Some("b"));
        assert_eq!(summary.lowest_memory_usage.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(summarize(&[]), Summary::default());

        // A strategy with no samples averages to zero and still wins.
        let accs = [acc("a", (1.0, 1.0, 1.0), 1), ResultAccumulator::new("b")];
        assert_eq!(summarize(&accs).fastest_serialization.as_deref(), Some("b"));
    }

    #[test]
    fn test_report_shape() {
        let accs = [acc("json", (1.0, 2.0, 3.0), 42)];
        let report = build_report(
            RunParameters {
                batch_size: 10,
                iterations: 1,
            },
            ExecutionMode::Sequential,
            &accs,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["parameters"]["batch_size"], 10);
        assert_eq!(json["mode"], "sequential");
        assert_eq!(json["results"]["json"]["avg_memory_usage"], 42.0);
        assert_eq!(json["results"]["json"]["total_operations"], 1);
        assert_eq!(json["summary"]["lowest_memory_usage"], "json");
    }
}
