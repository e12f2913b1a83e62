//! Drives iterations over every registered strategy.
//!
//! Each iteration draws a fresh batch from the record source and hands each
//! strategy its own deep copy. In sequential mode strategies run one after the
//! other and the first failure aborts the run. In concurrent mode every
//! strategy runs as its own rayon task; the iteration joins all of them before
//! any failure is reported, and the next batch is not generated until the join.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::accumulator::ResultAccumulator;
use crate::codecs::Strategy;
use crate::error::{BenchError, StrategyFailure};
use crate::harness::{Limits, MonotonicTimer, PhaseTimer};
use crate::record::{RecordBatch, RecordSource};
use crate::runner;
use crate::schema::{BenchmarkReport, RunParameters};
use crate::summary;
use crate::ExecutionMode;

pub struct Orchestrator<S> {
    source: S,
    timer: Box<dyn PhaseTimer>,
    limits: Limits,
}

impl<S: RecordSource> Orchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timer: Box::new(MonotonicTimer::new()),
            limits: Limits::default(),
        }
    }

    pub fn with_timer(mut self, timer: impl PhaseTimer + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Run `iterations` passes of every strategy over batches of `batch_size` records.
    ///
    /// Either every iteration completes for every strategy and a report is
    /// returned, or the first [`StrategyFailure`] (in registration order within
    /// the failing iteration) is returned and all samples are discarded.
    pub fn execute(
        &mut self,
        strategies: &[Box<dyn Strategy>],
        batch_size: usize,
        iterations: usize,
        mode: ExecutionMode,
    ) -> Result<BenchmarkReport, BenchError> {
        self.limits.check(batch_size, iterations)?;
        check_unique(strategies)?;

        let mut accumulators: Vec<ResultAccumulator> = strategies
            .iter()
            .map(|s| ResultAccumulator::new(s.id()))
            .collect();

        for iteration in 1..=iterations {
            info!(iteration, iterations, %mode, "starting iteration");
            let batch = self.source.generate(batch_size)?;

            match mode {
                ExecutionMode::Sequential => {
                    self.run_sequential(strategies, &batch, &mut accumulators)?
                }
                ExecutionMode::Concurrent => {
                    self.run_concurrent(strategies, &batch, &mut accumulators)?
                }
            }

            info!(iteration, iterations, "completed iteration");
        }

        Ok(summary::build_report(
            RunParameters {
                batch_size,
                iterations,
            },
            mode,
            &accumulators,
        ))
    }

    fn run_sequential(
        &self,
        strategies: &[Box<dyn Strategy>],
        batch: &RecordBatch,
        accumulators: &mut [ResultAccumulator],
    ) -> Result<(), StrategyFailure> {
        for (strategy, acc) in strategies.iter().zip(accumulators.iter_mut()) {
            debug!(strategy = strategy.id(), records = batch.len(), "running strategy");
            runner::run(batch.isolated_copy(), strategy.as_ref(), self.timer.as_ref(), acc)
                .inspect_err(|failure| warn!(%failure, "strategy failed"))?;
        }
        Ok(())
    }

    fn run_concurrent(
        &self,
        strategies: &[Box<dyn Strategy>],
        batch: &RecordBatch,
        accumulators: &mut [ResultAccumulator],
    ) -> Result<(), StrategyFailure> {
        let copies: Vec<RecordBatch> = strategies.iter().map(|_| batch.isolated_copy()).collect();
        let timer = self.timer.as_ref();

        // Collecting every outcome (rather than short-circuiting) lets in-flight
        // peers finish; the collect is the iteration barrier.
        let outcomes: Vec<Result<(), StrategyFailure>> = copies
            .into_par_iter()
            .zip(strategies.par_iter())
            .zip(accumulators.par_iter_mut())
            .map(|((copy, strategy), acc)| {
                debug!(strategy = strategy.id(), records = copy.len(), "running strategy");
                runner::run(copy, strategy.as_ref(), timer, acc)
            })
            .collect();

        let mut first = None;
        for failure in outcomes.into_iter().filter_map(Result::err) {
            warn!(%failure, "strategy failed");
            first.get_or_insert(failure);
        }
        match first {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

fn check_unique(strategies: &[Box<dyn Strategy>]) -> Result<(), BenchError> {
    for (i, s) in strategies.iter().enumerate() {
        if strategies[..i].iter().any(|prev| prev.id() == s.id()) {
            return Err(BenchError::InvalidArgument(format!(
                "strategy `{}` registered more than once",
                s.id()
            )));
        }
    }
    Ok(())
}
