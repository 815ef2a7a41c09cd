// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Budgeted steepest-ascent hill climbing.
//!
//! `HillClimber` owns one run end to end. Each iteration asks the
//! `NeighborGenerator` for every legal move of the current configuration,
//! scores the resulting configurations through the `Evaluator`, and adopts the
//! strictly best candidate if it beats the current fitness. Budget accounting,
//! convergence, monitoring and statistics are folded into the same loop.
//!
//! The loop is deterministic: generation ranks candidates in a fixed order and
//! ties between equally fit candidates go to the earliest one, so identical
//! graph, baseline, budgets and objective always yield the identical outcome.
//!
//! Oracle failures exclude the affected candidate for that iteration only.
//! Cancellation, the iteration cap and the time limit are checked between
//! iterations and end the run normally with the best configuration so far.
//! A move that would overrun the budget or disconnect the configuration is a
//! defect and panics.

use crate::{
    budget::BudgetTracker,
    config::ClimbConfig,
    convergence::ConvergenceDetector,
    error::ClimbError,
    eval::{Evaluation, EvaluationResult, Evaluator, Oracle},
    monitor::climb_monitor::{ClimbMonitor, Progress, SearchCommand},
    moves::Move,
    neighborhood::NeighborGenerator,
    result::ClimbOutcome,
    stats::ClimbStatistics,
};
use keystone_model::{
    configuration::{Configuration, ConfigurationError},
    graph::Graph,
};
use std::time::{Duration, Instant};

/// Mutable state of one run. Dropped when the run returns.
struct RunState {
    current: Configuration,
    current_evaluation: Evaluation,
    baseline_fitness: f64,
    budget: BudgetTracker,
    history: Vec<Move>,
    stats: ClimbStatistics,
}

impl RunState {
    #[inline]
    fn progress(&self, elapsed: Duration) -> Progress {
        Progress {
            iteration: self.stats.iterations,
            baseline_fitness: self.baseline_fitness,
            best_fitness: self.current_evaluation.fitness,
            budget: self.budget.summary(),
            elapsed,
        }
    }
}

/// Deterministic hill-climbing engine.
///
/// The engine keeps its generator and candidate buffer between runs, so
/// repeated runs on the same graph avoid most allocations. Every run takes its
/// own exclusive oracle handle; the graph is only read.
#[derive(Debug, Clone)]
pub struct HillClimber {
    config: ClimbConfig,
    generator: NeighborGenerator,
    candidates: Vec<Move>,
}

impl HillClimber {
    /// Creates an engine for `config`.
    pub fn new(config: ClimbConfig) -> Self {
        Self {
            generator: NeighborGenerator::new(config.max_candidates()),
            candidates: Vec::with_capacity(config.max_candidates()),
            config,
        }
    }

    /// Creates an engine with scratch buffers sized for `num_nodes`.
    pub fn preallocated(config: ClimbConfig, num_nodes: usize) -> Self {
        Self {
            generator: NeighborGenerator::preallocated(config.max_candidates(), num_nodes),
            candidates: Vec::with_capacity(config.max_candidates()),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ClimbConfig {
        &self.config
    }

    /// Improves `baseline` until convergence.
    ///
    /// # Errors
    ///
    /// Returns `ClimbError::InvalidBaseline` if `baseline` does not belong to
    /// `graph`, is not anchored at an archetype root or is disconnected, and
    /// `ClimbError::BaselineEvaluation` if the oracle cannot score it. Failures
    /// on candidates are absorbed.
    ///
    /// # Panics
    ///
    /// Panics if an adopted move overruns the budget or disconnects the
    /// configuration.
    pub fn run<O, M>(
        &mut self,
        graph: &Graph,
        baseline: &Configuration,
        oracle: &mut O,
        monitor: &mut M,
    ) -> Result<ClimbOutcome, ClimbError>
    where
        O: Oracle + ?Sized,
        M: ClimbMonitor + ?Sized,
    {
        let start_time = Instant::now();
        validate_baseline(graph, baseline)?;

        let mut evaluator = Evaluator::with_cache(
            &mut *oracle,
            self.config.objective(),
            self.config.cache_evaluations(),
        );
        let baseline_evaluation = match evaluator.evaluate(baseline) {
            EvaluationResult::Scored(evaluation) => evaluation,
            EvaluationResult::Failed(message) => {
                return Err(ClimbError::BaselineEvaluation(message));
            }
        };

        let mut state = RunState {
            current: baseline.clone(),
            current_evaluation: baseline_evaluation,
            baseline_fitness: baseline_evaluation.fitness,
            budget: self.config.budget_tracker(),
            history: Vec::new(),
            stats: ClimbStatistics::default(),
        };
        let mut detector =
            ConvergenceDetector::new(*self.config.criteria(), baseline_evaluation.fitness);
        let progress_interval = self.config.progress_interval();

        tracing::info!(
            oracle = evaluator.oracle().name(),
            objective = %self.config.objective(),
            nodes = baseline.len(),
            fitness = baseline_evaluation.fitness,
            budget = %state.budget.summary(),
            "hill climbing started"
        );
        monitor.on_start(baseline, &state.progress(start_time.elapsed()));

        let termination_reason = loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command(&state.stats) {
                tracing::debug!(%reason, "monitor requested termination");
                break detector.cancel();
            }

            if let Some(reason) = detector.check_limits(state.stats.iterations, start_time.elapsed())
            {
                break reason;
            }

            self.generator.generate(
                graph,
                &state.current,
                &state.budget.summary(),
                &mut self.candidates,
            );
            tracing::trace!(
                iteration = state.stats.iterations + 1,
                candidates = self.candidates.len(),
                "neighborhood generated"
            );

            if self.candidates.is_empty() {
                break detector.no_valid_moves();
            }

            state.stats.on_iteration();
            state.stats.on_candidates(self.candidates.len());

            // Strictly best candidate; ties keep the earliest in ranked order.
            let mut best: Option<(usize, Configuration, Evaluation)> = None;
            for (i, mv) in self.candidates.iter().enumerate() {
                let next = mv.apply(&state.current);
                if let EvaluationResult::Scored(evaluation) = evaluator.evaluate(&next) {
                    let better = match &best {
                        Some((_, _, incumbent)) => evaluation.fitness > incumbent.fitness,
                        None => true,
                    };
                    if better {
                        best = Some((i, next, evaluation));
                    }
                }
            }

            if let Some((i, next, evaluation)) = best {
                if evaluation.fitness > state.current_evaluation.fitness {
                    let mv = self.candidates[i];
                    state.budget.apply(&mv);
                    assert!(
                        next.is_valid(graph),
                        "called `HillClimber::run` and adopted {} which disconnects the configuration",
                        mv
                    );

                    state.current = next;
                    state.current_evaluation = evaluation;
                    state.history.push(mv);
                    state.stats.on_improvement();
                    evaluator.clear_cache();

                    tracing::debug!(
                        iteration = state.stats.iterations,
                        mv = %mv,
                        fitness = evaluation.fitness,
                        budget = %state.budget.summary(),
                        "move adopted"
                    );
                    monitor.on_improvement(
                        &mv,
                        &state.current,
                        &state.progress(start_time.elapsed()),
                    );
                }
            }

            detector.observe(state.current_evaluation.fitness);

            if state.stats.iterations % progress_interval == 0 {
                monitor.on_progress(&state.progress(start_time.elapsed()));
            }

            if let Some(reason) = detector.reason() {
                break reason;
            }
        };

        state.stats.set_evaluation_counters(
            evaluator.evaluations(),
            evaluator.cache_hits(),
            evaluator.failures(),
        );
        state.stats.set_total_time(start_time.elapsed());

        let budget = state.budget.summary();
        debug_assert!(
            budget.is_within_limits(),
            "called `HillClimber::run` and finished with budget {}",
            budget
        );

        let outcome = ClimbOutcome::new(
            graph,
            baseline,
            state.current,
            baseline_evaluation,
            state.current_evaluation,
            termination_reason,
            budget,
            state.history,
            state.stats,
        );

        tracing::info!(
            reason = %outcome.termination_reason(),
            iterations = outcome.iterations(),
            fitness = outcome.final_evaluation().fitness,
            improvement = outcome.improvement(),
            budget = %outcome.budget(),
            elapsed_ms = outcome.elapsed().as_millis() as u64,
            "hill climbing finished"
        );
        monitor.on_end(&outcome);
        Ok(outcome)
    }
}

fn validate_baseline(graph: &Graph, baseline: &Configuration) -> Result<(), ConfigurationError> {
    let root = baseline.root();
    if !graph.contains(root) {
        return Err(ConfigurationError::UnknownNode(root));
    }
    if let Some(node) = baseline.iter().find(|&n| !graph.contains(n)) {
        return Err(ConfigurationError::UnknownNode(node));
    }
    if !graph.is_root(root) {
        return Err(ConfigurationError::NotARoot(root));
    }
    if !baseline.is_valid(graph) {
        return Err(ConfigurationError::Disconnected(root));
    }
    Ok(())
}
