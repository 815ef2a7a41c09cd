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

//! Hill-climbing outcome and termination reporting.
//!
//! `ClimbOutcome` is the only artifact that leaves a run. It bundles the final
//! configuration, the baseline and final evaluations, the budget spent, the
//! net change relative to the baseline (added, removed and swapped node ids),
//! the adopted moves in order, and the run statistics.

use crate::{
    budget::BudgetState,
    eval::Evaluation,
    moves::{Move, MoveKind},
    stats::ClimbStatistics,
};
use keystone_model::{configuration::Configuration, graph::Graph, index::NodeId};
use std::time::Duration;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The stall counter reached the patience threshold.
    NoImprovement,
    /// The iteration cap was reached.
    MaxIterations,
    /// The wall-clock limit was reached.
    Timeout,
    /// The generator produced no legal move.
    NoValidMoves,
    /// A monitor requested termination.
    Cancelled,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::NoImprovement => "no_improvement",
            TerminationReason::MaxIterations => "max_iterations",
            TerminationReason::Timeout => "timeout",
            TerminationReason::NoValidMoves => "no_valid_moves",
            TerminationReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a hill-climbing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbOutcome {
    configuration: Configuration,
    baseline: Evaluation,
    final_evaluation: Evaluation,
    iterations: u64,
    elapsed: Duration,
    termination_reason: TerminationReason,
    budget: BudgetState,
    added: Vec<NodeId>,
    removed: Vec<NodeId>,
    swapped: Vec<(NodeId, NodeId)>,
    history: Vec<Move>,
    statistics: ClimbStatistics,
}

impl ClimbOutcome {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        graph: &Graph,
        baseline_configuration: &Configuration,
        configuration: Configuration,
        baseline: Evaluation,
        final_evaluation: Evaluation,
        termination_reason: TerminationReason,
        budget: BudgetState,
        history: Vec<Move>,
        statistics: ClimbStatistics,
    ) -> Self {
        let mut added = configuration.difference(baseline_configuration);
        let mut removed = baseline_configuration.difference(&configuration);

        // Pair up swaps whose effect survived until the end of the run.
        let mut swapped = Vec::new();
        for mv in &history {
            if let MoveKind::Swap {
                removed: out,
                added: into,
            } = mv.kind()
            {
                let out_pos = removed.iter().position(|&n| n == out);
                let into_pos = added.iter().position(|&n| n == into);
                if let (Some(o), Some(i)) = (out_pos, into_pos) {
                    removed.remove(o);
                    added.remove(i);
                    swapped.push((graph.node_id(out), graph.node_id(into)));
                }
            }
        }

        Self {
            configuration,
            baseline,
            final_evaluation,
            iterations: statistics.iterations,
            elapsed: statistics.time_total,
            termination_reason,
            budget,
            added: added.into_iter().map(|n| graph.node_id(n)).collect(),
            removed: removed.into_iter().map(|n| graph.node_id(n)).collect(),
            swapped,
            history,
            statistics,
        }
    }

    /// Returns the best configuration found.
    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[inline]
    pub fn baseline(&self) -> &Evaluation {
        &self.baseline
    }

    #[inline]
    pub fn final_evaluation(&self) -> &Evaluation {
        &self.final_evaluation
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn termination_reason(&self) -> TerminationReason {
        self.termination_reason
    }

    /// Returns the final budget counters.
    #[inline]
    pub fn budget(&self) -> &BudgetState {
        &self.budget
    }

    /// Node ids allocated relative to the baseline, excluding swap targets.
    #[inline]
    pub fn added(&self) -> &[NodeId] {
        &self.added
    }

    /// Node ids deallocated relative to the baseline, excluding swap sources.
    #[inline]
    pub fn removed(&self) -> &[NodeId] {
        &self.removed
    }

    /// `(removed, added)` pairs of swaps still in effect at the end.
    #[inline]
    pub fn swapped(&self) -> &[(NodeId, NodeId)] {
        &self.swapped
    }

    /// Adopted moves, in order.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn statistics(&self) -> &ClimbStatistics {
        &self.statistics
    }

    /// Returns `final - baseline` fitness.
    #[inline]
    pub fn improvement(&self) -> f64 {
        self.final_evaluation.fitness - self.baseline.fitness
    }

    /// Returns the relative improvement in percent, or `None` for a zero
    /// baseline.
    pub fn improvement_percent(&self) -> Option<f64> {
        (self.baseline.fitness != 0.0)
            .then(|| self.improvement() / self.baseline.fitness.abs() * 100.0)
    }

    /// Returns `true` if both outcomes agree on everything but timing.
    pub fn same_result(&self, other: &ClimbOutcome) -> bool {
        let mut a = self.statistics.clone();
        let mut b = other.statistics.clone();
        a.time_total = Duration::ZERO;
        b.time_total = Duration::ZERO;

        self.configuration == other.configuration
            && self.baseline == other.baseline
            && self.final_evaluation == other.final_evaluation
            && self.iterations == other.iterations
            && self.termination_reason == other.termination_reason
            && self.budget == other.budget
            && self.added == other.added
            && self.removed == other.removed
            && self.swapped == other.swapped
            && self.history == other.history
            && a == b
    }
}

impl std::fmt::Display for ClimbOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Termination: {}", self.termination_reason)?;
        writeln!(f, "Baseline:    {}", self.baseline)?;
        writeln!(f, "Final:       {}", self.final_evaluation)?;
        writeln!(f, "Budget:      {}", self.budget)?;
        writeln!(
            f,
            "Changes:     +{} -{} ~{}",
            self.added.len(),
            self.removed.len(),
            self.swapped.len()
        )?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{budget::LimitedBudget, eval::Metrics, testing};
    use keystone_model::index::NodeIndex;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn eval(fitness: f64) -> Evaluation {
        Evaluation {
            fitness,
            metrics: Metrics::new(fitness, 0.0),
        }
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(TerminationReason::NoImprovement.to_string(), "no_improvement");
        assert_eq!(TerminationReason::MaxIterations.to_string(), "max_iterations");
        assert_eq!(TerminationReason::Timeout.to_string(), "timeout");
        assert_eq!(TerminationReason::NoValidMoves.to_string(), "no_valid_moves");
        assert_eq!(TerminationReason::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_net_changes_separate_swaps() {
        // root(0) with children 1 and 2; 3 hangs off 1, 4 hangs off 2.
        let g = testing::fork_graph();
        let baseline = Configuration::new(&g, n(0), [n(1), n(2)]).unwrap();
        let history = vec![Move::swap(n(1), n(4)), Move::add(n(1)), Move::add(n(3))];
        let mut current = baseline.clone();
        for mv in &history {
            current = mv.apply(&current);
        }

        let outcome = ClimbOutcome::new(
            &g,
            &baseline,
            current,
            eval(1.0),
            eval(2.0),
            TerminationReason::NoValidMoves,
            BudgetState::new(2, LimitedBudget::Bounded(1)),
            history,
            ClimbStatistics::default(),
        );

        // Node 1 came back, so the swap does not survive; 3 and 4 are net adds.
        assert!(outcome.swapped().is_empty());
        assert_eq!(outcome.added(), &[NodeId(3), NodeId(4)]);
        assert!(outcome.removed().is_empty());
    }

    #[test]
    fn test_surviving_swap_is_reported_as_pair() {
        let g = testing::fork_graph();
        let baseline = Configuration::new(&g, n(0), [n(1), n(2)]).unwrap();
        let history = vec![Move::swap(n(1), n(4))];
        let current = history[0].apply(&baseline);

        let outcome = ClimbOutcome::new(
            &g,
            &baseline,
            current,
            eval(0.0),
            eval(2.0),
            TerminationReason::NoImprovement,
            BudgetState::new(0, LimitedBudget::Unbounded),
            history,
            ClimbStatistics::default(),
        );

        assert_eq!(outcome.swapped(), &[(NodeId(1), NodeId(4))]);
        assert!(outcome.added().is_empty());
        assert!(outcome.removed().is_empty());
        assert_eq!(outcome.improvement(), 2.0);
        assert_eq!(outcome.improvement_percent(), None);
        assert!(outcome.to_string().contains("~1"));
    }

    #[test]
    fn test_improvement_percent() {
        let g = testing::fork_graph();
        let baseline = Configuration::root_only(&g, n(0)).unwrap();
        let outcome = ClimbOutcome::new(
            &g,
            &baseline,
            baseline.clone(),
            eval(50.0),
            eval(75.0),
            TerminationReason::MaxIterations,
            BudgetState::new(0, LimitedBudget::Unbounded),
            Vec::new(),
            ClimbStatistics::default(),
        );
        assert_eq!(outcome.improvement_percent(), Some(50.0));
        assert!(outcome.same_result(&outcome.clone()));
    }
}
