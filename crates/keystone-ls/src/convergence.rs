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

//! Convergence detection for hill-climbing runs.
//!
//! `ConvergenceDetector` is a two-state machine, running and converged. It
//! tracks the best fitness seen and a stall counter. An iteration counts as a
//! stall unless it improves the best fitness by more than
//! `min_relative_improvement * |best|`; a significant improvement resets the
//! counter. The detector converges once the counter reaches `patience`, the
//! iteration cap or the time limit is hit, no legal move exists, or the run
//! is cancelled. Once converged it stays converged and keeps its first reason.

use crate::result::TerminationReason;
use std::time::Duration;

/// Stopping rules of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCriteria {
    /// Consecutive non-significant iterations tolerated before stopping.
    pub patience: u32,
    /// Relative gain over the best fitness that resets the stall counter.
    pub min_relative_improvement: f64,
    /// Maximum number of iterations.
    pub max_iterations: u64,
    /// Optional wall-clock limit, checked between iterations.
    pub time_limit: Option<Duration>,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            patience: 3,
            min_relative_improvement: 0.001,
            max_iterations: 10_000,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    Running,
    Converged(TerminationReason),
}

#[derive(Debug, Clone)]
pub struct ConvergenceDetector {
    criteria: ConvergenceCriteria,
    state: ConvergenceState,
    best_fitness: f64,
    stall_count: u32,
}

impl ConvergenceDetector {
    pub fn new(criteria: ConvergenceCriteria, baseline_fitness: f64) -> Self {
        Self {
            criteria,
            state: ConvergenceState::Running,
            best_fitness: baseline_fitness,
            stall_count: 0,
        }
    }

    #[inline]
    pub fn criteria(&self) -> &ConvergenceCriteria {
        &self.criteria
    }

    #[inline]
    pub fn state(&self) -> ConvergenceState {
        self.state
    }

    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self.state, ConvergenceState::Converged(_))
    }

    /// Returns the termination reason once converged.
    #[inline]
    pub fn reason(&self) -> Option<TerminationReason> {
        match self.state {
            ConvergenceState::Running => None,
            ConvergenceState::Converged(reason) => Some(reason),
        }
    }

    #[inline]
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    #[inline]
    pub fn stall_count(&self) -> u32 {
        self.stall_count
    }

    fn converge(&mut self, reason: TerminationReason) -> TerminationReason {
        match self.state {
            ConvergenceState::Running => {
                self.state = ConvergenceState::Converged(reason);
                reason
            }
            ConvergenceState::Converged(first) => first,
        }
    }

    /// Checks the iteration cap and the time limit before an iteration.
    pub fn check_limits(&mut self, iterations: u64, elapsed: Duration) -> Option<TerminationReason> {
        if let Some(reason) = self.reason() {
            return Some(reason);
        }
        if iterations >= self.criteria.max_iterations {
            return Some(self.converge(TerminationReason::MaxIterations));
        }
        if self.criteria.time_limit.is_some_and(|limit| elapsed >= limit) {
            return Some(self.converge(TerminationReason::Timeout));
        }
        None
    }

    /// Records the fitness held after an iteration.
    ///
    /// Returns `true` if the iteration improved significantly and reset the
    /// stall counter.
    pub fn observe(&mut self, current_fitness: f64) -> bool {
        if self.is_converged() {
            return false;
        }

        let gain = current_fitness - self.best_fitness;
        let threshold = self.criteria.min_relative_improvement * self.best_fitness.abs();
        let significant = gain > 0.0 && gain > threshold;

        if current_fitness > self.best_fitness {
            self.best_fitness = current_fitness;
        }

        if significant {
            self.stall_count = 0;
        } else {
            self.stall_count = self.stall_count.saturating_add(1);
            if self.stall_count >= self.criteria.patience {
                self.converge(TerminationReason::NoImprovement);
            }
        }
        significant
    }

    /// Records that the generator produced no candidate.
    #[inline]
    pub fn no_valid_moves(&mut self) -> TerminationReason {
        self.converge(TerminationReason::NoValidMoves)
    }

    /// Records an external cancellation.
    #[inline]
    pub fn cancel(&mut self) -> TerminationReason {
        self.converge(TerminationReason::Cancelled)
    }
}
