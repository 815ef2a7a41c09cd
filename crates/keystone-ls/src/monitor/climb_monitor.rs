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

//! Monitoring interface for hill-climbing runs.
//!
//! A `ClimbMonitor` observes the lifecycle of a run: its start, periodic
//! progress snapshots, every adopted move and the final outcome. Between
//! iterations the engine asks the monitor for a `SearchCommand`; the default
//! continues, so monitors stay lightweight unless they implement a stopping
//! condition.

use crate::{budget::BudgetState, moves::Move, result::ClimbOutcome, stats::ClimbStatistics};
use keystone_model::configuration::Configuration;
use std::time::Duration;

/// Instruction returned by a monitor between iterations.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// A snapshot of a running search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Iterations completed so far.
    pub iteration: u64,
    pub baseline_fitness: f64,
    /// Fitness of the current configuration, which is the best so far.
    pub best_fitness: f64,
    pub budget: BudgetState,
    pub elapsed: Duration,
}

impl Progress {
    /// Returns the relative improvement over the baseline in percent, or
    /// `None` for a zero baseline.
    pub fn improvement_percent(&self) -> Option<f64> {
        (self.baseline_fitness != 0.0).then(|| {
            (self.best_fitness - self.baseline_fitness) / self.baseline_fitness.abs() * 100.0
        })
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "iteration {}, best {:.4}, improvement ",
            self.iteration, self.best_fitness
        )?;
        match self.improvement_percent() {
            Some(pct) => write!(f, "{:+.2}%", pct)?,
            None => write!(f, "n/a")?,
        }
        write!(f, ", budget {}, elapsed {:.1?}", self.budget, self.elapsed)
    }
}

/// A monitor for hill-climbing runs.
pub trait ClimbMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once the baseline has been scored.
    fn on_start(&mut self, baseline: &Configuration, progress: &Progress);

    /// Called every `progress_interval` iterations.
    fn on_progress(&mut self, progress: &Progress);

    /// Called when a move is adopted.
    fn on_improvement(&mut self, mv: &Move, configuration: &Configuration, progress: &Progress);

    /// Called once with the final outcome.
    fn on_end(&mut self, outcome: &ClimbOutcome);

    /// Determines whether the run continues with the next iteration.
    fn search_command(&mut self, _statistics: &ClimbStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl<M> ClimbMonitor for &mut M
where
    M: ClimbMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_start(&mut self, baseline: &Configuration, progress: &Progress) {
        (**self).on_start(baseline, progress)
    }

    fn on_progress(&mut self, progress: &Progress) {
        (**self).on_progress(progress)
    }

    fn on_improvement(&mut self, mv: &Move, configuration: &Configuration, progress: &Progress) {
        (**self).on_improvement(mv, configuration, progress)
    }

    fn on_end(&mut self, outcome: &ClimbOutcome) {
        (**self).on_end(outcome)
    }

    fn search_command(&mut self, statistics: &ClimbStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }
}

impl std::fmt::Debug for dyn ClimbMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClimbMonitor {{ name: {} }}", self.name())
    }
}

impl std::fmt::Display for dyn ClimbMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClimbMonitor: {}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::LimitedBudget;

    fn progress(baseline: f64, best: f64) -> Progress {
        Progress {
            iteration: 4,
            baseline_fitness: baseline,
            best_fitness: best,
            budget: BudgetState::new(3, LimitedBudget::Unbounded),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_improvement_percent() {
        assert_eq!(progress(200.0, 250.0).improvement_percent(), Some(25.0));
        assert_eq!(progress(-200.0, -100.0).improvement_percent(), Some(50.0));
        assert_eq!(progress(0.0, 5.0).improvement_percent(), None);
    }

    #[test]
    fn test_progress_display() {
        let text = progress(200.0, 250.0).to_string();
        assert!(text.starts_with("iteration 4, best 250.0000, improvement +25.00%"));
        assert!(progress(0.0, 1.0).to_string().contains("improvement n/a"));
    }

    #[test]
    fn test_search_command_display() {
        assert_eq!(SearchCommand::Continue.to_string(), "Continue");
        assert_eq!(
            SearchCommand::Terminate("stop".into()).to_string(),
            "Terminate: stop"
        );
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
    }
}
