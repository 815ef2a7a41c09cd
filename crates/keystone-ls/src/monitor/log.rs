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

//! Progress logging through `tracing`.
//!
//! `LogMonitor` renders the run as a sequence of `info` events: a start line
//! with the baseline, one line per progress snapshot and a closing summary.
//! Adopted moves are reported at `debug` level. The monitor only emits events;
//! installing a subscriber is up to the application.

use crate::{
    monitor::climb_monitor::{ClimbMonitor, Progress},
    moves::Move,
    result::ClimbOutcome,
};
use keystone_model::configuration::Configuration;

/// A monitor that logs progress as `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct LogMonitor {
    label: Option<String>,
    lines: u64,
}

impl LogMonitor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every event with `label`, e.g. the caller's build name.
    pub fn with_label<S>(label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: Some(label.into()),
            lines: 0,
        }
    }

    /// Returns the number of progress lines emitted.
    #[inline]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    #[inline]
    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("climb")
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(label: {})", self.label())
    }
}

impl ClimbMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, baseline: &Configuration, progress: &Progress) {
        self.lines = 0;
        tracing::info!(
            label = self.label(),
            nodes = baseline.len(),
            fitness = progress.best_fitness,
            budget = %progress.budget,
            "search started"
        );
    }

    fn on_progress(&mut self, progress: &Progress) {
        self.lines += 1;
        tracing::info!(
            label = self.label(),
            iteration = progress.iteration,
            best = progress.best_fitness,
            improvement_pct = progress.improvement_percent().unwrap_or(0.0),
            free_used = progress.budget.free_used,
            limited_used = progress.budget.limited_used,
            elapsed_s = progress.elapsed.as_secs_f32(),
            "progress"
        );
    }

    fn on_improvement(&mut self, mv: &Move, configuration: &Configuration, progress: &Progress) {
        tracing::debug!(
            label = self.label(),
            iteration = progress.iteration,
            mv = %mv,
            nodes = configuration.len(),
            fitness = progress.best_fitness,
            "move adopted"
        );
    }

    fn on_end(&mut self, outcome: &ClimbOutcome) {
        tracing::info!(
            label = self.label(),
            reason = %outcome.termination_reason(),
            iterations = outcome.iterations(),
            baseline = outcome.baseline().fitness,
            fitness = outcome.final_evaluation().fitness,
            budget = %outcome.budget(),
            elapsed_s = outcome.elapsed().as_secs_f32(),
            "search finished"
        );
    }
}
