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

//! Run configuration.
//!
//! A `ClimbConfig` carries everything a run needs besides the graph, the
//! baseline and the oracle: both budgets, the objective, the stopping rules,
//! the candidate cap, the progress interval and the cache switch. It is only
//! obtainable through `ClimbConfigBuilder::build`, which validates caller
//! input and rejects it with a `ConfigError` before any search starts.
//!
//! # Example
//!
//! ```
//! use keystone_ls::config::ClimbConfigBuilder;
//!
//! let config = ClimbConfigBuilder::new()
//!     .with_free_budget(10)
//!     .with_limited_budget(Some(2))
//!     .with_objective_name("balanced")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.free_budget(), 10);
//! ```

use crate::{
    budget::{BudgetTracker, LimitedBudget},
    convergence::ConvergenceCriteria,
    error::ConfigError,
    eval::Objective,
    neighborhood::DEFAULT_MAX_CANDIDATES,
};
use std::time::Duration;

pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Validated configuration of a hill-climbing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbConfig {
    free_budget: u32,
    limited_budget: LimitedBudget,
    objective: Objective,
    criteria: ConvergenceCriteria,
    max_candidates: usize,
    progress_interval: u64,
    cache_evaluations: bool,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            free_budget: 0,
            limited_budget: LimitedBudget::Unbounded,
            objective: Objective::default(),
            criteria: ConvergenceCriteria::default(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            cache_evaluations: true,
        }
    }
}

impl ClimbConfig {
    #[inline]
    pub fn free_budget(&self) -> u32 {
        self.free_budget
    }

    #[inline]
    pub fn limited_budget(&self) -> LimitedBudget {
        self.limited_budget
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    #[inline]
    pub fn criteria(&self) -> &ConvergenceCriteria {
        &self.criteria
    }

    #[inline]
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    #[inline]
    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    #[inline]
    pub fn cache_evaluations(&self) -> bool {
        self.cache_evaluations
    }

    /// Returns a fresh tracker with nothing spent.
    #[inline]
    pub fn budget_tracker(&self) -> BudgetTracker {
        BudgetTracker::new(self.free_budget, self.limited_budget)
    }
}

/// Builder for `ClimbConfig`.
#[derive(Debug, Clone)]
pub struct ClimbConfigBuilder {
    free_budget: i64,
    limited_budget: Option<i64>,
    objective: Result<Objective, ConfigError>,
    criteria: ConvergenceCriteria,
    max_candidates: usize,
    progress_interval: u64,
    cache_evaluations: bool,
}

impl Default for ClimbConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClimbConfigBuilder {
    /// Creates a builder with default values: no free budget, unbounded
    /// limited budget, offence objective.
    pub fn new() -> Self {
        let defaults = ClimbConfig::default();
        Self {
            free_budget: 0,
            limited_budget: None,
            objective: Ok(defaults.objective),
            criteria: defaults.criteria,
            max_candidates: defaults.max_candidates,
            progress_interval: defaults.progress_interval,
            cache_evaluations: defaults.cache_evaluations,
        }
    }

    /// Sets the number of free allocations.
    #[inline]
    pub fn with_free_budget(mut self, free: i64) -> Self {
        self.free_budget = free;
        self
    }

    /// Sets the limited budget; `None` means unbounded.
    #[inline]
    pub fn with_limited_budget(mut self, limited: Option<i64>) -> Self {
        self.limited_budget = limited;
        self
    }

    #[inline]
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = Ok(objective);
        self
    }

    /// Sets the objective by name. Unknown names surface from `build`.
    #[inline]
    pub fn with_objective_name(mut self, name: &str) -> Self {
        self.objective = name.parse();
        self
    }

    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.criteria.max_iterations = max_iterations;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.criteria.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_patience(mut self, patience: u32) -> Self {
        self.criteria.patience = patience;
        self
    }

    #[inline]
    pub fn with_min_relative_improvement(mut self, threshold: f64) -> Self {
        self.criteria.min_relative_improvement = threshold;
        self
    }

    #[inline]
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    #[inline]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    #[inline]
    pub fn with_cache_evaluations(mut self, enabled: bool) -> Self {
        self.cache_evaluations = enabled;
        self
    }

    /// Validates the settings and builds the configuration.
    pub fn build(self) -> Result<ClimbConfig, ConfigError> {
        let free_budget = u32::try_from(self.free_budget)
            .map_err(|_| ConfigError::InvalidFreeBudget(self.free_budget))?;
        let limited_budget = match self.limited_budget {
            None => LimitedBudget::Unbounded,
            Some(limit) => LimitedBudget::Bounded(
                u32::try_from(limit).map_err(|_| ConfigError::InvalidLimitedBudget(limit))?,
            ),
        };
        let objective = self.objective?;

        if self.criteria.patience == 0 {
            return Err(ConfigError::ZeroPatience);
        }
        let threshold = self.criteria.min_relative_improvement;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidImprovementThreshold(threshold));
        }
        if self.criteria.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::ZeroCandidateCap);
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }

        Ok(ClimbConfig {
            free_budget,
            limited_budget,
            objective,
            criteria: self.criteria,
            max_candidates: self.max_candidates,
            progress_interval: self.progress_interval,
            cache_evaluations: self.cache_evaluations,
        })
    }
}
