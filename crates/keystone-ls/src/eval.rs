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

//! Evaluation adapter between the search and the external oracle.
//!
//! The oracle is the expensive, externally supplied stat engine that scores a
//! configuration. It reports raw metrics (offence and defence); the selected
//! `Objective` folds them into one scalar fitness. The `Evaluator` owns the
//! oracle handle of a single run, absorbs per-candidate failures into
//! `EvaluationResult::Failed` and memoizes scores of the current neighborhood.
//!
//! The balanced objective is a fixed linear blend of the raw metrics,
//! `0.6 * offence + 0.4 * defence`, without any normalization. Callers whose
//! metrics live on very different scales should pick a single-metric
//! objective instead.

use crate::error::ConfigError;
use keystone_model::configuration::Configuration;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Raw metric components reported by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub offence: f64,
    pub defence: f64,
}

impl Metrics {
    #[inline]
    pub const fn new(offence: f64, defence: f64) -> Self {
        Self { offence, defence }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.offence.is_finite() && self.defence.is_finite()
    }
}

/// Failure reported by an oracle for one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OracleError {
    message: String,
}

impl OracleError {
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The external scoring function.
///
/// An oracle is assumed to be expensive and deterministic for identical
/// input. It is not assumed to be safe for concurrent use: every run takes an
/// exclusive handle.
pub trait Oracle {
    /// Returns the name of the oracle.
    fn name(&self) -> &str;

    /// Scores `configuration`.
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError>;
}

impl<O> Oracle for &mut O
where
    O: Oracle + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError> {
        (**self).evaluate(configuration)
    }
}

impl<O> Oracle for Box<O>
where
    O: Oracle + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError> {
        (**self).evaluate(configuration)
    }
}

impl std::fmt::Debug for dyn Oracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oracle {{ name: {} }}", self.name())
    }
}

/// The scalar goal of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Objective {
    /// Maximize the offence metric.
    #[default]
    Offence,
    /// Maximize the defence metric.
    Defence,
    /// Maximize `0.6 * offence + 0.4 * defence` on raw values.
    Balanced,
}

impl Objective {
    pub const BALANCED_OFFENCE_WEIGHT: f64 = 0.6;
    pub const BALANCED_DEFENCE_WEIGHT: f64 = 0.4;

    /// Folds `metrics` into a scalar fitness.
    #[inline]
    pub fn fitness(self, metrics: &Metrics) -> f64 {
        match self {
            Objective::Offence => metrics.offence,
            Objective::Defence => metrics.defence,
            Objective::Balanced => {
                Self::BALANCED_OFFENCE_WEIGHT * metrics.offence
                    + Self::BALANCED_DEFENCE_WEIGHT * metrics.defence
            }
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::Offence => "offence",
            Objective::Defence => "defence",
            Objective::Balanced => "balanced",
        }
    }
}

impl std::str::FromStr for Objective {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offence" | "offense" | "damage" | "dps" => Ok(Objective::Offence),
            "defence" | "defense" | "ehp" => Ok(Objective::Defence),
            "balanced" => Ok(Objective::Balanced),
            _ => Err(ConfigError::UnknownObjective(s.to_string())),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub metrics: Metrics,
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4} (offence {:.4}, defence {:.4})",
            self.fitness, self.metrics.offence, self.metrics.defence
        )
    }
}

/// Outcome of scoring one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Scored(Evaluation),
    Failed(String),
}

impl EvaluationResult {
    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        match self {
            EvaluationResult::Scored(e) => Some(e.fitness),
            EvaluationResult::Failed(_) => None,
        }
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, EvaluationResult::Failed(_))
    }
}

/// Scores configurations for one run.
#[derive(Debug)]
pub struct Evaluator<O> {
    oracle: O,
    objective: Objective,
    cache: Option<FxHashMap<Configuration, Evaluation>>,
    evaluations: u64,
    cache_hits: u64,
    failures: u64,
}

impl<O> Evaluator<O>
where
    O: Oracle,
{
    /// Creates an evaluator with memoization enabled.
    #[inline]
    pub fn new(oracle: O, objective: Objective) -> Self {
        Self::with_cache(oracle, objective, true)
    }

    /// Creates an evaluator that calls the oracle for every request.
    #[inline]
    pub fn without_cache(oracle: O, objective: Objective) -> Self {
        Self::with_cache(oracle, objective, false)
    }

    pub fn with_cache(oracle: O, objective: Objective, cache: bool) -> Self {
        Self {
            oracle,
            objective,
            cache: cache.then(FxHashMap::default),
            evaluations: 0,
            cache_hits: 0,
            failures: 0,
        }
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    #[inline]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Scores `configuration`.
    ///
    /// Oracle errors and non-finite metrics yield `EvaluationResult::Failed`.
    /// Failures are never cached, so a later request retries the oracle.
    pub fn evaluate(&mut self, configuration: &Configuration) -> EvaluationResult {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(configuration)) {
            self.cache_hits += 1;
            return EvaluationResult::Scored(*hit);
        }

        self.evaluations += 1;
        let metrics = match self.oracle.evaluate(configuration) {
            Ok(metrics) if metrics.is_finite() => metrics,
            Ok(metrics) => {
                self.failures += 1;
                tracing::warn!(
                    oracle = self.oracle.name(),
                    offence = metrics.offence,
                    defence = metrics.defence,
                    "oracle returned non-finite metrics, candidate skipped"
                );
                return EvaluationResult::Failed(format!(
                    "non-finite metrics (offence {}, defence {})",
                    metrics.offence, metrics.defence
                ));
            }
            Err(err) => {
                self.failures += 1;
                tracing::warn!(
                    oracle = self.oracle.name(),
                    error = %err,
                    "oracle evaluation failed, candidate skipped"
                );
                return EvaluationResult::Failed(err.message);
            }
        };

        let evaluation = Evaluation {
            fitness: self.objective.fitness(&metrics),
            metrics,
        };
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(configuration.clone(), evaluation);
        }
        EvaluationResult::Scored(evaluation)
    }

    /// Drops every memoized score.
    #[inline]
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }

    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }

    /// Number of oracle calls made.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    #[inline]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    #[inline]
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FailingOracle, ValueOracle};
    use keystone_model::index::NodeIndex;

    #[test]
    fn test_objective_fitness() {
        let m = Metrics::new(10.0, 20.0);
        assert_eq!(Objective::Offence.fitness(&m), 10.0);
        assert_eq!(Objective::Defence.fitness(&m), 20.0);
        assert!((Objective::Balanced.fitness(&m) - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_objective_parsing() {
        assert_eq!("offence".parse::<Objective>(), Ok(Objective::Offence));
        assert_eq!("DPS".parse::<Objective>(), Ok(Objective::Offence));
        assert_eq!(" defense ".parse::<Objective>(), Ok(Objective::Defence));
        assert_eq!("ehp".parse::<Objective>(), Ok(Objective::Defence));
        assert_eq!("Balanced".parse::<Objective>(), Ok(Objective::Balanced));
        assert_eq!(
            "speed".parse::<Objective>(),
            Err(ConfigError::UnknownObjective("speed".into()))
        );
        assert_eq!(Objective::Balanced.to_string(), "balanced");
    }

    #[test]
    fn test_cache_serves_repeated_requests() {
        let (g, values) = testing::valued_line();
        let c = Configuration::root_only(&g, NodeIndex::new(0)).unwrap();
        let mut oracle = ValueOracle::new(values);
        let mut evaluator = Evaluator::new(&mut oracle, Objective::Offence);

        let first = evaluator.evaluate(&c);
        let second = evaluator.evaluate(&c);
        assert_eq!(first, second);
        assert_eq!(evaluator.evaluations(), 1);
        assert_eq!(evaluator.cache_hits(), 1);
        assert_eq!(evaluator.cached(), 1);

        evaluator.clear_cache();
        assert_eq!(evaluator.cached(), 0);
        evaluator.evaluate(&c);
        assert_eq!(evaluator.evaluations(), 2);
        drop(evaluator);
        assert_eq!(oracle.calls(), 2);
    }

    #[test]
    fn test_without_cache_always_calls_the_oracle() {
        let (g, values) = testing::valued_line();
        let c = Configuration::root_only(&g, NodeIndex::new(0)).unwrap();
        let mut evaluator = Evaluator::without_cache(ValueOracle::new(values), Objective::Offence);
        evaluator.evaluate(&c);
        evaluator.evaluate(&c);
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(evaluator.cache_hits(), 0);
        assert_eq!(evaluator.oracle().calls(), 2);
    }

    #[test]
    fn test_failures_are_reported_and_not_cached() {
        let (g, _) = testing::valued_line();
        let c = Configuration::root_only(&g, NodeIndex::new(0)).unwrap();
        let mut evaluator = Evaluator::new(FailingOracle::always(), Objective::Offence);

        let result = evaluator.evaluate(&c);
        assert!(result.is_failure());
        assert_eq!(result.fitness(), None);
        evaluator.evaluate(&c);
        assert_eq!(evaluator.failures(), 2);
        assert_eq!(evaluator.evaluations(), 2);
        assert_eq!(evaluator.cached(), 0);
    }

    #[test]
    fn test_non_finite_metrics_are_failures() {
        struct NanOracle;
        impl Oracle for NanOracle {
            fn name(&self) -> &str {
                "NanOracle"
            }
            fn evaluate(&mut self, _: &Configuration) -> Result<Metrics, OracleError> {
                Ok(Metrics::new(f64::NAN, 1.0))
            }
        }

        let (g, _) = testing::valued_line();
        let c = Configuration::root_only(&g, NodeIndex::new(0)).unwrap();
        let mut evaluator = Evaluator::new(NanOracle, Objective::Defence);
        assert!(evaluator.evaluate(&c).is_failure());
        assert_eq!(evaluator.failures(), 1);
    }

    #[test]
    fn test_boxed_oracle_forwards() {
        let (g, values) = testing::valued_line();
        let c = Configuration::root_only(&g, NodeIndex::new(0)).unwrap();
        let boxed: Box<dyn Oracle> = Box::new(ValueOracle::new(values));
        assert_eq!(format!("{:?}", &*boxed), "Oracle { name: ValueOracle }");
        let mut evaluator = Evaluator::new(boxed, Objective::Offence);
        assert_eq!(evaluator.evaluate(&c).fitness(), Some(0.0));
    }
}
