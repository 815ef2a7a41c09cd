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

//! Error types of the local search crate.
//!
//! Only caller mistakes surface as errors. Oracle failures for individual
//! candidates are absorbed by the engine, and invariant breaches inside the
//! generator or the budget tracker are assertion failures.

use keystone_model::configuration::ConfigurationError;
use thiserror::Error;

/// Invalid run configuration, rejected before the search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("free budget must not be negative, got {0}")]
    InvalidFreeBudget(i64),

    #[error("limited budget must not be negative, got {0}")]
    InvalidLimitedBudget(i64),

    #[error("unknown objective `{0}`, expected one of: offence, defence, balanced")]
    UnknownObjective(String),

    #[error("patience must be at least 1")]
    ZeroPatience,

    #[error("minimum relative improvement must be finite and non-negative, got {0}")]
    InvalidImprovementThreshold(f64),

    #[error("candidate cap must be at least 1")]
    ZeroCandidateCap,

    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,

    #[error("iteration cap must be at least 1")]
    ZeroIterationCap,
}

/// Errors returned by `HillClimber::run`.
#[derive(Debug, Error)]
pub enum ClimbError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid baseline: {0}")]
    InvalidBaseline(#[from] ConfigurationError),

    #[error("baseline evaluation failed: {0}")]
    BaselineEvaluation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_model::index::NodeIndex;

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            ConfigError::InvalidFreeBudget(-3).to_string(),
            "free budget must not be negative, got -3"
        );
        assert!(
            ConfigError::UnknownObjective("speed".into())
                .to_string()
                .contains("`speed`")
        );
    }

    #[test]
    fn test_climb_error_wraps_sources() {
        let err: ClimbError = ConfigError::ZeroPatience.into();
        assert!(matches!(err, ClimbError::Config(ConfigError::ZeroPatience)));

        let err: ClimbError = ConfigurationError::Disconnected(NodeIndex::new(4)).into();
        assert!(err.to_string().starts_with("invalid baseline"));
    }
}
