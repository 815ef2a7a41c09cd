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

//! Statistics reporting for hill-climbing runs.
//!
//! `ClimbStatistics` aggregates the counters of one run: iterations, generated
//! candidates, oracle evaluations, cache hits, absorbed oracle failures and
//! adopted improvements, together with the total wall-clock time. Updates use
//! saturating arithmetic so that the counters never trap inside the loop.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClimbStatistics {
    /// Number of iterations that evaluated at least one candidate.
    pub iterations: u64,

    /// Total number of candidate moves generated.
    pub candidates_generated: u64,

    /// Number of oracle calls, including the baseline.
    pub evaluations: u64,

    /// Number of candidate scores served from the cache.
    pub cache_hits: u64,

    /// Number of oracle failures absorbed during the run.
    pub evaluation_failures: u64,

    /// Number of adopted moves.
    pub improvements: u64,

    /// Total time taken by the run.
    pub time_total: Duration,
}

impl ClimbStatistics {
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    #[inline]
    pub fn on_candidates(&mut self, count: usize) {
        self.candidates_generated = self.candidates_generated.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
    }

    /// Copies the evaluator counters into the statistics.
    #[inline]
    pub fn set_evaluation_counters(&mut self, evaluations: u64, cache_hits: u64, failures: u64) {
        self.evaluations = evaluations;
        self.cache_hits = cache_hits;
        self.evaluation_failures = failures;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Returns the share of candidate scores served from the cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.evaluations + self.cache_hits;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

impl std::fmt::Display for ClimbStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Keystone-LS Statistics:")?;
        writeln!(f, "   Iterations:          {}", self.iterations)?;
        writeln!(f, "   Candidates:          {}", self.candidates_generated)?;
        writeln!(f, "   Evaluations:         {}", self.evaluations)?;
        writeln!(f, "   Cache Hits:          {}", self.cache_hits)?;
        writeln!(f, "   Failed Evaluations:  {}", self.evaluation_failures)?;
        writeln!(f, "   Improvements:        {}", self.improvements)?;
        writeln!(f, "   Total Time:          {:?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = ClimbStatistics::default();
        stats.on_iteration();
        stats.on_iteration();
        stats.on_candidates(5);
        stats.on_candidates(3);
        stats.on_improvement();
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.candidates_generated, 8);
        assert_eq!(stats.improvements, 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = ClimbStatistics {
            iterations: u64::MAX,
            ..Default::default()
        };
        stats.on_iteration();
        assert_eq!(stats.iterations, u64::MAX);
    }

    #[test]
    fn test_cache_hit_rate() {
        let mut stats = ClimbStatistics::default();
        assert_eq!(stats.cache_hit_rate(), 0.0);
        stats.set_evaluation_counters(3, 1, 0);
        assert!((stats.cache_hit_rate() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_display_lists_every_counter() {
        let text = ClimbStatistics::default().to_string();
        for label in ["Iterations", "Candidates", "Evaluations", "Cache Hits", "Improvements"] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
