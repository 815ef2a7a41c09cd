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

//! Fixtures shared by the unit tests: small graphs, random trees and
//! deterministic oracles.

use crate::eval::{Metrics, Oracle, OracleError};
use keystone_model::{
    configuration::Configuration,
    graph::{Graph, GraphBuilder, NodeTier},
    index::{NodeId, NodeIndex},
};
use rand::Rng;
use std::time::Duration;

/// Installs a test-friendly `tracing` subscriber once per process.
pub(crate) fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A path `0 - 1 - ... - (n-1)` rooted at node 0. Node ids equal indices.
pub(crate) fn line_graph(n: u32) -> Graph {
    let mut b = GraphBuilder::with_capacity(n as usize);
    for i in 0..n {
        b.add_node(NodeId(i), NodeTier::Minor).unwrap();
    }
    for i in 1..n {
        b.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
    }
    b.add_archetype("line", NodeId(0)).unwrap();
    b.build().unwrap()
}

/// Root 0 with children 1 and 2; 3 hangs off 1 and 4 hangs off 2.
pub(crate) fn fork_graph() -> Graph {
    let mut b = GraphBuilder::with_capacity(5);
    for i in 0..5 {
        b.add_node(NodeId(i), NodeTier::Minor).unwrap();
    }
    b.add_edge(NodeId(0), NodeId(1)).unwrap();
    b.add_edge(NodeId(0), NodeId(2)).unwrap();
    b.add_edge(NodeId(1), NodeId(3)).unwrap();
    b.add_edge(NodeId(2), NodeId(4)).unwrap();
    b.add_archetype("fork", NodeId(0)).unwrap();
    b.build().unwrap()
}

/// Line `root - A - B - C` with values A = 1, B = 5, C = 1.
pub(crate) fn valued_line() -> (Graph, Vec<f64>) {
    (line_graph(4), vec![0.0, 1.0, 5.0, 1.0])
}

/// A random spanning tree over `n` nodes plus up to `extra_edges` chords,
/// rooted at node 0, with random tiers.
pub(crate) fn random_graph<R: Rng>(rng: &mut R, n: usize, extra_edges: usize) -> Graph {
    let mut b = GraphBuilder::with_capacity(n);
    for i in 0..n as u32 {
        let tier = match rng.random_range(0..10) {
            0..=6 => NodeTier::Minor,
            7 | 8 => NodeTier::Notable,
            _ => NodeTier::Keystone,
        };
        b.add_node(NodeId(i), tier).unwrap();
    }
    for i in 1..n as u32 {
        let parent = rng.random_range(0..i);
        b.add_edge(NodeId(parent), NodeId(i)).unwrap();
    }
    for _ in 0..extra_edges {
        let a = rng.random_range(0..n as u32);
        let c = rng.random_range(0..n as u32);
        if a != c {
            b.add_edge(NodeId(a), NodeId(c)).unwrap();
        }
    }
    b.add_archetype("random", NodeId(0)).unwrap();
    b.build().unwrap()
}

pub(crate) fn random_values<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(0.0..10.0)).collect()
}

/// Offence is the sum of the allocated node values, defence the node count.
#[derive(Debug, Clone)]
pub(crate) struct ValueOracle {
    values: Vec<f64>,
    calls: u64,
}

impl ValueOracle {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, calls: 0 }
    }

    pub(crate) fn uniform(n: usize, value: f64) -> Self {
        Self::new(vec![value; n])
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls
    }

    fn score(&self, configuration: &Configuration) -> Metrics {
        let offence = configuration
            .iter()
            .map(|n| self.values.get(n.get()).copied().unwrap_or(0.0))
            .sum();
        Metrics::new(offence, configuration.len() as f64)
    }
}

impl Oracle for ValueOracle {
    fn name(&self) -> &str {
        "ValueOracle"
    }

    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError> {
        self.calls += 1;
        Ok(self.score(configuration))
    }
}

/// Fails on every configuration containing a poisoned node, or on all of
/// them when built with `always`.
#[derive(Debug, Clone)]
pub(crate) struct FailingOracle {
    inner: Option<ValueOracle>,
    poisoned: Vec<NodeIndex>,
}

impl FailingOracle {
    pub(crate) fn always() -> Self {
        Self {
            inner: None,
            poisoned: Vec::new(),
        }
    }

    pub(crate) fn poisoned(values: Vec<f64>, poisoned: Vec<NodeIndex>) -> Self {
        Self {
            inner: Some(ValueOracle::new(values)),
            poisoned,
        }
    }
}

impl Oracle for FailingOracle {
    fn name(&self) -> &str {
        "FailingOracle"
    }

    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError> {
        match self.inner.as_mut() {
            Some(inner) if !self.poisoned.iter().any(|&n| configuration.contains(n)) => {
                inner.evaluate(configuration)
            }
            _ => Err(OracleError::new("stat engine crashed")),
        }
    }
}

/// Sleeps before delegating, to exercise the time limit.
#[derive(Debug, Clone)]
pub(crate) struct SlowOracle {
    inner: ValueOracle,
    delay: Duration,
}

impl SlowOracle {
    pub(crate) fn new(inner: ValueOracle, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl Oracle for SlowOracle {
    fn name(&self) -> &str {
        "SlowOracle"
    }

    fn evaluate(&mut self, configuration: &Configuration) -> Result<Metrics, OracleError> {
        std::thread::sleep(self.delay);
        self.inner.evaluate(configuration)
    }
}
