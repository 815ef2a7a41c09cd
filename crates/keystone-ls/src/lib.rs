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

//! # Keystone Local Search
//!
//! **Budgeted, deterministic hill climbing over skill-tree configurations.**
//!
//! Starting from a caller-supplied baseline, the engine repeatedly generates
//! every legal single-step mutation of the current configuration, scores each
//! one through an external oracle, and adopts the best improving move until
//! the search converges. Two independent budgets bound the run: free
//! allocations and limited deallocations or reallocations.
//!
//! ## Modules
//!
//! * **`engine`**: `HillClimber`, the steepest-ascent search loop.
//! * **`neighborhood`**: Free-first generation, ranking and capping of moves.
//! * **`moves`**: `Move` (add, remove, swap) and its budget cost.
//! * **`budget`**: Dual-counter `BudgetTracker` with an explicit unbounded
//!   sentinel.
//! * **`eval`**: The `Oracle` trait, objectives and the caching `Evaluator`.
//! * **`convergence`**: Stall, iteration, time and move-exhaustion stopping
//!   rules.
//! * **`monitor`**: Synchronous observers for progress, logging and
//!   cancellation.
//! * **`config`**: Validated run configuration and its builder.
//! * **`result`** / **`stats`**: The run outcome and its counters.
//! * **`error`**: Caller-facing error types.
//!
//! ## Example
//!
//! ```
//! use keystone_ls::{
//!     config::ClimbConfigBuilder,
//!     engine::HillClimber,
//!     eval::{Metrics, Oracle, OracleError},
//!     monitor::no_op::NoOpMonitor,
//! };
//! use keystone_model::{configuration::Configuration, loading::GraphLoader};
//!
//! struct NodeCount;
//!
//! impl Oracle for NodeCount {
//!     fn name(&self) -> &str {
//!         "NodeCount"
//!     }
//!
//!     fn evaluate(&mut self, c: &Configuration) -> Result<Metrics, OracleError> {
//!         Ok(Metrics::new(c.len() as f64, 0.0))
//!     }
//! }
//!
//! let graph = GraphLoader::new()
//!     .from_str("node 1\nnode 2\nnode 3\nedge 1 2\nedge 2 3\nroot duelist 1\n")
//!     .unwrap();
//! let root = graph.root(graph.archetype_by_name("duelist").unwrap());
//! let baseline = Configuration::root_only(&graph, root).unwrap();
//!
//! let config = ClimbConfigBuilder::new().with_free_budget(2).build().unwrap();
//! let outcome = HillClimber::new(config)
//!     .run(&graph, &baseline, &mut NodeCount, &mut NoOpMonitor::new())
//!     .unwrap();
//! assert_eq!(outcome.configuration().len(), 3);
//! ```

pub mod budget;
pub mod config;
pub mod convergence;
pub mod engine;
pub mod error;
pub mod eval;
pub mod monitor;
pub mod moves;
pub mod neighborhood;
pub mod result;
pub mod stats;

#[cfg(test)]
mod testing;
