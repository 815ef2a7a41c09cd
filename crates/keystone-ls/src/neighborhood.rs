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

//! Move and neighbor generation.
//!
//! Given the immutable graph, the current configuration and the budget, the
//! `NeighborGenerator` enumerates every legal single-step mutation and returns
//! a ranked, capped candidate list. Legality is structural and financial at
//! once: each emitted move keeps the configuration connected to its root and
//! fits the remaining budget.
//!
//! Generation follows a strict free-first policy. While free budget remains
//! and the frontier is non-empty, only `Add` moves are produced; `Remove` and
//! `Swap` moves are considered only once the free budget is spent or no node
//! can be added. This is a hard rule, not a tie-break.
//!
//! Removals are found through the cut vertices of the allocated subgraph: a
//! non-root node that is not a cut vertex can be dropped without stranding
//! anything. A swap pairs such a node with a frontier node that stays adjacent
//! to the remainder after the removal, i.e. one that touches at least one
//! allocated node other than the one being dropped. Roots of every archetype
//! are never offered for allocation.
//!
//! Candidates are ordered by tier gain (higher first), then by kind (`Add`,
//! `Remove`, `Swap`), then by node index, and finally truncated to the
//! configured maximum so the per-iteration evaluation cost stays bounded.

use crate::{budget::BudgetState, moves::Move};
use fixedbitset::FixedBitSet;
use keystone_model::{
    configuration::Configuration, connectivity::ConnectivityValidator, graph::Graph,
    index::NodeIndex,
};

/// Default cap on the number of candidates returned per iteration.
pub const DEFAULT_MAX_CANDIDATES: usize = 128;

/// A frontier node together with its allocated neighbors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct FrontierEntry {
    node: NodeIndex,
    // Number of allocated neighbors.
    anchors: u32,
    // Lowest allocated neighbor; only meaningful when `anchors == 1`.
    first_anchor: NodeIndex,
}

/// Produces the ranked legal moves of a configuration.
#[derive(Debug, Clone)]
pub struct NeighborGenerator {
    max_candidates: usize,
    validator: ConnectivityValidator,
    frontier_mask: FixedBitSet,
    frontier: Vec<FrontierEntry>,
}

impl Default for NeighborGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl NeighborGenerator {
    /// Creates a generator returning at most `max_candidates` moves.
    ///
    /// # Panics
    ///
    /// Panics if `max_candidates` is zero.
    pub fn new(max_candidates: usize) -> Self {
        assert!(
            max_candidates > 0,
            "called `NeighborGenerator::new` with a zero candidate cap"
        );
        Self {
            max_candidates,
            validator: ConnectivityValidator::default(),
            frontier_mask: FixedBitSet::new(),
            frontier: Vec::new(),
        }
    }

    /// Creates a generator with buffers sized for `num_nodes`.
    pub fn preallocated(max_candidates: usize, num_nodes: usize) -> Self {
        let mut generator = Self::new(max_candidates);
        generator.validator = ConnectivityValidator::new(num_nodes);
        generator.frontier_mask = FixedBitSet::with_capacity(num_nodes);
        generator.frontier = Vec::with_capacity(num_nodes);
        generator
    }

    #[inline]
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Returns the frontier computed by the last `generate` call.
    pub fn frontier(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.frontier.iter().map(|e| e.node)
    }

    /// Writes the ranked, capped legal moves of `configuration` into `out`.
    pub fn generate(
        &mut self,
        graph: &Graph,
        configuration: &Configuration,
        budget: &BudgetState,
        out: &mut Vec<Move>,
    ) {
        out.clear();
        self.collect_frontier(graph, configuration);

        if budget.has_free() && budget.fits(1, 0) {
            out.extend(self.frontier.iter().map(|e| Move::add(e.node)));
        }

        if out.is_empty() && budget.has_limited() {
            let root = configuration.root();
            let cut = self
                .validator
                .cut_vertices(graph, root, configuration.as_bitset());

            for removable in configuration
                .iter()
                .filter(|&n| n != root && !cut.contains(n.get()))
            {
                out.push(Move::remove(removable));
                for entry in &self.frontier {
                    if entry.anchors > 1 || entry.first_anchor != removable {
                        out.push(Move::swap(removable, entry.node));
                    }
                }
            }
        }

        rank(graph, out);
        out.truncate(self.max_candidates);

        #[cfg(debug_assertions)]
        for mv in out.iter() {
            debug_assert!(
                budget.fits(mv.free_cost(), mv.limited_cost()),
                "called `NeighborGenerator::generate` and produced {} which overruns {}",
                mv,
                budget
            );
            debug_assert!(
                mv.apply(configuration).is_valid(graph),
                "called `NeighborGenerator::generate` and produced {} which disconnects the configuration",
                mv
            );
        }
    }

    fn collect_frontier(&mut self, graph: &Graph, configuration: &Configuration) {
        self.frontier_mask.clear();
        self.frontier_mask.grow(graph.num_nodes());
        self.frontier.clear();

        for node in configuration.iter() {
            for &next in graph.neighbors(node) {
                if !configuration.contains(next) && !graph.is_root(next) {
                    self.frontier_mask.insert(next.get());
                }
            }
        }

        for i in self.frontier_mask.ones() {
            let node = NodeIndex::new(i);
            let mut anchors = 0;
            let mut first_anchor = node;
            for &next in graph.neighbors(node) {
                if configuration.contains(next) {
                    if anchors == 0 {
                        first_anchor = next;
                    }
                    anchors += 1;
                }
            }
            self.frontier.push(FrontierEntry {
                node,
                anchors,
                first_anchor,
            });
        }
    }
}

#[inline]
fn kind_order(mv: &Move) -> u8 {
    match (mv.added(), mv.removed()) {
        (Some(_), None) => 0,
        (None, Some(_)) => 1,
        _ => 2,
    }
}

fn rank(graph: &Graph, moves: &mut [Move]) {
    moves.sort_by_key(|mv| {
        (
            std::cmp::Reverse(mv.tier_gain(graph)),
            kind_order(mv),
            mv.removed().map_or(0, |n| n.get()),
            mv.added().map_or(0, |n| n.get()),
        )
    });
}

/// Returns the ranked legal moves of `configuration` with the default cap.
pub fn generate_moves(graph: &Graph, configuration: &Configuration, budget: &BudgetState) -> Vec<Move> {
    let mut out = Vec::new();
    NeighborGenerator::preallocated(DEFAULT_MAX_CANDIDATES, graph.num_nodes())
        .generate(graph, configuration, budget, &mut out);
    out
}
