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

//! Connectivity validation on allocated subgraphs.
//!
//! A configuration is valid only if every allocated node can be reached from
//! the archetype root by walking exclusively over allocated nodes. This module
//! answers that question with a depth-first traversal restricted to the
//! allocated set, and additionally computes the cut vertices (articulation
//! points) of the allocated induced subgraph. A non-root allocated node that is
//! not a cut vertex can be deallocated without disconnecting the remainder,
//! which lets the neighbor generator enumerate every legal removal with a
//! single O(V + E) pass instead of one traversal per candidate.
//!
//! `ConnectivityValidator` owns its traversal buffers so repeated checks do not
//! allocate. The free function `is_connected` is a convenience wrapper for
//! one-off checks.

use crate::{graph::Graph, index::NodeIndex};
use fixedbitset::FixedBitSet;

/// Returns `true` if every node in `allocated` is reachable from `root` via
/// allocated nodes only.
///
/// `root` outside `allocated` yields `false`; `allocated == {root}` yields `true`.
#[inline]
pub fn is_connected(graph: &Graph, root: NodeIndex, allocated: &FixedBitSet) -> bool {
    ConnectivityValidator::new(graph.num_nodes()).is_connected(graph, root, allocated)
}

/// Reusable traversal state for connectivity and cut-vertex queries.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityValidator {
    visited: FixedBitSet,
    stack: Vec<NodeIndex>,
    // Tarjan bookkeeping. A discovery time of zero marks an unvisited node.
    discovery: Vec<u32>,
    low: Vec<u32>,
    parent: Vec<NodeIndex>,
    frames: Vec<(NodeIndex, usize)>,
    cut: FixedBitSet,
}

impl ConnectivityValidator {
    /// Creates a validator sized for a graph with `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            visited: FixedBitSet::with_capacity(num_nodes),
            stack: Vec::with_capacity(num_nodes),
            discovery: vec![0; num_nodes],
            low: vec![0; num_nodes],
            parent: vec![NodeIndex::new(0); num_nodes],
            frames: Vec::with_capacity(num_nodes),
            cut: FixedBitSet::with_capacity(num_nodes),
        }
    }

    fn ensure_capacity(&mut self, num_nodes: usize) {
        if self.discovery.len() < num_nodes {
            self.discovery.resize(num_nodes, 0);
            self.low.resize(num_nodes, 0);
            self.parent.resize(num_nodes, NodeIndex::new(0));
        }
        self.visited.grow(num_nodes);
        self.cut.grow(num_nodes);
    }

    /// Returns `true` if every node in `allocated` is reachable from `root`
    /// through allocated nodes.
    pub fn is_connected(&mut self, graph: &Graph, root: NodeIndex, allocated: &FixedBitSet) -> bool {
        if !graph.contains(root) || !allocated.contains(root.get()) {
            return false;
        }
        let reached = self.traverse(graph, root, allocated);
        reached == allocated.count_ones(..)
    }

    /// Returns the nodes reached by the last `is_connected` call.
    #[inline]
    pub fn reached(&self) -> &FixedBitSet {
        &self.visited
    }

    fn traverse(&mut self, graph: &Graph, root: NodeIndex, allocated: &FixedBitSet) -> usize {
        self.ensure_capacity(graph.num_nodes());
        self.visited.clear();
        self.stack.clear();

        self.visited.insert(root.get());
        self.stack.push(root);
        let mut count = 1;

        while let Some(node) = self.stack.pop() {
            for &next in graph.neighbors(node) {
                if allocated.contains(next.get()) && !self.visited.put(next.get()) {
                    count += 1;
                    self.stack.push(next);
                }
            }
        }
        count
    }

    /// Computes the cut vertices of the subgraph induced by `allocated`,
    /// restricted to the component containing `root`.
    ///
    /// Removing a node in the returned set would split the allocated subgraph.
    /// The root is reported only if it separates two or more subtrees.
    pub fn cut_vertices(
        &mut self,
        graph: &Graph,
        root: NodeIndex,
        allocated: &FixedBitSet,
    ) -> &FixedBitSet {
        self.ensure_capacity(graph.num_nodes());
        self.cut.clear();
        if !graph.contains(root) || !allocated.contains(root.get()) {
            return &self.cut;
        }

        for i in allocated.ones() {
            if i < self.discovery.len() {
                self.discovery[i] = 0;
            }
        }
        self.frames.clear();

        let mut timer: u32 = 1;
        let mut root_children = 0usize;
        self.discovery[root.get()] = timer;
        self.low[root.get()] = timer;
        self.frames.push((root, 0));

        while let Some(top) = self.frames.last_mut() {
            let (node, position) = *top;
            let neighbors = graph.neighbors(node);

            if position < neighbors.len() {
                top.1 += 1;
                let next = neighbors[position];
                if !allocated.contains(next.get()) {
                    continue;
                }
                if self.discovery[next.get()] == 0 {
                    timer += 1;
                    self.discovery[next.get()] = timer;
                    self.low[next.get()] = timer;
                    self.parent[next.get()] = node;
                    if node == root {
                        root_children += 1;
                    }
                    self.frames.push((next, 0));
                } else if node == root || next != self.parent[node.get()] {
                    let d = self.discovery[next.get()];
                    let l = &mut self.low[node.get()];
                    *l = (*l).min(d);
                }
                continue;
            }

            self.frames.pop();
            if let Some(&(up, _)) = self.frames.last() {
                let child_low = self.low[node.get()];
                let l = &mut self.low[up.get()];
                *l = (*l).min(child_low);
                if up != root && child_low >= self.discovery[up.get()] {
                    self.cut.insert(up.get());
                }
            }
        }

        if root_children > 1 {
            self.cut.insert(root.get());
        }
        &self.cut
    }
}
