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

//! Allocated-node configurations.
//!
//! A `Configuration` is the set of allocated nodes of one build, anchored at
//! its archetype root. It is a value type: every mutation returns a new
//! configuration and leaves the receiver untouched, which lets the search keep
//! the current, best, and candidate configurations side by side without
//! aliasing concerns.
//!
//! The public constructors validate connectivity, so a configuration obtained
//! from caller data is always connected and always contains its root. The
//! `with_*` mutators do not re-validate; they are meant to be fed moves that
//! were produced by the neighbor generator, whose postcondition guarantees
//! validity. `is_valid` is available to assert this at the call site.

use crate::{
    connectivity::is_connected,
    graph::Graph,
    index::{ArchetypeIndex, NodeIndex},
};
use fixedbitset::FixedBitSet;
use thiserror::Error;

/// Errors raised when building a `Configuration` from caller data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("node {0} is not part of the graph")]
    UnknownNode(NodeIndex),
    #[error("node {0} is not an archetype root")]
    NotARoot(NodeIndex),
    #[error("allocated nodes are not connected to root {0}")]
    Disconnected(NodeIndex),
}

/// A connected set of allocated nodes containing its archetype root.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    root: NodeIndex,
    allocated: FixedBitSet,
    len: usize,
}

impl Configuration {
    /// Creates the configuration that allocates only `root`.
    pub fn root_only(graph: &Graph, root: NodeIndex) -> Result<Self, ConfigurationError> {
        Self::new(graph, root, std::iter::empty())
    }

    /// Creates a configuration from `nodes`, anchored at `root`.
    ///
    /// The root is always allocated, whether or not `nodes` lists it.
    pub fn new<I>(graph: &Graph, root: NodeIndex, nodes: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        if !graph.contains(root) {
            return Err(ConfigurationError::UnknownNode(root));
        }
        if !graph.is_root(root) {
            return Err(ConfigurationError::NotARoot(root));
        }

        let mut allocated = FixedBitSet::with_capacity(graph.num_nodes());
        allocated.insert(root.get());
        for node in nodes {
            if !graph.contains(node) {
                return Err(ConfigurationError::UnknownNode(node));
            }
            allocated.insert(node.get());
        }

        if !is_connected(graph, root, &allocated) {
            return Err(ConfigurationError::Disconnected(root));
        }

        let len = allocated.count_ones(..);
        Ok(Self {
            root,
            allocated,
            len,
        })
    }

    /// Creates a configuration for `archetype` from `nodes`.
    pub fn for_archetype<I>(
        graph: &Graph,
        archetype: ArchetypeIndex,
        nodes: I,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        Self::new(graph, graph.root(archetype), nodes)
    }

    /// Returns the root this configuration is anchored at.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Returns the number of allocated nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: the root is allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `node` is allocated.
    #[inline]
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.allocated.contains(node.get())
    }

    /// Iterates over allocated nodes in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.allocated.ones().map(NodeIndex::new)
    }

    /// Returns the underlying membership bitset.
    #[inline]
    pub fn as_bitset(&self) -> &FixedBitSet {
        &self.allocated
    }

    /// Returns `true` if this configuration is connected to its root in `graph`.
    #[inline]
    pub fn is_valid(&self, graph: &Graph) -> bool {
        is_connected(graph, self.root, &self.allocated)
    }

    /// Returns a copy with `node` allocated.
    pub fn with_added(&self, node: NodeIndex) -> Self {
        debug_assert!(
            !self.contains(node),
            "called `Configuration::with_added` with already allocated node {}",
            node
        );
        let mut next = self.clone();
        next.allocated.grow(node.get() + 1);
        next.allocated.insert(node.get());
        next.len += 1;
        next
    }

    /// Returns a copy with `node` deallocated.
    pub fn with_removed(&self, node: NodeIndex) -> Self {
        debug_assert!(
            self.contains(node) && node != self.root,
            "called `Configuration::with_removed` with unallocated or root node {}",
            node
        );
        let mut next = self.clone();
        next.allocated.set(node.get(), false);
        next.len -= 1;
        next
    }

    /// Returns a copy with `removed` deallocated and `added` allocated.
    pub fn with_swapped(&self, removed: NodeIndex, added: NodeIndex) -> Self {
        debug_assert!(
            removed != added,
            "called `Configuration::with_swapped` with identical nodes {}",
            removed
        );
        self.with_removed(removed).with_added(added)
    }

    /// Returns the nodes allocated here but not in `other`, ascending.
    pub fn difference(&self, other: &Configuration) -> Vec<NodeIndex> {
        self.allocated
            .ones()
            .filter(|&i| !other.allocated.contains(i))
            .map(NodeIndex::new)
            .collect()
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("root", &self.root)
            .field("allocated", &self.iter().map(|n| n.get()).collect::<Vec<_>>())
            .finish()
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration(root: {}, nodes: {})", self.root, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeTier};
    use crate::index::NodeId;

    // root(0) - 1 - 2 - 3, plus a second archetype rooted at 4 hanging off 3.
    fn line() -> Graph {
        let mut b = GraphBuilder::new();
        for i in 0..5 {
            b.add_node(NodeId(i), NodeTier::Minor).unwrap();
        }
        b.add_edge(NodeId(0), NodeId(1)).unwrap();
        b.add_edge(NodeId(1), NodeId(2)).unwrap();
        b.add_edge(NodeId(2), NodeId(3)).unwrap();
        b.add_edge(NodeId(3), NodeId(4)).unwrap();
        b.add_archetype("first", NodeId(0)).unwrap();
        b.add_archetype("second", NodeId(4)).unwrap();
        b.build().unwrap()
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_root_only_contains_just_the_root() {
        let g = line();
        let c = Configuration::root_only(&g, n(0)).unwrap();
        assert_eq!(c.len(), 1);
        assert!(c.contains(n(0)));
        assert!(!c.is_empty());
        assert!(c.is_valid(&g));
    }

    #[test]
    fn test_new_inserts_root_and_validates_connectivity() {
        let g = line();
        let c = Configuration::new(&g, n(0), [n(1), n(2)]).unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![n(0), n(1), n(2)]);

        assert_eq!(
            Configuration::new(&g, n(0), [n(2)]),
            Err(ConfigurationError::Disconnected(n(0)))
        );
        assert_eq!(
            Configuration::new(&g, n(0), [n(9)]),
            Err(ConfigurationError::UnknownNode(n(9)))
        );
        assert_eq!(
            Configuration::root_only(&g, n(2)),
            Err(ConfigurationError::NotARoot(n(2)))
        );
    }

    #[test]
    fn test_for_archetype_uses_archetype_root() {
        let g = line();
        let second = g.archetype_by_name("second").unwrap();
        let c = Configuration::for_archetype(&g, second, [n(3)]).unwrap();
        assert_eq!(c.root(), n(4));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_mutators_return_new_values() {
        let g = line();
        let base = Configuration::new(&g, n(0), [n(1)]).unwrap();

        let added = base.with_added(n(2));
        assert_eq!(base.len(), 2);
        assert_eq!(added.len(), 3);
        assert!(added.contains(n(2)));
        assert!(added.is_valid(&g));

        let removed = added.with_removed(n(2));
        assert_eq!(removed, base);

        // Mutators do not validate; a swap that strands a node is detectable.
        let swapped = added.with_swapped(n(1), n(3));
        assert_eq!(swapped.len(), 3);
        assert!(swapped.contains(n(3)) && !swapped.contains(n(1)));
        assert!(!swapped.is_valid(&g));
    }

    #[test]
    fn test_difference_lists_nodes_missing_from_other() {
        let g = line();
        let a = Configuration::new(&g, n(0), [n(1), n(2)]).unwrap();
        let b = Configuration::root_only(&g, n(0)).unwrap();
        assert_eq!(a.difference(&b), vec![n(1), n(2)]);
        assert!(b.difference(&a).is_empty());
    }

    #[test]
    fn test_equal_configurations_hash_equally() {
        use std::collections::HashSet;
        let g = line();
        let a = Configuration::new(&g, n(0), [n(1)]).unwrap();
        let b = Configuration::root_only(&g, n(0)).unwrap().with_added(n(1));
        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }
}
