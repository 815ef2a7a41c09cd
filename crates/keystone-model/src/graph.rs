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

//! Immutable skill-tree graph.
//!
//! The `Graph` is built once from the data source and then shared read-only by
//! every search run, so it is laid out for the solving phase: adjacency lists
//! are flattened into a single compressed sparse row (CSR) block with a
//! sentinel offsets array, tiers and external ids live in parallel vectors, and
//! the set of archetype roots is kept as a bitset for constant-time checks.
//!
//! Construction goes through `GraphBuilder`, which validates caller data
//! eagerly (duplicate ids, dangling edges, self loops, unknown roots) and
//! collapses duplicate edges. Edges are undirected. Every neighbor list is
//! sorted ascending by `NodeIndex`, which keeps all traversals and move
//! generation deterministic.

use crate::index::{ArchetypeIndex, NodeId, NodeIndex};
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

/// The value tier of a node.
///
/// Tiers only steer move prioritization; the actual worth of a node is decided
/// by the evaluation oracle. The ordering is meaningful: `Keystone > Notable > Minor`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum NodeTier {
    #[default]
    Minor,
    Notable,
    Keystone,
}

impl NodeTier {
    /// Returns the tier as a small integer rank, higher is more valuable.
    #[inline(always)]
    pub const fn rank(self) -> u8 {
        match self {
            NodeTier::Minor => 0,
            NodeTier::Notable => 1,
            NodeTier::Keystone => 2,
        }
    }
}

impl std::fmt::Display for NodeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeTier::Minor => write!(f, "minor"),
            NodeTier::Notable => write!(f, "notable"),
            NodeTier::Keystone => write!(f, "keystone"),
        }
    }
}

/// Error returned when a string does not name a known `NodeTier`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown node tier `{0}`, expected one of: minor, notable, keystone")]
pub struct ParseTierError(pub String);

impl std::str::FromStr for NodeTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minor" => Ok(NodeTier::Minor),
            "notable" => Ok(NodeTier::Notable),
            "keystone" => Ok(NodeTier::Keystone),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

/// Errors raised while assembling a `Graph`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} was declared more than once")]
    DuplicateNode(NodeId),
    #[error("edge references unknown node {0}")]
    UnknownNode(NodeId),
    #[error("node {0} cannot be connected to itself")]
    SelfLoop(NodeId),
    #[error("archetype `{0}` was declared more than once")]
    DuplicateArchetype(String),
    #[error("graph has no nodes")]
    Empty,
    #[error("graph declares no archetype roots")]
    NoArchetypes,
}

/// A read-only view of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    pub index: NodeIndex,
    pub id: NodeId,
    pub tier: NodeTier,
    pub neighbors: &'a [NodeIndex],
}

/// The immutable skill-tree graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    ids: Vec<NodeId>,
    tiers: Vec<NodeTier>,
    // Flattened adjacency lists. The neighbors of node `i` are
    // `neighbors[offsets[i]..offsets[i + 1]]`.
    neighbors: Vec<NodeIndex>,
    // Length `num_nodes + 1`, last element equals `neighbors.len()`.
    offsets: Vec<usize>,
    lookup: FxHashMap<NodeId, NodeIndex>,
    archetype_names: Vec<String>,
    archetype_roots: Vec<NodeIndex>,
    root_mask: FixedBitSet,
}

impl Graph {
    /// Returns the number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.ids.len()
    }

    /// Returns the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Returns the number of archetypes.
    #[inline]
    pub fn num_archetypes(&self) -> usize {
        self.archetype_roots.len()
    }

    /// Returns `true` if `index` addresses a node of this graph.
    #[inline]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.get() < self.num_nodes()
    }

    /// Returns the node view at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Node<'_> {
        Node {
            index,
            id: self.node_id(index),
            tier: self.tier(index),
            neighbors: self.neighbors(index),
        }
    }

    /// Iterates over all nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.num_nodes()).map(move |i| self.node(NodeIndex::new(i)))
    }

    /// Returns the external id of the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn node_id(&self, index: NodeIndex) -> NodeId {
        let i = index.get();
        assert!(
            i < self.num_nodes(),
            "called `Graph::node_id` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            i
        );
        self.ids[i]
    }

    /// Returns the tier of the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn tier(&self, index: NodeIndex) -> NodeTier {
        let i = index.get();
        assert!(
            i < self.num_nodes(),
            "called `Graph::tier` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            i
        );
        self.tiers[i]
    }

    /// Returns the sorted neighbor list of the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn neighbors(&self, index: NodeIndex) -> &[NodeIndex] {
        let i = index.get();
        assert!(
            i < self.num_nodes(),
            "called `Graph::neighbors` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            i
        );
        let start = self.offsets[i];
        let end = self.offsets[i + 1];
        debug_assert!(
            start <= end && end <= self.neighbors.len(),
            "called `Graph::neighbors` with CSR invariant violated: start {}, end {}, len {}",
            start,
            end,
            self.neighbors.len()
        );
        &self.neighbors[start..end]
    }

    /// Returns `true` if `a` and `b` share an edge.
    #[inline]
    pub fn are_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Resolves an external id to its dense index.
    #[inline]
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.lookup.get(&id).copied()
    }

    /// Returns the root node of `archetype`.
    ///
    /// # Panics
    ///
    /// Panics if `archetype` is out of bounds.
    #[inline]
    pub fn root(&self, archetype: ArchetypeIndex) -> NodeIndex {
        let a = archetype.get();
        assert!(
            a < self.num_archetypes(),
            "called `Graph::root` with archetype index out of bounds: the len is {} but the index is {}",
            self.num_archetypes(),
            a
        );
        self.archetype_roots[a]
    }

    /// Returns the name of `archetype`.
    #[inline]
    pub fn archetype_name(&self, archetype: ArchetypeIndex) -> &str {
        &self.archetype_names[archetype.get()]
    }

    /// Looks up an archetype by its name.
    pub fn archetype_by_name(&self, name: &str) -> Option<ArchetypeIndex> {
        self.archetype_names
            .iter()
            .position(|n| n == name)
            .map(ArchetypeIndex::new)
    }

    /// Returns the archetype whose root is `node`, if any.
    pub fn archetype_of_root(&self, node: NodeIndex) -> Option<ArchetypeIndex> {
        self.archetype_roots
            .iter()
            .position(|&r| r == node)
            .map(ArchetypeIndex::new)
    }

    /// Returns `true` if `node` is the root of any archetype.
    ///
    /// Roots of foreign archetypes are never allocatable.
    #[inline]
    pub fn is_root(&self, node: NodeIndex) -> bool {
        self.root_mask.contains(node.get())
    }
}

/// Mutable builder for a `Graph`.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    ids: Vec<NodeId>,
    tiers: Vec<NodeTier>,
    adjacency: Vec<SmallVec<[NodeIndex; 4]>>,
    lookup: FxHashMap<NodeId, NodeIndex>,
    archetype_names: Vec<String>,
    archetype_roots: Vec<NodeIndex>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with room for `num_nodes` nodes.
    #[inline]
    pub fn with_capacity(num_nodes: usize) -> Self {
        Self {
            ids: Vec::with_capacity(num_nodes),
            tiers: Vec::with_capacity(num_nodes),
            adjacency: Vec::with_capacity(num_nodes),
            lookup: FxHashMap::with_capacity_and_hasher(num_nodes, Default::default()),
            archetype_names: Vec::new(),
            archetype_roots: Vec::new(),
        }
    }

    /// Returns the number of nodes declared so far.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.ids.len()
    }

    /// Declares a node and returns its dense index.
    pub fn add_node(&mut self, id: NodeId, tier: NodeTier) -> Result<NodeIndex, GraphError> {
        if self.lookup.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let index = NodeIndex::new(self.ids.len());
        self.ids.push(id);
        self.tiers.push(tier);
        self.adjacency.push(SmallVec::new());
        self.lookup.insert(id, index);
        Ok(index)
    }

    /// Connects two declared nodes. Repeated edges are collapsed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<&mut Self, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let ia = self.resolve(a)?;
        let ib = self.resolve(b)?;
        if !self.adjacency[ia.get()].contains(&ib) {
            self.adjacency[ia.get()].push(ib);
            self.adjacency[ib.get()].push(ia);
        }
        Ok(self)
    }

    /// Declares `root` as the starting node of a new archetype called `name`.
    pub fn add_archetype<S>(&mut self, name: S, root: NodeId) -> Result<ArchetypeIndex, GraphError>
    where
        S: Into<String>,
    {
        let name = name.into();
        if self.archetype_names.contains(&name) {
            return Err(GraphError::DuplicateArchetype(name));
        }
        let root = self.resolve(root)?;
        self.archetype_names.push(name);
        self.archetype_roots.push(root);
        Ok(ArchetypeIndex::new(self.archetype_roots.len() - 1))
    }

    fn resolve(&self, id: NodeId) -> Result<NodeIndex, GraphError> {
        self.lookup
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Freezes the builder into a `Graph`.
    pub fn build(self) -> Result<Graph, GraphError> {
        if self.ids.is_empty() {
            return Err(GraphError::Empty);
        }
        if self.archetype_roots.is_empty() {
            return Err(GraphError::NoArchetypes);
        }

        let num_nodes = self.ids.len();
        let total: usize = self.adjacency.iter().map(|a| a.len()).sum();
        let mut neighbors = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(num_nodes + 1);
        offsets.push(0);
        for mut list in self.adjacency {
            list.sort_unstable();
            neighbors.extend_from_slice(&list);
            offsets.push(neighbors.len());
        }

        let mut root_mask = FixedBitSet::with_capacity(num_nodes);
        for root in &self.archetype_roots {
            root_mask.insert(root.get());
        }

        Ok(Graph {
            ids: self.ids,
            tiers: self.tiers,
            neighbors,
            offsets,
            lookup: self.lookup,
            archetype_names: self.archetype_names,
            archetype_roots: self.archetype_roots,
            root_mask,
        })
    }
}
