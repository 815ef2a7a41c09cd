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

//! Graph loader for skill-tree data.
//!
//! Turns a line-oriented text description into a validated `Graph`. Every
//! line holds one directive; `#` starts a comment that runs to the end of the
//! line, and blank lines are ignored:
//!
//! ```text
//! node <id> [minor|notable|keystone]   # tier defaults to minor
//! edge <id> <id>                       # undirected
//! root <archetype> <id>                # one root per archetype
//! ```
//!
//! Directives may appear in any order; nodes are declared first, then edges,
//! then roots, so an edge may mention a node that is declared further down.
//! Every error carries the 1-based line number of the offending directive.
//! With `fail_on_orphans` enabled the loader also rejects graphs that contain
//! nodes no archetype root can ever reach.

use crate::{
    connectivity::ConnectivityValidator,
    graph::{Graph, GraphBuilder, GraphError, NodeTier, ParseTierError},
    index::{NodeId, NodeIndex},
};
use fixedbitset::FixedBitSet;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use thiserror::Error;

/// The error type for the graph loading process.
#[derive(Debug, Error)]
pub enum GraphLoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: expected {expected}")]
    MissingToken { line: usize, expected: &'static str },
    #[error("line {line}: unexpected trailing token `{token}`")]
    TrailingToken { line: usize, token: String },
    #[error("line {line}: could not parse `{token}` as a node id")]
    InvalidId { line: usize, token: String },
    #[error("line {line}: {source}")]
    Tier {
        line: usize,
        #[source]
        source: ParseTierError,
    },
    #[error("line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },
    #[error("invalid graph: {0}")]
    Build(#[from] GraphError),
    #[error("node {0} cannot be reached from any archetype root")]
    Orphan(NodeId),
}

#[derive(Debug)]
enum Directive {
    Node(NodeId, NodeTier),
    Edge(NodeId, NodeId),
    Root(String, NodeId),
}

/// A configurable loader for skill-tree graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLoader {
    fail_on_orphans: bool,
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self {
            fail_on_orphans: true,
        }
    }
}

impl GraphLoader {
    /// Creates a new `GraphLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether nodes unreachable from every root are an error.
    #[inline]
    pub fn fail_on_orphans(mut self, yes: bool) -> Self {
        self.fail_on_orphans = yes;
        self
    }

    /// Loads a graph from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Graph, GraphLoaderError> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut roots = Vec::new();

        for (i, line) in rdr.lines().enumerate() {
            let line_no = i + 1;
            let line = line?;
            if let Some(directive) = parse_line(&line, line_no)? {
                match directive {
                    d @ Directive::Node(..) => nodes.push((line_no, d)),
                    d @ Directive::Edge(..) => edges.push((line_no, d)),
                    d @ Directive::Root(..) => roots.push((line_no, d)),
                }
            }
        }

        let mut builder = GraphBuilder::with_capacity(nodes.len());
        for (line, directive) in nodes.into_iter().chain(edges).chain(roots) {
            let result = match directive {
                Directive::Node(id, tier) => builder.add_node(id, tier).map(|_| ()),
                Directive::Edge(a, b) => builder.add_edge(a, b).map(|_| ()),
                Directive::Root(name, id) => builder.add_archetype(name, id).map(|_| ()),
            };
            result.map_err(|source| GraphLoaderError::Graph { line, source })?;
        }

        let graph = builder.build()?;
        if self.fail_on_orphans {
            check_orphans(&graph)?;
        }
        Ok(graph)
    }

    /// Loads a graph from a file path.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Graph, GraphLoaderError> {
        let f = File::open(path)?;
        self.from_bufread(BufReader::new(f))
    }

    /// Loads a graph from any reader.
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Graph, GraphLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a graph from a string slice.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<Graph, GraphLoaderError> {
        self.from_bufread(s.as_bytes())
    }
}

fn parse_id(token: Option<&str>, line: usize, expected: &'static str) -> Result<NodeId, GraphLoaderError> {
    let token = token.ok_or(GraphLoaderError::MissingToken { line, expected })?;
    token
        .parse::<u32>()
        .map(NodeId)
        .map_err(|_| GraphLoaderError::InvalidId {
            line,
            token: token.to_string(),
        })
}

fn parse_line(raw: &str, line: usize) -> Result<Option<Directive>, GraphLoaderError> {
    let content = raw.split('#').next().unwrap_or("");
    let mut tokens = content.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let directive = match keyword {
        "node" => {
            let id = parse_id(tokens.next(), line, "a node id")?;
            let tier = match tokens.next() {
                Some(t) => t
                    .parse::<NodeTier>()
                    .map_err(|source| GraphLoaderError::Tier { line, source })?,
                None => NodeTier::Minor,
            };
            Directive::Node(id, tier)
        }
        "edge" => {
            let a = parse_id(tokens.next(), line, "two node ids")?;
            let b = parse_id(tokens.next(), line, "two node ids")?;
            Directive::Edge(a, b)
        }
        "root" => {
            let name = tokens.next().ok_or(GraphLoaderError::MissingToken {
                line,
                expected: "an archetype name",
            })?;
            let id = parse_id(tokens.next(), line, "a root node id")?;
            Directive::Root(name.to_string(), id)
        }
        other => {
            return Err(GraphLoaderError::UnknownDirective {
                line,
                directive: other.to_string(),
            });
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(GraphLoaderError::TrailingToken {
            line,
            token: extra.to_string(),
        });
    }
    Ok(Some(directive))
}

fn check_orphans(graph: &Graph) -> Result<(), GraphLoaderError> {
    let n = graph.num_nodes();
    let mut everything = FixedBitSet::with_capacity(n);
    everything.insert_range(..);

    let mut validator = ConnectivityValidator::new(n);
    let mut reachable = FixedBitSet::with_capacity(n);
    for a in 0..graph.num_archetypes() {
        let root = graph.root(crate::index::ArchetypeIndex::new(a));
        if validator.is_connected(graph, root, &everything) {
            return Ok(());
        }
        reachable.union_with(validator.reached());
    }

    match (0..n).find(|&i| !reachable.contains(i)) {
        Some(i) => Err(GraphLoaderError::Orphan(graph.node_id(NodeIndex::new(i)))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_TREE: &str = r#"
        # two archetypes sharing a notable
        node 100            # scion start
        node 200
        node 1 notable
        node 2 keystone
        edge 100 1
        edge 1 200
        edge 1 2
        root scion 100
        root witch 200
    "#;

    #[test]
    fn test_loads_nodes_edges_and_roots() {
        let g = GraphLoader::new().from_str(SMALL_TREE).expect("failed to load");
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.num_archetypes(), 2);

        let scion = g.archetype_by_name("scion").unwrap();
        assert_eq!(g.node_id(g.root(scion)), NodeId(100));
        let keystone = g.index_of(NodeId(2)).unwrap();
        assert_eq!(g.tier(keystone), NodeTier::Keystone);
        assert_eq!(g.tier(g.index_of(NodeId(200)).unwrap()), NodeTier::Minor);
    }

    #[test]
    fn test_edges_may_precede_node_declarations() {
        let data = "edge 1 2\nroot a 1\nnode 1\nnode 2\n";
        let g = GraphLoader::new().from_str(data).unwrap();
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        match GraphLoader::new().from_str("node 1\nnode x\n") {
            Err(GraphLoaderError::InvalidId { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("expected InvalidId, got {:?}", other),
        }

        match GraphLoader::new().from_str("node 1\n\nnode 2 mastery\n") {
            Err(GraphLoaderError::Tier { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Tier, got {:?}", other),
        }

        match GraphLoader::new().from_str("node 1\nedge 1 9\nroot a 1\n") {
            Err(GraphLoaderError::Graph { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, GraphError::UnknownNode(NodeId(9)));
            }
            other => panic!("expected Graph, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_directives() {
        assert!(matches!(
            GraphLoader::new().from_str("vertex 1"),
            Err(GraphLoaderError::UnknownDirective { line: 1, .. })
        ));
        assert!(matches!(
            GraphLoader::new().from_str("edge 1"),
            Err(GraphLoaderError::MissingToken { line: 1, .. })
        ));
        assert!(matches!(
            GraphLoader::new().from_str("node 1 minor extra"),
            Err(GraphLoaderError::TrailingToken { line: 1, .. })
        ));
        assert!(matches!(
            GraphLoader::new().from_str("node 1"),
            Err(GraphLoaderError::Build(GraphError::NoArchetypes))
        ));
    }

    #[test]
    fn test_fail_on_orphans() {
        let data = "node 1\nnode 2\nnode 3\nedge 1 2\nroot a 1\n";
        match GraphLoader::new().from_str(data) {
            Err(GraphLoaderError::Orphan(id)) => assert_eq!(id, NodeId(3)),
            other => panic!("expected Orphan, got {:?}", other),
        }
        let g = GraphLoader::new().fail_on_orphans(false).from_str(data).unwrap();
        assert_eq!(g.num_nodes(), 3);
    }

    #[test]
    fn test_from_reader_matches_from_str() {
        let a = GraphLoader::new().from_str(SMALL_TREE).unwrap();
        let b = GraphLoader::new().from_reader(SMALL_TREE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }
}
