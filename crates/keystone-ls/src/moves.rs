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

//! Single-step mutations of a configuration.
//!
//! A `Move` is one of three tagged variants together with the budget it
//! consumes: allocating a frontier node (`Add`, one free unit), deallocating a
//! removable node (`Remove`, one limited unit), or doing both at once (`Swap`,
//! one limited unit). Moves are small `Copy` values; applying one produces a
//! new `Configuration` and leaves the source untouched.

use keystone_model::{
    configuration::Configuration,
    graph::Graph,
    index::NodeIndex,
};

/// The structural part of a move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveKind {
    Add { node: NodeIndex },
    Remove { node: NodeIndex },
    Swap { removed: NodeIndex, added: NodeIndex },
}

/// A candidate mutation and its budget cost.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    kind: MoveKind,
    free_cost: u32,
    limited_cost: u32,
}

impl Move {
    /// Allocates `node`, paid from the free budget.
    #[inline]
    pub const fn add(node: NodeIndex) -> Self {
        Self {
            kind: MoveKind::Add { node },
            free_cost: 1,
            limited_cost: 0,
        }
    }

    /// Deallocates `node`, paid from the limited budget.
    #[inline]
    pub const fn remove(node: NodeIndex) -> Self {
        Self {
            kind: MoveKind::Remove { node },
            free_cost: 0,
            limited_cost: 1,
        }
    }

    /// Deallocates `removed` and allocates `added`, paid from the limited budget.
    #[inline]
    pub const fn swap(removed: NodeIndex, added: NodeIndex) -> Self {
        Self {
            kind: MoveKind::Swap { removed, added },
            free_cost: 0,
            limited_cost: 1,
        }
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn free_cost(&self) -> u32 {
        self.free_cost
    }

    #[inline]
    pub fn limited_cost(&self) -> u32 {
        self.limited_cost
    }

    /// Returns `true` if this move spends limited budget.
    #[inline]
    pub fn consumes_limited(&self) -> bool {
        self.limited_cost > 0
    }

    /// Returns the node this move allocates, if any.
    #[inline]
    pub fn added(&self) -> Option<NodeIndex> {
        match self.kind {
            MoveKind::Add { node } => Some(node),
            MoveKind::Swap { added, .. } => Some(added),
            MoveKind::Remove { .. } => None,
        }
    }

    /// Returns the node this move deallocates, if any.
    #[inline]
    pub fn removed(&self) -> Option<NodeIndex> {
        match self.kind {
            MoveKind::Remove { node } => Some(node),
            MoveKind::Swap { removed, .. } => Some(removed),
            MoveKind::Add { .. } => None,
        }
    }

    /// Applies this move to `configuration`, returning the result.
    pub fn apply(&self, configuration: &Configuration) -> Configuration {
        match self.kind {
            MoveKind::Add { node } => configuration.with_added(node),
            MoveKind::Remove { node } => configuration.with_removed(node),
            MoveKind::Swap { removed, added } => configuration.with_swapped(removed, added),
        }
    }

    /// Tier gain used for prioritization: the tier rank gained by the added
    /// node minus the rank lost with the removed node.
    #[inline]
    pub fn tier_gain(&self, graph: &Graph) -> i16 {
        let gained = self.added().map_or(0, |n| graph.tier(n).rank() as i16);
        let lost = self.removed().map_or(0, |n| graph.tier(n).rank() as i16);
        gained - lost
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MoveKind::Add { node } => write!(f, "Add({})", node.get()),
            MoveKind::Remove { node } => write!(f, "Remove({})", node.get()),
            MoveKind::Swap { removed, added } => {
                write!(f, "Swap({} -> {})", removed.get(), added.get())
            }
        }
    }
}
