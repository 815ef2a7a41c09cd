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

//! # Keystone Model
//!
//! **The domain model for budgeted skill-tree optimization.**
//!
//! This crate defines the immutable graph a search runs over and the
//! configurations it moves between. It is the data layer shared by every
//! concurrent search run: nothing here is mutated after loading.
//!
//! ## Modules
//!
//! * **`index`**: Strongly typed `NodeIndex`, `NodeId` and `ArchetypeIndex`.
//! * **`graph`**: The CSR-backed `Graph` with node tiers and archetype roots,
//!   plus its validating `GraphBuilder`.
//! * **`configuration`**: The `Configuration` value type, a connected set of
//!   allocated nodes anchored at its root.
//! * **`connectivity`**: Reachability checks and cut-vertex analysis on
//!   allocated subgraphs.
//! * **`loading`**: A text loader producing a `Graph` from directive lines.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: dense indices and external ids are distinct types.
//! 2.  **Memory Layout**: adjacency is flattened into one contiguous block and
//!     membership is a bitset, keeping traversals cache friendly.
//! 3.  **Fail-Fast**: builders and constructors validate eagerly, so the
//!     search never starts from a disconnected configuration.

pub mod configuration;
pub mod connectivity;
pub mod graph;
pub mod index;
pub mod loading;
