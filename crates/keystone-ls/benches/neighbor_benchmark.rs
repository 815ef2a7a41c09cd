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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use keystone_ls::{
    budget::{BudgetState, LimitedBudget},
    neighborhood::NeighborGenerator,
};
use keystone_model::{
    configuration::Configuration,
    connectivity::ConnectivityValidator,
    graph::{Graph, GraphBuilder, NodeTier},
    index::{NodeId, NodeIndex},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::hint::black_box;

const NUM_NODES: u32 = 1500;

/// A random tree of skill-tree size with a few cycles, rooted at node 0.
fn synthetic_tree(seed: u64) -> Graph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = GraphBuilder::with_capacity(NUM_NODES as usize);
    for i in 0..NUM_NODES {
        let tier = match rng.random_range(0..20) {
            0 => NodeTier::Keystone,
            1..=4 => NodeTier::Notable,
            _ => NodeTier::Minor,
        };
        b.add_node(NodeId(i), tier).unwrap();
    }
    for i in 1..NUM_NODES {
        // Parents close by keep the tree deep, like a real passive tree.
        let parent = i.saturating_sub(rng.random_range(1..=8));
        b.add_edge(NodeId(parent), NodeId(i)).unwrap();
    }
    for _ in 0..NUM_NODES / 20 {
        let a = rng.random_range(0..NUM_NODES);
        let c = rng.random_range(0..NUM_NODES);
        if a != c {
            b.add_edge(NodeId(a), NodeId(c)).unwrap();
        }
    }
    b.add_archetype("synthetic", NodeId(0)).unwrap();
    b.build().unwrap()
}

/// The first `size` nodes reached breadth-first from the root.
fn bfs_configuration(graph: &Graph, size: usize) -> Configuration {
    let root = NodeIndex::new(0);
    let mut seen = vec![false; graph.num_nodes()];
    let mut order = Vec::with_capacity(size);
    let mut queue = VecDeque::from([root]);
    seen[0] = true;
    while let Some(node) = queue.pop_front() {
        if order.len() == size {
            break;
        }
        order.push(node);
        for &next in graph.neighbors(node) {
            if !seen[next.get()] {
                seen[next.get()] = true;
                queue.push_back(next);
            }
        }
    }
    Configuration::new(graph, root, order).unwrap()
}

fn bench_neighbor_generation(c: &mut Criterion) {
    let graph = synthetic_tree(1337);
    let mut group = c.benchmark_group("neighbor_generation");

    for size in [25usize, 100, 400] {
        let configuration = bfs_configuration(&graph, size);
        let mut generator = NeighborGenerator::preallocated(128, graph.num_nodes());
        let mut out = Vec::with_capacity(128);

        group.throughput(Throughput::Elements(size as u64));

        let free = BudgetState::new(10, LimitedBudget::Unbounded);
        group.bench_with_input(BenchmarkId::new("free", size), &size, |b, _| {
            b.iter(|| {
                generator.generate(black_box(&graph), black_box(&configuration), &free, &mut out);
                black_box(out.len())
            })
        });

        let limited = BudgetState::new(0, LimitedBudget::Bounded(10));
        group.bench_with_input(BenchmarkId::new("limited", size), &size, |b, _| {
            b.iter(|| {
                generator.generate(black_box(&graph), black_box(&configuration), &limited, &mut out);
                black_box(out.len())
            })
        });
    }
    group.finish();
}

fn bench_connectivity(c: &mut Criterion) {
    let graph = synthetic_tree(1337);
    let configuration = bfs_configuration(&graph, 400);
    let mut validator = ConnectivityValidator::new(graph.num_nodes());
    let root = configuration.root();

    c.bench_function("is_connected_400", |b| {
        b.iter(|| validator.is_connected(black_box(&graph), root, configuration.as_bitset()))
    });
    c.bench_function("cut_vertices_400", |b| {
        b.iter(|| {
            validator
                .cut_vertices(black_box(&graph), root, configuration.as_bitset())
                .count_ones(..)
        })
    });
}

criterion_group!(benches, bench_neighbor_generation, bench_connectivity);
criterion_main!(benches);
