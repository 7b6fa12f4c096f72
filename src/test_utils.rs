// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests, integration tests and benchmarks.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::graph::{Graph, GraphBuilder, Label, NodeId};

/// Two SUM and two PRODUCT nodes over four inputs:
///
/// ```text
/// sum_left  = SUM(l0, l1)        sum_right = SUM(l2, l3)
/// prod_mid  = PRODUCT(sum_left, sum_right)
/// prod_top  = PRODUCT(prod_mid, l0)
/// ```
pub struct SampleCircuit {
    pub graph: Graph,
    pub leaves: [NodeId; 4],
    pub sum_left: NodeId,
    pub sum_right: NodeId,
    pub prod_mid: NodeId,
    pub prod_top: NodeId,
}

pub fn sample_circuit() -> SampleCircuit {
    let mut b = GraphBuilder::with_capacity(8);
    let leaves = [b.add_input(), b.add_input(), b.add_input(), b.add_input()];
    let sum_left = b.add_node(Label::Sum, &[leaves[0], leaves[1]]).unwrap();
    let sum_right = b.add_node(Label::Sum, &[leaves[2], leaves[3]]).unwrap();
    let prod_mid = b.add_node(Label::Product, &[sum_left, sum_right]).unwrap();
    let prod_top = b.add_node(Label::Product, &[prod_mid, leaves[0]]).unwrap();
    SampleCircuit {
        graph: b.finish_build().unwrap(),
        leaves,
        sum_left,
        sum_right,
        prod_mid,
        prod_top,
    }
}

/// One occurrence to canonicalize.
pub struct OccurrenceFixture {
    pub name: &'static str,
    pub graph: Graph,
    pub root: NodeId,
    /// Sorted.
    pub vertices: Vec<NodeId>,
}

fn fixture(
    name: &'static str,
    b: GraphBuilder,
    root: NodeId,
    vertices: &[NodeId],
) -> OccurrenceFixture {
    let mut vertices = vertices.to_vec();
    vertices.sort_unstable();
    OccurrenceFixture {
        name,
        graph: b.finish_build().unwrap(),
        root,
        vertices,
    }
}

/// Inputs 0..=3, node 4 = SUM(node 5, leaf 1), node 5 = PRODUCT(leaf 1,
/// leaf 2); the occurrence `{4, 5}` shares leaf 1.
pub fn shared_leaf_scenario() -> OccurrenceFixture {
    let mut b = GraphBuilder::new();
    for id in 0..4 {
        b.add_vertex(id, Label::Input).unwrap();
    }
    b.add_vertex(4, Label::Sum).unwrap();
    b.add_vertex(5, Label::Product).unwrap();
    b.add_edge(5, 4).unwrap();
    b.add_edge(1, 4).unwrap();
    b.add_edge(1, 5).unwrap();
    b.add_edge(2, 5).unwrap();
    fixture("shared_leaf_scenario", b, 4, &[4, 5])
}

/// Hand-built occurrences of sizes 1 through 8, covering shared inputs,
/// reconvergence and automorphic subtrees.
pub fn labeling_battery() -> Vec<OccurrenceFixture> {
    let mut out = Vec::new();

    {
        let mut b = GraphBuilder::new();
        let x = b.add_input();
        let y = b.add_input();
        let s = b.add_node(Label::Sum, &[x, y]).unwrap();
        out.push(fixture("singleton", b, s, &[s]));
    }

    out.push(shared_leaf_scenario());

    {
        let mut b = GraphBuilder::new();
        let x = b.add_input();
        let y = b.add_input();
        let s1 = b.add_node(Label::Sum, &[x, y]).unwrap();
        let s2 = b.add_node(Label::Sum, &[x, y]).unwrap();
        let p = b.add_node(Label::Product, &[s1, s2]).unwrap();
        out.push(fixture("twin_sums", b, p, &[s1, s2, p]));
    }

    for partial in [false, true] {
        let mut b = GraphBuilder::new();
        let x = b.add_input();
        let y = b.add_input();
        let c = b.add_node(Label::Sum, &[x, y]).unwrap();
        let l = b.add_node(Label::Product, &[c, x]).unwrap();
        let r = b.add_node(Label::Product, &[c, y]).unwrap();
        let top = b.add_node(Label::Sum, &[l, r]).unwrap();
        if partial {
            out.push(fixture("diamond_without_base", b, top, &[l, r, top]));
        } else {
            out.push(fixture("diamond", b, top, &[c, l, r, top]));
        }
    }

    {
        let mut b = GraphBuilder::new();
        let x = b.add_input();
        let ys = [b.add_input(), b.add_input(), b.add_input()];
        let ps: Vec<NodeId> = ys
            .iter()
            .map(|&y| b.add_node(Label::Product, &[x, y]).unwrap())
            .collect();
        let r = b.add_node(Label::Sum, &ps).unwrap();
        let mut vertices = ps.clone();
        vertices.push(r);
        out.push(fixture("fan_of_three", b, r, &vertices));
    }

    {
        let mut b = GraphBuilder::new();
        let xs = [b.add_input(), b.add_input(), b.add_input()];
        let n1 = b.add_node(Label::Sum, &[xs[0], xs[1]]).unwrap();
        let n2 = b.add_node(Label::Product, &[n1, xs[2]]).unwrap();
        let n3 = b.add_node(Label::Sum, &[n2, xs[0]]).unwrap();
        let n4 = b.add_node(Label::Product, &[n3, xs[1]]).unwrap();
        let n5 = b.add_node(Label::Sum, &[n4, xs[2]]).unwrap();
        out.push(fixture("chain_of_five", b, n5, &[n1, n2, n3, n4, n5]));
    }

    {
        // s1 and s2 each feed two consumers inside the occurrence.
        let mut b = GraphBuilder::new();
        let [x, y, z] = [b.add_input(), b.add_input(), b.add_input()];
        let s1 = b.add_node(Label::Sum, &[x, y]).unwrap();
        let s2 = b.add_node(Label::Sum, &[y, z]).unwrap();
        let p1 = b.add_node(Label::Product, &[s1, s2]).unwrap();
        let p2 = b.add_node(Label::Product, &[s1, x]).unwrap();
        let s3 = b.add_node(Label::Sum, &[s2, z]).unwrap();
        let r = b.add_node(Label::Sum, &[p1, p2, s3]).unwrap();
        out.push(fixture("shared_pair_tree", b, r, &[s1, s2, p1, p2, s3, r]));
    }

    {
        let mut b = GraphBuilder::new();
        let [a, c, d, e] = [b.add_input(), b.add_input(), b.add_input(), b.add_input()];
        let s1 = b.add_node(Label::Sum, &[a, c]).unwrap();
        let s2 = b.add_node(Label::Sum, &[d, e]).unwrap();
        let s3 = b.add_node(Label::Sum, &[a, d]).unwrap();
        let s4 = b.add_node(Label::Sum, &[c, e]).unwrap();
        let p1 = b.add_node(Label::Product, &[s1, s2]).unwrap();
        let p2 = b.add_node(Label::Product, &[s3, s4]).unwrap();
        let r = b.add_node(Label::Sum, &[p1, p2]).unwrap();
        out.push(fixture("crossed_tree", b, r, &[s1, s2, s3, s4, p1, p2, r]));
    }

    {
        let mut b = GraphBuilder::new();
        let x0 = b.add_input();
        let x1 = b.add_input();
        let mut prev = b.add_node(Label::Sum, &[x0, x1]).unwrap();
        let mut cur = b.add_node(Label::Product, &[prev, x1]).unwrap();
        let mut vertices = vec![prev, cur];
        for i in 0..6 {
            let label = if i % 2 == 0 { Label::Sum } else { Label::Product };
            let next = b.add_node(label, &[prev, cur]).unwrap();
            vertices.push(next);
            prev = cur;
            cur = next;
        }
        out.push(fixture("ladder_of_eight", b, cur, &vertices));
    }

    out
}

/// Random circuit with `inputs` leaves followed by `operations` SUM/PRODUCT
/// nodes, each consuming between 2 and `max_fanin` distinct earlier nodes.
pub fn random_circuit(seed: u64, inputs: usize, operations: usize, max_fanin: usize) -> Graph {
    assert!(inputs >= 2 && max_fanin >= 2);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut b = GraphBuilder::with_capacity(inputs + operations);
    for _ in 0..inputs {
        b.add_input();
    }
    for _ in 0..operations {
        let available = b.node_count();
        let fanin = rng.gen_range(2..=max_fanin).min(available);
        let operands = rand::seq::index::sample(&mut rng, available, fanin).into_vec();
        let label = if rng.gen_bool(0.5) {
            Label::Sum
        } else {
            Label::Product
        };
        b.add_node(label, &operands).unwrap();
    }
    b.finish_build().unwrap()
}

pub fn random_permutation(seed: u64, len: usize) -> Vec<NodeId> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut perm: Vec<NodeId> = (0..len).collect();
    perm.shuffle(&mut rng);
    perm
}

/// Copies `graph` with node `v` renamed to `permutation[v]`.
pub fn relabel(graph: &Graph, permutation: &[NodeId]) -> Graph {
    assert_eq!(permutation.len(), graph.node_count());
    let mut b = GraphBuilder::with_capacity(graph.node_count());
    for v in 0..graph.node_count() {
        b.add_vertex(permutation[v], graph.label(v)).unwrap();
    }
    for v in 0..graph.node_count() {
        for &child in graph.children(v) {
            b.add_edge(permutation[child], permutation[v]).unwrap();
        }
    }
    b.finish_build().unwrap()
}
