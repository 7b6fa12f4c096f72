// SPDX-License-Identifier: Apache-2.0

//! Occurrence states: connected induced sub-DAGs grown downward from a root.
//!
//! A state is a value; `expand` never mutates it and instead returns the
//! successor. Growth follows a fixed exclusion discipline so that every
//! vertex set reachable from a root is produced exactly once: choosing the
//! frontier entry at index `i` permanently excludes the entries before it
//! from the resulting branch.

mod frontier;
mod multi_output;
mod single_output;

pub use frontier::Frontier;
pub use multi_output::MultiOutputState;
pub use single_output::SingleOutputState;

use crate::graph::{Graph, NodeId};

pub trait OccurrenceState: Clone + Send + Sync + std::fmt::Debug {
    /// Singleton occurrence `{root}`.
    fn initial(graph: &Graph, root: NodeId) -> Self;

    fn frontier(&self) -> &Frontier;

    /// Grows the occurrence by `expandable()[index]`.
    fn expand(&self, graph: &Graph, index: usize) -> Self;

    /// Whether the occurrence can currently be accepted as a pattern instance.
    fn is_valid(&self) -> bool;

    fn output_count(&self) -> usize;

    fn root(&self) -> NodeId {
        self.frontier().root()
    }

    fn vertices(&self) -> &[NodeId] {
        self.frontier().vertices()
    }

    fn expandable(&self) -> &[NodeId] {
        self.frontier().expandable()
    }

    fn unexpandable(&self) -> &[NodeId] {
        self.frontier().unexpandable()
    }

    fn size(&self) -> usize {
        self.vertices().len()
    }

    fn input_count(&self) -> usize {
        self.frontier().input_count()
    }

    fn port_count(&self) -> usize {
        self.input_count() + self.output_count()
    }
}

/// First consumer of `node` that lies outside the occurrence.
pub(crate) fn external_parent(graph: &Graph, frontier: &Frontier, node: NodeId) -> Option<NodeId> {
    graph
        .parents(node)
        .iter()
        .copied()
        .find(|&p| !frontier.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_circuit;
    use pretty_assertions::assert_eq;

    /// Collects the vertex sets of every state reachable from `root`.
    fn all_vertex_sets<S: OccurrenceState>(graph: &Graph, root: NodeId) -> Vec<Vec<NodeId>> {
        let mut sets = Vec::new();
        let mut worklist = vec![S::initial(graph, root)];
        while let Some(state) = worklist.pop() {
            sets.push(state.vertices().to_vec());
            for i in 0..state.expandable().len() {
                worklist.push(state.expand(graph, i));
            }
        }
        sets.sort();
        sets
    }

    #[test]
    fn test_growth_from_root_is_duplicate_free() {
        let sample = sample_circuit();
        let sets = all_vertex_sets::<SingleOutputState>(&sample.graph, sample.prod_top);
        let p7 = sample.prod_top;
        let p6 = sample.prod_mid;
        let (s4, s5) = (sample.sum_left, sample.sum_right);
        assert_eq!(
            sets,
            vec![
                vec![s4, s5, p6, p7],
                vec![s4, p6, p7],
                vec![s5, p6, p7],
                vec![p6, p7],
                vec![p7],
            ]
        );
    }

    #[test]
    fn test_multi_and_single_output_share_growth() {
        let sample = sample_circuit();
        for root in sample.graph.operation_nodes() {
            assert_eq!(
                all_vertex_sets::<SingleOutputState>(&sample.graph, root),
                all_vertex_sets::<MultiOutputState>(&sample.graph, root)
            );
        }
    }
}
