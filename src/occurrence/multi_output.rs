// SPDX-License-Identifier: Apache-2.0

use crate::graph::{Graph, NodeId, sorted_insert};
use crate::occurrence::{Frontier, OccurrenceState, external_parent};

/// Occurrence that may expose several values.
///
/// `outputs` holds the root plus every non-root vertex with a consumer
/// outside the occurrence, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiOutputState {
    frontier: Frontier,
    outputs: Vec<NodeId>,
}

impl MultiOutputState {
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }
}

impl OccurrenceState for MultiOutputState {
    fn initial(graph: &Graph, root: NodeId) -> Self {
        MultiOutputState {
            frontier: Frontier::singleton(graph, root),
            outputs: vec![root],
        }
    }

    fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    fn expand(&self, graph: &Graph, index: usize) -> Self {
        let (frontier, v) = self.frontier.grow(graph, index);
        let root = frontier.root();

        // Only children of `v` can have lost their last external consumer.
        let mut outputs: Vec<NodeId> = self
            .outputs
            .iter()
            .copied()
            .filter(|&u| {
                u == root
                    || graph.children(v).binary_search(&u).is_err()
                    || external_parent(graph, &frontier, u).is_some()
            })
            .collect();
        if external_parent(graph, &frontier, v).is_some() {
            sorted_insert(&mut outputs, v);
        }

        MultiOutputState { frontier, outputs }
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }
}
