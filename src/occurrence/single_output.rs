// SPDX-License-Identifier: Apache-2.0

use crate::graph::{Graph, NodeId};
use crate::occurrence::{Frontier, OccurrenceState, external_parent};

/// Occurrence whose only externally visible value is its root.
///
/// `inter_node` names some consumer outside the occurrence of a non-root
/// vertex. While it is set the occurrence is not a valid single-output
/// pattern; further growth may still absorb that consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleOutputState {
    frontier: Frontier,
    inter_node: Option<NodeId>,
}

impl SingleOutputState {
    pub fn inter_node(&self) -> Option<NodeId> {
        self.inter_node
    }
}

/// Looks for an external consumer of any non-root vertex, checking `first`
/// before the rest.
fn find_external_consumer(graph: &Graph, frontier: &Frontier, first: NodeId) -> Option<NodeId> {
    external_parent(graph, frontier, first).or_else(|| {
        frontier
            .vertices()
            .iter()
            .copied()
            .filter(|&u| u != first && u != frontier.root())
            .find_map(|u| external_parent(graph, frontier, u))
    })
}

impl OccurrenceState for SingleOutputState {
    fn initial(graph: &Graph, root: NodeId) -> Self {
        SingleOutputState {
            frontier: Frontier::singleton(graph, root),
            inter_node: None,
        }
    }

    fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    fn expand(&self, graph: &Graph, index: usize) -> Self {
        let (frontier, v) = self.frontier.grow(graph, index);
        let inter_node = match self.inter_node {
            Some(consumer) if consumer == v => find_external_consumer(graph, &frontier, v),
            // With a single consumer, that consumer is the vertex `v` was grown
            // from.
            None if graph.parents(v).len() > 1 => external_parent(graph, &frontier, v),
            unchanged => unchanged,
        };
        SingleOutputState {
            frontier,
            inter_node,
        }
    }

    fn is_valid(&self) -> bool {
        self.inter_node.is_none()
    }

    fn output_count(&self) -> usize {
        1
    }
}
