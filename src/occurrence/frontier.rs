// SPDX-License-Identifier: Apache-2.0

use crate::graph::{Graph, NodeId, sorted_insert};

/// Vertex set and growth frontier shared by every occurrence variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frontier {
    root: NodeId,
    /// Sorted.
    vertices: Vec<NodeId>,
    /// Operation nodes that may be grown next, in growth order.
    expandable: Vec<NodeId>,
    /// Sorted. Children of the occurrence that are never grown in this branch.
    unexpandable: Vec<NodeId>,
}

impl Frontier {
    pub fn singleton(graph: &Graph, root: NodeId) -> Self {
        debug_assert!(graph.is_operation(root), "root {} is not an operation", root);
        Frontier {
            root,
            vertices: vec![root],
            expandable: graph.expandable_children(root).to_vec(),
            unexpandable: graph.unexpandable_children(root).to_vec(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn vertices(&self) -> &[NodeId] {
        &self.vertices
    }

    pub fn expandable(&self) -> &[NodeId] {
        &self.expandable
    }

    pub fn unexpandable(&self) -> &[NodeId] {
        &self.unexpandable
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.vertices.binary_search(&node).is_ok()
    }

    /// Number of distinct children outside the occurrence.
    pub fn input_count(&self) -> usize {
        self.expandable.len() + self.unexpandable.len()
    }

    /// Returns the successor frontier after absorbing `expandable[index]`,
    /// together with the absorbed node.
    pub fn grow(&self, graph: &Graph, index: usize) -> (Frontier, NodeId) {
        let v = self.expandable[index];

        let mut vertices = self.vertices.clone();
        sorted_insert(&mut vertices, v);

        let mut unexpandable = self.unexpandable.clone();
        for &skipped in &self.expandable[..index] {
            sorted_insert(&mut unexpandable, skipped);
        }
        for &leaf in graph.unexpandable_children(v) {
            sorted_insert(&mut unexpandable, leaf);
        }

        let mut expandable = self.expandable[index + 1..].to_vec();
        for &child in graph.expandable_children(v) {
            if vertices.binary_search(&child).is_ok()
                || unexpandable.binary_search(&child).is_ok()
                || expandable.contains(&child)
            {
                continue;
            }
            expandable.push(child);
        }

        let grown = Frontier {
            root: self.root,
            vertices,
            expandable,
            unexpandable,
        };
        (grown, v)
    }
}
