// SPDX-License-Identifier: Apache-2.0

//! Arithmetic-circuit DAG that pattern mining searches over.
//!
//! Edges point from an operand ("child") to the node that consumes it
//! ("parent"). Every node keeps its children and parents as sorted,
//! duplicate-free id lists, and additionally partitions its children into the
//! ones that can be grown into an occurrence (operation nodes) and the ones
//! that cannot (inputs and removed nodes).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub type NodeId = usize;

/// Exclusive upper bound on node ids.
///
/// Canonical codes pack two local ids into one `u64` and reserve the top half
/// of the range for label sentinels, so ids must stay below 2^31.
pub const MAX_NODES: usize = 1 << 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Input,
    Sum,
    Product,
    /// A node logically removed by a rewrite; never searched.
    Marker,
}

impl Label {
    pub fn is_operation(self) -> bool {
        matches!(self, Label::Sum | Label::Product)
    }

    pub fn symbol(self) -> char {
        match self {
            Label::Input => 'i',
            Label::Sum => '+',
            Label::Product => '*',
            Label::Marker => '#',
        }
    }

    pub fn from_symbol(c: char) -> Option<Label> {
        match c {
            'i' => Some(Label::Input),
            '+' => Some(Label::Sum),
            '*' => Some(Label::Product),
            '#' => Some(Label::Marker),
            _ => None,
        }
    }

    /// Dense index used by the canonical code's label sentinel.
    pub(crate) fn index(self) -> u64 {
        match self {
            Label::Input => 0,
            Label::Sum => 1,
            Label::Product => 2,
            Label::Marker => 3,
        }
    }

    pub(crate) fn from_index(index: u64) -> Option<Label> {
        match index {
            0 => Some(Label::Input),
            1 => Some(Label::Sum),
            2 => Some(Label::Product),
            3 => Some(Label::Marker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    label: Label,
    inc: Vec<NodeId>,
    out: Vec<NodeId>,
    expandable_children: Vec<NodeId>,
    unexpandable_children: Vec<NodeId>,
}

impl Node {
    fn new(label: Label) -> Self {
        Node {
            label,
            inc: Vec::new(),
            out: Vec::new(),
            expandable_children: Vec::new(),
            unexpandable_children: Vec::new(),
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    DuplicateVertex(NodeId),
    UnknownVertex(NodeId),
    SelfLoop(NodeId),
    /// INPUT nodes are leaves; they cannot consume operands.
    OperandIntoInput { from: NodeId, to: NodeId },
    TooManyNodes(NodeId),
    /// A slot below the highest added id was never filled.
    MissingVertex(NodeId),
    /// Some node lies on a cycle; the payload is one such node.
    Cycle(NodeId),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateVertex(id) => write!(f, "vertex {} was added twice", id),
            GraphError::UnknownVertex(id) => write!(f, "vertex {} has not been added", id),
            GraphError::SelfLoop(id) => write!(f, "self-loop on vertex {}", id),
            GraphError::OperandIntoInput { from, to } => {
                write!(f, "edge {} -> {} targets an input vertex", from, to)
            }
            GraphError::TooManyNodes(id) => write!(
                f,
                "vertex id {} exceeds the supported maximum of {}",
                id,
                MAX_NODES - 1
            ),
            GraphError::MissingVertex(id) => write!(f, "vertex slot {} was never filled", id),
            GraphError::Cycle(id) => write!(f, "graph has a cycle through vertex {}", id),
        }
    }
}

impl std::error::Error for GraphError {}

/// Inserts `value` into the sorted vector `v`; returns false if already
/// present.
pub(crate) fn sorted_insert(v: &mut Vec<NodeId>, value: NodeId) -> bool {
    match v.binary_search(&value) {
        Ok(_) => false,
        Err(pos) => {
            v.insert(pos, value);
            true
        }
    }
}

/// Incrementally constructs a `Graph`.
///
/// Vertices may be added out of order; every slot below the highest id must be
/// filled before `finish_build`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    slots: Vec<Option<Node>>,
    edge_count: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(node_count: usize) -> Self {
        GraphBuilder {
            slots: Vec::with_capacity(node_count),
            edge_count: 0,
        }
    }

    pub fn add_vertex(&mut self, id: NodeId, label: Label) -> Result<(), GraphError> {
        if id >= MAX_NODES {
            return Err(GraphError::TooManyNodes(id));
        }
        if id >= self.slots.len() {
            self.slots.resize_with(id + 1, || None);
        }
        if self.slots[id].is_some() {
            return Err(GraphError::DuplicateVertex(id));
        }
        self.slots[id] = Some(Node::new(label));
        Ok(())
    }

    /// Adds an edge from operand `x` into its consumer `y`.
    ///
    /// A repeated edge is ignored; parallel edges are not representable.
    pub fn add_edge(&mut self, x: NodeId, y: NodeId) -> Result<(), GraphError> {
        if x == y {
            return Err(GraphError::SelfLoop(x));
        }
        let x_label = self.node(x)?.label;
        let y_node = self.node(y)?;
        if y_node.label == Label::Input {
            return Err(GraphError::OperandIntoInput { from: x, to: y });
        }
        if y_node.inc.binary_search(&x).is_ok() {
            log::debug!("add_edge: ignoring repeated edge {} -> {}", x, y);
            return Ok(());
        }

        let y_node = self.node_mut(y)?;
        sorted_insert(&mut y_node.inc, x);
        if x_label.is_operation() {
            sorted_insert(&mut y_node.expandable_children, x);
        } else {
            sorted_insert(&mut y_node.unexpandable_children, x);
        }
        sorted_insert(&mut self.node_mut(x)?.out, y);
        self.edge_count += 1;
        Ok(())
    }

    /// Appends a new INPUT vertex and returns its id.
    pub fn add_input(&mut self) -> NodeId {
        let id = self.slots.len();
        self.slots.push(Some(Node::new(Label::Input)));
        id
    }

    /// Appends a new vertex consuming `operands` and returns its id. On error
    /// the builder is left unchanged.
    pub fn add_node(&mut self, label: Label, operands: &[NodeId]) -> Result<NodeId, GraphError> {
        let id = self.slots.len();
        for &operand in operands {
            self.node(operand)?;
        }
        if let (Label::Input, Some(&from)) = (label, operands.first()) {
            return Err(GraphError::OperandIntoInput { from, to: id });
        }
        self.add_vertex(id, label)?;
        for &operand in operands {
            self.add_edge(operand, id)?;
        }
        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.slots
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(GraphError::UnknownVertex(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.slots
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownVertex(id))
    }

    /// Seals the graph: fills no placeholders implicitly and rejects cycles.
    pub fn finish_build(self) -> Result<Graph, GraphError> {
        let mut nodes = Vec::with_capacity(self.slots.len());
        for (id, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(node) => nodes.push(node),
                None => return Err(GraphError::MissingVertex(id)),
            }
        }
        let graph = Graph {
            nodes,
            edge_count: self.edge_count,
        };
        graph.check_acyclic()?;
        log::debug!(
            "finish_build: nodes={} edges={}",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    edge_count: usize,
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn label(&self, id: NodeId) -> Label {
        self.nodes[id].label
    }

    pub fn is_operation(&self, id: NodeId) -> bool {
        self.nodes[id].label.is_operation()
    }

    /// Operands of `id`, sorted ascending.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].inc
    }

    /// Consumers of `id`, sorted ascending.
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].out
    }

    pub fn expandable_children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].expandable_children
    }

    pub fn unexpandable_children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].unexpandable_children
    }

    /// Lowest-id node with no consumer that is not a removed node.
    ///
    /// This is the default root used when canonicalizing a whole graph.
    pub fn default_root(&self) -> Option<NodeId> {
        (0..self.nodes.len())
            .find(|&id| self.nodes[id].out.is_empty() && self.nodes[id].label != Label::Marker)
    }

    /// Every node that can root an occurrence, ascending.
    pub fn operation_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&id| self.nodes[id].label.is_operation())
            .collect()
    }

    /// Operation nodes reachable from `root` along child edges, sorted.
    pub fn operation_cone(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut cone = Vec::new();
        let mut worklist = vec![root];
        seen[root] = true;
        while let Some(id) = worklist.pop() {
            cone.push(id);
            for &child in self.expandable_children(id) {
                if !seen[child] {
                    seen[child] = true;
                    worklist.push(child);
                }
            }
        }
        cone.sort_unstable();
        cone
    }

    fn check_acyclic(&self) -> Result<(), GraphError> {
        let mut pending: Vec<usize> = self.nodes.iter().map(|n| n.inc.len()).collect();
        let mut ready: VecDeque<NodeId> = (0..self.nodes.len())
            .filter(|&id| pending[id] == 0)
            .collect();
        let mut visited = 0usize;
        while let Some(id) = ready.pop_front() {
            visited += 1;
            for &parent in &self.nodes[id].out {
                pending[parent] -= 1;
                if pending[parent] == 0 {
                    ready.push_back(parent);
                }
            }
        }
        if visited == self.nodes.len() {
            return Ok(());
        }
        let on_cycle = (0..self.nodes.len()).find(|&id| pending[id] > 0);
        Err(GraphError::Cycle(on_cycle.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_edge_keeps_sorted_partition() {
        let mut b = GraphBuilder::new();
        b.add_vertex(3, Label::Sum).unwrap();
        b.add_vertex(0, Label::Input).unwrap();
        b.add_vertex(1, Label::Product).unwrap();
        b.add_vertex(2, Label::Input).unwrap();
        b.add_edge(2, 1).unwrap();
        b.add_edge(2, 3).unwrap();
        b.add_edge(1, 3).unwrap();
        b.add_edge(0, 3).unwrap();
        b.add_edge(0, 1).unwrap();
        let g = b.finish_build().unwrap();

        assert_eq!(g.children(3), &[0, 1, 2]);
        assert_eq!(g.expandable_children(3), &[1]);
        assert_eq!(g.unexpandable_children(3), &[0, 2]);
        assert_eq!(g.parents(0), &[1, 3]);
        assert_eq!(g.parents(2), &[1, 3]);
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn test_repeated_edge_is_ignored() {
        let mut b = GraphBuilder::new();
        let a = b.add_input();
        let c = b.add_input();
        let s = b.add_node(Label::Sum, &[a, c]).unwrap();
        b.add_edge(a, s).unwrap();
        let g = b.finish_build().unwrap();
        assert_eq!(g.children(s), &[a, c]);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_rejects_bad_edges() {
        let mut b = GraphBuilder::new();
        let a = b.add_input();
        let s = b.add_node(Label::Sum, &[a]).unwrap();
        assert_eq!(b.add_edge(s, s), Err(GraphError::SelfLoop(s)));
        assert_eq!(b.add_edge(s, 7), Err(GraphError::UnknownVertex(7)));
        assert_eq!(
            b.add_edge(s, a),
            Err(GraphError::OperandIntoInput { from: s, to: a })
        );
        assert_eq!(
            b.add_vertex(a, Label::Product),
            Err(GraphError::DuplicateVertex(a))
        );
        assert_eq!(
            b.add_vertex(MAX_NODES, Label::Sum),
            Err(GraphError::TooManyNodes(MAX_NODES))
        );
    }

    #[test]
    fn test_failed_add_node_leaves_builder_unchanged() {
        let mut b = GraphBuilder::new();
        let a = b.add_input();
        assert_eq!(
            b.add_node(Label::Sum, &[a, 9]),
            Err(GraphError::UnknownVertex(9))
        );
        assert_eq!(
            b.add_node(Label::Input, &[a]),
            Err(GraphError::OperandIntoInput { from: a, to: 1 })
        );
        assert_eq!(b.node_count(), 1);
        let s = b.add_node(Label::Sum, &[a]).unwrap();
        assert_eq!(s, 1);
        let g = b.finish_build().unwrap();
        assert_eq!(g.parents(a), &[s]);
    }

    #[test]
    fn test_finish_build_rejects_holes_and_cycles() {
        let mut b = GraphBuilder::new();
        b.add_vertex(1, Label::Sum).unwrap();
        assert_eq!(b.finish_build(), Err(GraphError::MissingVertex(0)));

        let mut b = GraphBuilder::new();
        b.add_vertex(0, Label::Sum).unwrap();
        b.add_vertex(1, Label::Product).unwrap();
        b.add_edge(0, 1).unwrap();
        b.add_edge(1, 0).unwrap();
        assert!(matches!(b.finish_build(), Err(GraphError::Cycle(_))));
    }

    #[test]
    fn test_default_root_skips_markers() {
        let mut b = GraphBuilder::new();
        let a = b.add_input();
        let c = b.add_input();
        let m = b.add_node(Label::Marker, &[a]).unwrap();
        let s = b.add_node(Label::Sum, &[a, c]).unwrap();
        let p = b.add_node(Label::Product, &[s, c]).unwrap();
        let g = b.finish_build().unwrap();
        assert_eq!(g.default_root(), Some(p));
        assert_eq!(g.operation_nodes(), vec![s, p]);
        assert_eq!(g.operation_cone(p), vec![s, p]);
        assert_eq!(g.unexpandable_children(m), &[a]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut b = GraphBuilder::new();
        let a = b.add_input();
        b.add_node(Label::Sum, &[a]).unwrap();
        let g = b.finish_build().unwrap();
        let copy = g.clone();
        assert_eq!(g, copy);
        assert_eq!(copy.parents(a), &[1]);
    }
}
