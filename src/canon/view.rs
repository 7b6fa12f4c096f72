// SPDX-License-Identifier: Apache-2.0

//! Local, index-based view of one occurrence plus the id-assignment state the
//! labeling strategies search over.
//!
//! Items `0..internal_count` are the occurrence vertices (in ascending graph
//! id order); items from `internal_count` on are its inputs, i.e. children
//! of occurrence vertices that are not themselves part of the occurrence.

use crate::canon::code::{encode_edge, encode_label};
use crate::canon::permute::PermutationProduct;
use crate::graph::{Graph, Label, NodeId};

const UNASSIGNED: u32 = u32::MAX;

#[derive(Debug)]
pub(crate) struct OccurrenceView {
    graph_ids: Vec<NodeId>,
    internal_count: usize,
    labels: Vec<Label>,
    /// Per internal item: child items in graph id order.
    children: Vec<Vec<usize>>,
    /// Per item: consumed by two or more occurrence vertices.
    shared: Vec<bool>,
    root: usize,
}

impl OccurrenceView {
    /// `vertices` must be sorted and contain `root`.
    pub(crate) fn new(graph: &Graph, root: NodeId, vertices: &[NodeId]) -> Self {
        debug_assert!(vertices.windows(2).all(|w| w[0] < w[1]));
        let internal_count = vertices.len();
        let mut graph_ids: Vec<NodeId> = vertices.to_vec();
        let mut uses: Vec<usize> = vec![0; internal_count];
        let mut children = Vec::with_capacity(internal_count);

        for &v in vertices {
            let mut local = Vec::with_capacity(graph.children(v).len());
            for &child in graph.children(v) {
                let item = match vertices.binary_search(&child) {
                    Ok(item) => item,
                    Err(_) => match graph_ids[internal_count..].iter().position(|&g| g == child) {
                        Some(offset) => internal_count + offset,
                        None => {
                            graph_ids.push(child);
                            uses.push(0);
                            graph_ids.len() - 1
                        }
                    },
                };
                uses[item] += 1;
                local.push(item);
            }
            children.push(local);
        }

        let root = vertices
            .binary_search(&root)
            .unwrap_or_else(|_| panic!("root {} is not an occurrence vertex", root));
        OccurrenceView {
            labels: vertices.iter().map(|&v| graph.label(v)).collect(),
            shared: uses.iter().map(|&n| n >= 2).collect(),
            graph_ids,
            internal_count,
            children,
            root,
        }
    }

    pub(crate) fn item_count(&self) -> usize {
        self.graph_ids.len()
    }

    pub(crate) fn input_count(&self) -> usize {
        self.graph_ids.len() - self.internal_count
    }

    pub(crate) fn is_internal(&self, item: usize) -> bool {
        item < self.internal_count
    }

    pub(crate) fn graph_id(&self, item: usize) -> NodeId {
        self.graph_ids[item]
    }
}

/// Partial map from items to local ids. Ids are handed out densely and in
/// order, so undoing is a truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    ids: Vec<u32>,
    /// Items in local id order.
    order: Vec<usize>,
    /// Internal items in local id order; this is also the expansion order.
    internal_order: Vec<usize>,
}

impl Assignment {
    pub(crate) fn new(view: &OccurrenceView) -> Self {
        let mut assignment = Assignment {
            ids: vec![UNASSIGNED; view.item_count()],
            order: Vec::with_capacity(view.item_count()),
            internal_order: Vec::with_capacity(view.internal_count),
        };
        assignment.assign(view, view.root);
        assignment
    }

    fn assign(&mut self, view: &OccurrenceView, item: usize) {
        debug_assert_eq!(self.ids[item], UNASSIGNED);
        self.ids[item] = self.order.len() as u32;
        self.order.push(item);
        if view.is_internal(item) {
            self.internal_order.push(item);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Number of internal items that have an id, i.e. the rounds available.
    pub(crate) fn rounds(&self) -> usize {
        self.internal_order.len()
    }

    /// Forgets every id at or above `len`.
    pub(crate) fn truncate(&mut self, view: &OccurrenceView, len: usize) {
        for &item in &self.order[len..] {
            self.ids[item] = UNASSIGNED;
        }
        let internal_left = self.order[..len]
            .iter()
            .filter(|&&item| view.is_internal(item))
            .count();
        self.order.truncate(len);
        self.internal_order.truncate(internal_left);
    }

    pub(crate) fn internal_vertices(&self, view: &OccurrenceView) -> Vec<NodeId> {
        self.internal_order.iter().map(|&i| view.graph_id(i)).collect()
    }

    pub(crate) fn assigned_vertices(&self, view: &OccurrenceView) -> Vec<NodeId> {
        self.order.iter().map(|&i| view.graph_id(i)).collect()
    }
}

/// Expansion of the internal item at one round.
///
/// Every ordering of the fresh children yields the same fragment; orderings
/// only matter for later rounds.
#[derive(Debug, Clone)]
pub(crate) struct Expansion {
    pub(crate) fragment: Vec<u64>,
    fresh_internal: Vec<usize>,
    fresh_shared: Vec<usize>,
    fresh_private: Vec<usize>,
}

impl Expansion {
    pub(crate) fn plan(view: &OccurrenceView, assignment: &Assignment, round: usize) -> Self {
        let node = assignment.internal_order[round];
        let parent_id = assignment.ids[node];

        let mut known: Vec<u32> = Vec::new();
        let mut fresh_internal = Vec::new();
        let mut fresh_shared = Vec::new();
        let mut fresh_private = Vec::new();
        for &child in &view.children[node] {
            let id = assignment.ids[child];
            if id != UNASSIGNED {
                known.push(id);
            } else if view.is_internal(child) {
                fresh_internal.push(child);
            } else if view.shared[child] {
                fresh_shared.push(child);
            } else {
                fresh_private.push(child);
            }
        }
        known.sort_unstable();

        let fresh_count = fresh_internal.len() + fresh_shared.len() + fresh_private.len();
        let next = assignment.len() as u32;
        let mut fragment = Vec::with_capacity(known.len() + fresh_count + 1);
        fragment.extend(known.iter().map(|&id| encode_edge(parent_id, id)));
        fragment.extend((0..fresh_count as u32).map(|k| encode_edge(parent_id, next + k)));
        fragment.push(encode_label(view.labels[node]));

        Expansion {
            fragment,
            fresh_internal,
            fresh_shared,
            fresh_private,
        }
    }

    pub(crate) fn permutations(&self) -> PermutationProduct {
        PermutationProduct::new(self.fresh_internal.len(), self.fresh_shared.len())
    }

    /// Hands out ids to the fresh children in the order `product` currently
    /// selects.
    pub(crate) fn apply(
        &self,
        view: &OccurrenceView,
        assignment: &mut Assignment,
        product: &PermutationProduct,
    ) {
        for &pos in product.outer() {
            assignment.assign(view, self.fresh_internal[pos]);
        }
        for &pos in product.inner() {
            assignment.assign(view, self.fresh_shared[pos]);
        }
        for &item in &self.fresh_private {
            assignment.assign(view, item);
        }
    }
}
