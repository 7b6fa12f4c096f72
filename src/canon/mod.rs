// SPDX-License-Identifier: Apache-2.0

//! Canonical labeling of occurrences.
//!
//! Local ids are handed out starting at the root (id 0). Internal vertices
//! are expanded in id order; expanding a vertex first lists its
//! already-numbered children, then numbers its fresh internal children, then
//! its fresh shared inputs, then its remaining inputs. The code is the
//! concatenation of the per-vertex fragments (sorted `(parent, child)` edges
//! followed by a label sentinel), minimized over every ordering of the fresh
//! internal children and of the fresh shared inputs. Orderings of unshared
//! inputs cannot change the code and are not explored.
//!
//! Two search strategies are provided. They return the same code and, among
//! tied assignments, the same one: the first in permutation order.

mod breadth_first;
pub mod code;
mod depth_first;
pub mod permute;
mod view;

use serde::{Deserialize, Serialize};

pub use code::{CanonicalCode, CodeElement, CodeParseError};

use crate::graph::{Graph, NodeId};
use crate::occurrence::OccurrenceState;
use view::OccurrenceView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingStrategy {
    BreadthFirst,
    /// Bounded-memory backtracking; the default.
    #[default]
    DepthFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalForm {
    pub code: CanonicalCode,
    /// Occurrence vertices in local id order; the root comes first.
    pub vertices: Vec<NodeId>,
    /// `assigned[i]` is the graph node holding local id `i`, inputs included.
    pub assigned: Vec<NodeId>,
    /// Distinct inputs; a shared input counts once.
    pub input_count: usize,
}

/// Canonicalizes the occurrence of `vertices` (sorted) rooted at `root`.
///
/// Every vertex must be reachable from `root` through child edges inside the
/// occurrence, and no vertex may consume the same operand twice.
pub fn canonicalize(
    graph: &Graph,
    root: NodeId,
    vertices: &[NodeId],
    strategy: LabelingStrategy,
) -> CanonicalForm {
    let view = OccurrenceView::new(graph, root, vertices);
    let (code, assignment) = match strategy {
        LabelingStrategy::BreadthFirst => breadth_first::search(&view),
        LabelingStrategy::DepthFirst => depth_first::search(&view),
    };
    debug_assert_eq!(
        assignment.rounds(),
        vertices.len(),
        "occurrence is not connected below its root"
    );
    CanonicalForm {
        code: CanonicalCode(code),
        vertices: assignment.internal_vertices(&view),
        assigned: assignment.assigned_vertices(&view),
        input_count: view.input_count(),
    }
}

pub fn canonicalize_state<S: OccurrenceState>(
    graph: &Graph,
    state: &S,
    strategy: LabelingStrategy,
) -> CanonicalForm {
    canonicalize(graph, state.root(), state.vertices(), strategy)
}

/// Canonicalizes every operation node reachable from `graph.default_root()`.
///
/// Returns `None` when there is no default root or it is not an operation.
pub fn canonicalize_graph(graph: &Graph, strategy: LabelingStrategy) -> Option<CanonicalForm> {
    let root = graph.default_root()?;
    if !graph.is_operation(root) {
        return None;
    }
    let cone = graph.operation_cone(root);
    Some(canonicalize(graph, root, &cone, strategy))
}
