// SPDX-License-Identifier: Apache-2.0

//! Subgraph pattern mining on arithmetic circuits.
//!
//! A circuit is a DAG of SUM and PRODUCT nodes over INPUT leaves
//! ([`graph::Graph`]). Mining grows every connected sub-DAG below each
//! operation node ([`occurrence`]), names it by a canonical code that is equal
//! exactly for isomorphic occurrences ([`canon`]), and groups occurrences by
//! that code ([`enumerate`]).

pub mod canon;
pub mod enumerate;
pub mod graph;
pub mod occurrence;
pub mod stats;
pub mod test_utils;

pub use canon::{CanonicalCode, CanonicalForm, LabelingStrategy, canonicalize};
pub use enumerate::{
    MiningError, MiningOptions, MiningResult, OutputMode, PatternMap, mine, mine_patterns,
};
pub use graph::{Graph, GraphBuilder, GraphError, Label, NodeId};
