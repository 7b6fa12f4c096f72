// SPDX-License-Identifier: Apache-2.0

//! Seed selection between deepening passes.

use std::cmp::Ordering;

use crate::enumerate::pattern_map::FrontierMap;
use crate::graph::{Graph, NodeId};

/// Caller-supplied preference between two occurrences of the same pattern.
/// `Ordering::Less` means `a` is the better seed. Must be a total order.
pub trait OccurrenceRanking: Sync {
    fn compare(&self, graph: &Graph, a: &[NodeId], b: &[NodeId]) -> Ordering;
}

impl<F> OccurrenceRanking for F
where
    F: Fn(&Graph, &[NodeId], &[NodeId]) -> Ordering + Sync,
{
    fn compare(&self, graph: &Graph, a: &[NodeId], b: &[NodeId]) -> Ordering {
        self(graph, a, b)
    }
}

/// Prefers occurrences whose operation nodes have the most consumers in
/// total, then the lexicographically smaller occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanoutRanking;

impl OccurrenceRanking for FanoutRanking {
    fn compare(&self, graph: &Graph, a: &[NodeId], b: &[NodeId]) -> Ordering {
        let fanout =
            |occ: &[NodeId]| -> usize { occ.iter().map(|&v| graph.parents(v).len()).sum() };
        fanout(b).cmp(&fanout(a)).then_with(|| a.cmp(b))
    }
}

/// Flattens `frontier` into the seeds of the next pass: per code, the best
/// `x_best` states by `ranking`, or every state when `x_best` is `None`.
///
/// Candidates are put in occurrence order before ranking, so ranking ties
/// and a missing ranking both resolve to the smallest occurrences whatever
/// order the workers produced them in.
pub(crate) fn select_seeds<S>(
    graph: &Graph,
    frontier: FrontierMap<S>,
    x_best: Option<usize>,
    ranking: Option<&dyn OccurrenceRanking>,
) -> Vec<S> {
    let mut seeds = Vec::with_capacity(frontier.state_count());
    let mut dropped = 0usize;
    for (_code, mut entries) in frontier.into_groups() {
        if let Some(x) = x_best {
            if entries.len() > x {
                entries.sort_by(|a, b| a.occurrence.cmp(&b.occurrence));
                if let Some(ranking) = ranking {
                    entries.sort_by(|a, b| ranking.compare(graph, &a.occurrence, &b.occurrence));
                }
                dropped += entries.len() - x;
                entries.truncate(x);
            }
        }
        seeds.extend(entries.into_iter().map(|e| e.state));
    }
    log::debug!(
        "select_seeds: kept {} seeds, dropped {}",
        seeds.len(),
        dropped
    );
    seeds
}
