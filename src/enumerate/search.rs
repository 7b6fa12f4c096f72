// SPDX-License-Identifier: Apache-2.0

//! Per-worker exhaustive growth.

use crate::canon::{LabelingStrategy, canonicalize_state};
use crate::enumerate::pattern_map::{FrontierEntry, FrontierMap, PatternMap};
use crate::graph::Graph;
use crate::occurrence::OccurrenceState;

/// Knobs shared by every worker of one pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassSettings {
    pub(crate) bound: usize,
    pub(crate) max_ports: usize,
    pub(crate) strategy: LabelingStrategy,
    pub(crate) keep_frontier: bool,
    pub(crate) progress_every: Option<u64>,
}

pub(crate) struct WorkerOutput<S> {
    pub(crate) patterns: PatternMap,
    pub(crate) frontier: FrontierMap<S>,
    pub(crate) visited: u64,
}

pub(crate) struct Worker<'g, S> {
    id: usize,
    graph: &'g Graph,
    settings: PassSettings,
    patterns: PatternMap,
    frontier: FrontierMap<S>,
    seeds_done: u64,
    visited: u64,
}

impl<'g, S: OccurrenceState> Worker<'g, S> {
    pub(crate) fn new(id: usize, graph: &'g Graph, settings: PassSettings) -> Self {
        Self {
            id,
            graph,
            settings,
            patterns: PatternMap::new(),
            frontier: FrontierMap::new(),
            seeds_done: 0,
            visited: 0,
        }
    }

    /// Visits every state reachable from `seed` whose size does not exceed
    /// the bound. The seed itself is not recorded.
    pub(crate) fn grow_from(&mut self, seed: S) {
        let mut stack: Vec<(S, usize)> = vec![(seed, 0)];
        while let Some((state, cursor)) = stack.last_mut() {
            if *cursor >= state.expandable().len() {
                stack.pop();
                continue;
            }
            let next = state.expand(self.graph, *cursor);
            *cursor += 1;
            self.visited += 1;
            if let Some(next) = self.visit(next) {
                stack.push((next, 0));
            }
        }

        self.seeds_done += 1;
        if let Some(every) = self.settings.progress_every {
            if every > 0 && self.seeds_done % every == 0 {
                log::info!(
                    "worker {}: {} seeds done, {} states visited, {} patterns so far",
                    self.id,
                    self.seeds_done,
                    self.visited,
                    self.patterns.len()
                );
            }
        }
    }

    /// Records `state` where it belongs and returns it back if it should be
    /// grown further.
    fn visit(&mut self, state: S) -> Option<S> {
        let at_bound = state.size() >= self.settings.bound;
        let accept = state.is_valid() && state.port_count() <= self.settings.max_ports;
        let retain = at_bound && self.settings.keep_frontier;
        if accept || retain {
            let form = canonicalize_state(self.graph, &state, self.settings.strategy);
            if accept {
                self.patterns.record(form.code.clone(), form.vertices.clone());
            }
            if retain {
                self.frontier.record(
                    form.code,
                    FrontierEntry {
                        state,
                        occurrence: form.vertices,
                    },
                );
                return None;
            }
        }
        if at_bound {
            None
        } else {
            Some(state)
        }
    }

    pub(crate) fn finish(self) -> WorkerOutput<S> {
        log::debug!(
            "worker {}: finished {} seeds, visited {} states, {} patterns, {} frontier states",
            self.id,
            self.seeds_done,
            self.visited,
            self.patterns.len(),
            self.frontier.state_count()
        );
        WorkerOutput {
            patterns: self.patterns,
            frontier: self.frontier,
            visited: self.visited,
        }
    }
}
