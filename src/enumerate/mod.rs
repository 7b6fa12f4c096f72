// SPDX-License-Identifier: Apache-2.0

//! Frequent-pattern enumeration over a circuit graph.
//!
//! The first pass grows every connected occurrence, from every operation
//! root, up to the first size of the schedule. Each later pass resumes from
//! the occurrences the previous pass stopped at (its frontier), optionally
//! keeping only the best few per pattern, which trades completeness for
//! reach.
//!
//! Work is split across a fixed set of scoped threads; each owns a strided
//! slice of the roots (or seeds) and private result maps that are merged once
//! all threads join.

pub mod defaults;
mod deepen;
mod options;
mod partition;
mod pattern_map;
mod search;

use std::time::Instant;

pub use deepen::{FanoutRanking, OccurrenceRanking};
pub use options::{MiningError, MiningOptions, OutputMode};
pub use partition::partition_strided;
pub use pattern_map::{FrontierEntry, FrontierMap, PatternMap};

use crate::graph::{Graph, NodeId};
use crate::occurrence::{MultiOutputState, OccurrenceState, SingleOutputState};
use search::{PassSettings, Worker, WorkerOutput};

#[derive(Debug, Clone)]
pub struct MiningResult<S> {
    pub patterns: PatternMap,
    /// States retained at the last pass's bound; empty unless
    /// `keep_frontier` was set.
    pub frontier: FrontierMap<S>,
}

/// Runs one pass: every worker grows the states `seed` produces from its
/// share of `parts`.
fn run_pass<T, S, F>(
    graph: &Graph,
    settings: PassSettings,
    parts: Vec<Vec<T>>,
    seed: F,
) -> Vec<WorkerOutput<S>>
where
    T: Send,
    S: OccurrenceState,
    F: Fn(&Graph, T) -> S + Sync,
{
    let seed = &seed;
    std::thread::scope(|scope| {
        let handles: Vec<_> = parts
            .into_iter()
            .enumerate()
            .map(|(id, part)| {
                log::debug!("worker {}: {} seeds", id, part.len());
                scope.spawn(move || {
                    let mut worker = Worker::new(id, graph, settings);
                    for item in part {
                        worker.grow_from(seed(graph, item));
                    }
                    worker.finish()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(output) => output,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Mines every pattern of `graph` allowed by `options`, tracking occurrences
/// as `S`.
///
/// `ranking` orders frontier occurrences when deepening with a finite
/// `x_best`; it is required in that case and ignored otherwise.
pub fn mine<S: OccurrenceState>(
    graph: &Graph,
    options: &MiningOptions,
    ranking: Option<&dyn OccurrenceRanking>,
) -> Result<MiningResult<S>, MiningError> {
    options.validate(ranking.is_some())?;
    let threads = options.worker_count();
    let last_pass = options.sizes.len() - 1;
    let start = Instant::now();

    let mut patterns = PatternMap::new();
    let mut frontier: FrontierMap<S> = FrontierMap::new();

    for (pass, &bound) in options.sizes.iter().enumerate() {
        let pass_start = Instant::now();
        let settings = PassSettings {
            bound,
            max_ports: options.max_ports,
            strategy: options.strategy,
            keep_frontier: pass < last_pass || options.keep_frontier,
            progress_every: options.progress_every_seeds,
        };

        let outputs = if pass == 0 {
            let roots: Vec<NodeId> = graph.operation_nodes();
            log::info!(
                "mine: pass 0 bound={} roots={} threads={}",
                bound,
                roots.len(),
                threads
            );
            run_pass(graph, settings, partition_strided(roots, threads), |g, root| {
                S::initial(g, root)
            })
        } else {
            let previous = std::mem::take(&mut frontier);
            let seeds = deepen::select_seeds(graph, previous, options.x_best, ranking);
            log::info!(
                "mine: pass {} bound={} seeds={} threads={}",
                pass,
                bound,
                seeds.len(),
                threads
            );
            run_pass(graph, settings, partition_strided(seeds, threads), |_, state| state)
        };

        let mut visited = 0u64;
        let found_before = patterns.occurrence_count();
        for output in outputs {
            visited += output.visited;
            patterns.merge(output.patterns);
            frontier.merge(output.frontier);
        }
        log::info!(
            "mine: pass {} done; visited {} states, {} new occurrences, {} frontier states, {} ms",
            pass,
            visited,
            patterns.occurrence_count() - found_before,
            frontier.state_count(),
            pass_start.elapsed().as_millis()
        );
    }

    patterns.sort_occurrences();
    frontier.sort_entries();
    log::info!(
        "mine: {} patterns, {} occurrences in {} ms",
        patterns.len(),
        patterns.occurrence_count(),
        start.elapsed().as_millis()
    );
    Ok(MiningResult { patterns, frontier })
}

/// Mines with the occurrence state selected by `options.output_mode` and
/// returns only the patterns.
pub fn mine_patterns(
    graph: &Graph,
    options: &MiningOptions,
    ranking: Option<&dyn OccurrenceRanking>,
) -> Result<PatternMap, MiningError> {
    let patterns = match options.output_mode {
        OutputMode::SingleOutput => mine::<SingleOutputState>(graph, options, ranking)?.patterns,
        OutputMode::MultiOutput => mine::<MultiOutputState>(graph, options, ranking)?.patterns,
    };
    Ok(patterns)
}
