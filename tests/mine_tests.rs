// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use circuit_patterns::canon::{CanonicalCode, LabelingStrategy};
use circuit_patterns::enumerate::{
    FanoutRanking, MiningOptions, OutputMode, PatternMap, mine, mine_patterns,
};
use circuit_patterns::graph::{Graph, NodeId};
use circuit_patterns::occurrence::SingleOutputState;
use circuit_patterns::test_utils::{random_circuit, random_permutation, relabel, sample_circuit};
use maplit::btreemap;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn code(text: &str) -> CanonicalCode {
    text.parse().unwrap()
}

fn options(sizes: Vec<usize>, max_ports: usize, output_mode: OutputMode) -> MiningOptions {
    MiningOptions {
        sizes,
        max_ports,
        output_mode,
        threads: Some(3),
        ..MiningOptions::default()
    }
}

/// Every occurrence as a sorted vertex set, across all patterns.
fn vertex_sets(patterns: &PatternMap) -> Vec<Vec<NodeId>> {
    let mut sets: Vec<Vec<NodeId>> = patterns
        .iter()
        .flat_map(|(_, occurrences)| occurrences.iter())
        .map(|occ| {
            let mut set = occ.clone();
            set.sort_unstable();
            set
        })
        .collect();
    sets.sort();
    sets
}

/// Every connected vertex set of 2..=k operation nodes, found by testing each
/// subset of each root's cone.
fn brute_force_vertex_sets(graph: &Graph, k: usize) -> Vec<Vec<NodeId>> {
    let mut sets = Vec::new();
    for root in graph.operation_nodes() {
        let others: Vec<NodeId> = graph
            .operation_cone(root)
            .into_iter()
            .filter(|&v| v != root)
            .collect();
        assert!(others.len() < 16, "cone too large for brute force");
        for mask in 1u32..(1 << others.len()) {
            if mask.count_ones() as usize + 1 > k {
                continue;
            }
            let mut set: Vec<NodeId> = others
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &v)| v)
                .collect();
            set.push(root);
            set.sort_unstable();

            let mut reached = BTreeSet::from([root]);
            let mut worklist = vec![root];
            while let Some(v) = worklist.pop() {
                for &c in graph.children(v) {
                    if set.binary_search(&c).is_ok() && reached.insert(c) {
                        worklist.push(c);
                    }
                }
            }
            if reached.len() == set.len() {
                sets.push(set);
            }
        }
    }
    sets.sort();
    sets
}

#[test]
fn test_sample_circuit_up_to_three() {
    init_logger();
    let s = sample_circuit();
    let patterns = mine_patterns(
        &s.graph,
        &options(vec![3], 5, OutputMode::SingleOutput),
        None,
    )
    .unwrap();
    assert_eq!(
        patterns.into_inner(),
        btreemap! {
            code("(0,1)(0,2)*(1,3)(1,4)+") => vec![
                vec![s.prod_mid, s.sum_left],
                vec![s.prod_mid, s.sum_right],
            ],
            code("(0,1)(0,2)*(1,3)(1,4)*") => vec![vec![s.prod_top, s.prod_mid]],
            code("(0,1)(0,2)*(1,3)(1,4)+(2,5)(2,6)+") => vec![
                vec![s.prod_mid, s.sum_left, s.sum_right],
            ],
            code("(0,1)(0,2)*(1,3)(1,4)*(3,2)(3,5)+") => vec![
                vec![s.prod_top, s.prod_mid, s.sum_left],
            ],
            code("(0,1)(0,2)*(1,3)(1,4)*(3,5)(3,6)+") => vec![
                vec![s.prod_top, s.prod_mid, s.sum_right],
            ],
        }
    );
}

#[test]
fn test_port_bound_drops_wide_occurrences() {
    let s = sample_circuit();
    let patterns = mine_patterns(
        &s.graph,
        &options(vec![3], 4, OutputMode::SingleOutput),
        None,
    )
    .unwrap();
    // {6,4,5} and {7,6,5} have five ports each.
    assert_eq!(patterns.len(), 3);
    assert_eq!(patterns.occurrence_count(), 4);
}

#[test_case(1; "seed 1")]
#[test_case(2; "seed 2")]
#[test_case(3; "seed 3")]
fn test_matches_brute_force_subsets(seed: u64) {
    init_logger();
    let g = random_circuit(seed, 4, 10, 3);
    let k = 4;
    let patterns = mine_patterns(
        &g,
        &options(vec![k], usize::MAX, OutputMode::MultiOutput),
        None,
    )
    .unwrap();
    assert_eq!(vertex_sets(&patterns), brute_force_vertex_sets(&g, k));
}

/// Keeps the sets whose only value consumed outside the set is the root's.
fn single_output_sets(graph: &Graph, sets: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
    sets.into_iter()
        .filter(|set| {
            let inside = |v: &NodeId| set.binary_search(v).is_ok();
            set.iter().all(|&v| {
                let parents = graph.parents(v);
                // The root is the one vertex with no consumer in the set.
                !parents.iter().any(inside) || parents.iter().all(inside)
            })
        })
        .collect()
}

#[test_case(1; "seed 1")]
#[test_case(4; "seed 4")]
#[test_case(9; "seed 9")]
fn test_single_output_matches_brute_force_subsets(seed: u64) {
    let g = random_circuit(seed, 4, 10, 3);
    let k = 4;
    let patterns = mine_patterns(
        &g,
        &options(vec![k], usize::MAX, OutputMode::SingleOutput),
        None,
    )
    .unwrap();
    let expected = single_output_sets(&g, brute_force_vertex_sets(&g, k));
    assert_eq!(vertex_sets(&patterns), expected);
}

#[test_case(OutputMode::SingleOutput; "single output")]
#[test_case(OutputMode::MultiOutput; "multi output")]
fn test_bounds_are_respected(output_mode: OutputMode) {
    let g = random_circuit(11, 5, 14, 3);
    let (k, max_ports) = (4, 6);
    let patterns = mine_patterns(&g, &options(vec![k], max_ports, output_mode), None).unwrap();
    assert!(!patterns.is_empty());

    for (code, occurrences) in patterns.iter() {
        assert_eq!(code.internal_count(), occurrences[0].len());
        for occ in occurrences {
            assert!((2..=k).contains(&occ.len()));
            assert!(occ.iter().all(|&v| g.is_operation(v)));
            let mut set = occ.clone();
            set.sort_unstable();
            let inside = |v: &NodeId| set.binary_search(v).is_ok();

            let inputs: BTreeSet<NodeId> = occ
                .iter()
                .flat_map(|&v| g.children(v).iter().copied())
                .filter(|c| !inside(c))
                .collect();
            let exposed: Vec<NodeId> = occ[1..]
                .iter()
                .copied()
                .filter(|&v| g.parents(v).iter().any(|p| !inside(p)))
                .collect();
            let outputs = match output_mode {
                OutputMode::SingleOutput => {
                    assert!(exposed.is_empty(), "{:?} leaks an inner value", occ);
                    1
                }
                OutputMode::MultiOutput => 1 + exposed.len(),
            };
            assert!(inputs.len() + outputs <= max_ports, "{:?} exceeds ports", occ);
        }
    }
}

#[test]
fn test_no_occurrence_is_found_twice() {
    let g = random_circuit(5, 4, 16, 4);
    let patterns = mine_patterns(
        &g,
        &options(vec![4], usize::MAX, OutputMode::MultiOutput),
        None,
    )
    .unwrap();
    let sets = vertex_sets(&patterns);
    let distinct: BTreeSet<&Vec<NodeId>> = sets.iter().collect();
    assert_eq!(distinct.len(), sets.len());
}

#[test]
fn test_relabeling_preserves_patterns() {
    let g = random_circuit(21, 4, 12, 3);
    let perm = random_permutation(99, g.node_count());
    let h = relabel(&g, &perm);
    let opts = options(vec![4], 7, OutputMode::SingleOutput);
    let original = mine_patterns(&g, &opts, None).unwrap();
    let renamed = mine_patterns(&h, &opts, None).unwrap();

    let as_sets = |patterns: &PatternMap, rename: &dyn Fn(NodeId) -> NodeId| {
        patterns
            .iter()
            .map(|(code, occurrences)| {
                let sets: BTreeSet<Vec<NodeId>> = occurrences
                    .iter()
                    .map(|occ| {
                        let mut set: Vec<NodeId> = occ.iter().map(|&v| rename(v)).collect();
                        set.sort_unstable();
                        set
                    })
                    .collect();
                (code.clone(), sets)
            })
            .collect::<BTreeMap<_, _>>()
    };
    assert_eq!(
        as_sets(&original, &|v: NodeId| perm[v]),
        as_sets(&renamed, &|v: NodeId| v)
    );
}

#[test]
fn test_strategies_agree_on_every_occurrence() {
    let g = random_circuit(8, 4, 14, 3);
    let mut opts = options(vec![5], usize::MAX, OutputMode::MultiOutput);
    opts.strategy = LabelingStrategy::BreadthFirst;
    let bfs = mine_patterns(&g, &opts, None).unwrap();
    opts.strategy = LabelingStrategy::DepthFirst;
    let dfs = mine_patterns(&g, &opts, None).unwrap();
    assert_eq!(bfs, dfs);
}

#[test]
fn test_unlimited_deepening_matches_single_pass() {
    init_logger();
    let g = random_circuit(13, 4, 14, 3);
    let single =
        mine_patterns(&g, &options(vec![4], 7, OutputMode::SingleOutput), None).unwrap();
    let staged = mine_patterns(
        &g,
        &options(vec![2, 3, 4], 7, OutputMode::SingleOutput),
        None,
    )
    .unwrap();
    assert_eq!(staged, single);
}

#[test]
fn test_limited_deepening_finds_a_subset() {
    let g = random_circuit(17, 5, 16, 3);
    let exhaustive =
        mine_patterns(&g, &options(vec![4], 8, OutputMode::SingleOutput), None).unwrap();
    let heuristic_options = MiningOptions {
        x_best: Some(1),
        ..options(vec![2, 4], 8, OutputMode::SingleOutput)
    };
    let heuristic = mine_patterns(&g, &heuristic_options, Some(&FanoutRanking)).unwrap();

    assert!(!heuristic.is_empty());
    for (code, occurrences) in heuristic.iter() {
        let all = exhaustive.get(code).expect("heuristic found an unknown pattern");
        for occ in occurrences {
            assert!(all.contains(occ), "{:?} missing from exhaustive result", occ);
        }
    }
    // Size-2 patterns come from the exhaustive first pass and are complete.
    for (code, occurrences) in exhaustive.iter().filter(|(c, _)| c.internal_count() == 2) {
        assert_eq!(heuristic.get(code), Some(occurrences));
    }
}

#[test]
fn test_worker_count_does_not_change_result() {
    let g = random_circuit(23, 5, 18, 3);
    let results: Vec<PatternMap> = [1, 2, 7]
        .into_iter()
        .map(|threads| {
            let opts = MiningOptions {
                threads: Some(threads),
                ..options(vec![2, 4], 7, OutputMode::MultiOutput)
            };
            mine_patterns(&g, &opts, None).unwrap()
        })
        .collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
}

#[test_case(0; "seed 0")]
#[test_case(3; "seed 3")]
#[test_case(6; "seed 6")]
#[test_case(12; "seed 12")]
#[test_case(19; "seed 19")]
fn test_worker_count_does_not_change_limited_deepening(seed: u64) {
    // Ranks by size only, so every candidate of a pattern ties.
    let by_size = |_: &Graph, a: &[NodeId], b: &[NodeId]| -> Ordering { a.len().cmp(&b.len()) };
    let g = random_circuit(seed, 4, 16, 3);
    let results: Vec<PatternMap> = [1, 3, 7]
        .into_iter()
        .map(|threads| {
            let opts = MiningOptions {
                threads: Some(threads),
                x_best: Some(1),
                ..options(vec![2, 4], usize::MAX, OutputMode::MultiOutput)
            };
            mine_patterns(&g, &opts, Some(&by_size)).unwrap()
        })
        .collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_frontier_resumes_where_mining_stopped() {
    let s = sample_circuit();
    let opts = MiningOptions {
        keep_frontier: true,
        ..options(vec![2], 8, OutputMode::SingleOutput)
    };
    let result = mine::<SingleOutputState>(&s.graph, &opts, None).unwrap();
    let occurrences: Vec<Vec<NodeId>> = result
        .frontier
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|e| e.occurrence.clone()))
        .collect();
    assert_eq!(
        occurrences,
        vec![
            vec![s.prod_mid, s.sum_left],
            vec![s.prod_mid, s.sum_right],
            vec![s.prod_top, s.prod_mid],
        ]
    );
}
