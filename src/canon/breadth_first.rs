// SPDX-License-Identifier: Apache-2.0

//! Breadth-first branch-and-bound labeling.
//!
//! Keeps every partial assignment whose code so far is minimal. Each round
//! expands the next internal item of every survivor, then retains only the
//! successors with the smallest fragment. Fragments end in a label sentinel
//! and are therefore prefix-free, so minimizing round by round minimizes the
//! whole code.

use crate::canon::view::{Assignment, Expansion, OccurrenceView};

pub(crate) fn search(view: &OccurrenceView) -> (Vec<u64>, Assignment) {
    let mut survivors = vec![Assignment::new(view)];
    let mut code = Vec::new();
    let mut round = 0;

    while round < survivors[0].rounds() {
        let plans: Vec<Expansion> = survivors
            .iter()
            .map(|a| Expansion::plan(view, a, round))
            .collect();
        let best = match plans.iter().map(|p| &p.fragment).min() {
            Some(fragment) => fragment.clone(),
            None => break,
        };

        let mut next = Vec::new();
        for (member, plan) in survivors.iter().zip(&plans) {
            if plan.fragment != best {
                continue;
            }
            let mut product = plan.permutations();
            loop {
                let mut successor = member.clone();
                plan.apply(view, &mut successor, &product);
                next.push(successor);
                if !product.advance() {
                    break;
                }
            }
        }
        log::trace!(
            "breadth_first: round={} survivors={} successors={}",
            round,
            survivors.len(),
            next.len()
        );

        code.extend_from_slice(&best);
        survivors = next;
        round += 1;
    }

    // Successors are generated in permutation order, so the first survivor is
    // the first minimal assignment in depth-first order as well.
    let first = survivors.swap_remove(0);
    (code, first)
}
