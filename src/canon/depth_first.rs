// SPDX-License-Identifier: Apache-2.0

//! Depth-first backtracking labeling.
//!
//! One live assignment plus a stack of decision points, one per expanded
//! round. A decision point remembers how far the assignment and the code had
//! grown before it was applied, so backtracking is a pair of truncations, and
//! holds the permutation cursor that yields its next untried ordering.
//!
//! Explores the same tree as the breadth-first strategy in O(depth) memory.
//! A branch is abandoned at the first element that exceeds the best code at
//! the same position. Because every ordering at a decision point produces the
//! same fragment, a point whose fragment loses is dropped without trying its
//! siblings.

use std::cmp::Ordering;

use crate::canon::permute::PermutationProduct;
use crate::canon::view::{Assignment, Expansion, OccurrenceView};

struct DecisionPoint {
    expansion: Expansion,
    product: PermutationProduct,
    assigned_before: usize,
    code_before: usize,
}

impl DecisionPoint {
    fn code_after(&self) -> usize {
        self.code_before + self.expansion.fragment.len()
    }
}

/// Compares `fragment` against `best` starting at `offset`.
fn compare_at(fragment: &[u64], best: &[u64], offset: usize) -> Ordering {
    for (k, &element) in fragment.iter().enumerate() {
        match best.get(offset + k) {
            Some(&b) if element == b => continue,
            Some(&b) => return element.cmp(&b),
            None => return Ordering::Greater,
        }
    }
    Ordering::Equal
}

pub(crate) fn search(view: &OccurrenceView) -> (Vec<u64>, Assignment) {
    let mut assignment = Assignment::new(view);
    let mut code: Vec<u64> = Vec::new();
    let mut stack: Vec<DecisionPoint> = Vec::new();
    let mut best: Option<(Vec<u64>, Assignment)> = None;
    let mut pruned = 0usize;

    loop {
        // Every prefix left on the stack matches the best code, so a forward
        // pass starts out tied.
        let mut relation = Ordering::Equal;
        let completed = loop {
            let round = stack.len();
            if round >= assignment.rounds() {
                break true;
            }
            let expansion = Expansion::plan(view, &assignment, round);
            if let Some((best_code, _)) = &best {
                if relation == Ordering::Equal {
                    relation = compare_at(&expansion.fragment, best_code, code.len());
                }
            }
            if relation == Ordering::Greater {
                pruned += 1;
                break false;
            }
            let point = DecisionPoint {
                product: expansion.permutations(),
                assigned_before: assignment.len(),
                code_before: code.len(),
                expansion,
            };
            code.extend_from_slice(&point.expansion.fragment);
            point
                .expansion
                .apply(view, &mut assignment, &point.product);
            stack.push(point);
        };

        if completed && (best.is_none() || relation == Ordering::Less) {
            best = Some((code.clone(), assignment.clone()));
        }

        // Backtrack to the deepest point with an untried ordering.
        loop {
            let Some(top) = stack.last_mut() else {
                log::trace!("depth_first: pruned {} branches", pruned);
                return best.unwrap_or_else(|| (code, assignment));
            };
            assignment.truncate(view, top.assigned_before);
            if top.product.advance() {
                code.truncate(top.code_after());
                top.expansion.apply(view, &mut assignment, &top.product);
                break;
            }
            code.truncate(top.code_before);
            stack.pop();
        }
    }
}
