// SPDX-License-Identifier: Apache-2.0

//! Lexicographic permutation cursors.
//!
//! Cursors only produce orderings of positions `0..len`; applying an ordering
//! to an assignment is the caller's business.

/// Rearranges `items` into the next lexicographically greater permutation.
///
/// Returns false, leaving `items` untouched, when `items` is already the last
/// permutation.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    // Longest non-increasing suffix starts right after the pivot.
    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let pivot = pivot - 1;
    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot] {
        successor -= 1;
    }
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

/// Cursor over all orderings of `0..len`, starting at the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    order: Vec<usize>,
}

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Permutation {
            order: (0..len).collect(),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn advance(&mut self) -> bool {
        next_permutation(&mut self.order)
    }

    pub fn reset(&mut self) {
        for (i, slot) in self.order.iter_mut().enumerate() {
            *slot = i;
        }
    }
}

/// Cartesian product of two permutation cursors; the inner one advances
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationProduct {
    outer: Permutation,
    inner: Permutation,
}

impl PermutationProduct {
    pub fn new(outer_len: usize, inner_len: usize) -> Self {
        PermutationProduct {
            outer: Permutation::identity(outer_len),
            inner: Permutation::identity(inner_len),
        }
    }

    pub fn outer(&self) -> &[usize] {
        self.outer.as_slice()
    }

    pub fn inner(&self) -> &[usize] {
        self.inner.as_slice()
    }

    /// Moves to the next combination; false once every combination has been
    /// produced.
    pub fn advance(&mut self) -> bool {
        if self.inner.advance() {
            return true;
        }
        if self.outer.advance() {
            self.inner.reset();
            return true;
        }
        false
    }
}
