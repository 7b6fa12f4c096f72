// SPDX-License-Identifier: Apache-2.0

/// Deals `items` round-robin into `parts` lists: item `i` goes to part
/// `i % parts`. Always returns exactly `parts` lists, some possibly empty.
///
/// Roots are numbered in creation order, so neighbouring roots tend to have
/// similar cone sizes; striding spreads them across workers.
pub fn partition_strided<T>(items: Vec<T>, parts: usize) -> Vec<Vec<T>> {
    let parts = parts.max(1);
    let mut out: Vec<Vec<T>> = (0..parts)
        .map(|_| Vec::with_capacity(items.len() / parts + 1))
        .collect();
    for (i, item) in items.into_iter().enumerate() {
        out[i % parts].push(item);
    }
    out
}
