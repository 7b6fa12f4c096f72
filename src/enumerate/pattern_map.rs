// SPDX-License-Identifier: Apache-2.0

//! Result containers keyed by canonical code.

use std::collections::btree_map::{self, BTreeMap};

use crate::canon::CanonicalCode;
use crate::graph::NodeId;

/// Canonical code to every occurrence found for it. Each occurrence is the
/// list of its operation nodes in canonical (root-first) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMap {
    patterns: BTreeMap<CanonicalCode, Vec<Vec<NodeId>>>,
}

impl PatternMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: CanonicalCode, occurrence: Vec<NodeId>) {
        self.patterns.entry(code).or_default().push(occurrence);
    }

    /// Appends every occurrence list of `other` to the matching list here.
    pub fn merge(&mut self, other: PatternMap) {
        for (code, mut occurrences) in other.patterns {
            match self.patterns.entry(code) {
                btree_map::Entry::Vacant(e) => {
                    e.insert(occurrences);
                }
                btree_map::Entry::Occupied(mut e) => e.get_mut().append(&mut occurrences),
            }
        }
    }

    pub fn get(&self, code: &CanonicalCode) -> Option<&[Vec<NodeId>]> {
        self.patterns.get(code).map(|v| v.as_slice())
    }

    pub fn contains(&self, code: &CanonicalCode) -> bool {
        self.patterns.contains_key(code)
    }

    /// Patterns in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalCode, &[Vec<NodeId>])> {
        self.patterns.iter().map(|(c, v)| (c, v.as_slice()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &CanonicalCode> {
        self.patterns.keys()
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.patterns.values().map(|v| v.len()).sum()
    }

    /// Drops the occurrences for which `keep` returns false. Patterns whose
    /// list becomes empty stay in the map.
    pub fn retain_occurrences<F>(&mut self, mut keep: F)
    where
        F: FnMut(&CanonicalCode, &[NodeId]) -> bool,
    {
        for (code, occurrences) in self.patterns.iter_mut() {
            occurrences.retain(|occ| keep(code, occ));
        }
    }

    pub fn sort_occurrences(&mut self) {
        for occurrences in self.patterns.values_mut() {
            occurrences.sort_unstable();
        }
    }

    pub fn into_inner(self) -> BTreeMap<CanonicalCode, Vec<Vec<NodeId>>> {
        self.patterns
    }
}

impl IntoIterator for PatternMap {
    type Item = (CanonicalCode, Vec<Vec<NodeId>>);
    type IntoIter = btree_map::IntoIter<CanonicalCode, Vec<Vec<NodeId>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

/// A state retained at a size bound, with its canonical vertex order.
#[derive(Debug, Clone)]
pub struct FrontierEntry<S> {
    pub state: S,
    pub occurrence: Vec<NodeId>,
}

/// States that reached a pass's size bound, grouped by canonical code. These
/// seed the next deepening pass.
#[derive(Debug, Clone)]
pub struct FrontierMap<S> {
    entries: BTreeMap<CanonicalCode, Vec<FrontierEntry<S>>>,
}

impl<S> Default for FrontierMap<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> FrontierMap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: CanonicalCode, entry: FrontierEntry<S>) {
        self.entries.entry(code).or_default().push(entry);
    }

    pub fn merge(&mut self, other: FrontierMap<S>) {
        for (code, mut entries) in other.entries {
            self.entries.entry(code).or_default().append(&mut entries);
        }
    }

    pub fn get(&self, code: &CanonicalCode) -> Option<&[FrontierEntry<S>]> {
        self.entries.get(code).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalCode, &[FrontierEntry<S>])> {
        self.entries.iter().map(|(c, v)| (c, v.as_slice()))
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state_count(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }

    /// Orders each code's entries by occurrence so the map does not depend on
    /// how work was split between threads.
    pub fn sort_entries(&mut self) {
        for entries in self.entries.values_mut() {
            entries.sort_by(|a, b| a.occurrence.cmp(&b.occurrence));
        }
    }

    pub(crate) fn into_groups(
        self,
    ) -> impl Iterator<Item = (CanonicalCode, Vec<FrontierEntry<S>>)> {
        self.entries.into_iter()
    }
}
