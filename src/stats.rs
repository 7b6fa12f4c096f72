// SPDX-License-Identifier: Apache-2.0

//! Summary statistics over a mining result.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::enumerate::PatternMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequentPattern {
    pub code: String,
    pub size: usize,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub pattern_count: usize,
    pub occurrence_count: usize,
    /// Pattern size (operation nodes) to number of distinct patterns.
    pub patterns_by_size: BTreeMap<usize, usize>,
    /// Pattern size to number of occurrences.
    pub occurrences_by_size: BTreeMap<usize, usize>,
    /// Ties go to the smallest code.
    pub most_frequent: Option<FrequentPattern>,
}

pub fn summarize(patterns: &PatternMap) -> PatternSummary {
    let mut summary = PatternSummary {
        pattern_count: patterns.len(),
        occurrence_count: patterns.occurrence_count(),
        ..PatternSummary::default()
    };
    for (code, occurrences) in patterns.iter() {
        let size = code.internal_count();
        *summary.patterns_by_size.entry(size).or_insert(0) += 1;
        *summary.occurrences_by_size.entry(size).or_insert(0) += occurrences.len();
        let better = match &summary.most_frequent {
            Some(best) => occurrences.len() > best.occurrences,
            None => true,
        };
        if better {
            summary.most_frequent = Some(FrequentPattern {
                code: code.to_string(),
                size,
                occurrences: occurrences.len(),
            });
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::{MiningOptions, mine_patterns};
    use crate::test_utils::sample_circuit;
    use maplit::btreemap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize_sample_circuit() {
        let s = sample_circuit();
        let patterns = mine_patterns(&s.graph, &MiningOptions::exhaustive(3, 5), None).unwrap();
        let summary = summarize(&patterns);
        assert_eq!(summary.pattern_count, 5);
        assert_eq!(summary.occurrence_count, 6);
        assert_eq!(summary.patterns_by_size, btreemap! { 2 => 2, 3 => 3 });
        assert_eq!(summary.occurrences_by_size, btreemap! { 2 => 3, 3 => 3 });
        assert_eq!(
            summary.most_frequent,
            Some(FrequentPattern {
                code: "(0,1)(0,2)*(1,3)(1,4)+".to_string(),
                size: 2,
                occurrences: 2,
            })
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["pattern_count"], 5);
        assert_eq!(json["most_frequent"]["occurrences"], 2);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&PatternMap::new());
        assert_eq!(summary, PatternSummary::default());
    }
}
