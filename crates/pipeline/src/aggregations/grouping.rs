//! Shared accumulator for the "same X, several Y" reports.

use catalog::fold_key;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Minimum number of distinct values a group needs to be reported
pub(crate) const MIN_DISTINCT: usize = 2;

/// Entries grouped under a case-folded key.
///
/// The first label seen for a key is kept for output, and groups come out in
/// the order their key was first seen.
#[derive(Debug)]
pub(crate) struct FoldedGroups<T> {
    groups: IndexMap<String, (String, Vec<T>)>,
}

impl<T> FoldedGroups<T> {
    pub(crate) fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    /// Append `entry` to the group of `label`'s folded key
    pub(crate) fn push(&mut self, label: &str, entry: T) {
        self.groups
            .entry(fold_key(label))
            .or_insert_with(|| (label.to_string(), Vec::new()))
            .1
            .push(entry);
    }

    /// Keep the groups whose entries carry at least [`MIN_DISTINCT`]
    /// distinct values, compared by exact string
    pub(crate) fn into_report<F>(self, distinct_by: F) -> IndexMap<String, Vec<T>>
    where
        F: Fn(&T) -> &str,
    {
        self.groups
            .into_values()
            .filter(|(_, entries)| {
                let distinct: HashSet<&str> = entries.iter().map(&distinct_by).collect();
                distinct.len() >= MIN_DISTINCT
            })
            .collect()
    }
}
