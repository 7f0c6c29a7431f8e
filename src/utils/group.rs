//! Grouping of availability records by book.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::ResultRecord;

/// Identity of a book within a result set
///
/// Titles and authors are compared exactly as received: no case folding and
/// no whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookKey {
    pub title: String,
    pub author: String,
}

impl BookKey {
    /// Create a new key
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// The key a record belongs under
    pub fn of(record: &ResultRecord) -> Self {
        Self::new(record.title.clone(), record.author.clone())
    }
}

/// All records sharing one book key, in their original relative order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookGroup {
    pub key: BookKey,
    pub records: Vec<ResultRecord>,
}

impl BookGroup {
    /// Number of records in the group
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the group has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Records grouped by book, groups ordered by first occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedResults {
    pub groups: Vec<BookGroup>,
}

impl GroupedResults {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(BookGroup::len).sum()
    }

    /// Iterate over the groups in order
    pub fn iter(&self) -> std::slice::Iter<'_, BookGroup> {
        self.groups.iter()
    }

    /// Look up the group for a key
    pub fn get(&self, key: &BookKey) -> Option<&BookGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Flatten back to a record list: groups in order, records in order
    pub fn flatten(&self) -> Vec<ResultRecord> {
        self.groups
            .iter()
            .flat_map(|g| g.records.iter().cloned())
            .collect()
    }
}

impl<'a> IntoIterator for &'a GroupedResults {
    type Item = &'a BookGroup;
    type IntoIter = std::slice::Iter<'a, BookGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group records by (title, author) in a single pass
///
/// Group order is the order in which each key first appears; records keep
/// their original relative order inside a group. Nothing is sorted, filtered
/// or deduplicated.
pub fn group_results(records: Vec<ResultRecord>) -> GroupedResults {
    let mut index: HashMap<BookKey, usize> = HashMap::new();
    let mut groups: Vec<BookGroup> = Vec::new();

    for record in records {
        let key = BookKey::of(&record);
        match index.get(&key) {
            Some(&idx) => groups[idx].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(BookGroup {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    GroupedResults { groups }
}
