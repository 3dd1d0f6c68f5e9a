use std::collections::HashMap;

use crate::models::{Record, RecordKind};

/// Memoized lookup results keyed by normalized query. Lives as long as the
/// process and is never evicted.
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<(RecordKind, String), Record>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: RecordKind, query: &str) -> Option<&Record> {
        self.entries.get(&(kind, kind.normalize(query)))
    }

    pub fn insert(&mut self, kind: RecordKind, query: &str, record: Record) {
        self.entries.insert((kind, kind.normalize(query)), record);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
