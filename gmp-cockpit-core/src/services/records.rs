//! Record collection and filtered view

use crate::types::ModuleRecord;

/// Case-insensitive substring match on title, code and description
///
/// Blank search text matches every record.
#[must_use]
pub fn default_matches(record: &ModuleRecord, search_text: &str) -> bool {
    let needle = search_text.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    std::iter::once(Some(record.title.as_str()))
        .chain([record.code.as_deref(), record.description.as_deref()])
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Ordered record set with a selection
///
/// Records are replaced wholesale on reload; the filtered view is computed
/// on demand from the current search predicate.
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<ModuleRecord>,
    selected: Option<usize>,
}

impl RecordCollection {
    /// Replace all records and select the first one
    pub fn replace(&mut self, records: Vec<ModuleRecord>) {
        self.selected = if records.is_empty() { None } else { Some(0) };
        self.records = records;
    }

    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn selected(&self) -> Option<&ModuleRecord> {
        self.selected.and_then(|index| self.records.get(index))
    }

    /// Records accepted by `predicate`, in display order
    pub fn filtered<F>(&self, predicate: F) -> Vec<ModuleRecord>
    where
        F: Fn(&ModuleRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Select by key if the record passes `predicate`
    ///
    /// Returns `false` (selection unchanged) for unknown or filtered-out keys.
    pub fn select<F>(&mut self, key: &str, predicate: F) -> bool
    where
        F: Fn(&ModuleRecord) -> bool,
    {
        match self
            .records
            .iter()
            .position(|record| record.key == key && predicate(record))
        {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Keep the selection inside the view accepted by `predicate`
    ///
    /// A hidden selection moves to the first visible record, or to none.
    /// Returns whether the selection changed.
    pub fn reconcile<F>(&mut self, predicate: F) -> bool
    where
        F: Fn(&ModuleRecord) -> bool,
    {
        if self.selected().is_some_and(|record| predicate(record)) {
            return false;
        }
        let next = self.records.iter().position(|record| predicate(record));
        let changed = next != self.selected;
        self.selected = next;
        changed
    }
}
