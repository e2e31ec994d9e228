//! Normalized record types.

use chrono::NaiveDateTime;

/// Canonical field names of a [`NormalizedRecord`], in output order.
pub const NORMALIZED_COLUMNS: [&str; 4] =
    ["datetime", "unified_protocol", "total_bytes", "event_count"];

/// One event reduced to the common four-field shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Event time from the `ts` column, if present and numeric.
    pub datetime: Option<NaiveDateTime>,
    /// Lowercase application protocol or log category.
    pub unified_protocol: String,
    /// Bytes attributed to the event, never negative.
    pub total_bytes: f64,
    /// Always 1; summed to count events.
    pub event_count: u32,
}

/// Ordered concatenation of the records of every loaded export.
///
/// Built once per report run and discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedDataset {
    records: Vec<NormalizedRecord>,
}

impl CombinedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical field names, also defined when the dataset is empty.
    pub fn columns(&self) -> &'static [&'static str] {
        &NORMALIZED_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRecord> {
        self.records.iter()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = NormalizedRecord>) {
        self.records.extend(records);
    }

    pub fn into_records(self) -> Vec<NormalizedRecord> {
        self.records
    }

    /// Sum of `event_count` over all records.
    pub fn event_total(&self) -> u64 {
        self.records
            .iter()
            .map(|record| u64::from(record.event_count))
            .sum()
    }
}

impl From<Vec<NormalizedRecord>> for CombinedDataset {
    fn from(records: Vec<NormalizedRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<NormalizedRecord> for CombinedDataset {
    fn from_iter<I: IntoIterator<Item = NormalizedRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CombinedDataset {
    type Item = &'a NormalizedRecord;
    type IntoIter = std::slice::Iter<'a, NormalizedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
