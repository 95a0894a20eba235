//! Deterministic batch merge into the canonical table

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::domain::PaperRecord;

/// Counts reported by one batch merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub updated: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} papers to the library; {} existing were found and updated.",
            self.added, self.updated
        )
    }
}

/// Merge a batch of normalized records into the table.
///
/// Within the batch, duplicates are dropped keeping the first occurrence —
/// by title, then by DOI. The batch is then appended to the table and the
/// concatenation deduplicated on the compound (title, DOI) key keeping the
/// last occurrence, so incoming data wins over existing rows.
///
/// Empty titles and DOIs are no keys at all: they never match anything, so
/// two records missing both fields coexist instead of overwriting each
/// other.
pub fn merge_batch(table: Vec<PaperRecord>, batch: Vec<PaperRecord>) -> (Vec<PaperRecord>, MergeReport) {
    let batch = dedup_keep_first(batch, |record| {
        record.title_key().map(str::to_string)
    });
    let batch = dedup_keep_first(batch, |record| record.doi_key().map(str::to_string));

    let initial_count = table.len();
    let batch_count = batch.len();

    let mut combined = table;
    combined.extend(batch);
    let merged = dedup_keep_last(combined);

    let added = merged.len().saturating_sub(initial_count);
    let updated = batch_count.saturating_sub(added);
    (merged, MergeReport { added, updated })
}

fn dedup_keep_first<F>(records: Vec<PaperRecord>, key: F) -> Vec<PaperRecord>
where
    F: Fn(&PaperRecord) -> Option<String>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| match key(record) {
            Some(value) => seen.insert(value),
            None => true,
        })
        .collect()
}

/// The compound dedup key: present only when at least one component is a
/// real key, so all-empty rows never collide.
fn compound_key(record: &PaperRecord) -> Option<(Option<String>, Option<String>)> {
    let title = record.title_key().map(str::to_string);
    let doi = record.doi_key().map(str::to_string);
    if title.is_none() && doi.is_none() {
        None
    } else {
        Some((title, doi))
    }
}

fn dedup_keep_last(records: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut last_index: HashMap<(Option<String>, Option<String>), usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if let Some(key) = compound_key(record) {
            last_index.insert(key, index);
        }
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(index, record)| match compound_key(record) {
            Some(key) => last_index[&key] == *index,
            None => true,
        })
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordSource;

    fn record(id: &str, title: Option<&str>, doi: Option<&str>) -> PaperRecord {
        let mut record = PaperRecord::new(id, RecordSource::OpenAlex);
        record.title = title.map(str::to_string);
        record.doi = doi.map(str::to_string);
        record
    }

    #[test]
    fn merge_into_empty_table_adds_all() {
        let batch = vec![
            record("1", Some("A"), Some("X")),
            record("2", Some("B"), Some("Y")),
        ];
        let (table, report) = merge_batch(Vec::new(), batch);
        assert_eq!(table.len(), 2);
        assert_eq!(report, MergeReport { added: 2, updated: 0 });
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = vec![
            record("1", Some("A"), Some("X")),
            record("2", Some("B"), Some("Y")),
        ];

        let (once, first) = merge_batch(Vec::new(), batch.clone());
        let (twice, second) = merge_batch(once.clone(), batch);

        assert_eq!(once, twice);
        assert_eq!(first, MergeReport { added: 2, updated: 0 });
        assert_eq!(second, MergeReport { added: 0, updated: 2 });
    }

    #[test]
    fn incoming_row_wins_on_matching_keys() {
        let mut existing = record("1", Some("A"), Some("X"));
        existing.volume = Some("old".to_string());

        let mut incoming = record("1", Some("A"), Some("X"));
        incoming.volume = Some("new".to_string());

        let (table, report) = merge_batch(vec![existing], vec![incoming]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].volume.as_deref(), Some("new"));
        assert_eq!(report, MergeReport { added: 0, updated: 1 });
    }

    #[test]
    fn batch_dedup_keeps_first_by_title_then_doi() {
        let batch = vec![
            record("1", Some("A"), Some("X")),
            record("2", Some("A"), Some("Y")), // dropped: title collision
            record("3", Some("B"), Some("X")), // dropped: DOI collision
            record("4", Some("C"), Some("Z")),
        ];
        let (table, report) = merge_batch(Vec::new(), batch);
        let ids: Vec<&str> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(report, MergeReport { added: 2, updated: 0 });
    }

    #[test]
    fn rows_without_any_key_never_collide() {
        let batch = vec![record("1", None, None), record("2", None, None)];
        let (table, report) = merge_batch(Vec::new(), batch);
        assert_eq!(table.len(), 2);
        assert_eq!(report.added, 2);

        // And they survive a re-merge untouched.
        let (again, _) = merge_batch(table, vec![record("3", None, None)]);
        assert_eq!(again.len(), 3);
    }

    #[test]
    fn partial_keys_must_match_on_both_components() {
        // Same title, one row without a DOI: distinct compound keys.
        let existing = vec![record("1", Some("A"), Some("X"))];
        let (table, _) = merge_batch(existing, vec![record("2", Some("A"), None)]);
        assert_eq!(table.len(), 2);

        // Same title, DOI missing on both: compound keys match.
        let existing = vec![record("1", Some("A"), None)];
        let (table, report) = merge_batch(existing, vec![record("2", Some("A"), None)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].id, "2");
        assert_eq!(report, MergeReport { added: 0, updated: 1 });
    }

    #[test]
    fn table_order_follows_last_occurrence() {
        let existing = vec![
            record("1", Some("A"), Some("X")),
            record("2", Some("B"), Some("Y")),
        ];
        let batch = vec![record("3", Some("A"), Some("X"))];
        let (table, _) = merge_batch(existing, batch);
        let ids: Vec<&str> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
