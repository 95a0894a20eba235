//! Normalization of remote items into canonical records

use serde_json::Value;
use tracing::error;

use super::RemoteItem;
use crate::domain::{Creator, ItemType, PaperRecord, RecordSource};

fn opt(item: &RemoteItem, field: &str) -> Option<String> {
    let value = item.data_str(field);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Normalize one remote item into a canonical record.
///
/// The data block is copied field-for-field; `zotero_key` is the item's key
/// and the canonical id is the item's `extra` field when non-empty, else the
/// key (records pushed by this engine carry their id in `extra`).
pub fn record_from_item(item: &RemoteItem) -> PaperRecord {
    let id = match opt(item, "extra") {
        Some(extra) => extra,
        None => item.key.clone(),
    };
    let mut record = PaperRecord::new(id, RecordSource::Zotero);
    record.zotero_key = Some(item.key.clone());

    record.title = opt(item, "title");
    record.abstract_note = opt(item, "abstractNote");
    record.date = opt(item, "date");
    record.doi = opt(item, "DOI");
    record.item_type = ItemType::from_remote_name(item.data_str("itemType"));
    record.publication_title = opt(item, "publicationTitle");
    record.proceedings_title = opt(item, "proceedingsTitle");
    record.conference_name = opt(item, "conferenceName");
    record.place = opt(item, "place");
    record.volume = opt(item, "volume");
    record.issue = opt(item, "issue");
    record.pages = opt(item, "pages");
    record.series = opt(item, "series");
    record.series_title = opt(item, "seriesTitle");
    record.series_text = opt(item, "seriesText");
    record.journal_abbreviation = opt(item, "journalAbbreviation");
    record.language = opt(item, "language");
    record.issn = opt(item, "ISSN");
    record.isbn = opt(item, "ISBN");
    record.short_title = opt(item, "shortTitle");
    record.url = opt(item, "url");
    record.access_date = opt(item, "accessDate");
    record.archive = opt(item, "archive");
    record.archive_location = opt(item, "archiveLocation");
    record.library_catalog = opt(item, "libraryCatalog");
    record.call_number = opt(item, "callNumber");
    record.rights = opt(item, "rights");
    record.extra = opt(item, "extra");

    if let Some(Value::Array(raw_creators)) = item.data.get("creators") {
        record.creators = raw_creators
            .iter()
            .filter_map(|raw| serde_json::from_value::<Creator>(raw.clone()).ok())
            .collect();
    }

    if let Some(Value::Array(raw_tags)) = item.data.get("tags") {
        record.tags = raw_tags
            .iter()
            .filter_map(|raw| raw.get("tag").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
    }

    if let Some(Value::Array(raw_collections)) = item.data.get("collections") {
        record.collections = raw_collections
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    if let Some(Value::Object(raw_relations)) = item.data.get("relations") {
        record.relations = raw_relations
            .iter()
            .filter_map(|(predicate, object)| {
                object
                    .as_str()
                    .map(|uri| (predicate.clone(), uri.to_string()))
            })
            .collect();
    }

    record
}

/// Normalize a batch of remote items, skipping items without a key.
/// One bad item never aborts the batch.
pub fn records_from_items(items: &[RemoteItem]) -> Vec<PaperRecord> {
    items
        .iter()
        .filter_map(|item| {
            if item.key.is_empty() {
                error!(
                    title = item.data_str("title"),
                    "skipping remote item without a key"
                );
                return None;
            }
            Some(record_from_item(item))
        })
        .collect()
}
