//! Inbound sync: import the remote library into the canonical table

use tracing::debug;

use crate::domain::PaperRecord;
use crate::fulltext::retrieve_fulltext;
use crate::merge::{merge_batch, MergeReport};
use crate::store::{records_from_items, ReferenceStore, StoreError};

/// Pull every remote item into the table.
///
/// Each item is normalized, full text is attached on a best-effort basis
/// (a miss is logged and never blocks the import), and items whose title
/// already exists in the table adopt the existing row's canonical id so
/// the merge lands on the same identity. The whole batch goes through a
/// single merge.
pub fn pull_remote(
    table: Vec<PaperRecord>,
    store: &dyn ReferenceStore,
    collection_key: Option<&str>,
) -> Result<(Vec<PaperRecord>, MergeReport), StoreError> {
    let items = store.list_all_items(collection_key)?;

    let mut batch = records_from_items(&items);
    for record in &mut batch {
        if let Some(key) = record.zotero_key.clone() {
            match retrieve_fulltext(store, &key) {
                Ok(fulltext) => record.fulltext = fulltext.content,
                Err(error) => {
                    debug!(key = %key, %error, "could not retrieve full text for remote item");
                }
            }
        }

        if let Some(title) = record.title_key() {
            let existing_id = table
                .iter()
                .find(|row| row.title_key() == Some(title))
                .map(|row| row.id.clone());
            if let Some(id) = existing_id {
                record.id = id;
            }
        }
    }

    Ok(merge_batch(table, batch))
}
