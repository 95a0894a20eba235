//! Outbound sync: create / update / skip against the remote store

use std::fmt;

use serde_json::Value;
use tracing::warn;

use super::resolve_remote;
use crate::domain::PaperRecord;
use crate::error::LibraryError;
use crate::store::{ItemTemplate, ReferenceStore, RemoteItem, StoreError};

/// What happened to one record during an outbound pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    Added,
    Updated,
    Skipped,
}

/// Aggregate result of an outbound pass. Failures are isolated per record
/// and carried as (title, message) pairs.
#[derive(Clone, Debug, Default)]
pub struct OutboundReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<(String, String)>,
}

impl fmt::Display for OutboundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} papers to the remote library. \
             Updated {} existing papers. \
             Skipped {} papers. \
             {} errors occurred.",
            self.added.len(),
            self.updated.len(),
            self.skipped.len(),
            self.errors.len()
        )
    }
}

/// Push every canonical record to the remote store.
///
/// Records without a remote counterpart are created (and linked back);
/// records with a counterpart are updated when `update_existing` is set and
/// skipped otherwise. A failure on one record is recorded and the pass
/// continues with the next. Only the snapshot fetch for a configured
/// collection can fail the pass as a whole.
pub fn push_library(
    table: &mut [PaperRecord],
    store: &dyn ReferenceStore,
    collection_key: Option<&str>,
    update_existing: bool,
) -> Result<OutboundReport, StoreError> {
    let snapshot = match collection_key {
        Some(key) => Some(store.collection_items(key)?),
        None => None,
    };

    let mut report = OutboundReport::default();
    for record in table.iter_mut() {
        let title = record.title.clone().unwrap_or_default();
        match push_record(record, store, snapshot.as_deref(), collection_key, update_existing) {
            Ok(PushOutcome::Added) => report.added.push(title),
            Ok(PushOutcome::Updated) => report.updated.push(title),
            Ok(PushOutcome::Skipped) => report.skipped.push(title),
            Err(error) => {
                warn!(record = %record.id, %error, "failed to push record to remote store");
                report.errors.push((title, error.to_string()));
            }
        }
    }
    Ok(report)
}

fn push_record(
    record: &mut PaperRecord,
    store: &dyn ReferenceStore,
    snapshot: Option<&[RemoteItem]>,
    collection_key: Option<&str>,
    update_existing: bool,
) -> Result<PushOutcome, LibraryError> {
    let existing = resolve_remote(record, snapshot, store)?;
    if let Some(item) = &existing {
        // A title hit links a locally-created record to its counterpart.
        record.link_remote(&item.key);
    }

    match existing {
        Some(item) if update_existing => {
            let template = build_item_payload(record, store, collection_key)?;
            store.update_item(&item.key, &template)?;
            Ok(PushOutcome::Updated)
        }
        Some(_) => Ok(PushOutcome::Skipped),
        None => {
            let template = build_item_payload(record, store, collection_key)?;
            let result = store.create_items(&[template])?;
            let created = result.successful.get("0").cloned().ok_or_else(|| {
                StoreError::PartialCreate(
                    serde_json::to_string(&result.failed).unwrap_or_default(),
                )
            })?;
            record.link_remote(&created.key);
            if let Some(key) = collection_key {
                store.add_to_collection(key, &created)?;
            }
            Ok(PushOutcome::Added)
        }
    }
}

/// Build the remote payload for a record: the store's template for the
/// record's item type, filled field-by-field, with `extra` carrying the
/// canonical id and the working collection attached.
fn build_item_payload(
    record: &PaperRecord,
    store: &dyn ReferenceStore,
    collection_key: Option<&str>,
) -> Result<ItemTemplate, LibraryError> {
    let item_type = record.item_type.remote_name().ok_or_else(|| {
        LibraryError::Validation(format!(
            "record {} has an item type the remote store does not accept",
            record.id
        ))
    })?;

    let mut template = store.item_template(item_type)?;
    let fields: Vec<String> = template.keys().cloned().collect();
    for field in fields {
        let value = record.template_value(&field);
        template.insert(field, value);
    }
    template.insert("extra".to_string(), Value::String(record.id.clone()));
    if let Some(key) = collection_key {
        template.insert(
            "collections".to_string(),
            Value::Array(vec![Value::String(key.to_string())]),
        );
    }

    let mut checked = store.validate_templates(&[template])?;
    checked.pop().ok_or_else(|| {
        LibraryError::Store(StoreError::Validation(
            "template validation returned no items".to_string(),
        ))
    })
}
