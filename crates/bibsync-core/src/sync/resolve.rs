//! Identity resolution against the remote store

use tracing::debug;

use crate::domain::PaperRecord;
use crate::store::{ReferenceStore, RemoteItem, StoreError};

/// Find the remote counterpart of a canonical record, if any.
///
/// Key lookup is authoritative: a record carrying a remote key resolves
/// through the supplied collection snapshot, or by a direct fetch when no
/// snapshot is given. A failed key lookup means "not found", never a fatal
/// error. Only keyless records fall back to an exact-title search; the
/// first hit with the identical title wins. No fuzzy matching.
pub fn resolve_remote(
    record: &PaperRecord,
    snapshot: Option<&[RemoteItem]>,
    store: &dyn ReferenceStore,
) -> Result<Option<RemoteItem>, StoreError> {
    if let Some(key) = record.zotero_key.as_deref().filter(|k| !k.is_empty()) {
        let found = match snapshot {
            Some(items) => items.iter().find(|item| item.key == key).cloned(),
            None => match store.get_item(key) {
                Ok(item) => Some(item),
                Err(error) => {
                    debug!(key, %error, "remote key lookup failed; treating as not found");
                    None
                }
            },
        };
        return Ok(found);
    }

    let Some(title) = record.title_key() else {
        return Ok(None);
    };
    let hits = store.search_by_title(title)?;
    Ok(hits
        .into_iter()
        .find(|item| item.data_str("title") == title))
}
