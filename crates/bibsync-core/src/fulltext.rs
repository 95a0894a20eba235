//! Full-text retrieval through remote attachments

use thiserror::Error;

use crate::store::{Fulltext, ReferenceStore, RemoteItem, StoreError};

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum FulltextError {
    #[error("no attachments found for item {key}")]
    NoAttachments { key: String },
    #[error("no PDF attachment found for item {key}")]
    NoPdfAttachment { key: String },
    #[error(
        "attachment {attachment_key} exists but its full text could not be \
         retrieved; re-syncing the attachment through the reference manager \
         UI may recover it"
    )]
    Unretrievable { attachment_key: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Descriptive view of one attachment of an item.
#[derive(Clone, Debug)]
pub struct AttachmentInfo {
    pub key: String,
    pub content_type: String,
    pub title: Option<String>,
    pub link_mode: Option<String>,
    pub url: Option<String>,
}

/// An item together with its attachments.
#[derive(Clone, Debug)]
pub struct ItemAttachments {
    pub item: RemoteItem,
    pub attachments: Vec<AttachmentInfo>,
}

/// List an item's attachments: children carrying both a key and a content
/// type.
pub fn attachment_info(
    store: &dyn ReferenceStore,
    item_key: &str,
) -> Result<ItemAttachments, StoreError> {
    let item = store.get_item(item_key)?;
    let children = store.list_children(item_key)?;

    let attachments = children
        .iter()
        .filter(|child| !child.key.is_empty() && !child.data_str("contentType").is_empty())
        .map(|child| AttachmentInfo {
            key: child.key.clone(),
            content_type: child.data_str("contentType").to_string(),
            title: optional(child.data_str("title")),
            link_mode: optional(child.data_str("linkMode")),
            url: optional(child.data_str("url")),
        })
        .collect();

    Ok(ItemAttachments { item, attachments })
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Retrieve the full text of an item through its first PDF attachment.
///
/// Fails with `NoAttachments` when the item has no attachments at all,
/// `NoPdfAttachment` when none is a PDF, and `Unretrievable` when the PDF
/// exists but the store cannot deliver its text — a known limitation of the
/// upstream attachment indexing that only a manual re-sync resolves. There
/// is exactly one fallback tier: the first PDF found, with no ranking among
/// several.
pub fn retrieve_fulltext(
    store: &dyn ReferenceStore,
    item_key: &str,
) -> Result<Fulltext, FulltextError> {
    let info = attachment_info(store, item_key)?;

    if info.attachments.is_empty() {
        return Err(FulltextError::NoAttachments {
            key: item_key.to_string(),
        });
    }

    let pdf = info
        .attachments
        .iter()
        .find(|attachment| attachment.content_type == PDF_CONTENT_TYPE)
        .ok_or_else(|| FulltextError::NoPdfAttachment {
            key: item_key.to_string(),
        })?;

    store
        .get_fulltext(&pdf.key)
        .map_err(|_| FulltextError::Unretrievable {
            attachment_key: pdf.key.clone(),
        })
}
