//! Reference-manager store: capability trait and item model

pub mod item;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use item::{record_from_item, records_from_items};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("invalid item: {0}")]
    Validation(String),
    #[error("remote store accepted only part of the batch: {0}")]
    PartialCreate(String),
}

/// An item template: the store's declared fields for one item type,
/// filled field-by-field before a write.
pub type ItemTemplate = serde_json::Map<String, serde_json::Value>;

/// One item of the remote library. `data` is the store's field block,
/// carried verbatim.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RemoteItem {
    pub key: String,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RemoteItem {
    /// A string field of the data block, empty-if-absent.
    pub fn data_str(&self, field: &str) -> &str {
        self.data
            .get(field)
            .and_then(|value| value.as_str())
            .unwrap_or_default()
    }
}

/// Outcome envelope of a batch create: index -> created item, index ->
/// failure description.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateItemsResult {
    #[serde(default)]
    pub successful: HashMap<String, RemoteItem>,
    #[serde(default)]
    pub failed: HashMap<String, serde_json::Value>,
}

/// Full-text payload of an attachment.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Fulltext {
    #[serde(default)]
    pub content: String,
}

/// Capability interface of the reference-manager store. Implementations
/// block the caller.
pub trait ReferenceStore {
    /// Every top-level item of the library, optionally scoped to one
    /// collection.
    fn list_all_items(&self, collection_key: Option<&str>)
        -> Result<Vec<RemoteItem>, StoreError>;

    /// The items of one collection (a snapshot for identity resolution).
    fn collection_items(&self, collection_key: &str) -> Result<Vec<RemoteItem>, StoreError>;

    /// Fetch one item by key.
    fn get_item(&self, key: &str) -> Result<RemoteItem, StoreError>;

    /// Search items by title text.
    fn search_by_title(&self, text: &str) -> Result<Vec<RemoteItem>, StoreError>;

    /// Create items from templates; the result maps batch indices to
    /// created items and failures.
    fn create_items(&self, templates: &[ItemTemplate]) -> Result<CreateItemsResult, StoreError>;

    /// Push an update to an existing item.
    fn update_item(&self, key: &str, template: &ItemTemplate) -> Result<(), StoreError>;

    /// The store's empty template for an item type.
    fn item_template(&self, item_type: &str) -> Result<ItemTemplate, StoreError>;

    /// Validate templates before a write.
    fn validate_templates(&self, templates: &[ItemTemplate])
        -> Result<Vec<ItemTemplate>, StoreError>;

    /// Child items (attachments, notes) of an item.
    fn list_children(&self, key: &str) -> Result<Vec<RemoteItem>, StoreError>;

    /// Full text of an attachment.
    fn get_fulltext(&self, attachment_key: &str) -> Result<Fulltext, StoreError>;

    /// Add an already-created item to a collection.
    fn add_to_collection(&self, collection_key: &str, item: &RemoteItem)
        -> Result<(), StoreError>;
}
