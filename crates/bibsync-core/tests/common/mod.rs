//! In-memory fake collaborators for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{json, Value};

use bibsync_core::{
    CreateItemsResult, Fulltext, ItemTemplate, MetadataSource, ReferenceStore, RemoteItem,
    SourceError, StoreError, Work, WorkQuery,
};

/// An in-memory reference store that records every call it receives.
pub struct FakeStore {
    pub items: RefCell<Vec<RemoteItem>>,
    pub children: RefCell<HashMap<String, Vec<RemoteItem>>>,
    pub fulltexts: RefCell<HashMap<String, String>>,
    /// Titles whose create call fails with a transport error.
    pub fail_create_titles: Vec<String>,
    /// Titles whose create call returns an empty `successful` map.
    pub reject_create_titles: Vec<String>,
    pub calls: RefCell<Vec<String>>,
    next_key: RefCell<u32>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            children: RefCell::new(HashMap::new()),
            fulltexts: RefCell::new(HashMap::new()),
            fail_create_titles: Vec::new(),
            reject_create_titles: Vec::new(),
            calls: RefCell::new(Vec::new()),
            next_key: RefCell::new(0),
        }
    }

    pub fn with_item(self, key: &str, data: Value) -> Self {
        self.items.borrow_mut().push(RemoteItem {
            key: key.to_string(),
            version: Some(1),
            data: data.as_object().cloned().unwrap_or_default(),
        });
        self
    }

    pub fn with_child(self, parent_key: &str, child_key: &str, content_type: &str) -> Self {
        self.children
            .borrow_mut()
            .entry(parent_key.to_string())
            .or_default()
            .push(RemoteItem {
                key: child_key.to_string(),
                version: Some(1),
                data: json!({ "contentType": content_type, "itemType": "attachment" })
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            });
        self
    }

    pub fn with_fulltext(self, attachment_key: &str, content: &str) -> Self {
        self.fulltexts
            .borrow_mut()
            .insert(attachment_key.to_string(), content.to_string());
        self
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record_call(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl ReferenceStore for FakeStore {
    fn list_all_items(
        &self,
        collection_key: Option<&str>,
    ) -> Result<Vec<RemoteItem>, StoreError> {
        self.record_call(format!("list:{}", collection_key.unwrap_or("*")));
        Ok(self.items.borrow().clone())
    }

    fn collection_items(&self, collection_key: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.record_call(format!("collection:{collection_key}"));
        Ok(self.items.borrow().clone())
    }

    fn get_item(&self, key: &str) -> Result<RemoteItem, StoreError> {
        self.record_call(format!("get:{key}"));
        self.items
            .borrow()
            .iter()
            .find(|item| item.key == key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn search_by_title(&self, text: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.record_call(format!("search:{text}"));
        // The real store matches loosely on title text; the resolver is the
        // one responsible for exact equality.
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|item| item.data_str("title").contains(text))
            .cloned()
            .collect())
    }

    fn create_items(&self, templates: &[ItemTemplate]) -> Result<CreateItemsResult, StoreError> {
        self.record_call("create".to_string());

        let mut result = CreateItemsResult::default();
        for (index, template) in templates.iter().enumerate() {
            let title = template
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if self.fail_create_titles.iter().any(|t| t == title) {
                return Err(StoreError::Http("simulated transport failure".to_string()));
            }
            if self.reject_create_titles.iter().any(|t| t == title) {
                result
                    .failed
                    .insert(index.to_string(), json!({ "code": 400, "message": "rejected" }));
                continue;
            }

            let mut key_counter = self.next_key.borrow_mut();
            *key_counter += 1;
            let item = RemoteItem {
                key: format!("NEW{}", *key_counter),
                version: Some(1),
                data: template.clone(),
            };
            self.items.borrow_mut().push(item.clone());
            result.successful.insert(index.to_string(), item);
        }
        Ok(result)
    }

    fn update_item(&self, key: &str, template: &ItemTemplate) -> Result<(), StoreError> {
        self.record_call(format!("update:{key}"));
        let mut items = self.items.borrow_mut();
        let item = items
            .iter_mut()
            .find(|item| item.key == key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        item.data = template.clone();
        Ok(())
    }

    fn item_template(&self, item_type: &str) -> Result<ItemTemplate, StoreError> {
        self.record_call(format!("template:{item_type}"));
        let mut template = json!({
            "itemType": item_type,
            "title": "",
            "abstractNote": "",
            "date": "",
            "DOI": "",
            "volume": "",
            "issue": "",
            "pages": "",
            "language": "",
            "url": "",
            "rights": "",
            "extra": "",
            "creators": [],
            "tags": [],
            "collections": [],
        })
        .as_object()
        .cloned()
        .unwrap_or_default();
        if item_type == "conferencePaper" {
            template.insert("proceedingsTitle".to_string(), json!(""));
            template.insert("conferenceName".to_string(), json!(""));
            template.insert("place".to_string(), json!(""));
        } else {
            template.insert("publicationTitle".to_string(), json!(""));
        }
        Ok(template)
    }

    fn validate_templates(
        &self,
        templates: &[ItemTemplate],
    ) -> Result<Vec<ItemTemplate>, StoreError> {
        self.record_call("validate".to_string());
        Ok(templates.to_vec())
    }

    fn list_children(&self, key: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.record_call(format!("children:{key}"));
        Ok(self
            .children
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    fn get_fulltext(&self, attachment_key: &str) -> Result<Fulltext, StoreError> {
        self.record_call(format!("fulltext:{attachment_key}"));
        self.fulltexts
            .borrow()
            .get(attachment_key)
            .map(|content| Fulltext {
                content: content.clone(),
            })
            .ok_or_else(|| StoreError::NotFound(attachment_key.to_string()))
    }

    fn add_to_collection(
        &self,
        collection_key: &str,
        item: &RemoteItem,
    ) -> Result<(), StoreError> {
        self.record_call(format!("addcoll:{collection_key}:{}", item.key));
        Ok(())
    }
}

/// A metadata source serving a fixed set of works.
pub struct FakeSource {
    pub works: Vec<Work>,
}

impl MetadataSource for FakeSource {
    fn search_works(
        &self,
        _query: &WorkQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Work>, SourceError> {
        let mut works = self.works.clone();
        if let Some(limit) = limit {
            works.truncate(limit);
        }
        Ok(works)
    }

    fn count_works(&self, _query: &WorkQuery) -> Result<u64, SourceError> {
        Ok(self.works.len() as u64)
    }

    fn work_by_doi(&self, doi: &str) -> Result<Option<Work>, SourceError> {
        Ok(self
            .works
            .iter()
            .find(|work| work.doi.as_deref() == Some(doi))
            .cloned())
    }
}
