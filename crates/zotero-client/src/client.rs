//! Reference library client

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use bibsync_core::{
    CreateItemsResult, Fulltext, ItemTemplate, ReferenceStore, RemoteItem, StoreError,
};

use crate::config::ZoteroConfig;

const API_VERSION: &str = "3";
/// Page size for "everything" listings.
const PAGE_SIZE: usize = 100;

pub struct ZoteroClient {
    http: Client,
    config: ZoteroConfig,
}

impl ZoteroClient {
    pub fn new(config: ZoteroConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|error| StoreError::Http(error.to_string()))?;
        Ok(Self { http, config })
    }

    fn library_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.library_prefix())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Zotero-API-Key", &self.config.api_key)
            .header("Zotero-API-Version", API_VERSION)
    }

    fn send(&self, request: RequestBuilder, context: &str) -> Result<Response, StoreError> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|error| StoreError::Http(format!("{context}: {error}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(context.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Http(format!("{context}: status {status}")));
        }
        Ok(response)
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<T, StoreError> {
        let response = self.send(self.http.get(url).query(params), context)?;
        response
            .json()
            .map_err(|error| StoreError::Parse(format!("{context}: {error}")))
    }

    /// Walk a paginated listing to its end.
    fn paginate(&self, path: &str) -> Result<Vec<RemoteItem>, StoreError> {
        let url = self.library_url(path);
        let mut items: Vec<RemoteItem> = Vec::new();
        let mut start = 0usize;

        loop {
            let start_param = start.to_string();
            let limit_param = PAGE_SIZE.to_string();
            let page: Vec<RemoteItem> = self.get_json(
                &url,
                &[("start", start_param.as_str()), ("limit", limit_param.as_str())],
                path,
            )?;
            let page_size = page.len();
            items.extend(page);
            if page_size < PAGE_SIZE {
                break;
            }
            start += PAGE_SIZE;
        }

        debug!(path, count = items.len(), "listed remote items");
        Ok(items)
    }

    /// Current version of an item, for optimistic-concurrency headers.
    fn item_version(&self, key: &str) -> Result<u64, StoreError> {
        let item = self.get_item(key)?;
        item.version.ok_or_else(|| {
            StoreError::Parse(format!("item {key} carries no version"))
        })
    }

    fn write_version(&self, key: &str, template: &ItemTemplate) -> Result<u64, StoreError> {
        match template.get("version").and_then(Value::as_u64) {
            Some(version) => Ok(version),
            None => self.item_version(key),
        }
    }
}

impl ReferenceStore for ZoteroClient {
    fn list_all_items(
        &self,
        collection_key: Option<&str>,
    ) -> Result<Vec<RemoteItem>, StoreError> {
        match collection_key {
            Some(key) => self.paginate(&format!("/collections/{key}/items/top")),
            None => self.paginate("/items/top"),
        }
    }

    fn collection_items(&self, collection_key: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.paginate(&format!("/collections/{collection_key}/items"))
    }

    fn get_item(&self, key: &str) -> Result<RemoteItem, StoreError> {
        self.get_json(
            &self.library_url(&format!("/items/{key}")),
            &[],
            &format!("item {key}"),
        )
    }

    fn search_by_title(&self, text: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.get_json(
            &self.library_url("/items"),
            &[("q", text), ("qmode", "titleCreatorYear")],
            "title search",
        )
    }

    fn create_items(&self, templates: &[ItemTemplate]) -> Result<CreateItemsResult, StoreError> {
        let response = self.send(
            self.http
                .post(self.library_url("/items"))
                .json(&templates),
            "create items",
        )?;
        response
            .json()
            .map_err(|error| StoreError::Parse(format!("create items: {error}")))
    }

    fn update_item(&self, key: &str, template: &ItemTemplate) -> Result<(), StoreError> {
        let version = self.write_version(key, template)?;
        self.send(
            self.http
                .put(self.library_url(&format!("/items/{key}")))
                .header("If-Unmodified-Since-Version", version)
                .json(template),
            &format!("update item {key}"),
        )?;
        Ok(())
    }

    fn item_template(&self, item_type: &str) -> Result<ItemTemplate, StoreError> {
        // Templates are served globally, outside any library.
        self.get_json(
            &format!("{}/items/new", self.config.base_url),
            &[("itemType", item_type)],
            &format!("template for {item_type}"),
        )
    }

    fn validate_templates(
        &self,
        templates: &[ItemTemplate],
    ) -> Result<Vec<ItemTemplate>, StoreError> {
        for template in templates {
            let item_type = template
                .get("itemType")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if item_type.is_empty() {
                return Err(StoreError::Validation(
                    "item template is missing its item type".to_string(),
                ));
            }
        }
        Ok(templates.to_vec())
    }

    fn list_children(&self, key: &str) -> Result<Vec<RemoteItem>, StoreError> {
        self.get_json(
            &self.library_url(&format!("/items/{key}/children")),
            &[],
            &format!("children of {key}"),
        )
    }

    fn get_fulltext(&self, attachment_key: &str) -> Result<Fulltext, StoreError> {
        self.get_json(
            &self.library_url(&format!("/items/{attachment_key}/fulltext")),
            &[],
            &format!("fulltext of {attachment_key}"),
        )
    }

    fn add_to_collection(
        &self,
        collection_key: &str,
        item: &RemoteItem,
    ) -> Result<(), StoreError> {
        let mut collections: Vec<String> = item
            .data
            .get("collections")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if !collections.iter().any(|key| key == collection_key) {
            collections.push(collection_key.to_string());
        }

        let version = match item.version {
            Some(version) => version,
            None => self.item_version(&item.key)?,
        };
        self.send(
            self.http
                .patch(self.library_url(&format!("/items/{}", item.key)))
                .header("If-Unmodified-Since-Version", version)
                .json(&serde_json::json!({ "collections": collections })),
            &format!("add item {} to collection {collection_key}", item.key),
        )?;
        Ok(())
    }
}
