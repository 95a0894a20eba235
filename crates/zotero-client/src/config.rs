//! Client configuration

use std::env;

use bibsync_core::StoreError;

const DEFAULT_BASE_URL: &str = "https://api.zotero.org";

/// Whether the library belongs to a user or a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryType {
    User,
    Group,
}

impl LibraryType {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "user" => Ok(LibraryType::User),
            "group" => Ok(LibraryType::Group),
            other => Err(StoreError::Validation(format!(
                "library type must be 'user' or 'group', got '{other}'"
            ))),
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            LibraryType::User => "users",
            LibraryType::Group => "groups",
        }
    }
}

/// Credentials and addressing for one remote library. Missing credentials
/// are a validation error raised here, before any remote call.
#[derive(Clone, Debug)]
pub struct ZoteroConfig {
    pub api_key: String,
    pub library_id: String,
    pub library_type: LibraryType,
    pub base_url: String,
}

impl ZoteroConfig {
    pub fn new(
        api_key: impl Into<String>,
        library_id: impl Into<String>,
        library_type: LibraryType,
    ) -> Result<Self, StoreError> {
        let api_key = api_key.into();
        let library_id = library_id.into();
        if api_key.is_empty() {
            return Err(StoreError::Validation(
                "an API key is required to access the reference library".to_string(),
            ));
        }
        if library_id.is_empty() {
            return Err(StoreError::Validation(
                "a library id is required to access the reference library".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            library_id,
            library_type,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Read configuration from `ZOTERO_API_KEY`, `ZOTERO_LIBRARY_ID`, and
    /// `ZOTERO_LIBRARY_TYPE` (defaults to `user`).
    pub fn from_env() -> Result<Self, StoreError> {
        let library_type = match env::var("ZOTERO_LIBRARY_TYPE") {
            Ok(value) if !value.is_empty() => LibraryType::parse(&value)?,
            _ => LibraryType::User,
        };
        Self::new(
            env::var("ZOTERO_API_KEY").unwrap_or_default(),
            env::var("ZOTERO_LIBRARY_ID").unwrap_or_default(),
            library_type,
        )
    }

    /// URL prefix of the configured library.
    pub fn library_prefix(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.library_type.path_segment(),
            self.library_id
        )
    }
}
