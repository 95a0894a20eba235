//! zotero-client: blocking client for the Zotero web API v3
//!
//! Implements the `ReferenceStore` capability of `bibsync-core`: item CRUD,
//! collections, child attachments, full-text retrieval, and item templates.

mod client;
mod config;

pub use client::ZoteroClient;
pub use config::{LibraryType, ZoteroConfig};
