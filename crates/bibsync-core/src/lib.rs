//! bibsync-core: reconciliation engine for a bibliographic library
//!
//! This library maintains a canonical table of paper records synchronized
//! bidirectionally with a reference-manager store and enriched from a
//! scholarly-metadata search API. It provides:
//! - field normalization from both source schemas into one record shape
//! - abstract reconstruction from positional word indices
//! - deterministic batch merge with (title, DOI) deduplication
//! - identity resolution and the create/update/skip outbound protocol
//! - full-text retrieval through remote PDF attachments
//! - CSV export of the library table
//!
//! Remote services are consumed through the `MetadataSource` and
//! `ReferenceStore` capability traits; concrete clients live in their own
//! crates.

pub mod domain;
pub mod error;
pub mod export;
pub mod fulltext;
pub mod library;
pub mod merge;
pub mod sources;
pub mod store;
pub mod sync;
pub mod text;

// Re-export main types for convenience
pub use domain::{Creator, ItemType, PaperRecord, RecordSource, CANONICAL_COLUMNS};
pub use error::LibraryError;
pub use fulltext::{AttachmentInfo, FulltextError, ItemAttachments};
pub use library::{PaperLibrary, TextKind};
pub use merge::{merge_batch, MergeReport};
pub use sources::{MetadataSource, SourceError, Work, WorkQuery};
pub use store::{
    CreateItemsResult, Fulltext, ItemTemplate, ReferenceStore, RemoteItem, StoreError,
};
pub use sync::{pull_remote, push_library, resolve_remote, OutboundReport, PushOutcome};
pub use text::decode_inverted_index;
