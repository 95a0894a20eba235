//! Engine-level error type

use thiserror::Error;

use crate::sources::SourceError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{0}")]
    Validation(String),
    #[error("paper with id {0} not found in library")]
    RecordNotFound(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to export library: {0}")]
    Export(String),
}
