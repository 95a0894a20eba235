//! openalex-client: blocking client for the OpenAlex works API
//!
//! Implements the `MetadataSource` capability of `bibsync-core`: paginated
//! works search, result counting, and DOI lookup, with a capped exponential
//! backoff on rate limiting.

mod client;

pub use client::{OpenAlexClient, OpenAlexConfig};
