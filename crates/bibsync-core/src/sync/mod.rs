//! Two-way synchronization between the canonical table and the remote store

mod inbound;
mod outbound;
mod resolve;

pub use inbound::pull_remote;
pub use outbound::{push_library, OutboundReport, PushOutcome};
pub use resolve::resolve_remote;
