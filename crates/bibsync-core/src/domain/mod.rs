//! Canonical record domain model

mod creator;
mod item_type;
mod record;

pub use creator::Creator;
pub use item_type::ItemType;
pub use record::{PaperRecord, RecordSource, CANONICAL_COLUMNS};
