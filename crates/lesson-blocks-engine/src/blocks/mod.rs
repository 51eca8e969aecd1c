//! # Block Model
//!
//! The closed set of lesson content blocks and the document that orders them.
//!
//! ## Modules
//!
//! - **`kind`**: `BlockKind`, the closed set of kinds and their wire names
//! - **`block`**: `Block` and the per-kind payload types
//! - **`table`**: `TableGrid`, the header-aware authoring view of a table
//! - **`document`**: `Document`, an ordered block sequence plus its origin
//! - **`inline`**: inline marks carried inside rich-text strings
//!
//! ## Key Invariants
//!
//! - Blocks never reference other blocks; a document is a flat sequence
//! - Rich text is trusted markup and is never re-escaped
//! - Blocks the model cannot decode are kept as opaque pass-through blocks

pub mod block;
pub mod document;
pub mod inline;
pub mod kind;
pub mod table;

pub use block::{
    Block, CodeData, HeadingData, ListData, ListStyle, OpaqueBlock, ParagraphData, QuoteData,
    TableData,
};
pub use document::{ContentOrigin, Document};
pub use inline::InlineMark;
pub use kind::BlockKind;
pub use table::{TableError, TableGrid};

#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("Invalid block kind: {0}")]
    InvalidBlockKind(String),
    #[error("Invalid payload for {kind} block: {source}")]
    InvalidBlockPayload {
        kind: BlockKind,
        source: serde_json::Error,
    },
}
