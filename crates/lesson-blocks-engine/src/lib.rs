pub mod blocks;
pub mod codec;
pub mod context;
pub mod editing;
pub mod io;
pub mod models;
pub mod render;
pub mod services;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{Block, BlockKind, ContentOrigin, Document, ListStyle, TableGrid};
pub use codec::{ParsedContent, classify_and_parse, deserialize, serialize};
pub use context::{KeyValueStore, MemoryKeyValueStore, SessionContext, UserProfile};
pub use editing::{BlockId, Cmd, EditingSession, Patch, SessionError, SessionState, TableEdit};
pub use io::*;
pub use models::*;
pub use render::{render_block, render_document, render_text};
pub use services::{LessonService, RenderedLesson, ServiceError};
