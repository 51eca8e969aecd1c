//! # Block Rendering
//!
//! Pure functions from blocks to display output, shared by read-only lesson
//! views and authoring previews.
//!
//! - **`html`**: trusted-markup HTML, one element per block
//! - **`text`**: plain text for excerpts and terminals
//!
//! Rendering never fails. Unknown blocks become a visible placeholder and
//! out-of-range heading levels are clamped.

pub mod html;
pub mod text;

pub use html::{render_block, render_document};
pub use text::render_text;
