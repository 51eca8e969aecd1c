//! # Persisted Content Codec
//!
//! Maps between the `Lesson.content` string and a [`Document`].
//!
//! Two encodings are accepted, detected in this order:
//!
//! 1. Leading non-whitespace `{`: a JSON object `{"blocks": [{"type", "data"}, ...]}`
//! 2. Anything else, or a structured parse that fails: legacy text/HTML,
//!    held verbatim as a single raw paragraph
//!
//! Detection lives only in [`classify_and_parse`]. Malformed content is never
//! an error for the caller; the worst case is one plain block.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::{Block, BlockKind, Document};

/// Serialized form of a document with no blocks
pub const EMPTY_CONTENT: &str = r#"{"blocks":[]}"#;

/// Persisted content after shape detection.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedContent {
    Structured(Document),
    Legacy(String),
}

impl ParsedContent {
    pub fn into_document(self) -> Document {
        match self {
            ParsedContent::Structured(doc) => doc,
            ParsedContent::Legacy(markup) => Document::legacy(markup),
        }
    }
}

/// Raised by the structured decoder; always recovered by the legacy fallback.
#[derive(Debug, thiserror::Error)]
#[error("Structured content did not parse: {0}")]
pub struct StructuredParseFailure(#[from] serde_json::Error);

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("Failed to encode {kind} block: {source}")]
    Block {
        kind: String,
        source: serde_json::Error,
    },
    #[error("Failed to encode document: {0}")]
    Document(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct WireDocument {
    blocks: Vec<WireBlock>,
}

#[derive(Serialize, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Detect the encoding of persisted content and decode it.
///
/// Empty input is an empty structured document. Whitespace-only input is
/// not empty and is kept as legacy text.
pub fn classify_and_parse(raw: &str) -> ParsedContent {
    if raw.is_empty() {
        return ParsedContent::Structured(Document::new());
    }
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        match parse_structured(trimmed) {
            Ok(doc) => return ParsedContent::Structured(doc),
            Err(e) => debug!("Falling back to legacy content: {e}"),
        }
    }
    ParsedContent::Legacy(raw.to_string())
}

pub fn deserialize(raw: &str) -> Document {
    classify_and_parse(raw).into_document()
}

/// As [`deserialize`], treating absent content as empty
pub fn deserialize_opt(raw: Option<&str>) -> Document {
    raw.map(deserialize).unwrap_or_default()
}

/// Encode a document as `{"blocks":[{"type":...,"data":...},...]}`.
///
/// Inverse of [`deserialize`]: pass-through blocks are written back with
/// their original payload, and untouched legacy content is written back
/// verbatim so it keeps rendering as it did. Once edited, legacy content is
/// saved in the structured form.
pub fn serialize(document: &Document) -> Result<String, SerializeError> {
    if let Some(markup) = document.legacy_markup() {
        return Ok(markup.to_string());
    }
    let blocks = document
        .blocks()
        .iter()
        .map(|block| {
            let data = block.payload().map_err(|source| SerializeError::Block {
                kind: block.type_name().to_string(),
                source,
            })?;
            Ok(WireBlock {
                kind: block.type_name().to_string(),
                data,
            })
        })
        .collect::<Result<Vec<_>, SerializeError>>()?;
    Ok(serde_json::to_string(&WireDocument { blocks })?)
}

fn parse_structured(text: &str) -> Result<Document, StructuredParseFailure> {
    let wire: WireDocument = serde_json::from_str(text)?;
    Ok(wire.blocks.into_iter().map(decode_block).collect())
}

fn decode_block(wire: WireBlock) -> Block {
    let Ok(kind) = wire.kind.parse::<BlockKind>() else {
        return Block::opaque(wire.kind, wire.data);
    };
    match Block::from_payload(kind, wire.data.clone()) {
        Ok(block) => block,
        Err(e) => {
            debug!("Keeping {} block as pass-through: {e}", wire.kind);
            Block::opaque(wire.kind, wire.data)
        }
    }
}
