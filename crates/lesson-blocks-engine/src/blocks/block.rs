use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{BlockError, BlockKind, TableGrid};

/// Payload of a heading block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingData {
    /// Nominally 1-6; anything else is tolerated and clamped at render time
    #[serde(default = "default_heading_level")]
    pub level: i64,
    #[serde(default)]
    pub text: String,
}

fn default_heading_level() -> i64 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphData {
    #[serde(default)]
    pub text: String,
}

/// Visual style of a list block.
///
/// Checklists carry no per-item checked state; they render as a styled
/// unordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
    Checklist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub style: ListStyle,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeData {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteData {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Persisted shape of a table block. `content[0]` is the header row when
/// `with_headings` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(rename = "withHeadings", default)]
    pub with_headings: bool,
    #[serde(default, deserialize_with = "cells_or_empty")]
    pub content: Vec<Vec<String>>,
}

/// Reads `null` rows and cells as empty so they never survive into the model.
fn cells_or_empty<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<Option<Vec<Option<String>>>>> = Option::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| {
            row.unwrap_or_default()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect()
        })
        .collect())
}

/// A block whose `type` this model does not understand, or whose payload did
/// not fit its declared kind. Kept verbatim so a re-save loses nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueBlock {
    pub kind: String,
    pub data: Value,
}

/// One unit of lesson content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(HeadingData),
    Paragraph(ParagraphData),
    List(ListData),
    Code(CodeData),
    Quote(QuoteData),
    Delimiter,
    Table(TableData),
    Unknown(OpaqueBlock),
}

impl Block {
    /// Build a block from a kind name and an optional initial payload.
    ///
    /// Without a payload the kind's defaults are used. Fields missing from a
    /// payload take their per-field defaults.
    pub fn create(kind: &str, payload: Option<Value>) -> Result<Self, BlockError> {
        let kind: BlockKind = kind.parse()?;
        match payload {
            None => Ok(Self::new(kind)),
            Some(data) => Self::from_payload(kind, data)
                .map_err(|source| BlockError::InvalidBlockPayload { kind, source }),
        }
    }

    /// Default block for a kind
    pub fn new(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => Self::heading(default_heading_level(), ""),
            BlockKind::Paragraph => Self::paragraph(""),
            BlockKind::List => Self::list(ListStyle::Unordered, vec![String::new()]),
            BlockKind::Code => Self::code(""),
            BlockKind::Quote => Self::quote("", None),
            BlockKind::Delimiter => Block::Delimiter,
            BlockKind::Table => Self::table(&TableGrid::placeholder()),
        }
    }

    pub fn heading(level: i64, text: impl Into<String>) -> Self {
        Block::Heading(HeadingData {
            level,
            text: text.into(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(ParagraphData { text: text.into() })
    }

    pub fn list(style: ListStyle, items: Vec<String>) -> Self {
        Block::List(ListData { style, items })
    }

    pub fn code(code: impl Into<String>) -> Self {
        Block::Code(CodeData { code: code.into() })
    }

    pub fn quote(text: impl Into<String>, caption: Option<String>) -> Self {
        Block::Quote(QuoteData {
            text: text.into(),
            caption,
        })
    }

    pub fn table(grid: &TableGrid) -> Self {
        Block::Table(grid.save())
    }

    pub fn opaque(kind: impl Into<String>, data: Value) -> Self {
        Block::Unknown(OpaqueBlock {
            kind: kind.into(),
            data,
        })
    }

    /// Decode a persisted payload for a known kind. A `null` payload reads
    /// as an empty object.
    pub fn from_payload(kind: BlockKind, data: Value) -> Result<Self, serde_json::Error> {
        let data = match data {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Ok(match kind {
            BlockKind::Heading => Block::Heading(serde_json::from_value(data)?),
            BlockKind::Paragraph => Block::Paragraph(serde_json::from_value(data)?),
            BlockKind::List => Block::List(serde_json::from_value(data)?),
            BlockKind::Code => Block::Code(serde_json::from_value(data)?),
            BlockKind::Quote => Block::Quote(serde_json::from_value(data)?),
            BlockKind::Delimiter => {
                if !data.is_object() {
                    return Err(serde::de::Error::custom("delimiter data must be an object"));
                }
                Block::Delimiter
            }
            BlockKind::Table => Block::Table(serde_json::from_value(data)?),
        })
    }

    /// Payload as written to the `data` field of a persisted block
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Block::Heading(d) => serde_json::to_value(d),
            Block::Paragraph(d) => serde_json::to_value(d),
            Block::List(d) => serde_json::to_value(d),
            Block::Code(d) => serde_json::to_value(d),
            Block::Quote(d) => serde_json::to_value(d),
            Block::Delimiter => Ok(Value::Object(Map::new())),
            Block::Table(d) => serde_json::to_value(d),
            Block::Unknown(opaque) => Ok(opaque.data.clone()),
        }
    }

    /// The known kind, or `None` for pass-through blocks
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Block::Heading(_) => Some(BlockKind::Heading),
            Block::Paragraph(_) => Some(BlockKind::Paragraph),
            Block::List(_) => Some(BlockKind::List),
            Block::Code(_) => Some(BlockKind::Code),
            Block::Quote(_) => Some(BlockKind::Quote),
            Block::Delimiter => Some(BlockKind::Delimiter),
            Block::Table(_) => Some(BlockKind::Table),
            Block::Unknown(_) => None,
        }
    }

    /// Name written to the `type` field; pass-through blocks keep their original name
    pub fn type_name(&self) -> &str {
        match self {
            Block::Unknown(opaque) => &opaque.kind,
            known => known.kind().map_or("unknown", BlockKind::as_str),
        }
    }
}
