use std::fmt;
use std::str::FromStr;

use super::BlockError;

/// The closed set of block kinds a lesson document can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    List,
    Code,
    Quote,
    Delimiter,
    Table,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Heading,
        BlockKind::Paragraph,
        BlockKind::List,
        BlockKind::Code,
        BlockKind::Quote,
        BlockKind::Delimiter,
        BlockKind::Table,
    ];

    /// Name written to the `type` field of a persisted block
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Quote => "quote",
            BlockKind::Delimiter => "delimiter",
            BlockKind::Table => "table",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // The authoring widget stored headings under its tool name.
            "heading" | "header" => Ok(BlockKind::Heading),
            "paragraph" => Ok(BlockKind::Paragraph),
            "list" => Ok(BlockKind::List),
            "code" => Ok(BlockKind::Code),
            "quote" => Ok(BlockKind::Quote),
            "delimiter" => Ok(BlockKind::Delimiter),
            "table" => Ok(BlockKind::Table),
            other => Err(BlockError::InvalidBlockKind(other.to_string())),
        }
    }
}
