use super::Block;

/// Where a document's content came from when it was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Structured `{"blocks": [...]}` content, or content built in memory
    #[default]
    Structured,
    /// Pre-block lesson text or HTML, held as a single raw paragraph
    Legacy,
}

/// Ordered sequence of blocks making up one lesson's content.
///
/// Order is display and serialization order. An empty document is valid and
/// renders as "no content". Mutation outside this crate goes through
/// [`crate::editing::EditingSession`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    origin: ContentOrigin,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            origin: ContentOrigin::Structured,
        }
    }

    /// Wrap legacy text as one raw-markup paragraph, text kept verbatim
    pub fn legacy(markup: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::paragraph(markup)],
            origin: ContentOrigin::Legacy,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn origin(&self) -> ContentOrigin {
        self.origin
    }

    pub fn is_legacy(&self) -> bool {
        self.origin == ContentOrigin::Legacy
    }

    /// The raw markup of an untouched legacy document
    pub fn legacy_markup(&self) -> Option<&str> {
        match (self.origin, self.blocks.as_slice()) {
            (ContentOrigin::Legacy, [Block::Paragraph(p)]) => Some(p.text.as_str()),
            _ => None,
        }
    }

    // Any edit turns a legacy document into authored block content.

    pub(crate) fn insert(&mut self, index: usize, block: Block) {
        self.origin = ContentOrigin::Structured;
        self.blocks.insert(index, block);
    }

    pub(crate) fn replace(&mut self, index: usize, block: Block) -> Block {
        self.origin = ContentOrigin::Structured;
        std::mem::replace(&mut self.blocks[index], block)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Block {
        self.origin = ContentOrigin::Structured;
        self.blocks.remove(index)
    }
}

impl FromIterator<Block> for Document {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        Self::from_blocks(iter.into_iter().collect())
    }
}
