use crate::editing::BlockId;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub changed: Vec<BlockId>,
    pub removed: Vec<BlockId>,
    pub version: u64,
}
