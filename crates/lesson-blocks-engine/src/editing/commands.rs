use crate::blocks::{Block, TableError, TableGrid};
use crate::editing::BlockId;

/// An edit to a session's block sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert `block` before position `at` (`at == len` appends)
    InsertBlock { at: usize, block: Block },
    /// Replace the block's content, keeping its id and position
    UpdateBlock { id: BlockId, block: Block },
    RemoveBlock { id: BlockId },
    /// Move a block so it ends up at position `to`
    MoveBlock { id: BlockId, to: usize },
    /// Cell-level edit of a table block through its header-aware grid
    EditTable { id: BlockId, edit: TableEdit },
}

/// Table edits, addressed in visual rows (header, when present, is row 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEdit {
    SetCell {
        row: usize,
        column: usize,
        text: String,
    },
    AddRow,
    AddColumn,
    RemoveRow(usize),
    RemoveColumn(usize),
    SetHeadings(bool),
}

impl TableEdit {
    pub(crate) fn apply_to(self, grid: &mut TableGrid) -> Result<(), TableError> {
        match self {
            TableEdit::SetCell { row, column, text } => grid.set_cell(row, column, text),
            TableEdit::AddRow => {
                grid.add_row();
                Ok(())
            }
            TableEdit::AddColumn => {
                grid.add_column();
                Ok(())
            }
            TableEdit::RemoveRow(row) => grid.remove_row(row).map(|_| ()),
            TableEdit::RemoveColumn(column) => grid.remove_column(column),
            TableEdit::SetHeadings(enabled) => {
                grid.set_headings(enabled);
                Ok(())
            }
        }
    }
}
