use super::TableData;

const PLACEHOLDER_COLUMNS: usize = 3;
const PLACEHOLDER_ROWS: usize = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Row {row} is out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("Column {column} is out of range (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}

/// Authoring representation of a table: an optional header section plus body
/// rows.
///
/// Rows are addressed visually: when a header exists it is row 0 and body
/// rows follow. Saving emits the header as `content[0]` with
/// `withHeadings = true`; without a header only body rows are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new(header: Option<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Grid inserted for a freshly created table block
    pub fn placeholder() -> Self {
        let header = (1..=PLACEHOLDER_COLUMNS)
            .map(|c| format!("Header {c}"))
            .collect();
        let rows = (1..=PLACEHOLDER_ROWS)
            .map(|r| {
                (1..=PLACEHOLDER_COLUMNS)
                    .map(|c| format!("Cell {r}.{c}"))
                    .collect()
            })
            .collect();
        Self::new(Some(header), rows)
    }

    pub fn from_data(data: &TableData) -> Self {
        match data.content.split_first() {
            Some((header, rows)) if data.with_headings => {
                Self::new(Some(header.clone()), rows.to_vec())
            }
            _ => Self::new(None, data.content.clone()),
        }
    }

    /// Persisted shape; the header section, if any, becomes row 0.
    pub fn save(&self) -> TableData {
        let mut content = Vec::with_capacity(self.row_count());
        if let Some(header) = &self.header {
            content.push(header.clone());
        }
        content.extend(self.rows.iter().cloned());
        TableData {
            with_headings: self.header.is_some(),
            content,
        }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Visual row count, header included
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    /// Width of the widest row
    pub fn column_count(&self) -> usize {
        self.header
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.visual_row(row)?.get(column).map(String::as_str)
    }

    /// Set a cell; short rows are padded with empty cells up to `column`.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        text: impl Into<String>,
    ) -> Result<(), TableError> {
        let columns = self.column_count();
        if column >= columns {
            return Err(TableError::ColumnOutOfRange { column, columns });
        }
        let rows = self.row_count();
        let target = self
            .visual_row_mut(row)
            .ok_or(TableError::RowOutOfRange { row, rows })?;
        if target.len() <= column {
            target.resize(column + 1, String::new());
        }
        target[column] = text.into();
        Ok(())
    }

    /// Append an empty body row as wide as the table (at least one cell)
    pub fn add_row(&mut self) {
        let width = self.column_count().max(1);
        self.rows.push(vec![String::new(); width]);
    }

    /// Append an empty cell to every row
    pub fn add_column(&mut self) {
        let width = self.column_count();
        for row in self.header.iter_mut().chain(self.rows.iter_mut()) {
            row.resize(width, String::new());
            row.push(String::new());
        }
    }

    pub fn remove_row(&mut self, row: usize) -> Result<Vec<String>, TableError> {
        let rows = self.row_count();
        if self.header.is_some() {
            if row == 0 {
                return Ok(self.header.take().unwrap_or_default());
            }
            if row - 1 < self.rows.len() {
                return Ok(self.rows.remove(row - 1));
            }
        } else if row < self.rows.len() {
            return Ok(self.rows.remove(row));
        }
        Err(TableError::RowOutOfRange { row, rows })
    }

    pub fn remove_column(&mut self, column: usize) -> Result<(), TableError> {
        let columns = self.column_count();
        if column >= columns {
            return Err(TableError::ColumnOutOfRange { column, columns });
        }
        for row in self.header.iter_mut().chain(self.rows.iter_mut()) {
            if column < row.len() {
                row.remove(column);
            }
        }
        Ok(())
    }

    /// Toggle the header section. Turning headings on promotes the first
    /// body row (or adds an empty one); turning them off demotes the header
    /// back into the body.
    pub fn set_headings(&mut self, enabled: bool) {
        match (enabled, self.header.take()) {
            (true, Some(header)) => self.header = Some(header),
            (true, None) => {
                self.header = Some(if self.rows.is_empty() {
                    vec![String::new(); self.column_count().max(1)]
                } else {
                    self.rows.remove(0)
                });
            }
            (false, Some(header)) => self.rows.insert(0, header),
            (false, None) => {}
        }
    }

    fn visual_row(&self, row: usize) -> Option<&Vec<String>> {
        match &self.header {
            Some(header) if row == 0 => Some(header),
            Some(_) => self.rows.get(row - 1),
            None => self.rows.get(row),
        }
    }

    fn visual_row_mut(&mut self, row: usize) -> Option<&mut Vec<String>> {
        match &mut self.header {
            Some(header) if row == 0 => Some(header),
            Some(_) => self.rows.get_mut(row - 1),
            None => self.rows.get_mut(row),
        }
    }
}
