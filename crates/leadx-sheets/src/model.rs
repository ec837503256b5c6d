use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SheetError;

/// Placeholder shown for cells that are missing or blank.
pub const EMPTY_CELL: &str = "—";

/// Spreadsheet-style column letter for a zero-based index (`0 -> A`, `26 -> AA`).
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetColumn {
    pub index: usize,
    pub letter: String,
    pub header: String,
}

impl SheetColumn {
    pub fn new(index: usize, header: impl Into<String>) -> Self {
        Self {
            index,
            letter: column_letter(index),
            header: header.into(),
        }
    }

    /// Identifier used by field mappings, e.g. `Column B – Email Address`.
    pub fn label(&self) -> String {
        if self.header.is_empty() {
            format!("Column {}", self.letter)
        } else {
            format!("Column {} – {}", self.letter, self.header)
        }
    }

    /// Whether `identifier` refers to this column, by full label, bare letter or header text.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        identifier == self.label()
            || identifier.eq_ignore_ascii_case(&self.letter)
            || (!self.header.is_empty() && identifier.eq_ignore_ascii_case(&self.header))
    }
}

impl fmt::Display for SheetColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    pub columns: Vec<SheetColumn>,
    pub rows: Vec<Vec<String>>,
    /// Source line of each row, header being line 1.
    #[serde(default)]
    pub lines: Vec<usize>,
}

impl SheetTable {
    pub fn new(columns: Vec<SheetColumn>, rows: Vec<Vec<String>>, lines: Vec<usize>) -> Self {
        Self {
            columns,
            rows,
            lines,
        }
    }

    /// 1-based sheet line of `row`. Dropped blank rows still count.
    pub fn line(&self, row: usize) -> usize {
        self.lines.get(row).copied().unwrap_or(row + 2)
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(SheetColumn::label).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column(&self, identifier: &str) -> Option<&SheetColumn> {
        self.columns.iter().find(|column| column.matches(identifier))
    }

    pub fn resolve(&self, identifier: &str) -> Result<&SheetColumn, SheetError> {
        self.column(identifier)
            .ok_or_else(|| SheetError::UnknownColumn(identifier.to_string()))
    }

    /// Non-blank cell value under `identifier` in `row`.
    pub fn cell(&self, row: usize, identifier: &str) -> Option<&str> {
        let column = self.column(identifier)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column.index))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Like [`SheetTable::cell`] but renders missing values as [`EMPTY_CELL`].
    pub fn preview_cell(&self, row: usize, identifier: &str) -> &str {
        self.cell(row, identifier).unwrap_or(EMPTY_CELL)
    }
}
