//! Reading spreadsheet exports (CSV) into addressable columns and rows.

pub mod errors;
pub mod model;
mod reader;

pub use errors::SheetError;
pub use model::{column_letter, SheetColumn, SheetTable, EMPTY_CELL};
pub use reader::{read_sheet, read_sheet_from_reader};

#[cfg(test)]
mod tests;
