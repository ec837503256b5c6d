use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::errors::SheetError;
use crate::model::{SheetColumn, SheetTable};

pub fn read_sheet(content: &str) -> Result<SheetTable, SheetError> {
    read_sheet_from_reader(content.as_bytes())
}

/// Reads a CSV export whose first row holds the column headers.
///
/// Rows shorter than the header are padded with blank cells; rows longer than
/// the header are rejected. Rows whose cells are all blank are dropped.
pub fn read_sheet_from_reader<R: Read>(input: R) -> Result<SheetTable, SheetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut records = reader.records();

    let header = records.next().ok_or(SheetError::MissingHeader)??;
    let columns = parse_header(&header)?;

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for (offset, record) in records.enumerate() {
        let record = record?;
        // header is line 1
        let line_index = offset + 2;
        if record.len() > columns.len() {
            return Err(SheetError::DataRow {
                line_index,
                message: format!(
                    "expected at most {} cells, found {}",
                    columns.len(),
                    record.len()
                ),
            });
        }
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(columns.len(), String::new());
        rows.push(cells);
        lines.push(line_index);
    }

    Ok(SheetTable::new(columns, rows, lines))
}

fn parse_header(record: &StringRecord) -> Result<Vec<SheetColumn>, SheetError> {
    if record.iter().all(|cell| cell.is_empty()) {
        return Err(SheetError::InvalidHeader {
            message: "every header cell is blank".to_string(),
        });
    }

    Ok(record
        .iter()
        .enumerate()
        .map(|(index, header)| SheetColumn::new(index, header))
        .collect())
}
