//! Sheet column to lead field mapping.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use leadx_sheets::{SheetError, SheetTable, EMPTY_CELL};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LabelError, ValidationError};
use crate::types::{Lead, LeadSource, LeadStatus};

pub const EMAIL_UNMAPPED_WARNING: &str =
    "Email is not mapped — leads won't receive email automations.";
pub const PHONE_UNMAPPED_WARNING: &str = "Phone is not mapped — SMS automations will be skipped.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadField {
    Name,
    Email,
    Phone,
    Status,
    Source,
}

impl LeadField {
    /// Canonical order, which is also the column order auto-mapping assumes.
    pub const ALL: [LeadField; 5] = [
        LeadField::Name,
        LeadField::Email,
        LeadField::Phone,
        LeadField::Status,
        LeadField::Source,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
            LeadField::Status => "status",
            LeadField::Source => "source",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadField::Name => "Name",
            LeadField::Email => "Email",
            LeadField::Phone => "Phone",
            LeadField::Status => "Status",
            LeadField::Source => "Source",
        }
    }

    /// Contact fields; at least one of them has to be mapped before saving.
    pub fn is_contact(&self) -> bool {
        matches!(self, LeadField::Email | LeadField::Phone)
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeadField {
    type Err = LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        LeadField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LabelError {
                kind: "lead field",
                value: trimmed.to_string(),
            })
    }
}

/// Column identifier per lead field. Empty strings count as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl FieldMapping {
    fn slot(&self, field: LeadField) -> &Option<String> {
        match field {
            LeadField::Name => &self.name,
            LeadField::Email => &self.email,
            LeadField::Phone => &self.phone,
            LeadField::Status => &self.status,
            LeadField::Source => &self.source,
        }
    }

    fn slot_mut(&mut self, field: LeadField) -> &mut Option<String> {
        match field {
            LeadField::Name => &mut self.name,
            LeadField::Email => &mut self.email,
            LeadField::Phone => &mut self.phone,
            LeadField::Status => &mut self.status,
            LeadField::Source => &mut self.source,
        }
    }

    pub fn get(&self, field: LeadField) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|column| !column.is_empty())
    }

    pub fn is_mapped(&self, field: LeadField) -> bool {
        self.get(field).is_some()
    }

    /// Maps `field` to `column`; an empty `column` unmaps it.
    pub fn set(&mut self, field: LeadField, column: impl Into<String>) {
        let column = column.into();
        *self.slot_mut(field) = if column.is_empty() {
            None
        } else {
            Some(column)
        };
    }

    pub fn clear(&mut self, field: LeadField) {
        *self.slot_mut(field) = None;
    }

    pub fn with(mut self, field: LeadField, column: impl Into<String>) -> Self {
        self.set(field, column);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (LeadField, Option<&str>)> + '_ {
        LeadField::ALL.into_iter().map(|field| (field, self.get(field)))
    }

    pub fn mapped_count(&self) -> usize {
        LeadField::ALL
            .into_iter()
            .filter(|field| self.is_mapped(*field))
            .count()
    }

    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.is_mapped(LeadField::Email) {
            warnings.push(EMAIL_UNMAPPED_WARNING);
        }
        if !self.is_mapped(LeadField::Phone) {
            warnings.push(PHONE_UNMAPPED_WARNING);
        }
        warnings
    }

    pub fn report(&self) -> MappingReport {
        MappingReport {
            warnings: self.warnings().into_iter().map(str::to_string).collect(),
            mapped_count: self.mapped_count(),
        }
    }

    /// Save precondition: email or phone (or both) must be mapped.
    pub fn ensure_saveable(&self) -> Result<(), ValidationError> {
        if self.is_mapped(LeadField::Email) || self.is_mapped(LeadField::Phone) {
            Ok(())
        } else {
            Err(ValidationError::MappingIncomplete)
        }
    }

    /// Every mapped column must exist in `sheet`.
    pub fn check_columns(&self, sheet: &SheetTable) -> Result<(), SheetError> {
        for column in self.entries().filter_map(|(_, column)| column) {
            sheet.resolve(column)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingReport {
    pub warnings: Vec<String>,
    pub mapped_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedMapping {
    pub sheet_name: String,
    pub mapping: FieldMapping,
    pub mapped_count: usize,
}

impl SavedMapping {
    pub fn message(&self) -> String {
        format!(
            "{} fields mapped for \"{}\".",
            self.mapped_count, self.sheet_name
        )
    }
}

pub fn save_mapping(mapping: &FieldMapping, sheet_name: &str) -> Result<SavedMapping, ValidationError> {
    if let Err(err) = mapping.ensure_saveable() {
        warn!(sheet = sheet_name, "rejected mapping without email or phone");
        return Err(err);
    }

    let saved = SavedMapping {
        sheet_name: sheet_name.to_string(),
        mapping: mapping.clone(),
        mapped_count: mapping.mapped_count(),
    };
    info!(
        sheet = sheet_name,
        mapped = saved.mapped_count,
        "mapping saved"
    );
    Ok(saved)
}

/// Positional guess: first column to name, second to email, and so on.
pub fn suggest_mapping(columns: &[String]) -> FieldMapping {
    let mut mapping = FieldMapping::default();
    for (field, column) in LeadField::ALL.into_iter().zip(columns) {
        mapping.set(field, column.clone());
    }
    debug!(mapped = mapping.mapped_count(), "suggested positional mapping");
    mapping
}

/// Preview value for `field` in `row`, or [`EMPTY_CELL`] when there is nothing to show.
pub fn preview_value<'a>(
    mapping: &FieldMapping,
    sheet: &'a SheetTable,
    row: usize,
    field: LeadField,
) -> &'a str {
    match mapping.get(field) {
        Some(column) => sheet.preview_cell(row, column),
        None => EMPTY_CELL,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the sheet, header included.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub leads: Vec<Lead>,
    pub skipped: Vec<SkippedRow>,
}

/// Builds leads from the rows of `sheet` using a saveable mapping.
///
/// Rows without any contact value are skipped. A missing or unknown status
/// becomes `New`; a source cell that is not a known source becomes `Google Sheets`.
pub fn import_leads(
    mapping: &FieldMapping,
    sheet: &SheetTable,
    id_prefix: &str,
    imported_at: NaiveDateTime,
) -> crate::error::Result<ImportReport> {
    mapping.ensure_saveable()?;
    mapping.check_columns(sheet)?;

    let value = |row: usize, field: LeadField| -> Option<String> {
        mapping
            .get(field)
            .and_then(|column| sheet.cell(row, column))
            .map(str::to_string)
    };

    let mut leads = Vec::new();
    let mut skipped = Vec::new();

    for row in 0..sheet.row_count() {
        let line = sheet.line(row);
        let email = value(row, LeadField::Email);
        let phone = value(row, LeadField::Phone);
        if email.is_none() && phone.is_none() {
            warn!(line, "skipping row without email or phone");
            skipped.push(SkippedRow {
                line,
                reason: "row has neither email nor phone".to_string(),
            });
            continue;
        }

        let name = value(row, LeadField::Name)
            .or_else(|| email.clone())
            .or_else(|| phone.clone())
            .unwrap_or_default();
        let status = value(row, LeadField::Status)
            .and_then(|raw| raw.parse::<LeadStatus>().ok())
            .unwrap_or(LeadStatus::New);
        let source = value(row, LeadField::Source)
            .and_then(|raw| raw.parse::<LeadSource>().ok())
            .unwrap_or(LeadSource::GoogleSheets);

        leads.push(Lead {
            id: format!("{id_prefix}-{}", row + 1),
            name,
            email: email.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            status,
            source,
            last_contacted: None,
            created_date: imported_at,
            tags: Vec::new(),
            notes: Vec::new(),
        });
    }

    info!(
        imported = leads.len(),
        skipped = skipped.len(),
        "imported leads from sheet"
    );
    Ok(ImportReport { leads, skipped })
}
