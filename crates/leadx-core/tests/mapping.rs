use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use leadx_core::error::{LeadxError, ValidationError};
use leadx_core::mapping::{
    import_leads, preview_value, save_mapping, suggest_mapping, FieldMapping, LeadField,
    EMAIL_UNMAPPED_WARNING, PHONE_UNMAPPED_WARNING,
};
use leadx_core::types::{LeadSource, LeadStatus};
use leadx_sheets::{read_sheet, SheetError, SheetTable, EMPTY_CELL};

fn fixture(name: &str) -> SheetTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../leadx-sheets/tests/data")
        .join(name);
    let contents = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", path.display(), err));
    read_sheet(&contents).expect("fixture parses")
}

const NAME: &str = "Column A – Full Name";
const EMAIL: &str = "Column B – Email Address";
const PHONE: &str = "Column C – Mobile";
const STATUS: &str = "Column D – Lead Status";
const SOURCE: &str = "Column E – Campaign";

#[test]
fn mapped_count_tracks_every_combination() {
    for bits in 0u8..32 {
        let mut mapping = FieldMapping::default();
        for (offset, field) in LeadField::ALL.into_iter().enumerate() {
            if bits & (1 << offset) != 0 {
                mapping.set(field, format!("Column {offset}"));
            }
        }
        assert_eq!(mapping.mapped_count(), bits.count_ones() as usize, "bits {bits:05b}");

        let email = bits & 0b00010 != 0;
        let phone = bits & 0b00100 != 0;
        assert_eq!(mapping.ensure_saveable().is_ok(), email || phone, "bits {bits:05b}");
        assert_eq!(mapping.warnings().len(), usize::from(!email) + usize::from(!phone));
    }
}

#[test]
fn warnings_name_the_missing_contact_fields() {
    let mapping = FieldMapping::default().with(LeadField::Phone, PHONE);
    assert_eq!(mapping.warnings(), vec![EMAIL_UNMAPPED_WARNING]);

    let report = FieldMapping::default().report();
    assert_eq!(
        report.warnings,
        vec![
            EMAIL_UNMAPPED_WARNING.to_string(),
            PHONE_UNMAPPED_WARNING.to_string()
        ]
    );
    assert_eq!(report.mapped_count, 0);
}

#[test]
fn save_requires_email_or_phone() {
    let name_only = FieldMapping::default().with(LeadField::Name, NAME);
    let err = save_mapping(&name_only, "Q1 Leads Master").unwrap_err();
    assert_eq!(err, ValidationError::MappingIncomplete);
    assert_eq!(err.to_string(), "Map at least Email or Phone to continue.");
    assert_eq!(err.title(), "Mapping incomplete");

    let saved = save_mapping(&name_only.with(LeadField::Phone, PHONE), "Q1 Leads Master").unwrap();
    assert_eq!(saved.mapped_count, 2);
    assert_eq!(saved.message(), "2 fields mapped for \"Q1 Leads Master\".");
}

#[test]
fn positional_suggestion_fills_fields_in_order() {
    let sheet = fixture("q1_leads_master.csv");
    let mapping = suggest_mapping(&sheet.labels());

    assert_eq!(mapping.get(LeadField::Name), Some(NAME));
    assert_eq!(mapping.get(LeadField::Email), Some(EMAIL));
    assert_eq!(mapping.get(LeadField::Phone), Some(PHONE));
    assert_eq!(mapping.get(LeadField::Status), Some(STATUS));
    assert_eq!(mapping.get(LeadField::Source), Some(SOURCE));
    assert_eq!(mapping.mapped_count(), 5);
    assert!(mapping.warnings().is_empty());
}

#[test]
fn suggestion_from_a_narrow_sheet_leaves_the_rest_unmapped() {
    let sheet = fixture("webinar_signups.csv");
    let mapping = suggest_mapping(&sheet.labels());

    assert_eq!(mapping.mapped_count(), 2);
    assert_eq!(mapping.get(LeadField::Email), Some("Column B – Email"));
    assert!(!mapping.is_mapped(LeadField::Phone));
}

#[test]
fn preview_shows_placeholder_for_unmapped_or_blank() {
    let sheet = fixture("q1_leads_master.csv");
    let mapping = FieldMapping::default()
        .with(LeadField::Name, NAME)
        .with(LeadField::Email, EMAIL);

    assert_eq!(preview_value(&mapping, &sheet, 0, LeadField::Name), "Sarah Chen");
    assert_eq!(preview_value(&mapping, &sheet, 0, LeadField::Phone), EMPTY_CELL);
    assert_eq!(preview_value(&mapping, &sheet, 3, LeadField::Email), EMPTY_CELL);
}

#[test]
fn import_skips_rows_without_contact_values() {
    let sheet = fixture("q1_leads_master.csv");
    let imported_at = NaiveDate::from_ymd_opt(2026, 2, 21)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let full = suggest_mapping(&sheet.labels());
    let report = import_leads(&full, &sheet, "q1", imported_at).unwrap();
    assert_eq!(report.leads.len(), 10);
    assert!(report.skipped.is_empty());

    let sarah = &report.leads[0];
    assert_eq!(sarah.id, "q1-1");
    assert_eq!(sarah.status, LeadStatus::New);
    assert_eq!(sarah.source, LeadSource::GoogleSheets);
    assert_eq!(sarah.created_date, imported_at);
    assert_eq!(report.leads[1].status, LeadStatus::Contacted);
    // "Qualified" is not a lead status.
    assert_eq!(report.leads[2].status, LeadStatus::New);

    let email_only = FieldMapping::default()
        .with(LeadField::Name, NAME)
        .with(LeadField::Email, EMAIL);
    let report = import_leads(&email_only, &sheet, "q1", imported_at).unwrap();
    assert_eq!(report.leads.len(), 9);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 5);
}

#[test]
fn skipped_rows_keep_their_sheet_line_after_blank_rows() {
    let sheet = fixture("webinar_signups.csv");
    let imported_at = NaiveDate::from_ymd_opt(2026, 2, 21)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let report = import_leads(&suggest_mapping(&sheet.labels()), &sheet, "web", imported_at).unwrap();
    let names: Vec<&str> = report.leads.iter().map(|lead| lead.name.as_str()).collect();
    assert_eq!(names, vec!["Nadia Rahman", "Owen Brooks"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 5);

    let inline = read_sheet("Name,Email,Phone\nAda,ada@x.io,\n,,\nBob,,\n").unwrap();
    let mapping = FieldMapping::default()
        .with(LeadField::Name, "Name")
        .with(LeadField::Email, "Email");
    let report = import_leads(&mapping, &inline, "inline", imported_at).unwrap();
    assert_eq!(report.skipped[0].line, 4);
}

#[test]
fn import_falls_back_to_contact_for_name() {
    let sheet = fixture("q1_leads_master.csv");
    let imported_at = NaiveDate::from_ymd_opt(2026, 2, 21)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mapping = FieldMapping::default()
        .with(LeadField::Email, EMAIL)
        .with(LeadField::Phone, PHONE);

    let report = import_leads(&mapping, &sheet, "x", imported_at).unwrap();
    assert_eq!(report.leads[0].name, "sarah@acme.co");
    assert_eq!(report.leads[3].name, "+1 555-0104");
    assert_eq!(report.leads[4].phone, "");
}

#[test]
fn import_rejects_unsaveable_or_unknown_columns() {
    let sheet = fixture("q1_leads_master.csv");
    let imported_at = NaiveDate::from_ymd_opt(2026, 2, 21)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let err = import_leads(&FieldMapping::default(), &sheet, "x", imported_at).unwrap_err();
    assert!(matches!(
        err,
        LeadxError::Validation(ValidationError::MappingIncomplete)
    ));

    let wrong = FieldMapping::default().with(LeadField::Email, "Column Z – Fax");
    let err = import_leads(&wrong, &sheet, "x", imported_at).unwrap_err();
    assert!(matches!(err, LeadxError::Sheet(SheetError::UnknownColumn(_))));
}
