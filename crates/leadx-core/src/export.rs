use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::Lead;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Serialize)]
struct LeadRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Source")]
    source: &'static str,
    #[serde(rename = "Last Contacted")]
    last_contacted: String,
    #[serde(rename = "Created")]
    created: String,
}

impl<'a> From<&'a Lead> for LeadRow<'a> {
    fn from(lead: &'a Lead) -> Self {
        Self {
            name: &lead.name,
            email: &lead.email,
            phone: &lead.phone,
            status: lead.status.as_str(),
            source: lead.source.as_str(),
            last_contacted: lead
                .last_contacted
                .map(|at| at.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            created: lead.created_date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Writes `leads` as CSV with a header row. Returns the number of data rows.
pub fn write_leads_csv<W: Write>(leads: &[Lead], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for lead in leads {
        csv_writer.serialize(LeadRow::from(lead))?;
    }
    csv_writer.flush()?;
    Ok(leads.len())
}

pub fn export_leads(leads: &[Lead], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let written = write_leads_csv(leads, file)?;
    info!(path = %path.display(), rows = written, "exported leads");
    Ok(written)
}
