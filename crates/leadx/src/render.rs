use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use leadx_core::aggregates::{active_count, delivery_summary, total_rows};
use leadx_core::mapping::{FieldMapping, ImportReport, LeadField};
use leadx_core::templates::sms_segments;
use leadx_core::types::{
    Automation, Channel, CreditPool, CreditUsage, Lead, MessageLog, Sheet, Template,
};
use leadx_core::workspace::{Dashboard, MappingSession};
use leadx_sheets::EMPTY_CELL;
use serde::Serialize;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Prints `value` as pretty JSON, or as whatever `text` renders it to.
pub fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

pub fn leads(leads: &[Lead]) -> String {
    let mut out = table(&[
        "ID", "Name", "Email", "Phone", "Status", "Source", "Last Contacted", "Created",
    ]);
    for lead in leads {
        out.add_row(vec![
            lead.id.clone(),
            lead.name.clone(),
            lead.email.clone(),
            lead.phone.clone(),
            lead.status.to_string(),
            lead.source.to_string(),
            lead.last_contacted
                .map(|at| at.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| "Never".to_string()),
            lead.created_date.format(TIME_FORMAT).to_string(),
        ]);
    }
    format!("{out}\n{} lead(s)", leads.len())
}

pub fn lead_profile(lead: &Lead) -> String {
    let mut out = table(&["Field", "Value"]);
    let rows = [
        ("Name", lead.name.clone()),
        ("Email", lead.email.clone()),
        ("Phone", lead.phone.clone()),
        ("Status", lead.status.to_string()),
        ("Source", lead.source.to_string()),
        (
            "Last Contacted",
            lead.last_contacted
                .map(|at| at.format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| "Never".to_string()),
        ),
        ("Created", lead.created_date.format(TIME_FORMAT).to_string()),
        ("Tags", lead.tags.join(", ")),
    ];
    for (field, value) in rows {
        out.add_row(vec![field.to_string(), value]);
    }

    let mut lines = vec![out.to_string()];
    if lead.notes.is_empty() {
        lines.push("No notes yet.".to_string());
    }
    for note in &lead.notes {
        lines.push(format!("[{}] {}", note.date, note.text));
    }
    lines.join("\n")
}

pub fn automations(automations: &[Automation]) -> String {
    let mut out = table(&[
        "ID", "Name", "Trigger", "Action", "Sheet", "State", "Last Run", "Success", "Runs",
    ]);
    for automation in automations {
        out.add_row(vec![
            automation.id.clone(),
            automation.name.clone(),
            automation.trigger.to_string(),
            automation.action.to_string(),
            automation.sheet.clone(),
            if automation.enabled { "Active" } else { "Paused" }.to_string(),
            automation.last_run.clone(),
            format!(
                "{:.1}% ({:?})",
                automation.success_rate,
                automation.rate_band()
            ),
            automation.runs.to_string(),
        ]);
    }
    let active = active_count(automations);
    format!("{out}\n{active} of {} active", automations.len())
}

pub fn messages(logs: &[MessageLog]) -> String {
    let mut out = table(&[
        "ID", "Time", "Lead", "Channel", "Automation", "Status", "Credits",
    ]);
    for log in logs {
        out.add_row(vec![
            log.id.clone(),
            log.timestamp.format(TIME_FORMAT).to_string(),
            log.lead_name.clone(),
            log.channel.to_string(),
            log.automation.clone(),
            log.status.to_string(),
            log.credits.to_string(),
        ]);
    }
    let summary = delivery_summary(logs);
    format!(
        "{out}\n{} message(s), {} reached, {} credit(s) used",
        summary.total,
        summary.reached(),
        summary.credits
    )
}

pub fn message_detail(log: &MessageLog) -> String {
    let mut out = table(&["Field", "Value"]);
    let rows = [
        ("Lead", format!("{} <{}>", log.lead_name, log.lead_email)),
        ("Sent", log.timestamp.format(TIME_FORMAT).to_string()),
        ("Channel", log.channel.to_string()),
        ("Automation", log.automation.clone()),
        ("Status", log.status.to_string()),
        ("Credits", log.credits.to_string()),
        ("Provider", log.provider.clone()),
        ("Provider ID", log.provider_message_id.clone()),
        ("Duration", log.duration.clone()),
    ];
    for (field, value) in rows {
        out.add_row(vec![field.to_string(), value]);
    }
    if log.channel == Channel::Email {
        out.add_row(vec![
            "Subject".to_string(),
            log.subject.clone().unwrap_or_else(|| EMPTY_CELL.to_string()),
        ]);
    }
    out.add_row(vec!["Body".to_string(), log.body.clone()]);
    out.to_string()
}

pub fn sheets(sheets: &[Sheet]) -> String {
    let mut out = table(&["ID", "Name", "Tab", "Status", "Last Sync", "Rows", "Automations"]);
    for sheet in sheets {
        out.add_row(vec![
            sheet.id.clone(),
            sheet.name.clone(),
            sheet.tab.clone(),
            sheet.status.to_string(),
            sheet.last_sync.clone(),
            sheet.rows.to_string(),
            sheet.automations.to_string(),
        ]);
    }
    format!(
        "{out}\n{} sheet(s), {} row(s)",
        sheets.len(),
        total_rows(sheets)
    )
}

pub fn templates(templates: &[Template]) -> String {
    let mut out = table(&[
        "ID", "Title", "Type", "Category", "Variables", "Segments", "Last Edited",
    ]);
    for template in templates {
        let segments = match template.kind {
            Channel::Sms => sms_segments(&template.preview).to_string(),
            Channel::Email => EMPTY_CELL.to_string(),
        };
        out.add_row(vec![
            template.id.clone(),
            template.title.clone(),
            template.kind.to_string(),
            template.category.clone(),
            template.variables.join(", "),
            segments,
            template.last_edited.clone(),
        ]);
    }
    out.to_string()
}

fn pool_row(channel: &str, pool: &CreditPool) -> Vec<String> {
    vec![
        channel.to_string(),
        pool.used.to_string(),
        pool.total.to_string(),
        pool.remaining().to_string(),
        format!("{}%", pool.percent_used()),
    ]
}

pub fn billing(credits: &CreditUsage) -> String {
    let mut out = table(&["Channel", "Used", "Total", "Remaining", "Used %"]);
    out.add_row(pool_row("Email", &credits.email));
    out.add_row(pool_row("SMS", &credits.sms));
    format!("{out}\n{} credit(s) remaining", credits.remaining())
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = table(&["Metric", "Value"]);
    out.add_row(vec!["Leads".to_string(), dashboard.lead_count.to_string()]);
    for (status, count) in &dashboard.lead_status {
        out.add_row(vec![format!("  {status}"), count.to_string()]);
    }
    out.add_row(vec![
        "Active automations".to_string(),
        format!(
            "{} of {}",
            dashboard.active_automations, dashboard.automation_count
        ),
    ]);
    out.add_row(vec![
        "Connected sheets".to_string(),
        format!("{} ({} rows)", dashboard.sheet_count, dashboard.total_rows),
    ]);
    out.add_row(vec![
        "Messages".to_string(),
        format!(
            "{} sent, {} reached",
            dashboard.delivery.total,
            dashboard.delivery.reached()
        ),
    ]);
    out.add_row(vec![
        "Credits used".to_string(),
        dashboard.delivery.credits.to_string(),
    ]);
    out.add_row(vec![
        "Email credits".to_string(),
        format!("{}%", dashboard.credits.email.percent_used()),
    ]);
    out.add_row(vec![
        "SMS credits".to_string(),
        format!("{}%", dashboard.credits.sms.percent_used()),
    ]);
    out.to_string()
}

fn mapping_table(mapping: &FieldMapping) -> Table {
    let mut out = table(&["Lead Field", "Sheet Column"]);
    for (field, column) in mapping.entries() {
        out.add_row(vec![
            field.label().to_string(),
            column.unwrap_or("Not mapped").to_string(),
        ]);
    }
    out
}

pub fn mapping(session: &MappingSession, preview_rows: usize) -> String {
    let report = session.report();
    let mut lines = vec![
        format!("Sheet: {}", session.sheet_name),
        mapping_table(&session.mapping).to_string(),
        format!(
            "{} of {} fields mapped",
            report.mapped_count,
            LeadField::ALL.len()
        ),
    ];
    lines.extend(report.warnings.iter().map(|w| format!("warning: {w}")));

    let header: Vec<&str> = LeadField::ALL.iter().map(|field| field.label()).collect();
    let mut preview = table(&header);
    for row in session.preview(preview_rows) {
        preview.add_row(row);
    }
    lines.push(preview.to_string());
    lines.join("\n")
}

pub fn import_report(report: &ImportReport) -> String {
    let mut lines = vec![format!(
        "Imported {} lead(s); skipped {} row(s).",
        report.leads.len(),
        report.skipped.len()
    )];
    for skipped in &report.skipped {
        lines.push(format!("  line {}: {}", skipped.line, skipped.reason));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadx_core::seed::Dataset;

    #[test]
    fn billing_shows_percent_and_remaining() {
        let data = Dataset::seed().unwrap();
        let text = billing(&data.credits);
        assert!(text.contains("62%"));
        assert!(text.ends_with("941 credit(s) remaining"));
    }

    #[test]
    fn never_contacted_leads_render_as_never() {
        let data = Dataset::seed().unwrap();
        let text = leads(&data.leads[1..2]);
        assert!(text.contains("Never"));
        assert!(text.ends_with("1 lead(s)"));
    }

    #[test]
    fn lead_profile_lists_tags_and_notes() {
        let data = Dataset::seed().unwrap();
        let text = lead_profile(&data.leads[0]);
        assert!(text.contains("VIP, Onboarding"));
        assert!(text.ends_with("[Jan 14, 2024] Interested in enterprise plan. Follow up next week."));
        assert!(lead_profile(&data.leads[1]).ends_with("No notes yet."));
    }

    #[test]
    fn message_footer_counts_reached_and_credits() {
        let data = Dataset::seed().unwrap();
        assert!(messages(&data.messages).ends_with("10 message(s), 7 reached, 9 credit(s) used"));
    }
}
