//! Page-level operations over the in-memory stores.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use leadx_repository::{InMemoryRepository, InsertPosition, Repository};
use leadx_sheets::SheetTable;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::aggregates::{
    active_count, delivery_summary, lead_status_counts, total_rows, DeliverySummary,
};
use crate::builder::AutomationDraft;
use crate::config::Config;
use crate::error::Result;
use crate::filters::{
    matches, sort_automations, sort_leads, sort_messages, AutomationCriteria, AutomationSort,
    BulkSelection, LeadCriteria, LeadSort, MessageCriteria, MessageSort, SheetCriteria,
    TemplateCriteria,
};
use crate::mapping::{
    import_leads, preview_value, save_mapping, FieldMapping, ImportReport, LeadField,
    MappingReport, SavedMapping,
};
use crate::profile::new_note;
use crate::seed::Dataset;
use crate::simulation::{Assistant, Simulator, TestRunReport};
use crate::templates::{create_template, duplicate_template, Suggestion, TemplateDraft};
use crate::types::{
    Automation, CreditUsage, Lead, LeadStatus, MessageLog, Sheet, Template, TemplateKind,
};

pub const AUTOMATION_ACTIVATED: &str = "Automation Activated";
pub const AUTOMATION_PAUSED: &str = "Automation Paused";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    pub automation: Automation,
    pub notice: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub lead_count: usize,
    pub lead_status: Vec<(LeadStatus, usize)>,
    pub automation_count: usize,
    pub active_automations: usize,
    pub sheet_count: usize,
    pub total_rows: u64,
    pub delivery: DeliverySummary,
    pub credits: CreditUsage,
}

/// Column mapping in progress for one sheet.
#[derive(Debug, Clone)]
pub struct MappingSession {
    pub sheet_name: String,
    pub table: SheetTable,
    pub mapping: FieldMapping,
}

impl MappingSession {
    pub fn new(sheet_name: impl Into<String>, table: SheetTable) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            table,
            mapping: FieldMapping::default(),
        }
    }

    /// Maps `field` to `column` after checking the column exists in the sheet.
    pub fn assign(&mut self, field: LeadField, column: &str) -> Result<()> {
        if !column.is_empty() {
            self.table.resolve(column)?;
        }
        self.mapping.set(field, column);
        Ok(())
    }

    pub fn report(&self) -> MappingReport {
        self.mapping.report()
    }

    /// Preview values for the first `limit` rows, one entry per lead field.
    pub fn preview(&self, limit: usize) -> Vec<Vec<&str>> {
        (0..self.table.row_count().min(limit))
            .map(|row| {
                LeadField::ALL
                    .into_iter()
                    .map(|field| preview_value(&self.mapping, &self.table, row, field))
                    .collect()
            })
            .collect()
    }

    /// Replaces the mapping with the assistant's suggestion. On failure the
    /// current mapping stays as it was.
    pub async fn auto_map(&mut self, assistant: &dyn Assistant) -> Result<&FieldMapping> {
        let suggestion = assistant.suggest_mapping(&self.table.labels()).await?;
        self.mapping = suggestion;
        Ok(&self.mapping)
    }
}

pub struct Workspace {
    leads: Arc<dyn Repository<Lead>>,
    automations: Arc<dyn Repository<Automation>>,
    messages: Arc<dyn Repository<MessageLog>>,
    sheets: Arc<dyn Repository<Sheet>>,
    templates: Arc<dyn Repository<Template>>,
    mappings: RwLock<HashMap<String, SavedMapping>>,
    credits: CreditUsage,
    assistant: Arc<dyn Assistant>,
}

impl Workspace {
    pub fn from_dataset(dataset: Dataset, config: &Config) -> Self {
        info!(
            leads = dataset.leads.len(),
            automations = dataset.automations.len(),
            messages = dataset.messages.len(),
            sheets = dataset.sheets.len(),
            templates = dataset.templates.len(),
            "workspace loaded"
        );
        Self {
            leads: Arc::new(InMemoryRepository::with_records(dataset.leads)),
            automations: Arc::new(InMemoryRepository::with_records(dataset.automations)),
            messages: Arc::new(InMemoryRepository::with_records(dataset.messages)),
            sheets: Arc::new(InMemoryRepository::with_records(dataset.sheets)),
            templates: Arc::new(InMemoryRepository::with_records(dataset.templates)),
            mappings: RwLock::new(HashMap::new()),
            credits: config.billing.apply(dataset.credits),
            assistant: Arc::new(Simulator::new(config.latency)),
        }
    }

    /// Built-in demo data with the given configuration.
    pub fn seeded(config: &Config) -> Result<Self> {
        Ok(Self::from_dataset(Dataset::seed()?, config))
    }

    pub fn with_assistant(mut self, assistant: Arc<dyn Assistant>) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn assistant(&self) -> &dyn Assistant {
        self.assistant.as_ref()
    }

    pub fn credits(&self) -> CreditUsage {
        self.credits
    }

    pub async fn leads(&self, criteria: &LeadCriteria, sort: LeadSort) -> Result<Vec<Lead>> {
        let mut leads = self.leads.list(&|lead: &Lead| matches(lead, criteria)).await?;
        sort_leads(&mut leads, sort);
        Ok(leads)
    }

    pub async fn lead(&self, id: &str) -> Result<Lead> {
        Ok(self.leads.get(id).await?)
    }

    pub async fn add_lead_tag(&self, id: &str, tag: &str) -> Result<Lead> {
        let tag = tag.to_string();
        let lead = self
            .leads
            .update(
                id,
                Box::new(move |current: &Lead| {
                    let mut next = current.clone();
                    next.add_tag(&tag);
                    next
                }),
            )
            .await?;
        debug!(id, tags = lead.tags.len(), "lead tags updated");
        Ok(lead)
    }

    pub async fn remove_lead_tag(&self, id: &str, tag: &str) -> Result<Lead> {
        let tag = tag.to_string();
        let lead = self
            .leads
            .update(
                id,
                Box::new(move |current: &Lead| {
                    let mut next = current.clone();
                    next.remove_tag(&tag);
                    next
                }),
            )
            .await?;
        debug!(id, tags = lead.tags.len(), "lead tags updated");
        Ok(lead)
    }

    /// Adds a note in front of the existing ones. Blank text is rejected
    /// before the store is touched.
    pub async fn add_lead_note(&self, id: &str, text: &str) -> Result<Lead> {
        let note = new_note(text)?;
        let lead = self
            .leads
            .update(
                id,
                Box::new(move |current: &Lead| {
                    let mut next = current.clone();
                    next.prepend_note(note);
                    next
                }),
            )
            .await?;
        info!(id, notes = lead.notes.len(), "note added to lead");
        Ok(lead)
    }

    /// Selected leads in store order; ids that no longer exist are ignored.
    pub async fn selected_leads(&self, selection: &BulkSelection) -> Result<Vec<Lead>> {
        Ok(self
            .leads
            .list(&|lead: &Lead| selection.contains(&lead.id))
            .await?)
    }

    pub async fn automations(
        &self,
        criteria: &AutomationCriteria,
        sort: AutomationSort,
    ) -> Result<Vec<Automation>> {
        let mut automations = self
            .automations
            .list(&|automation: &Automation| matches(automation, criteria))
            .await?;
        sort_automations(&mut automations, sort);
        Ok(automations)
    }

    pub async fn messages(
        &self,
        criteria: &MessageCriteria,
        sort: MessageSort,
    ) -> Result<Vec<MessageLog>> {
        let mut logs = self
            .messages
            .list(&|log: &MessageLog| matches(log, criteria))
            .await?;
        sort_messages(&mut logs, sort);
        Ok(logs)
    }

    pub async fn message(&self, id: &str) -> Result<MessageLog> {
        Ok(self.messages.get(id).await?)
    }

    pub async fn sheets(&self, criteria: &SheetCriteria) -> Result<Vec<Sheet>> {
        Ok(self
            .sheets
            .list(&|sheet: &Sheet| matches(sheet, criteria))
            .await?)
    }

    /// Non-archived templates accepted by `criteria`.
    pub async fn templates(&self, criteria: &TemplateCriteria) -> Result<Vec<Template>> {
        Ok(self
            .templates
            .list(&|template: &Template| !template.archived && matches(template, criteria))
            .await?)
    }

    pub async fn toggle_automation(&self, id: &str) -> Result<ToggleOutcome> {
        let automation = self
            .automations
            .update(
                id,
                Box::new(|current: &Automation| Automation {
                    enabled: !current.enabled,
                    ..current.clone()
                }),
            )
            .await?;
        let notice = if automation.enabled {
            AUTOMATION_ACTIVATED
        } else {
            AUTOMATION_PAUSED
        };
        info!(id, name = %automation.name, enabled = automation.enabled, "automation toggled");
        Ok(ToggleOutcome { automation, notice })
    }

    /// Completes the builder: the draft becomes an enabled automation at the end of the list.
    pub async fn activate_draft(&self, draft: &AutomationDraft) -> Result<Automation> {
        let automation = draft.activate(Uuid::new_v4().to_string())?;
        self.automations
            .insert(automation.clone(), InsertPosition::Back)
            .await?;
        info!(id = %automation.id, name = %automation.name, "automation activated");
        Ok(automation)
    }

    pub async fn test_run(&self, draft: &AutomationDraft) -> Result<TestRunReport> {
        self.assistant.test_run(draft).await
    }

    pub async fn save_mapping(&self, session: &MappingSession) -> Result<SavedMapping> {
        let saved = save_mapping(&session.mapping, &session.sheet_name)?;
        self.mappings
            .write()
            .await
            .insert(saved.sheet_name.clone(), saved.clone());
        Ok(saved)
    }

    pub async fn saved_mapping(&self, sheet_name: &str) -> Option<SavedMapping> {
        self.mappings.read().await.get(sheet_name).cloned()
    }

    pub async fn auto_map<'a>(&self, session: &'a mut MappingSession) -> Result<&'a FieldMapping> {
        session.auto_map(self.assistant.as_ref()).await
    }

    /// Adds the session's rows as leads. The mapping has to be saveable.
    pub async fn import_sheet(
        &self,
        session: &MappingSession,
        imported_at: NaiveDateTime,
    ) -> Result<ImportReport> {
        let prefix = format!("import-{}", Uuid::new_v4().simple());
        let report = import_leads(&session.mapping, &session.table, &prefix, imported_at)?;
        for lead in &report.leads {
            self.leads.insert(lead.clone(), InsertPosition::Back).await?;
        }
        debug!(sheet = %session.sheet_name, added = report.leads.len(), "stored imported leads");
        Ok(report)
    }

    pub async fn save_template(&self, draft: &TemplateDraft) -> Result<Template> {
        let template = draft.save()?;
        self.templates
            .insert(template.clone(), InsertPosition::Front)
            .await?;
        Ok(template)
    }

    /// Quick-create dialog; the new template goes first.
    pub async fn create_template(
        &self,
        kind: TemplateKind,
        title: &str,
        category: &str,
        body: &str,
    ) -> Result<Template> {
        let template = create_template(kind, title, category, body)?;
        self.templates
            .insert(template.clone(), InsertPosition::Front)
            .await?;
        info!(id = %template.id, title = %template.title, "template created");
        Ok(template)
    }

    pub async fn duplicate_template(&self, id: &str) -> Result<Template> {
        let original = self.templates.get(id).await?;
        let copy = duplicate_template(&original);
        self.templates
            .insert(copy.clone(), InsertPosition::Front)
            .await?;
        info!(from = id, id = %copy.id, "template duplicated");
        Ok(copy)
    }

    pub async fn archive_template(&self, id: &str) -> Result<Template> {
        let archived = self
            .templates
            .update(
                id,
                Box::new(|current: &Template| Template {
                    archived: true,
                    ..current.clone()
                }),
            )
            .await?;
        info!(id, title = %archived.title, "template archived");
        Ok(archived)
    }

    pub async fn template_suggestions(&self, kind: TemplateKind) -> Result<Vec<Suggestion>> {
        self.assistant.template_suggestions(kind).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let (leads, automations, messages, sheets) = futures::try_join!(
            self.leads.all(),
            self.automations.all(),
            self.messages.all(),
            self.sheets.all(),
        )?;

        Ok(Dashboard {
            lead_count: leads.len(),
            lead_status: lead_status_counts(&leads),
            automation_count: automations.len(),
            active_automations: active_count(&automations),
            sheet_count: sheets.len(),
            total_rows: total_rows(&sheets),
            delivery: delivery_summary(&messages),
            credits: self.credits,
        })
    }

    /// Current contents of every store, in the data-file shape.
    pub async fn snapshot(&self) -> Result<Dataset> {
        let (leads, automations, messages, sheets, templates) = futures::try_join!(
            self.leads.all(),
            self.automations.all(),
            self.messages.all(),
            self.sheets.all(),
            self.templates.all(),
        )?;
        Ok(Dataset {
            leads,
            automations,
            messages,
            sheets,
            templates,
            credits: self.credits,
        })
    }
}

