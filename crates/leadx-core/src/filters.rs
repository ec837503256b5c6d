//! Search/filter evaluation shared by every list view.
//!
//! A record is kept only when every active criterion accepts it. Criteria are
//! independent, so the order they are checked in never changes the outcome.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{
    Automation, Channel, DeliveryStatus, Lead, LeadSource, LeadStatus, MessageLog, Sheet,
    SyncStatus, Template, TemplateKind, Trigger,
};

/// Either no restriction, or exact equality with one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// A restricted selection rejects records that have no value for the slot.
    pub fn accepts(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            trimmed.parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Which timestamp of a record a date range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// The record's natural timestamp (created date for leads, send time for messages).
    #[default]
    Primary,
    LastContacted,
}

impl FromStr for DateField {
    type Err = crate::error::LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" | "created" | "sent" => Ok(DateField::Primary),
            "last-contacted" | "last_contacted" | "lastcontacted" => Ok(DateField::LastContacted),
            other => Err(crate::error::LabelError {
                kind: "date field",
                value: other.to_string(),
            }),
        }
    }
}

/// Inclusive calendar-day range. `to` covers its whole day through 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub field: DateField,
}

impl DateRange {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.from.map(|day| day.and_time(NaiveTime::MIN))
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.to
            .map(|day| day.and_time(NaiveTime::MIN) + Duration::seconds(86_399))
    }

    pub fn contains(&self, timestamp: Option<NaiveDateTime>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(ts) = timestamp else {
            return false;
        };
        if let Some(start) = self.start() {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end() {
            if ts > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criteria<S, C> {
    pub search: String,
    pub status: Selection<S>,
    pub category: Selection<C>,
    pub date_range: DateRange,
}

impl<S, C> Default for Criteria<S, C> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: Selection::All,
            category: Selection::All,
            date_range: DateRange::default(),
        }
    }
}

impl<S: PartialEq, C: PartialEq> Criteria<S, C> {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn status(mut self, status: S) -> Self {
        self.status = Selection::Only(status);
        self
    }

    pub fn category(mut self, category: C) -> Self {
        self.category = Selection::Only(category);
        self
    }

    pub fn dates(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// True when anything other than the search box narrows the list.
    pub fn has_active_filters(&self) -> bool {
        !self.status.is_all() || !self.category.is_all() || self.date_range.is_active()
    }

    /// Resets the dropdown and date filters, keeping the search text.
    pub fn clear_filters(&mut self) {
        self.status = Selection::All;
        self.category = Selection::All;
        self.date_range = DateRange::default();
    }
}

/// A record shape the list views can search and filter.
pub trait Filterable {
    type Status: PartialEq;
    type Category: PartialEq;

    /// Fields the free-text search looks at. `None` marks an absent value.
    fn search_fields(&self) -> Vec<Option<&str>>;

    fn status(&self) -> Option<&Self::Status>;

    fn category(&self) -> Option<&Self::Category> {
        None
    }

    fn timestamp(&self, _field: DateField) -> Option<NaiveDateTime> {
        None
    }
}

pub type LeadCriteria = Criteria<LeadStatus, LeadSource>;
pub type AutomationCriteria = Criteria<Trigger, String>;
pub type MessageCriteria = Criteria<DeliveryStatus, Channel>;
pub type SheetCriteria = Criteria<SyncStatus, String>;
pub type TemplateCriteria = Criteria<TemplateKind, String>;

pub fn matches_search<R: Filterable>(record: &R, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches<R: Filterable>(record: &R, criteria: &Criteria<R::Status, R::Category>) -> bool {
    matches_search(record, &criteria.search)
        && criteria.status.accepts(record.status())
        && criteria.category.accepts(record.category())
        && criteria
            .date_range
            .contains(record.timestamp(criteria.date_range.field))
}

pub fn filter_records<'a, R: Filterable>(
    records: &'a [R],
    criteria: &Criteria<R::Status, R::Category>,
) -> Vec<&'a R> {
    let kept: Vec<&R> = records.iter().filter(|r| matches(*r, criteria)).collect();
    debug!(total = records.len(), kept = kept.len(), "filtered records");
    kept
}

/// Template list: one kind tab at a time, archived templates hidden.
pub fn filter_templates<'a>(templates: &'a [Template], criteria: &TemplateCriteria) -> Vec<&'a Template> {
    templates
        .iter()
        .filter(|t| !t.archived && matches(*t, criteria))
        .collect()
}

impl Filterable for Lead {
    type Status = LeadStatus;
    type Category = LeadSource;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), Some(self.email.as_str()), Some(self.phone.as_str())]
    }

    fn status(&self) -> Option<&LeadStatus> {
        Some(&self.status)
    }

    fn category(&self) -> Option<&LeadSource> {
        Some(&self.source)
    }

    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Primary => Some(self.created_date),
            DateField::LastContacted => self.last_contacted,
        }
    }
}

impl Filterable for Automation {
    type Status = Trigger;
    type Category = String;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }

    fn status(&self) -> Option<&Trigger> {
        Some(&self.trigger)
    }

    fn category(&self) -> Option<&String> {
        Some(&self.sheet)
    }
}

impl Filterable for MessageLog {
    type Status = DeliveryStatus;
    type Category = Channel;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.lead_name.as_str()), Some(self.automation.as_str())]
    }

    fn status(&self) -> Option<&DeliveryStatus> {
        Some(&self.status)
    }

    fn category(&self) -> Option<&Channel> {
        Some(&self.channel)
    }

    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Primary => Some(self.timestamp),
            DateField::LastContacted => None,
        }
    }
}

impl Filterable for Sheet {
    type Status = SyncStatus;
    type Category = String;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), Some(self.tab.as_str())]
    }

    fn status(&self) -> Option<&SyncStatus> {
        Some(&self.status)
    }
}

impl Filterable for Template {
    type Status = TemplateKind;
    type Category = String;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str())]
    }

    fn status(&self) -> Option<&TemplateKind> {
        Some(&self.kind)
    }

    fn category(&self) -> Option<&String> {
        Some(&self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadSort {
    #[default]
    Unsorted,
    Name,
    Newest,
    RecentlyContacted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageSort {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutomationSort {
    #[default]
    Unsorted,
    Name,
    MostRuns,
}

impl FromStr for LeadSort {
    type Err = crate::error::LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(LeadSort::Unsorted),
            "name" => Ok(LeadSort::Name),
            "newest" | "created" => Ok(LeadSort::Newest),
            "contacted" | "recently-contacted" => Ok(LeadSort::RecentlyContacted),
            other => Err(crate::error::LabelError {
                kind: "lead sort",
                value: other.to_string(),
            }),
        }
    }
}

pub fn sort_leads(leads: &mut [Lead], order: LeadSort) {
    match order {
        LeadSort::Unsorted => {}
        LeadSort::Name => leads.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        LeadSort::Newest => leads.sort_by(|a, b| b.created_date.cmp(&a.created_date)),
        // `None < Some`, so reversing puts never-contacted leads last.
        LeadSort::RecentlyContacted => {
            leads.sort_by(|a, b| b.last_contacted.cmp(&a.last_contacted))
        }
    }
}

pub fn sort_messages(logs: &mut [MessageLog], order: MessageSort) {
    match order {
        MessageSort::NewestFirst => logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        MessageSort::OldestFirst => logs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
}

pub fn sort_automations(automations: &mut [Automation], order: AutomationSort) {
    match order {
        AutomationSort::Unsorted => {}
        AutomationSort::Name => automations.sort_by(|a, b| a.name.cmp(&b.name)),
        AutomationSort::MostRuns => automations.sort_by(|a, b| b.runs.cmp(&a.runs)),
    }
}

/// Row checkboxes of a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelection {
    selected: HashSet<String>,
}

impl BulkSelection {
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.selected.iter().map(String::as_str)
    }

    pub fn all_selected<'a>(&self, visible: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in visible {
            any = true;
            if !self.selected.contains(id) {
                return false;
            }
        }
        any
    }

    /// Header checkbox: clears everything when every visible row is already
    /// selected, otherwise selects exactly the visible rows.
    pub fn toggle_all(&mut self, visible: &[&str]) {
        if self.all_selected(visible.iter().copied()) {
            self.selected.clear();
        } else {
            self.selected = visible.iter().map(|id| id.to_string()).collect();
        }
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Empties the selection, returning how many rows were selected.
    pub fn take(&mut self) -> usize {
        let count = self.selected.len();
        self.selected.clear();
        count
    }
}
