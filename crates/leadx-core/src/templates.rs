//! Message templates: placeholder detection, SMS sizing and save rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{Template, TemplateKind};

pub const SMS_MAX: usize = 160;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("variable pattern is valid"));

/// Distinct `{{variable}}` names across `subject` and `body`, in first-seen order.
pub fn detect_variables(subject: &str, body: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for text in [subject, body] {
        for capture in VARIABLE_PATTERN.captures_iter(text) {
            let name = &capture[1];
            if !found.iter().any(|existing| existing == name) {
                found.push(name.to_string());
            }
        }
    }
    found
}

pub fn sms_segments(body: &str) -> usize {
    body.chars().count().div_ceil(SMS_MAX).max(1)
}

pub fn insert_variable(body: &str, variable: &str) -> String {
    format!("{body}{{{{{variable}}}}}")
}

pub fn categories(kind: TemplateKind) -> &'static [&'static str] {
    match kind {
        TemplateKind::Email => &["Onboarding", "Nurture", "Win-back", "Sales", "Transactional"],
        TemplateKind::Sms => &["Reminder", "Transactional", "Marketing", "Confirmation"],
    }
}

/// Canonical spelling of `category` among the categories of `kind`, or of
/// every kind when `kind` is `None`.
pub fn known_category(kind: Option<TemplateKind>, category: &str) -> Option<&'static str> {
    let category = category.trim();
    let kinds: &[TemplateKind] = match kind {
        Some(TemplateKind::Email) => &[TemplateKind::Email],
        Some(TemplateKind::Sms) => &[TemplateKind::Sms],
        None => &[TemplateKind::Email, TemplateKind::Sms],
    };
    kinds
        .iter()
        .flat_map(|kind| categories(*kind).iter().copied())
        .find(|known| known.eq_ignore_ascii_case(category))
}

pub fn default_category(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Email => "Nurture",
        TemplateKind::Sms => "Marketing",
    }
}

/// Editor form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub kind: TemplateKind,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl TemplateDraft {
    pub fn new(kind: TemplateKind) -> Self {
        Self {
            kind,
            title: String::new(),
            category: String::new(),
            subject: String::new(),
            body: String::new(),
        }
    }

    pub fn variables(&self) -> Vec<String> {
        match self.kind {
            TemplateKind::Email => detect_variables(&self.subject, &self.body),
            TemplateKind::Sms => detect_variables("", &self.body),
        }
    }

    pub fn sms_segments(&self) -> usize {
        sms_segments(&self.body)
    }

    /// Title, then subject (email only), then body.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.kind == TemplateKind::Email && self.subject.trim().is_empty() {
            return Err(ValidationError::SubjectRequired);
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::BodyRequired);
        }
        Ok(())
    }

    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) {
        if let (Some(subject), TemplateKind::Email) = (&suggestion.subject, self.kind) {
            self.subject = subject.clone();
        }
        self.body = suggestion.body.clone();
    }

    /// Validates and turns the draft into a stored template.
    pub fn save(&self) -> Result<Template, ValidationError> {
        self.validate()?;
        let template = Template {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            kind: self.kind,
            category: if self.category.trim().is_empty() {
                default_category(self.kind).to_string()
            } else {
                self.category.clone()
            },
            variables: self.variables(),
            last_edited: "Just now".to_string(),
            preview: self.body.clone(),
            archived: false,
        };
        info!(
            title = %template.title,
            variables = template.variables.len(),
            "template saved"
        );
        Ok(template)
    }
}

pub fn saved_message(template: &Template) -> String {
    format!(
        "\"{}\" saved with {} variable(s).",
        template.title,
        template.variables.len()
    )
}

/// Quick-create dialog: only a title is required.
pub fn create_template(
    kind: TemplateKind,
    title: &str,
    category: &str,
    body: &str,
) -> Result<Template, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    Ok(Template {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        kind,
        category: if category.trim().is_empty() {
            default_category(kind).to_string()
        } else {
            category.to_string()
        },
        variables: detect_variables("", body),
        last_edited: "Just now".to_string(),
        preview: if body.is_empty() {
            "No content yet.".to_string()
        } else {
            body.to_string()
        },
        archived: false,
    })
}

pub fn duplicate_template(template: &Template) -> Template {
    Template {
        id: Uuid::new_v4().to_string(),
        title: format!("{} (Copy)", template.title),
        last_edited: "Just now".to_string(),
        ..template.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

impl Suggestion {
    fn email(subject: &str, body: &str) -> Self {
        Self {
            subject: Some(subject.to_string()),
            body: body.to_string(),
        }
    }

    fn sms(body: &str) -> Self {
        Self {
            subject: None,
            body: body.to_string(),
        }
    }
}

/// Canned writing-assistant output per template kind.
pub fn canned_suggestions(kind: TemplateKind) -> Vec<Suggestion> {
    match kind {
        TemplateKind::Email => vec![
            Suggestion::email(
                "Welcome aboard, {{name}}!",
                "Hi {{name}},\n\nThank you for joining {{company}}! We're excited to have you.\n\nHere's what you can do next:\n• Explore your dashboard\n• Set up your first automation\n• Connect your tools\n\nIf you need anything, just reply to this email.\n\nBest,\nThe {{company}} Team",
            ),
            Suggestion::email(
                "Quick follow-up",
                "Hey {{name}},\n\nJust wanted to check in and see how things are going with {{product}}.\n\nWould you be open to a quick 15-minute call on {{date}}? Here's my calendar link: {{link}}\n\nLooking forward to hearing from you!\n\nCheers",
            ),
            Suggestion::email(
                "We miss you, {{name}}",
                "Hi {{name}},\n\nIt's been a while since we last connected. We've made some great updates to {{product}} that I think you'll love.\n\nAs a special thank you, here's {{offer}} just for you.\n\nHope to see you back soon!",
            ),
        ],
        TemplateKind::Sms => vec![
            Suggestion::sms(
                "Hi {{name}}, your appointment is confirmed for {{date}}. Reply STOP to opt out.",
            ),
            Suggestion::sms(
                "{{name}}, don't miss out! {{offer}} ends tonight. Shop now at {{link}}. Reply STOP to unsubscribe.",
            ),
            Suggestion::sms(
                "Hi {{name}}, thanks for your order #{{ref}}. We'll notify you when it ships. Reply HELP for support.",
            ),
        ],
    }
}
