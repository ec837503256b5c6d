//! Step-by-step automation builder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{ActionKind, Automation, Template, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderStep {
    Sheet,
    Trigger,
    Action,
    Template,
    Review,
}

impl BuilderStep {
    pub const ALL: [BuilderStep; 5] = [
        BuilderStep::Sheet,
        BuilderStep::Trigger,
        BuilderStep::Action,
        BuilderStep::Template,
        BuilderStep::Review,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BuilderStep::Sheet => "sheet",
            BuilderStep::Trigger => "trigger",
            BuilderStep::Action => "action",
            BuilderStep::Template => "template",
            BuilderStep::Review => "review",
        }
    }

    pub fn next(&self) -> Option<BuilderStep> {
        let index = BuilderStep::ALL.iter().position(|step| step == self)?;
        BuilderStep::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for BuilderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateChoice {
    pub id: String,
    pub title: String,
}

impl From<&Template> for TemplateChoice {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id.clone(),
            title: template.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationDraft {
    pub sheet: Option<String>,
    pub trigger: Option<Trigger>,
    pub action: Option<ActionKind>,
    pub template: Option<TemplateChoice>,
    #[serde(default)]
    pub name: String,
}

impl AutomationDraft {
    pub fn is_complete(&self, step: BuilderStep) -> bool {
        match step {
            BuilderStep::Sheet => self.sheet.is_some(),
            BuilderStep::Trigger => self.trigger.is_some(),
            BuilderStep::Action => self.action.is_some(),
            BuilderStep::Template => self.template.is_some(),
            BuilderStep::Review => true,
        }
    }

    /// Step that follows `step`, provided `step` has its selection.
    pub fn advance(&self, step: BuilderStep) -> Result<BuilderStep, ValidationError> {
        if !self.is_complete(step) {
            return Err(ValidationError::StepIncomplete { step: step.label() });
        }
        Ok(step.next().unwrap_or(BuilderStep::Review))
    }

    /// Picking a different action drops a template chosen for the old one.
    pub fn choose_action(&mut self, action: ActionKind) {
        if self.action != Some(action) {
            self.template = None;
        }
        self.action = Some(action);
    }

    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        self.template
            .as_ref()
            .map(|template| template.title.clone())
            .unwrap_or_else(|| "New Automation".to_string())
    }

    /// The enabled automation this draft activates as.
    pub fn activate(&self, id: impl Into<String>) -> Result<Automation, ValidationError> {
        for step in BuilderStep::ALL {
            if !self.is_complete(step) {
                return Err(ValidationError::StepIncomplete { step: step.label() });
            }
        }
        let (Some(sheet), Some(trigger), Some(action)) =
            (self.sheet.clone(), self.trigger, self.action)
        else {
            return Err(ValidationError::StepIncomplete {
                step: BuilderStep::Sheet.label(),
            });
        };

        Ok(Automation {
            id: id.into(),
            name: self.display_name(),
            trigger,
            action,
            sheet,
            enabled: true,
            last_run: "Never".to_string(),
            success_rate: 0.0,
            runs: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_step_needs_its_selection() {
        let mut draft = AutomationDraft::default();
        assert_eq!(
            draft.advance(BuilderStep::Sheet),
            Err(ValidationError::StepIncomplete { step: "sheet" })
        );

        draft.sheet = Some("Q1 Leads Master".to_string());
        assert_eq!(draft.advance(BuilderStep::Sheet), Ok(BuilderStep::Trigger));
        assert!(draft.advance(BuilderStep::Trigger).is_err());
        assert_eq!(draft.advance(BuilderStep::Review), Ok(BuilderStep::Review));
    }

    #[test]
    fn changing_action_clears_template() {
        let mut draft = AutomationDraft::default();
        draft.choose_action(ActionKind::SendEmail);
        draft.template = Some(TemplateChoice {
            id: "1".to_string(),
            title: "Welcome Email".to_string(),
        });

        draft.choose_action(ActionKind::SendEmail);
        assert!(draft.template.is_some());
        draft.choose_action(ActionKind::SendSms);
        assert!(draft.template.is_none());
    }

    #[test]
    fn activation_names_after_template_when_unnamed() {
        let draft = AutomationDraft {
            sheet: Some("Webinar Signups".to_string()),
            trigger: Some(Trigger::NewRow),
            action: Some(ActionKind::SendSms),
            template: Some(TemplateChoice {
                id: "5".to_string(),
                title: "Quick Reminder".to_string(),
            }),
            name: "  ".to_string(),
        };

        let automation = draft.activate("9").unwrap();
        assert_eq!(automation.name, "Quick Reminder");
        assert!(automation.enabled);
        assert_eq!(automation.runs, 0);
    }
}
