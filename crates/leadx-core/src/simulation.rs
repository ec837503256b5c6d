//! Stand-ins for the slow services behind the pages: the mapping assistant,
//! the writing assistant and automation test runs. Each call waits for its
//! configured latency and can be told to fail.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::builder::AutomationDraft;
use crate::config::LatencyConfig;
use crate::error::{LeadxError, Result, ValidationError};
use crate::mapping::{suggest_mapping, FieldMapping};
use crate::templates::{canned_suggestions, Suggestion};
use crate::types::TemplateKind;

/// Recipient every test run pretends to message.
pub const TEST_RECIPIENT: &str = "Jane Doe (jane@example.com)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AutoMap,
    TemplateAssist,
    TestRun,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::AutoMap => "auto-map",
            Operation::TemplateAssist => "template assist",
            Operation::TestRun => "test run",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunReport {
    pub automation: String,
    pub message: String,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Mapping guess for the given sheet columns.
    async fn suggest_mapping(&self, columns: &[String]) -> Result<FieldMapping>;

    async fn template_suggestions(&self, kind: TemplateKind) -> Result<Vec<Suggestion>>;

    /// Dry run of a completed builder draft.
    async fn test_run(&self, draft: &AutomationDraft) -> Result<TestRunReport>;
}

/// Fixed-delay [`Assistant`] with per-operation failure injection.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    latency: LatencyConfig,
    failures: HashMap<Operation, String>,
}

impl Simulator {
    pub fn new(latency: LatencyConfig) -> Self {
        Self {
            latency,
            failures: HashMap::new(),
        }
    }

    /// Makes every later call of `operation` fail with `message`.
    pub fn failing(mut self, operation: Operation, message: impl Into<String>) -> Self {
        self.failures.insert(operation, message.into());
        self
    }

    pub fn latency(&self) -> LatencyConfig {
        self.latency
    }

    async fn wait(&self, operation: Operation, delay: Duration) -> Result<()> {
        tokio::time::sleep(delay).await;
        match self.failures.get(&operation) {
            Some(message) => {
                warn!(operation = operation.label(), %message, "simulated failure");
                Err(LeadxError::Simulated {
                    operation: operation.label(),
                    message: message.clone(),
                })
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Assistant for Simulator {
    async fn suggest_mapping(&self, columns: &[String]) -> Result<FieldMapping> {
        self.wait(Operation::AutoMap, self.latency.ai_suggest()).await?;
        let mapping = suggest_mapping(columns);
        info!(mapped = mapping.mapped_count(), "auto-map suggestion ready");
        Ok(mapping)
    }

    async fn template_suggestions(&self, kind: TemplateKind) -> Result<Vec<Suggestion>> {
        self.wait(Operation::TemplateAssist, self.latency.template_assist())
            .await?;
        Ok(canned_suggestions(kind))
    }

    async fn test_run(&self, draft: &AutomationDraft) -> Result<TestRunReport> {
        let (Some(action), Some(template)) = (draft.action, draft.template.as_ref()) else {
            let step = if draft.action.is_none() { "action" } else { "template" };
            return Err(ValidationError::StepIncomplete { step }.into());
        };
        self.wait(Operation::TestRun, self.latency.test_run()).await?;

        let report = TestRunReport {
            automation: draft.display_name(),
            message: format!(
                "Trigger fired → {action} sent to \"{TEST_RECIPIENT}\" using \"{}\" template. Completed in 1.2s.",
                template.title
            ),
        };
        info!(automation = %report.automation, "test run complete");
        Ok(report)
    }
}
