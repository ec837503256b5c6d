use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::{Automation, CreditUsage, Lead, MessageLog, Sheet, Template};

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Everything the pages start out with. Also the shape of a `--data` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub automations: Vec<Automation>,
    #[serde(default)]
    pub messages: Vec<MessageLog>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub credits: CreditUsage,
}

impl Dataset {
    /// The built-in demo data.
    pub fn seed() -> Result<Self> {
        Self::from_json_str(SEED_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            leads = dataset.leads.len(),
            automations = dataset.automations.len(),
            messages = dataset.messages.len(),
            sheets = dataset.sheets.len(),
            templates = dataset.templates.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }
}
