use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::chat::{DEFAULT_AGENT_KEYWORDS, RoleClassifier};

/// Dashboard settings.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "agent_keywords": ["service", "support", "helpdesk"],
///   "base_url": "https://example.org/outputs",
///   "concurrency": 8
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Case-insensitive sender-name fragments identifying support agents.
    pub agent_keywords: Vec<String>,
    /// Prefix used to turn bare ticket ids into `<base_url>/<id>.json`.
    pub base_url: Option<String>,
    /// Maximum number of ticket sources loaded at once.
    pub concurrency: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            agent_keywords: DEFAULT_AGENT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            base_url: None,
            concurrency: 4,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(content)?;
        config.concurrency = config.concurrency.max(1);
        Ok(config)
    }

    pub fn classifier(&self) -> RoleClassifier {
        RoleClassifier::new(&self.agent_keywords)
    }
}
