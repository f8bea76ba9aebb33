//! Configuration management
//!
//! Settings live in `settings.json`:
//! ```json
//! {
//!   "import": {
//!     "headerKeywords": ["date", "description"],
//!     "idStrategy": "random",
//!     "amountHypotheses": [{ "kind": "fixed", "amount": 2, "description": [1] }, { "kind": "scan" }]
//!   }
//! }
//! ```
//! Keys the library does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adapters::{FingerprintIds, RandomIds};
use crate::domain::rule::{MISCELLANEOUS, UNCATEGORIZED};
use crate::domain::CategoryRule;
use crate::ports::IdGenerator;

/// Environment variable overriding `import.idStrategy`
pub const ID_STRATEGY_ENV: &str = "VISIONSPEND_ID_STRATEGY";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    import: ImportSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// VisionSpend configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub import: ImportSettings,
}

impl Config {
    /// Load config from a settings directory
    ///
    /// A missing or unreadable settings file yields defaults. The id
    /// strategy can be overridden with `VISIONSPEND_ID_STRATEGY`.
    pub fn load(settings_dir: &Path) -> Result<Self> {
        let id_strategy = std::env::var(ID_STRATEGY_ENV).ok();
        Self::load_from(settings_dir, id_strategy.as_deref())
    }

    /// Load config, applying an explicit id strategy override
    ///
    /// Unrecognized override values are ignored and the file value kept.
    pub fn load_from(settings_dir: &Path, id_strategy: Option<&str>) -> Result<Self> {
        let settings_path = settings_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", settings_path.display(), e);
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let mut import = raw.import;
        if let Some(value) = id_strategy {
            match IdStrategy::parse(value) {
                Some(strategy) => import.id_strategy = strategy,
                None => warn!("Ignoring unknown {} value: {}", ID_STRATEGY_ENV, value),
            }
        }

        Ok(Self { import })
    }

    /// Save config to a settings directory, preserving unmanaged keys
    pub fn save(&self, settings_dir: &Path) -> Result<()> {
        let settings_path = settings_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.import = self.import.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}

/// How imported rows obtain their identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Fresh random id per row: de-duplication is identity-based only
    #[default]
    Random,
    /// Hash of normalized date|description|amount: re-imports are dropped
    Fingerprint,
}

impl IdStrategy {
    /// Case-insensitive `random` / `fingerprint`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Some(Self::Random),
            "fingerprint" => Some(Self::Fingerprint),
            _ => None,
        }
    }

    pub fn generator(&self) -> Arc<dyn IdGenerator> {
        match self {
            Self::Random => Arc::new(RandomIds),
            Self::Fingerprint => Arc::new(FingerprintIds),
        }
    }
}

/// One positional guess about where the amount and description sit in a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AmountHypothesis {
    /// Amount at `amount`; description is the first non-empty field among `description`
    Fixed { amount: usize, description: Vec<usize> },
    /// First numeric field from index 1 on; description is the field before it,
    /// else the field after it, else the placeholder
    Scan,
}

/// Settings for the delimited-file importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSettings {
    /// Line 0 is a header when it contains all of these (case-insensitive)
    pub header_keywords: Vec<String>,
    /// Rows with fewer fields are rejected
    pub min_fields: usize,
    /// Evaluated in order; the first whose amount field is numeric wins
    pub amount_hypotheses: Vec<AmountHypothesis>,
    pub placeholder_description: String,
    /// Used when the resolved category is empty
    pub default_category: String,
    /// Used when no keyword rule matches
    pub fallback_category: String,
    /// chrono formats tried in order
    pub date_formats: Vec<String>,
    /// Replaces the built-in keyword table when set
    pub category_rules: Option<Vec<CategoryRule>>,
    pub id_strategy: IdStrategy,
}

impl ImportSettings {
    /// Keyword table in effect
    pub fn rules(&self) -> Vec<CategoryRule> {
        self.category_rules.clone().unwrap_or_else(CategoryRule::defaults)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            header_keywords: vec!["date".to_string(), "description".to_string()],
            min_fields: 3,
            amount_hypotheses: vec![
                AmountHypothesis::Fixed {
                    amount: 2,
                    description: vec![1],
                },
                AmountHypothesis::Fixed {
                    amount: 1,
                    description: vec![2, 0],
                },
                AmountHypothesis::Scan,
            ],
            placeholder_description: "Unknown Description".to_string(),
            default_category: UNCATEGORIZED.to_string(),
            fallback_category: MISCELLANEOUS.to_string(),
            date_formats: [
                "%Y-%m-%d",
                "%m/%d/%Y",
                "%Y/%m/%d",
                "%m-%d-%Y",
                "%d.%m.%Y",
                "%b %d, %Y",
                "%B %d, %Y",
                "%b %d %Y",
                "%B %d %Y",
                "%d %b %Y",
                "%d %B %Y",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            category_rules: None,
            id_strategy: IdStrategy::Random,
        }
    }
}
