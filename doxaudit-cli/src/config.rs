//! TOML configuration for the audit run.

use anyhow::{Context, Result};
use doxaudit_core::checks::{CheckId, CheckOptions, Severity};
use doxaudit_core::searchidx::DEFAULT_THRESHOLD;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Check names to disable entirely.
    #[serde(default)]
    pub disabled_checks: Vec<String>,

    /// Per-check severity overrides (`broken_link = "warning"`).
    #[serde(default)]
    pub severity: HashMap<String, String>,

    /// Regexes; findings whose file, location or message match are
    /// suppressed.
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_fuzzy_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_result_limit() -> usize {
    25
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            disabled_checks: Vec::new(),
            severity: HashMap::new(),
            ignore: Vec::new(),
            fuzzy_threshold: default_fuzzy_threshold(),
            result_limit: default_result_limit(),
        }
    }
}

impl AuditConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AuditConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Default config when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Translate into the runner's options, validating names.
    pub fn check_options(&self) -> Result<CheckOptions> {
        let mut options = CheckOptions::default();

        for name in &self.disabled_checks {
            let id: CheckId = name
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid disabled_checks entry")?;
            options.disabled.insert(id);
        }

        for (name, severity) in &self.severity {
            let id: CheckId = name
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid severity override")?;
            let severity: Severity = severity
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid severity override")?;
            options.overrides.insert(id, severity);
        }

        for pattern in &self.ignore {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Invalid ignore pattern '{}'", pattern))?;
            options.ignore.push(regex);
        }

        Ok(options)
    }
}
