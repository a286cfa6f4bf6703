///! Diagnostic types shared by the check catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How bad a finding is. Ordered so `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Identifier of one check in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    TableParse,
    BrokenLink,
    DanglingAnchor,
    EscapingLink,
    MissingChildTable,
    TableNameMismatch,
    ChildTableCycle,
    OrphanTable,
    NavindexOrder,
    NavindexPath,
    SearchKeyEncoding,
    SearchShardOrder,
    SearchLetterGroup,
    SearchManifest,
    DuplicateSearchKey,
    DuplicatePageAnchor,
    CrossrefClassSearch,
}

impl CheckId {
    pub const ALL: &'static [CheckId] = &[
        CheckId::TableParse,
        CheckId::BrokenLink,
        CheckId::DanglingAnchor,
        CheckId::EscapingLink,
        CheckId::MissingChildTable,
        CheckId::TableNameMismatch,
        CheckId::ChildTableCycle,
        CheckId::OrphanTable,
        CheckId::NavindexOrder,
        CheckId::NavindexPath,
        CheckId::SearchKeyEncoding,
        CheckId::SearchShardOrder,
        CheckId::SearchLetterGroup,
        CheckId::SearchManifest,
        CheckId::DuplicateSearchKey,
        CheckId::DuplicatePageAnchor,
        CheckId::CrossrefClassSearch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::TableParse => "table_parse",
            CheckId::BrokenLink => "broken_link",
            CheckId::DanglingAnchor => "dangling_anchor",
            CheckId::EscapingLink => "escaping_link",
            CheckId::MissingChildTable => "missing_child_table",
            CheckId::TableNameMismatch => "table_name_mismatch",
            CheckId::ChildTableCycle => "child_table_cycle",
            CheckId::OrphanTable => "orphan_table",
            CheckId::NavindexOrder => "navindex_order",
            CheckId::NavindexPath => "navindex_path",
            CheckId::SearchKeyEncoding => "search_key_encoding",
            CheckId::SearchShardOrder => "search_shard_order",
            CheckId::SearchLetterGroup => "search_letter_group",
            CheckId::SearchManifest => "search_manifest",
            CheckId::DuplicateSearchKey => "duplicate_search_key",
            CheckId::DuplicatePageAnchor => "duplicate_page_anchor",
            CheckId::CrossrefClassSearch => "crossref_class_search",
        }
    }

    /// Catalog default, before configuration overrides.
    pub fn default_severity(&self) -> Severity {
        match self {
            CheckId::TableNameMismatch
            | CheckId::SearchManifest
            | CheckId::DuplicateSearchKey
            | CheckId::CrossrefClassSearch => Severity::Warning,
            CheckId::OrphanTable | CheckId::DuplicatePageAnchor => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown check '{}'", s))
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub check: CheckId,
    pub severity: Severity,
    /// Artifact or page the finding is about, relative to the root.
    pub file: String,
    /// Position inside the file when one makes sense (a node label
    /// path, a search key, a URL).
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(check: CheckId, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check,
            severity: check.default_severity(),
            file: file.into(),
            location: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{}: {} [{}] {}: {}",
                self.severity, self.file, self.check, location, self.message
            ),
            None => write!(f, "{}: {} [{}] {}", self.severity, self.file, self.check, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_check_id_round_trip() {
        for id in CheckId::ALL {
            assert_eq!(id.as_str().parse::<CheckId>().as_ref(), Ok(id));
        }
        assert!("no_such_check".parse::<CheckId>().is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(CheckId::BrokenLink, "navtreedata.js", "page 'gone.html' does not exist")
            .at("Classes > Class List");
        assert_eq!(
            diag.to_string(),
            "error: navtreedata.js [broken_link] Classes > Class List: page 'gone.html' does not exist"
        );
    }
}
