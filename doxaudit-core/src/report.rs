///! Audit report assembly and rendering

use crate::bundle::{BundleStats, DocBundle};
use crate::checks::{Diagnostic, Severity};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub root: String,
    pub stats: BundleStats,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new(bundle: &DocBundle, diagnostics: Vec<Diagnostic>) -> Self {
        let count = |severity| diagnostics.iter().filter(|d| d.severity == severity).count();
        Self {
            generated_at: Utc::now(),
            root: bundle.root.display().to_string(),
            stats: bundle.stats(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
            diagnostics,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether the run should fail. Errors always fail; `strict` makes
    /// warnings fail too.
    pub fn fails(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }

    /// Human-readable rendering for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Audit of {}\n", self.root));
        out.push_str(&format!("{}\n\n", self.stats));

        if self.is_clean() {
            out.push_str("No findings.\n");
            return out;
        }

        for diag in &self.diagnostics {
            out.push_str(&format!("{}\n", diag));
        }
        out.push_str(&format!(
            "\n{} errors, {} warnings, {} infos\n",
            self.errors, self.warnings, self.infos
        ));
        out
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
    }

    /// One diagnostic per row; summary stays in text/JSON.
    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["severity", "check", "file", "location", "message"])
            .context("Failed to write CSV header")?;
        for diag in &self.diagnostics {
            writer
                .write_record([
                    diag.severity.as_str(),
                    diag.check.as_str(),
                    diag.file.as_str(),
                    diag.location.as_deref().unwrap_or(""),
                    diag.message.as_str(),
                ])
                .context("Failed to write CSV row")?;
        }
        let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
        String::from_utf8(bytes).context("CSV output was not UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckId;

    fn sample_report() -> Report {
        let bundle = DocBundle::default();
        Report::new(
            &bundle,
            vec![
                Diagnostic::new(CheckId::BrokenLink, "navtreedata.js", "page 'gone.html' missing")
                    .at("Project > Gone"),
                {
                    let mut d = Diagnostic::new(
                        CheckId::OrphanTable,
                        "unused.js",
                        "child table 'unused' is referenced by nothing",
                    );
                    d.severity = Severity::Info;
                    d
                },
            ],
        )
    }

    #[test]
    fn test_counts_and_failure() {
        let report = sample_report();
        assert_eq!(report.errors, 1);
        assert_eq!(report.infos, 1);
        assert!(report.fails(false));

        let clean = Report::new(&DocBundle::default(), Vec::new());
        assert!(clean.is_clean());
        assert!(!clean.fails(true));
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let bundle = DocBundle::default();
        let mut diag = Diagnostic::new(CheckId::TableNameMismatch, "t.js", "mismatch");
        diag.severity = Severity::Warning;
        let report = Report::new(&bundle, vec![diag]);

        assert!(!report.fails(false));
        assert!(report.fails(true));
    }

    #[test]
    fn test_render_text() {
        let text = sample_report().render_text();
        assert!(text.contains("[broken_link]"));
        assert!(text.contains("1 errors, 0 warnings, 1 infos"));
        assert!(Report::new(&DocBundle::default(), Vec::new())
            .render_text()
            .contains("No findings."));
    }

    #[test]
    fn test_render_csv() {
        let csv = sample_report().render_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("severity,check,file,location,message"));
        assert!(csv.contains("error,broken_link,navtreedata.js,Project > Gone"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let json = sample_report().render_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["errors"], 1);
        assert_eq!(value["diagnostics"][0]["check"], "broken_link");
        assert_eq!(value["diagnostics"][0]["severity"], "error");
    }
}
