///! Check runner: executes the enabled catalog over a loaded bundle
///! and assembles the report.

use super::types::{CheckId, Diagnostic, Severity};
use super::{links, nav, search};
use crate::bundle::DocBundle;
use crate::report::Report;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Which checks run, at which severity, and what to suppress.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub disabled: HashSet<CheckId>,
    pub overrides: HashMap<CheckId, Severity>,
    /// A diagnostic whose file, location or message matches any of
    /// these is dropped.
    pub ignore: Vec<Regex>,
}

impl CheckOptions {
    fn keeps(&self, diag: &Diagnostic) -> bool {
        if self.disabled.contains(&diag.check) {
            return false;
        }
        !self.ignore.iter().any(|re| {
            re.is_match(&diag.file)
                || re.is_match(&diag.message)
                || diag.location.as_deref().map(|l| re.is_match(l)).unwrap_or(false)
        })
    }
}

/// Run the whole catalog and return the report.
pub fn run_checks(bundle: &DocBundle, opts: &CheckOptions) -> Report {
    let mut diagnostics = Vec::new();

    check_table_parse(bundle, &mut diagnostics);
    links::check_links(bundle, &mut diagnostics);
    nav::check_missing_child_tables(bundle, &mut diagnostics);
    nav::check_table_names(bundle, &mut diagnostics);
    nav::check_table_cycles(bundle, &mut diagnostics);
    nav::check_orphan_tables(bundle, &mut diagnostics);
    nav::check_nav_index_order(bundle, &mut diagnostics);
    nav::check_nav_index_paths(bundle, &mut diagnostics);
    search::check_key_encoding(bundle, &mut diagnostics);
    search::check_shard_order(bundle, &mut diagnostics);
    search::check_letter_groups(bundle, &mut diagnostics);
    search::check_class_crossref(bundle, &mut diagnostics);
    check_duplicate_anchors(bundle, &mut diagnostics);

    let total = diagnostics.len();
    let mut kept: Vec<Diagnostic> = diagnostics
        .into_iter()
        .filter(|d| opts.keeps(d))
        .map(|mut d| {
            if let Some(severity) = opts.overrides.get(&d.check) {
                d.severity = *severity;
            }
            d
        })
        .collect();
    debug!("Checks produced {} findings, {} kept", total, kept.len());

    kept.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then_with(|| a.check.cmp(&b.check))
            .then_with(|| a.location.cmp(&b.location))
            .then_with(|| a.message.cmp(&b.message))
    });

    Report::new(bundle, kept)
}

/// Files that failed to parse or shape during loading, plus pages the
/// scanner could not read.
fn check_table_parse(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for error in &bundle.load_errors {
        out.push(Diagnostic::new(CheckId::TableParse, error.file.clone(), error.message.clone()));
    }
    for error in &bundle.pages.scan_errors {
        out.push(Diagnostic::new(CheckId::TableParse, error.file.clone(), error.message.clone()));
    }
}

/// Anchors defined twice inside one page.
fn check_duplicate_anchors(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for (page, info) in &bundle.pages.pages {
        for anchor in &info.duplicate_anchors {
            out.push(
                Diagnostic::new(
                    CheckId::DuplicatePageAnchor,
                    page.clone(),
                    format!("anchor '{}' is defined more than once", anchor),
                )
                .at(anchor.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::LoadError;
    use crate::navtree::{NavNode, NavTreeData};
    use crate::pages::PageInfo;

    fn failing_bundle() -> DocBundle {
        let mut bundle = DocBundle::default();
        bundle.load_errors.push(LoadError {
            file: "hierarchy.js".to_string(),
            message: "line 2, column 13: unterminated string".to_string(),
        });
        bundle.navtree = Some(NavTreeData {
            roots: vec![NavNode::new("Project", Some("gone.html".to_string()))],
            index_pages: Vec::new(),
            sync_on_msg: None,
            sync_off_msg: None,
        });
        bundle.pages.pages.insert("index.html".to_string(), PageInfo::default());
        bundle
    }

    #[test]
    fn test_runner_collects_and_sorts() {
        let report = run_checks(&failing_bundle(), &CheckOptions::default());

        assert_eq!(report.diagnostics.len(), 2);
        // Sorted by file: hierarchy.js before navtreedata.js
        assert_eq!(report.diagnostics[0].check, CheckId::TableParse);
        assert_eq!(report.diagnostics[1].check, CheckId::BrokenLink);
        assert_eq!(report.errors, 2);
    }

    #[test]
    fn test_disabled_check_dropped() {
        let opts = CheckOptions {
            disabled: [CheckId::BrokenLink].into_iter().collect(),
            ..CheckOptions::default()
        };
        let report = run_checks(&failing_bundle(), &opts);
        assert!(report.diagnostics.iter().all(|d| d.check != CheckId::BrokenLink));
    }

    #[test]
    fn test_severity_override() {
        let opts = CheckOptions {
            overrides: [(CheckId::BrokenLink, Severity::Warning)].into_iter().collect(),
            ..CheckOptions::default()
        };
        let report = run_checks(&failing_bundle(), &opts);
        let broken = report
            .diagnostics
            .iter()
            .find(|d| d.check == CheckId::BrokenLink)
            .unwrap();
        assert_eq!(broken.severity, Severity::Warning);
        assert_eq!(report.warnings, 1);
    }

    #[test]
    fn test_ignore_pattern() {
        let opts = CheckOptions {
            ignore: vec![Regex::new("gone\\.html").unwrap()],
            ..CheckOptions::default()
        };
        let report = run_checks(&failing_bundle(), &opts);
        assert!(report.diagnostics.iter().all(|d| d.check != CheckId::BrokenLink));
    }
}
