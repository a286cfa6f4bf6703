//! `doxaudit check` - load, validate, report.

use crate::cli::ReportFormat;
use crate::config::AuditConfig;
use anyhow::{Context, Result};
use doxaudit_core::checks::run_checks;
use doxaudit_core::bundle::DocBundle;
use std::path::{Path, PathBuf};
use tracing::error;

/// Exit codes: 0 clean, 1 findings at failing severity, 2 the bundle
/// could not be loaded at all.
pub async fn run(
    root: &Path,
    format: ReportFormat,
    output: Option<&PathBuf>,
    strict: bool,
    config_path: Option<&PathBuf>,
) -> Result<i32> {
    let config = AuditConfig::load(config_path.map(|p| p.as_path()))?;
    let options = config.check_options()?;

    let bundle = match DocBundle::load(root).await {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Failed to load bundle from {}: {:#}", root.display(), e);
            return Ok(2);
        }
    };

    let report = run_checks(&bundle, &options);
    let rendered = match format {
        ReportFormat::Text => report.render_text(),
        ReportFormat::Json => report.render_json()?,
        ReportFormat::Csv => report.render_csv()?,
    };

    match output {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(if report.fails(strict) { 1 } else { 0 })
}
