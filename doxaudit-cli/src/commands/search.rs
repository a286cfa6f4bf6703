//! `doxaudit search` - query the index from the command line.

use crate::cli::QueryFormat;
use crate::config::AuditConfig;
use anyhow::{Context, Result};
use doxaudit_core::bundle::DocBundle;
use doxaudit_core::searchidx::{MatchKind, QueryOptions, query};
use std::path::{Path, PathBuf};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    root: &Path,
    term: &str,
    section: Option<String>,
    limit: Option<usize>,
    fuzzy: bool,
    threshold: Option<f64>,
    format: QueryFormat,
    config_path: Option<&PathBuf>,
) -> Result<i32> {
    let config = AuditConfig::load(config_path.map(|p| p.as_path()))?;
    let bundle = DocBundle::load(root).await?;

    let options = QueryOptions {
        section,
        limit: limit.unwrap_or(config.result_limit),
        // --threshold implies the fuzzy tier
        fuzzy: fuzzy || threshold.is_some(),
        threshold: threshold.unwrap_or(config.fuzzy_threshold),
    };
    let hits = query(&bundle.search, term, &options);

    match format {
        QueryFormat::Json => {
            let json = serde_json::to_string_pretty(&hits).context("Failed to serialize hits")?;
            println!("{}", json);
        }
        QueryFormat::Text => {
            if hits.is_empty() {
                println!("No matches for '{}'.", term);
                return Ok(1);
            }
            for hit in &hits {
                let shown = hit.scope.as_deref().unwrap_or(&hit.label);
                let kind = match hit.kind {
                    MatchKind::Exact => String::new(),
                    MatchKind::Prefix => " (prefix)".to_string(),
                    MatchKind::Fuzzy => format!(" (fuzzy {:.2})", hit.score),
                };
                println!("{:<12} {}  {}{}", hit.section, shown, hit.url, kind);
            }
        }
    }

    Ok(0)
}
