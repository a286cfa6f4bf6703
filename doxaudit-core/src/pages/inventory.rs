///! Scan of the generated HTML pages and their anchors

use anyhow::{Context, Result};
use futures::future::join_all;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Anchors one generated page defines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageInfo {
    /// All `id` attribute values plus `<a name=...>` values.
    pub anchors: HashSet<String>,
    /// Anchor values that occur more than once in the page.
    pub duplicate_anchors: Vec<String>,
}

/// A page that could not be read or parsed during the scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanError {
    pub file: String,
    pub message: String,
}

/// All `*.html` files under the doc root, keyed by `/`-separated path
/// relative to the root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageInventory {
    pub pages: HashMap<String, PageInfo>,
    pub scan_errors: Vec<ScanError>,
}

impl PageInventory {
    /// Scan the doc root recursively.
    ///
    /// Pages are parsed on blocking tasks joined together; a page that
    /// fails to read is recorded in `scan_errors` and the scan goes on.
    pub async fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let files = collect_html_files(&root).await?;
        debug!("Scanning {} generated pages under {}", files.len(), root.display());

        let tasks: Vec<_> = files
            .into_iter()
            .map(|rel| {
                let path = root.join(&rel);
                tokio::task::spawn_blocking(move || {
                    let result = std::fs::read_to_string(&path)
                        .map(|html| extract_anchors(&html));
                    (rel, result)
                })
            })
            .collect();

        let mut inventory = Self::default();
        for joined in join_all(tasks).await {
            let (rel, result) = joined.context("page scan task panicked")?;
            match result {
                Ok(info) => {
                    inventory.pages.insert(rel, info);
                }
                Err(e) => inventory.scan_errors.push(ScanError {
                    file: rel,
                    message: e.to_string(),
                }),
            }
        }

        Ok(inventory)
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    pub fn has_anchor(&self, page: &str, fragment: &str) -> bool {
        self.pages
            .get(page)
            .map(|info| info.anchors.contains(fragment))
            .unwrap_or(false)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn anchor_count(&self) -> usize {
        self.pages.values().map(|p| p.anchors.len()).sum()
    }
}

/// Recursively collect `*.html` paths relative to `root`.
async fn collect_html_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("html") {
                let rel = path
                    .strip_prefix(root)
                    .expect("entry under scanned root")
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push(rel);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Pull every addressable anchor out of one page.
fn extract_anchors(html: &str) -> PageInfo {
    let document = Html::parse_document(html);
    let id_sel = Selector::parse("[id]").expect("static selector");
    let name_sel = Selector::parse("a[name]").expect("static selector");

    let mut seen: HashMap<String, usize> = HashMap::new();
    for element in document.select(&id_sel) {
        if let Some(id) = element.value().attr("id") {
            *seen.entry(id.to_string()).or_insert(0) += 1;
        }
    }
    for element in document.select(&name_sel) {
        if let Some(name) = element.value().attr("name") {
            // An <a> carrying both id and name counts once
            if element.value().attr("id") != Some(name) {
                *seen.entry(name.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut duplicate_anchors: Vec<String> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(anchor, _)| anchor.clone())
        .collect();
    duplicate_anchors.sort();

    PageInfo {
        anchors: seen.into_keys().collect(),
        duplicate_anchors,
    }
}
