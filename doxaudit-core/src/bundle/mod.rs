///! Artifact discovery and loading
///!
///! `DocBundle::load` walks a Doxygen HTML root, parses every index
///! artifact it recognizes and scans the generated pages. A file that
///! fails to parse becomes a recorded load error, not an abort: a
///! malformed table is itself a finding.

use crate::jsdata::parse_script;
use crate::navtree::{
    ChildTable, NavIndexShard, NavTreeData, TableMap, child_table_from_script,
    nav_index_from_script, navtree_from_script, parse_nav_index_name,
};
use crate::pages::PageInventory;
use crate::searchidx::{
    SearchIndex, manifest_from_script, parse_shard_filename, shard_from_script,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Doxygen's widget scripts; real code, not data tables.
const SCRIPT_STEMS: &[&str] = &[
    "jquery",
    "dynsections",
    "navtree",
    "resize",
    "svgpan",
    "menudata",
    "cookie",
    "clipboard",
    "doxygen",
];

/// A file that failed to parse or shape during loading.
#[derive(Debug, Clone, Serialize)]
pub struct LoadError {
    /// Path relative to the doc root (`search/functions_4.js`).
    pub file: String,
    pub message: String,
}

/// Everything one documentation build emitted, loaded.
#[derive(Debug, Default)]
pub struct DocBundle {
    pub root: PathBuf,
    pub navtree: Option<NavTreeData>,
    pub child_tables: TableMap,
    pub nav_index_shards: Vec<NavIndexShard>,
    pub search: SearchIndex,
    pub pages: PageInventory,
    pub load_errors: Vec<LoadError>,
}

impl DocBundle {
    /// Load every recognized artifact under `root`.
    pub async fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        info!("Loading documentation bundle from {}", root.display());

        let mut bundle = Self {
            pages: PageInventory::scan(&root).await?,
            root: root.clone(),
            ..Self::default()
        };

        bundle.load_root_scripts().await?;
        bundle.load_search_scripts().await?;

        bundle.nav_index_shards.sort_by_key(|s| s.ordinal);
        bundle
            .search
            .shards
            .sort_by(|a, b| a.section.cmp(&b.section).then(a.ordinal.cmp(&b.ordinal)));

        info!(
            "Bundle loaded: {} child tables, {} nav-index shards, {} search shards, {} pages, {} load errors",
            bundle.child_tables.len(),
            bundle.nav_index_shards.len(),
            bundle.search.shards.len(),
            bundle.pages.page_count(),
            bundle.load_errors.len()
        );
        Ok(bundle)
    }

    /// `navtreedata.js`, `navtreeindex<k>.js` and the child tables.
    async fn load_root_scripts(&mut self) -> Result<()> {
        for stem in js_stems(&self.root).await? {
            if SCRIPT_STEMS.contains(&stem.as_str()) {
                debug!("Skipping widget script {}.js", stem);
                continue;
            }

            let rel = format!("{}.js", stem);
            let source = match self.read_artifact(&rel).await {
                Ok(source) => source,
                Err(e) => {
                    self.record_error(&rel, e);
                    continue;
                }
            };
            let script = match parse_script(&source) {
                Ok(script) => script,
                Err(e) => {
                    self.record_error(&rel, e.into());
                    continue;
                }
            };

            let shaped = if stem == "navtreedata" {
                navtree_from_script(&script).map(|tree| self.navtree = Some(tree))
            } else if let Some(ordinal) = parse_nav_index_name(&stem) {
                nav_index_from_script(&script, ordinal)
                    .map(|shard| self.nav_index_shards.push(shard))
            } else {
                child_table_from_script(&script, &stem).map(|table: ChildTable| {
                    self.child_tables.insert(table.name.clone(), table);
                })
            };

            if let Err(e) = shaped {
                self.record_error(&rel, e);
            }
        }
        Ok(())
    }

    /// `search/searchdata.js` and the `search/<section>_<hex>.js` shards.
    async fn load_search_scripts(&mut self) -> Result<()> {
        let search_dir = self.root.join("search");
        if !search_dir.is_dir() {
            debug!("No search/ directory under {}", self.root.display());
            return Ok(());
        }

        for stem in js_stems(&search_dir).await? {
            let shard_name = parse_shard_filename(&stem);
            if stem != "searchdata" && shard_name.is_none() {
                debug!("Skipping widget script search/{}.js", stem);
                continue;
            }

            let rel = format!("search/{}.js", stem);
            let source = match self.read_artifact(&rel).await {
                Ok(source) => source,
                Err(e) => {
                    self.record_error(&rel, e);
                    continue;
                }
            };
            let script = match parse_script(&source) {
                Ok(script) => script,
                Err(e) => {
                    self.record_error(&rel, e.into());
                    continue;
                }
            };

            let shaped = match shard_name {
                None => manifest_from_script(&script).map(|m| self.search.manifest = Some(m)),
                Some((section, ordinal)) => {
                    shard_from_script(&script, &section, ordinal, &stem)
                        .map(|shard| self.search.shards.push(shard))
                }
            };

            if let Err(e) = shaped {
                self.record_error(&rel, e);
            }
        }
        Ok(())
    }

    async fn read_artifact(&self, rel: &str) -> Result<String> {
        tokio::fs::read_to_string(self.root.join(rel))
            .await
            .with_context(|| format!("Failed to read {}", rel))
    }

    fn record_error(&mut self, rel: &str, error: anyhow::Error) {
        debug!("Failed to load {}: {:#}", rel, error);
        self.load_errors.push(LoadError {
            file: rel.to_string(),
            message: format!("{:#}", error),
        });
    }

    /// Bundle-level counters.
    pub fn stats(&self) -> BundleStats {
        BundleStats {
            child_tables: self.child_tables.len(),
            nav_nodes: self
                .navtree
                .as_ref()
                .map(|tree| tree.node_count(&self.child_tables))
                .unwrap_or(0),
            nav_index_shards: self.nav_index_shards.len(),
            nav_index_entries: self.nav_index_shards.iter().map(|s| s.entries.len()).sum(),
            search_shards: self.search.shards.len(),
            search_records: self.search.total_records(),
            pages: self.pages.page_count(),
            anchors: self.pages.anchor_count(),
            load_errors: self.load_errors.len(),
        }
    }
}

/// Statistics over a loaded bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleStats {
    pub child_tables: usize,
    pub nav_nodes: usize,
    pub nav_index_shards: usize,
    pub nav_index_entries: usize,
    pub search_shards: usize,
    pub search_records: usize,
    pub pages: usize,
    pub anchors: usize,
    pub load_errors: usize,
}

impl std::fmt::Display for BundleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pages: {} ({} anchors)", self.pages, self.anchors)?;
        writeln!(
            f,
            "Navigation: {} nodes, {} child tables, {} index shards ({} entries)",
            self.nav_nodes, self.child_tables, self.nav_index_shards, self.nav_index_entries
        )?;
        writeln!(
            f,
            "Search: {} records in {} shards",
            self.search_records, self.search_shards
        )?;
        write!(f, "Load errors: {}", self.load_errors)
    }
}

/// File stems of `*.js` entries directly under `dir`, sorted.
async fn js_stems(dir: &Path) -> Result<Vec<String>> {
    let mut stems = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("js") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }

    stems.sort();
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAVTREEDATA: &str = r#"var NAVTREE =
[
  [ "Project", "index.html", [
    [ "Classes", "annotated.html", [
      [ "Class List", "annotated.html", "annotated_dup" ]
    ] ]
  ] ]
];

var NAVTREEINDEX =
[
"annotated.html"
];
"#;

    const ANNOTATED_DUP: &str = r#"var annotated_dup =
[
    [ "Scan", "class_scan.html", null ],
    [ "Station", "class_station.html", null ]
];
"#;

    const NAVTREEINDEX0: &str = "var NAVTREEINDEX0 =\n{\n\"annotated.html\":[0,0],\n\"index.html\":[]\n};\n";

    const ALL_0: &str =
        "var searchData=\n[\n  ['scan',['Scan',['../class_scan.html',1,'']]]\n];\n";

    async fn write_doc_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("doxaudit-bundle-{}-{}", tag, std::process::id()));
        let search = dir.join("search");
        tokio::fs::create_dir_all(&search).await.unwrap();

        tokio::fs::write(dir.join("navtreedata.js"), NAVTREEDATA).await.unwrap();
        tokio::fs::write(dir.join("annotated_dup.js"), ANNOTATED_DUP).await.unwrap();
        tokio::fs::write(dir.join("navtreeindex0.js"), NAVTREEINDEX0).await.unwrap();
        tokio::fs::write(dir.join("resize.js"), "function resizeable() { return 1; }")
            .await
            .unwrap();
        tokio::fs::write(search.join("all_0.js"), ALL_0).await.unwrap();
        tokio::fs::write(search.join("search.js"), "function SearchBox() {}")
            .await
            .unwrap();

        for page in ["index.html", "annotated.html", "class_scan.html", "class_station.html"] {
            tokio::fs::write(dir.join(page), "<html></html>").await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_load_miniature_root() {
        let dir = write_doc_root("ok").await;
        let bundle = DocBundle::load(&dir).await.unwrap();

        assert!(bundle.navtree.is_some());
        assert!(bundle.child_tables.contains_key("annotated_dup"));
        assert_eq!(bundle.nav_index_shards.len(), 1);
        assert_eq!(bundle.search.shards.len(), 1);
        assert!(bundle.load_errors.is_empty());

        let stats = bundle.stats();
        assert_eq!(stats.pages, 4);
        assert_eq!(stats.search_records, 1);
        assert_eq!(stats.nav_nodes, 5);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_miniature_root_validates_clean() {
        use crate::checks::{CheckId, CheckOptions, run_checks};

        let dir = write_doc_root("clean").await;
        let bundle = DocBundle::load(&dir).await.unwrap();
        let report = run_checks(&bundle, &CheckOptions::default());
        assert!(report.is_clean(), "unexpected findings: {:?}", report.diagnostics);

        // Seed a defect: a page named by the class list disappears
        tokio::fs::remove_file(dir.join("class_station.html")).await.unwrap();
        let bundle = DocBundle::load(&dir).await.unwrap();
        let report = run_checks(&bundle, &CheckOptions::default());

        assert_eq!(report.errors, 1);
        assert_eq!(report.diagnostics[0].check, CheckId::BrokenLink);
        assert_eq!(report.diagnostics[0].file, "annotated_dup.js");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_table_becomes_load_error() {
        let dir = write_doc_root("bad").await;
        tokio::fs::write(dir.join("hierarchy.js"), "var hierarchy =\n[ [ \"broken\" ")
            .await
            .unwrap();

        let bundle = DocBundle::load(&dir).await.unwrap();
        assert_eq!(bundle.load_errors.len(), 1);
        assert_eq!(bundle.load_errors[0].file, "hierarchy.js");
        assert!(bundle.navtree.is_some());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
