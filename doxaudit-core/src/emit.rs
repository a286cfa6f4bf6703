///! Canonical re-emission of the index artifacts
///!
///! Reproduces the generator's own layouts so a parsed table can be
///! written back byte-compatibly: two-space spaced brackets for
///! `navtreedata.js`, four-space indent for child tables, compact
///! single-quoted tuples for the search shards.

use crate::bundle::DocBundle;
use crate::navtree::{ChildTable, NavChildren, NavIndexShard, NavNode, NavTreeData};
use crate::searchidx::{SearchShard, SearchTarget, SectionManifest};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

fn escape_double(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_single(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// The generator ends nav-side files at the final `;` with no newline;
/// search files keep one.
fn trim_final_newline(out: &mut String) {
    if out.ends_with('\n') {
        out.pop();
    }
}

/// `navtreedata.js` layout.
pub fn emit_navtree(tree: &NavTreeData) -> String {
    let mut out = String::from("var NAVTREE =\n[\n");
    push_nodes(&mut out, &tree.roots, 2);
    out.push_str("];\n");

    if !tree.index_pages.is_empty() {
        out.push_str("\nvar NAVTREEINDEX =\n[\n");
        for (idx, url) in tree.index_pages.iter().enumerate() {
            let comma = if idx + 1 < tree.index_pages.len() { "," } else { "" };
            out.push_str(&format!("\"{}\"{}\n", escape_double(url), comma));
        }
        out.push_str("];\n");
    }

    if tree.sync_on_msg.is_some() || tree.sync_off_msg.is_some() {
        out.push('\n');
        if let Some(msg) = &tree.sync_on_msg {
            out.push_str(&format!("var SYNCONMSG = '{}';\n", escape_single(msg)));
        }
        if let Some(msg) = &tree.sync_off_msg {
            out.push_str(&format!("var SYNCOFFMSG = '{}';\n", escape_single(msg)));
        }
    }
    trim_final_newline(&mut out);
    out
}

/// Child-table layout (`annotated_dup.js`, `class_*.js`, ...).
pub fn emit_child_table(table: &ChildTable) -> String {
    let mut out = format!("var {} =\n[\n", table.name);
    push_nodes(&mut out, &table.nodes, 4);
    out.push_str("];");
    out
}

fn push_nodes(out: &mut String, nodes: &[NavNode], indent: usize) {
    for (idx, node) in nodes.iter().enumerate() {
        push_node(out, node, indent, idx + 1 == nodes.len());
    }
}

fn push_node(out: &mut String, node: &NavNode, indent: usize, last: bool) {
    let pad = " ".repeat(indent);
    let comma = if last { "" } else { "," };
    let link = match &node.link {
        Some(url) => format!("\"{}\"", escape_double(url)),
        None => "null".to_string(),
    };
    let label = escape_double(&node.label);

    match &node.children {
        NavChildren::Leaf => {
            out.push_str(&format!("{}[ \"{}\", {}, null ]{}\n", pad, label, link, comma));
        }
        NavChildren::Ref(name) => {
            out.push_str(&format!(
                "{}[ \"{}\", {}, \"{}\" ]{}\n",
                pad,
                label,
                link,
                escape_double(name),
                comma
            ));
        }
        NavChildren::Inline(children) => {
            out.push_str(&format!("{}[ \"{}\", {}, [\n", pad, label, link));
            push_nodes(out, children, indent + 2);
            out.push_str(&format!("{}] ]{}\n", pad, comma));
        }
    }
}

/// `navtreeindex<k>.js` layout: one entry per line, no spacing.
pub fn emit_nav_index(shard: &NavIndexShard) -> String {
    let mut out = format!("var NAVTREEINDEX{} =\n{{\n", shard.ordinal);
    for (idx, (url, path)) in shard.entries.iter().enumerate() {
        let steps: Vec<String> = path.iter().map(|p| p.to_string()).collect();
        let comma = if idx + 1 < shard.entries.len() { "," } else { "" };
        out.push_str(&format!(
            "\"{}\":[{}]{}\n",
            escape_double(url),
            steps.join(","),
            comma
        ));
    }
    out.push_str("};\n");
    out
}

/// Search-shard layout: compact single-quoted tuples.
pub fn emit_search_shard(shard: &SearchShard) -> String {
    let mut out = String::from("var searchData=\n[\n");
    for (idx, record) in shard.records.iter().enumerate() {
        let targets: Vec<String> = record.targets.iter().map(emit_target).collect();
        let comma = if idx + 1 < shard.records.len() { "," } else { "" };
        out.push_str(&format!(
            "  ['{}',['{}',{}]]{}\n",
            escape_single(&record.key),
            escape_single(&record.label),
            targets.join(","),
            comma
        ));
    }
    out.push_str("];\n");
    out
}

fn emit_target(target: &SearchTarget) -> String {
    match &target.scope {
        Some(scope) => format!(
            "['{}',{},'{}']",
            escape_single(&target.url),
            target.flag,
            escape_single(scope)
        ),
        None => format!("['{}',{}]", escape_single(&target.url), target.flag),
    }
}

/// `search/searchdata.js` layout.
pub fn emit_manifest(manifest: &SectionManifest) -> String {
    let mut out = String::from("var indexSectionsWithContent =\n{\n");
    push_manifest_rows(&mut out, manifest, |s| Some(s.letters.clone()));
    out.push_str("};\n\nvar indexSectionNames =\n{\n");
    push_manifest_rows(&mut out, manifest, |s| Some(s.name.clone()));
    out.push_str("};\n");

    if manifest.sections.iter().any(|s| s.label.is_some()) {
        out.push_str("\nvar indexSectionLabels =\n{\n");
        push_manifest_rows(&mut out, manifest, |s| s.label.clone());
        out.push_str("};\n");
    }
    out
}

fn push_manifest_rows(
    out: &mut String,
    manifest: &SectionManifest,
    value: impl Fn(&crate::searchidx::ManifestSection) -> Option<String>,
) {
    let rows: Vec<_> = manifest
        .sections
        .iter()
        .filter_map(|s| value(s).map(|v| (s.index, v)))
        .collect();
    for (idx, (index, v)) in rows.iter().enumerate() {
        let comma = if idx + 1 < rows.len() { "," } else { "" };
        out.push_str(&format!("  {}: \"{}\"{}\n", index, escape_double(v), comma));
    }
}

/// Write every artifact of the bundle, normalized, under `out`.
///
/// Never writes in place; `out` must differ from the bundle root.
pub async fn write_bundle(bundle: &DocBundle, out: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let out = out.as_ref();
    anyhow::ensure!(
        out != bundle.root,
        "refusing to rewrite the bundle in place: {}",
        out.display()
    );
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let mut written = Vec::new();
    let mut write = |rel: String, content: String| {
        let path = out.join(&rel);
        written.push((path, content));
    };

    if let Some(tree) = &bundle.navtree {
        write("navtreedata.js".to_string(), emit_navtree(tree));
    }
    for table in bundle.child_tables.values() {
        write(format!("{}.js", table.file), emit_child_table(table));
    }
    for shard in &bundle.nav_index_shards {
        write(format!("navtreeindex{}.js", shard.ordinal), emit_nav_index(shard));
    }
    if !bundle.search.shards.is_empty() || bundle.search.manifest.is_some() {
        tokio::fs::create_dir_all(out.join("search"))
            .await
            .context("Failed to create search output directory")?;
    }
    for shard in &bundle.search.shards {
        write(format!("search/{}.js", shard.file), emit_search_shard(shard));
    }
    if let Some(manifest) = &bundle.search.manifest {
        write("search/searchdata.js".to_string(), emit_manifest(manifest));
    }

    let mut paths = Vec::with_capacity(written.len());
    for (path, content) in written {
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        paths.push(path);
    }
    paths.sort();

    info!("Wrote {} normalized artifacts to {}", paths.len(), out.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdata::parse_script;
    use crate::navtree::{child_table_from_script, nav_index_from_script, navtree_from_script};
    use crate::searchidx::{manifest_from_script, shard_from_script};

    const NAVTREE_FIXTURE: &str = r#"var NAVTREE =
[
  [ "VieSched++", "index.html", [
    [ "Namespaces", null, [
      [ "Namespace List", "namespaces.html", "namespaces" ]
    ] ],
    [ "Classes", "annotated.html", [
      [ "Class List", "annotated.html", "annotated_dup" ],
      [ "Class Index", "classes.html", null ]
    ] ]
  ] ]
];

var NAVTREEINDEX =
[
"index.html",
"class_scan.html#a51"
];

var SYNCONMSG = 'click to disable panel synchronisation';
var SYNCOFFMSG = 'click to enable panel synchronisation';"#;

    const CHILD_TABLE_FIXTURE: &str = r#"var annotated_dup =
[
    [ "VieVS", "namespace_vie_v_s.html", "namespace_vie_v_s" ],
    [ "Scan", "class_scan.html", [
      [ "times", "class_scan.html#a1f", null ]
    ] ],
    [ "Tle", "class_tle.html", null ]
];"#;

    const NAV_INDEX_FIXTURE: &str = "var NAVTREEINDEX0 =\n{\n\"annotated.html\":[0,1,0],\n\"index.html\":[]\n};\n";

    const SEARCH_FIXTURE: &str = "var searchData=\n[\n  ['eccentricity',['Eccentricity',['../class_orbital_elements.html#ab420f',1,'OrbitalElements::Eccentricity()'],['../class_tle.html#a9aa94',1,'Tle::Eccentricity()']]],\n  ['empty',['empty',['../class_source_list.html#a9d1f5',1,'SourceList::empty()']]]\n];\n";

    const MANIFEST_FIXTURE: &str = "var indexSectionsWithContent =\n{\n  0: \"ef\",\n  1: \"e\"\n};\n\nvar indexSectionNames =\n{\n  0: \"all\",\n  1: \"classes\"\n};\n\nvar indexSectionLabels =\n{\n  0: \"All\",\n  1: \"Classes\"\n};\n";

    #[test]
    fn test_navtree_round_trip() {
        let script = parse_script(NAVTREE_FIXTURE).unwrap();
        let tree = navtree_from_script(&script).unwrap();
        assert_eq!(emit_navtree(&tree), NAVTREE_FIXTURE);
    }

    #[test]
    fn test_child_table_round_trip() {
        let script = parse_script(CHILD_TABLE_FIXTURE).unwrap();
        let table = child_table_from_script(&script, "annotated_dup").unwrap();
        assert_eq!(emit_child_table(&table), CHILD_TABLE_FIXTURE);
    }

    #[test]
    fn test_nav_files_end_at_final_semicolon() {
        let script = parse_script(NAVTREE_FIXTURE).unwrap();
        let tree = navtree_from_script(&script).unwrap();
        assert!(emit_navtree(&tree).ends_with("';"));

        let script = parse_script(CHILD_TABLE_FIXTURE).unwrap();
        let table = child_table_from_script(&script, "annotated_dup").unwrap();
        assert!(emit_child_table(&table).ends_with("];"));

        let script = parse_script(SEARCH_FIXTURE).unwrap();
        let shard = shard_from_script(&script, "all", 0, "all_0").unwrap();
        assert!(emit_search_shard(&shard).ends_with("];\n"));
    }

    #[test]
    fn test_nav_index_round_trip() {
        let script = parse_script(NAV_INDEX_FIXTURE).unwrap();
        let shard = nav_index_from_script(&script, 0).unwrap();
        assert_eq!(emit_nav_index(&shard), NAV_INDEX_FIXTURE);
    }

    #[test]
    fn test_search_shard_round_trip() {
        let script = parse_script(SEARCH_FIXTURE).unwrap();
        let shard = shard_from_script(&script, "all", 0, "all_0").unwrap();
        assert_eq!(emit_search_shard(&shard), SEARCH_FIXTURE);
    }

    #[test]
    fn test_manifest_round_trip() {
        let script = parse_script(MANIFEST_FIXTURE).unwrap();
        let manifest = manifest_from_script(&script).unwrap();
        assert_eq!(emit_manifest(&manifest), MANIFEST_FIXTURE);
    }

    #[test]
    fn test_single_quote_escaping() {
        let shard = SearchShard {
            section: "all".to_string(),
            ordinal: 0,
            file: "all_0".to_string(),
            records: vec![crate::searchidx::SearchRecord {
                key: "op".to_string(),
                label: "don't".to_string(),
                targets: vec![SearchTarget {
                    url: "../p.html".to_string(),
                    flag: 0,
                    scope: None,
                }],
            }],
        };
        assert!(emit_search_shard(&shard).contains(r"don\'t"));
    }

    #[tokio::test]
    async fn test_write_bundle_refuses_in_place() {
        let dir = std::env::temp_dir().join(format!("doxaudit-emit-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let bundle = DocBundle {
            root: dir.clone(),
            ..DocBundle::default()
        };
        assert!(write_bundle(&bundle, &dir).await.is_err());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_bundle_outputs() {
        let out = std::env::temp_dir().join(format!("doxaudit-emit-out-{}", std::process::id()));
        let mut bundle = DocBundle::default();
        let script = parse_script(CHILD_TABLE_FIXTURE).unwrap();
        let table = child_table_from_script(&script, "annotated_dup").unwrap();
        bundle.child_tables.insert(table.name.clone(), table);

        let paths = write_bundle(&bundle, &out).await.unwrap();
        assert_eq!(paths.len(), 1);
        let rewritten = tokio::fs::read_to_string(&paths[0]).await.unwrap();
        assert_eq!(rewritten, CHILD_TABLE_FIXTURE);

        tokio::fs::remove_dir_all(&out).await.unwrap();
    }
}
