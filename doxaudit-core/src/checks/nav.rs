///! Navigation-side checks: child-table wiring and the paginated
///! nav-index shards.

use super::types::{CheckId, Diagnostic};
use crate::bundle::DocBundle;
use crate::navtree::{NavChildren, NavNode};
use std::collections::{HashMap, HashSet};

/// Table references that resolve to no loaded file.
pub(super) fn check_missing_child_tables(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for (file, name) in referenced_tables(bundle) {
        if !bundle.child_tables.contains_key(name) {
            out.push(Diagnostic::new(
                CheckId::MissingChildTable,
                file,
                format!("referenced child table '{}' is not loaded", name),
            ));
        }
    }
}

/// Declared `var` name must match the file stem.
pub(super) fn check_table_names(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for table in bundle.child_tables.values() {
        if table.name != table.file {
            out.push(Diagnostic::new(
                CheckId::TableNameMismatch,
                format!("{}.js", table.file),
                format!("file declares 'var {}', expected 'var {}'", table.name, table.file),
            ));
        }
    }
}

/// Reference cycles between child tables.
pub(super) fn check_table_cycles(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    let graph: HashMap<&str, Vec<&str>> = bundle
        .child_tables
        .values()
        .map(|t| (t.name.as_str(), t.referenced_tables()))
        .collect();

    let mut reported: HashSet<Vec<&str>> = HashSet::new();
    for &start in graph.keys() {
        let mut path = Vec::new();
        find_cycle(start, &graph, &mut path, &mut reported, out, bundle);
    }
}

fn find_cycle<'a>(
    name: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    reported: &mut HashSet<Vec<&'a str>>,
    out: &mut Vec<Diagnostic>,
    bundle: &DocBundle,
) {
    if let Some(pos) = path.iter().position(|&p| p == name) {
        // Normalize the cycle so each one is reported once
        let mut cycle: Vec<&str> = path[pos..].to_vec();
        let min = cycle
            .iter()
            .enumerate()
            .min_by_key(|(_, n)| **n)
            .map(|(i, _)| i)
            .unwrap_or(0);
        cycle.rotate_left(min);
        if reported.insert(cycle.clone()) {
            let file = bundle
                .child_tables
                .get(cycle[0])
                .map(|t| format!("{}.js", t.file))
                .unwrap_or_else(|| format!("{}.js", cycle[0]));
            out.push(Diagnostic::new(
                CheckId::ChildTableCycle,
                file,
                format!("child tables form a reference cycle: {}", cycle.join(" -> ")),
            ));
        }
        return;
    }

    let Some(refs) = graph.get(name) else {
        return;
    };
    path.push(name);
    for &next in refs {
        find_cycle(next, graph, path, reported, out, bundle);
    }
    path.pop();
}

/// Loaded tables nothing references.
pub(super) fn check_orphan_tables(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    let referenced: HashSet<&str> = referenced_tables(bundle).into_iter().map(|(_, n)| n).collect();

    for table in bundle.child_tables.values() {
        if !referenced.contains(table.name.as_str()) {
            out.push(Diagnostic::new(
                CheckId::OrphanTable,
                format!("{}.js", table.file),
                format!("child table '{}' is referenced by nothing", table.name),
            ));
        }
    }
}

/// Shard ordering and the `NAVTREEINDEX` boundary list.
pub(super) fn check_nav_index_order(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for shard in &bundle.nav_index_shards {
        let file = format!("navtreeindex{}.js", shard.ordinal);
        for pair in shard.entries.windows(2) {
            if pair[0].0 >= pair[1].0 {
                out.push(
                    Diagnostic::new(
                        CheckId::NavindexOrder,
                        file.clone(),
                        format!("entry '{}' is not above '{}'", pair[1].0, pair[0].0),
                    )
                    .at(pair[1].0.clone()),
                );
            }
        }
    }

    let Some(tree) = &bundle.navtree else {
        return;
    };
    if tree.index_pages.is_empty() {
        return;
    }

    for shard in &bundle.nav_index_shards {
        let file = format!("navtreeindex{}.js", shard.ordinal);
        match tree.index_pages.get(shard.ordinal) {
            None => out.push(Diagnostic::new(
                CheckId::NavindexOrder,
                file,
                format!("shard {} has no NAVTREEINDEX boundary entry", shard.ordinal),
            )),
            Some(boundary) => {
                if shard.first_url() != Some(boundary.as_str()) {
                    out.push(Diagnostic::new(
                        CheckId::NavindexOrder,
                        file,
                        format!(
                            "shard starts at '{}', NAVTREEINDEX says '{}'",
                            shard.first_url().unwrap_or("<empty>"),
                            boundary
                        ),
                    ));
                }
            }
        }
    }

    let loaded: HashSet<usize> = bundle.nav_index_shards.iter().map(|s| s.ordinal).collect();
    for (ordinal, boundary) in tree.index_pages.iter().enumerate() {
        if !loaded.contains(&ordinal) {
            out.push(Diagnostic::new(
                CheckId::NavindexOrder,
                "navtreedata.js",
                format!(
                    "NAVTREEINDEX lists '{}' but navtreeindex{}.js is not loaded",
                    boundary, ordinal
                ),
            ));
        }
    }
}

/// Every breadcrumb path must address a tree node.
pub(super) fn check_nav_index_paths(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    let Some(tree) = &bundle.navtree else {
        return;
    };

    for shard in &bundle.nav_index_shards {
        let file = format!("navtreeindex{}.js", shard.ordinal);
        for (url, path) in &shard.entries {
            if tree.resolve_path(&bundle.child_tables, path).is_none() {
                out.push(
                    Diagnostic::new(
                        CheckId::NavindexPath,
                        file.clone(),
                        format!("breadcrumb path {:?} resolves to no tree node", path),
                    )
                    .at(url.clone()),
                );
            }
        }
    }
}

/// Every (source file, referenced table name) pair in the bundle.
fn referenced_tables(bundle: &DocBundle) -> Vec<(String, &str)> {
    let mut refs = Vec::new();

    if let Some(tree) = &bundle.navtree {
        for root in &tree.roots {
            collect_refs(root, "navtreedata.js", &mut refs);
        }
    }
    for table in bundle.child_tables.values() {
        let file = format!("{}.js", table.file);
        for node in &table.nodes {
            collect_refs(node, &file, &mut refs);
        }
    }
    refs
}

fn collect_refs<'a>(node: &'a NavNode, file: &str, out: &mut Vec<(String, &'a str)>) {
    match &node.children {
        NavChildren::Leaf => {}
        NavChildren::Ref(name) => out.push((file.to_string(), name)),
        NavChildren::Inline(children) => {
            for child in children {
                collect_refs(child, file, out);
            }
        }
    }
}
