//! `doxaudit tree` - print the navigation tree or a page's breadcrumb.

use anyhow::{Result, bail};
use doxaudit_core::bundle::DocBundle;
use doxaudit_core::jsdata::decode_entities;
use doxaudit_core::navtree::{NavChildren, NavNode, NavTreeData, TableMap};
use std::path::Path;

pub async fn run(
    root: &Path,
    depth: Option<usize>,
    tables: bool,
    page: Option<String>,
) -> Result<i32> {
    let bundle = DocBundle::load(root).await?;
    let Some(tree) = &bundle.navtree else {
        bail!("{} has no navtreedata.js", root.display());
    };

    if let Some(page) = page {
        return print_breadcrumb(tree, &bundle, &page);
    }

    for node in &tree.roots {
        print_node(node, &bundle.child_tables, 0, depth, tables);
    }
    Ok(0)
}

fn print_node(
    node: &NavNode,
    tables_map: &TableMap,
    level: usize,
    depth: Option<usize>,
    tables: bool,
) {
    if depth.map(|d| level > d).unwrap_or(false) {
        return;
    }

    let label = decode_entities(&node.label);
    let indent = "  ".repeat(level);
    match (&node.link, &node.children) {
        (Some(link), NavChildren::Ref(name)) if !tables => {
            println!("{}{} ({}) [{}]", indent, label, link, name)
        }
        (Some(link), _) => println!("{}{} ({})", indent, label, link),
        (None, NavChildren::Ref(name)) if !tables => println!("{}{} [{}]", indent, label, name),
        (None, _) => println!("{}{}", indent, label),
    }

    match &node.children {
        NavChildren::Leaf => {}
        NavChildren::Inline(children) => {
            for child in children {
                print_node(child, tables_map, level + 1, depth, tables);
            }
        }
        NavChildren::Ref(name) => {
            if tables {
                if let Some(table) = tables_map.get(name) {
                    for child in &table.nodes {
                        print_node(child, tables_map, level + 1, depth, tables);
                    }
                }
            }
        }
    }
}

/// Resolve the page's breadcrumb path through the nav-index shards.
fn print_breadcrumb(tree: &NavTreeData, bundle: &DocBundle, page: &str) -> Result<i32> {
    let entry = bundle
        .nav_index_shards
        .iter()
        .flat_map(|s| s.entries.iter())
        .find(|(url, _)| url == page || url.split('#').next() == Some(page));

    let Some((url, path)) = entry else {
        eprintln!("No nav-index entry for '{}'.", page);
        return Ok(1);
    };

    let mut trail = Vec::new();
    for end in 0..=path.len() {
        match tree.resolve_path(&bundle.child_tables, &path[..end]) {
            Some(node) => trail.push(decode_entities(&node.label)),
            None => bail!("breadcrumb path {:?} for '{}' does not resolve", path, url),
        }
    }

    println!("{}", trail.join(" > "));
    Ok(0)
}
