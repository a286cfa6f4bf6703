///! Link checks: every URL an index table carries must land on an
///! existing page, and its fragment on an existing anchor.

use super::types::{CheckId, Diagnostic};
use crate::bundle::DocBundle;
use crate::jsdata::decode_entities;
use crate::navtree::{NavChildren, NavNode};
use crate::pages::{LinkTarget, PageInventory};

pub(super) fn check_links(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    if let Some(tree) = &bundle.navtree {
        for root in &tree.roots {
            let mut trail = Vec::new();
            walk_inline(root, &mut trail, &mut |node, location| {
                if let Some(url) = &node.link {
                    classify(&bundle.pages, "navtreedata.js", "", url, location, out);
                }
            });
        }
        for url in &tree.index_pages {
            classify(&bundle.pages, "navtreedata.js", "", url, "NAVTREEINDEX", out);
        }
    }

    for table in bundle.child_tables.values() {
        let file = format!("{}.js", table.file);
        for node in &table.nodes {
            let mut trail = Vec::new();
            walk_inline(node, &mut trail, &mut |node, location| {
                if let Some(url) = &node.link {
                    classify(&bundle.pages, &file, "", url, location, out);
                }
            });
        }
    }

    for shard in &bundle.nav_index_shards {
        let file = format!("navtreeindex{}.js", shard.ordinal);
        for (url, _) in &shard.entries {
            classify(&bundle.pages, &file, "", url, url, out);
        }
    }

    for shard in &bundle.search.shards {
        let file = format!("search/{}.js", shard.file);
        for record in &shard.records {
            for target in &record.targets {
                classify(&bundle.pages, &file, "search", &target.url, &record.key, out);
            }
        }
    }
}

/// Visit a node and its inline descendants; table references are
/// audited through their own files.
fn walk_inline<'a>(
    node: &'a NavNode,
    trail: &mut Vec<String>,
    visit: &mut impl FnMut(&'a NavNode, &str),
) {
    trail.push(decode_entities(&node.label));
    visit(node, &trail.join(" > "));

    if let NavChildren::Inline(children) = &node.children {
        for child in children {
            walk_inline(child, trail, visit);
        }
    }
    trail.pop();
}

fn classify(
    pages: &PageInventory,
    file: &str,
    base_dir: &str,
    url: &str,
    location: &str,
    out: &mut Vec<Diagnostic>,
) {
    match LinkTarget::resolve(base_dir, url) {
        LinkTarget::External => {}
        LinkTarget::EscapesRoot => out.push(
            Diagnostic::new(
                CheckId::EscapingLink,
                file,
                format!("link '{}' escapes the documentation root", url),
            )
            .at(location),
        ),
        LinkTarget::Local { page, fragment } => {
            if page.is_empty() {
                return;
            }
            if !pages.contains(&page) {
                out.push(
                    Diagnostic::new(
                        CheckId::BrokenLink,
                        file,
                        format!("link '{}' names missing page '{}'", url, page),
                    )
                    .at(location),
                );
            } else if let Some(fragment) = fragment {
                if !pages.has_anchor(&page, &fragment) {
                    out.push(
                        Diagnostic::new(
                            CheckId::DanglingAnchor,
                            file,
                            format!("page '{}' has no anchor '{}'", page, fragment),
                        )
                        .at(location),
                    );
                }
            }
        }
    }
}
