///! Navigation-tree data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::HashSet;

/// Loaded child tables, keyed by declared table name.
pub type TableMap = HashMap<String, ChildTable>;

/// One navigation entry: the (label, link, children-or-null) triple.
///
/// `link` is `null` in the file for pure grouping nodes ("Namespaces").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub label: String,
    pub link: Option<String>,
    pub children: NavChildren,
}

/// The third element of a navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavChildren {
    /// `null`, no children.
    Leaf,
    /// A string naming another table file that holds the children.
    Ref(String),
    /// An inline nested array of entries.
    Inline(Vec<NavNode>),
}

impl NavNode {
    pub fn new(label: impl Into<String>, link: Option<String>) -> Self {
        Self {
            label: label.into(),
            link,
            children: NavChildren::Leaf,
        }
    }

    pub fn with_ref(mut self, table: impl Into<String>) -> Self {
        self.children = NavChildren::Ref(table.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = NavChildren::Inline(children);
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.children, NavChildren::Leaf)
    }

    /// Children of this node, expanding a table reference through `tables`.
    /// A reference to a missing table expands to no children.
    pub fn children_in<'a>(&'a self, tables: &'a TableMap) -> &'a [NavNode] {
        match &self.children {
            NavChildren::Leaf => &[],
            NavChildren::Inline(nodes) => nodes,
            NavChildren::Ref(name) => tables.get(name).map(|t| t.nodes.as_slice()).unwrap_or(&[]),
        }
    }
}

/// Contents of `navtreedata.js`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavTreeData {
    /// Top-level entries of `var NAVTREE` (Doxygen emits exactly one,
    /// the project root).
    pub roots: Vec<NavNode>,
    /// `var NAVTREEINDEX`: first URL of each `navtreeindex<k>.js` shard.
    pub index_pages: Vec<String>,
    /// Panel-sync tooltips, preserved for re-emission.
    pub sync_on_msg: Option<String>,
    pub sync_off_msg: Option<String>,
}

impl NavTreeData {
    /// Depth-first walk over the tree with child tables expanded.
    ///
    /// A table already being expanded on the current path is not entered
    /// again, so a reference cycle cannot loop; cycle reporting is a
    /// separate check. Tables shared between branches (class tables are
    /// referenced from both the class list and the hierarchy) expand in
    /// each branch, as the widget renders them.
    pub fn walk<'a>(&'a self, tables: &'a TableMap, mut visit: impl FnMut(&'a NavNode, usize)) {
        let mut expanding = HashSet::new();
        for root in &self.roots {
            walk_node(root, tables, 0, &mut expanding, &mut visit);
        }
    }

    /// Resolve a nav-index breadcrumb path to a node.
    ///
    /// With the usual single project root the path addresses the root's
    /// children; with several roots the first index selects the root.
    pub fn resolve_path<'a>(&'a self, tables: &'a TableMap, path: &[usize]) -> Option<&'a NavNode> {
        let (mut node, rest) = match self.roots.as_slice() {
            [single] => (single, path),
            roots => {
                let (first, rest) = path.split_first()?;
                (roots.get(*first)?, rest)
            }
        };

        for &idx in rest {
            node = node.children_in(tables).get(idx)?;
        }
        Some(node)
    }

    /// Number of nodes reachable from the roots, tables expanded.
    pub fn node_count(&self, tables: &TableMap) -> usize {
        let mut count = 0;
        self.walk(tables, |_, _| count += 1);
        count
    }
}

fn walk_node<'a>(
    node: &'a NavNode,
    tables: &'a TableMap,
    depth: usize,
    expanding: &mut HashSet<&'a str>,
    visit: &mut impl FnMut(&'a NavNode, usize),
) {
    visit(node, depth);

    match &node.children {
        NavChildren::Leaf => {}
        NavChildren::Inline(children) => {
            for child in children {
                walk_node(child, tables, depth + 1, expanding, visit);
            }
        }
        NavChildren::Ref(name) => {
            if !expanding.insert(name.as_str()) {
                return;
            }
            if let Some(table) = tables.get(name) {
                for child in &table.nodes {
                    walk_node(child, tables, depth + 1, expanding, visit);
                }
            }
            expanding.remove(name.as_str());
        }
    }
}

/// One auxiliary table file (`annotated_dup.js`, `class_*.js`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildTable {
    /// Declared `var` name; referenced by that name from other entries.
    pub name: String,
    /// File stem the table was loaded from (normally equals `name`).
    pub file: String,
    pub nodes: Vec<NavNode>,
}

impl ChildTable {
    /// Table names referenced by this table's entries, at any depth.
    pub fn referenced_tables(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        let mut stack: Vec<&NavNode> = self.nodes.iter().collect();
        while let Some(node) = stack.pop() {
            match &node.children {
                NavChildren::Leaf => {}
                NavChildren::Ref(name) => refs.push(name.as_str()),
                NavChildren::Inline(children) => stack.extend(children.iter()),
            }
        }
        refs
    }
}

/// One `navtreeindex<k>.js` shard: page URL -> breadcrumb path.
///
/// Entry order is kept as written; the order itself is an audited
/// property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavIndexShard {
    pub ordinal: usize,
    pub entries: Vec<(String, Vec<usize>)>,
}

impl NavIndexShard {
    pub fn first_url(&self) -> Option<&str> {
        self.entries.first().map(|(url, _)| url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (NavTreeData, TableMap) {
        let root = NavNode::new("Project", Some("index.html".to_string())).with_children(vec![
            NavNode::new("Classes", Some("annotated.html".to_string())).with_children(vec![
                NavNode::new("Class List", Some("annotated.html".to_string()))
                    .with_ref("annotated_dup"),
                NavNode::new("Class Index", Some("classes.html".to_string())),
            ]),
            NavNode::new("Files", None),
        ]);

        let table = ChildTable {
            name: "annotated_dup".to_string(),
            file: "annotated_dup".to_string(),
            nodes: vec![
                NavNode::new("Scan", Some("class_scan.html".to_string())),
                NavNode::new("Station", Some("class_station.html".to_string())),
            ],
        };

        let mut tables = TableMap::new();
        tables.insert(table.name.clone(), table);

        (
            NavTreeData {
                roots: vec![root],
                index_pages: Vec::new(),
                sync_on_msg: None,
                sync_off_msg: None,
            },
            tables,
        )
    }

    #[test]
    fn test_walk_expands_refs() {
        let (tree, tables) = sample_tree();
        let mut labels = Vec::new();
        tree.walk(&tables, |node, depth| labels.push((node.label.clone(), depth)));

        assert_eq!(labels.len(), 7);
        assert!(labels.contains(&("Scan".to_string(), 3)));
        assert!(labels.contains(&("Files".to_string(), 1)));
        assert_eq!(tree.node_count(&tables), 7);
    }

    #[test]
    fn test_walk_survives_ref_cycle() {
        let (mut tree, mut tables) = sample_tree();
        tree.roots[0].children = NavChildren::Ref("a".to_string());

        tables.insert(
            "a".to_string(),
            ChildTable {
                name: "a".to_string(),
                file: "a".to_string(),
                nodes: vec![NavNode::new("loop", None).with_ref("a")],
            },
        );

        // Must terminate; one visit of the cycling table's nodes
        assert_eq!(tree.node_count(&tables), 2);
    }

    #[test]
    fn test_resolve_path_through_ref() {
        let (tree, tables) = sample_tree();

        // Single root: path addresses the root's children
        let node = tree.resolve_path(&tables, &[0, 0, 1]).unwrap();
        assert_eq!(node.label, "Station");

        assert!(tree.resolve_path(&tables, &[0, 0, 2]).is_none());
        assert!(tree.resolve_path(&tables, &[5]).is_none());
        assert_eq!(tree.resolve_path(&tables, &[]).unwrap().label, "Project");
    }

    #[test]
    fn test_referenced_tables() {
        let table = ChildTable {
            name: "t".to_string(),
            file: "t".to_string(),
            nodes: vec![
                NavNode::new("a", None).with_ref("x"),
                NavNode::new("b", None)
                    .with_children(vec![NavNode::new("c", None).with_ref("y")]),
            ],
        };
        let mut refs = table.referenced_tables();
        refs.sort();
        assert_eq!(refs, vec!["x", "y"]);
    }
}
