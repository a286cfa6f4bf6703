///! Shaping of parsed JS values into navigation-tree types

use super::types::{ChildTable, NavChildren, NavIndexShard, NavNode, NavTreeData};
use crate::jsdata::{JsScript, JsValue};
use anyhow::{Context, Result, bail};

/// Build the navtree from a parsed `navtreedata.js`.
pub fn navtree_from_script(script: &JsScript) -> Result<NavTreeData> {
    let tree = script
        .get("NAVTREE")
        .context("navtreedata.js declares no NAVTREE")?;
    let entries = tree
        .as_array()
        .with_context(|| format!("NAVTREE is {}, expected array", tree.type_name()))?;

    let mut roots = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        roots.push(node_from_value(entry, &format!("NAVTREE[{}]", idx))?);
    }

    let mut index_pages = Vec::new();
    if let Some(index) = script.get("NAVTREEINDEX") {
        let items = index
            .as_array()
            .with_context(|| format!("NAVTREEINDEX is {}, expected array", index.type_name()))?;
        for (idx, item) in items.iter().enumerate() {
            let url = item
                .as_str()
                .with_context(|| format!("NAVTREEINDEX[{}] is not a string", idx))?;
            index_pages.push(url.to_string());
        }
    }

    Ok(NavTreeData {
        roots,
        index_pages,
        sync_on_msg: script.get("SYNCONMSG").and_then(|v| v.as_str()).map(String::from),
        sync_off_msg: script.get("SYNCOFFMSG").and_then(|v| v.as_str()).map(String::from),
    })
}

/// Build a child table from a parsed auxiliary table file.
///
/// The file must declare exactly one array variable.
pub fn child_table_from_script(script: &JsScript, file_stem: &str) -> Result<ChildTable> {
    let var = script
        .single()
        .with_context(|| format!("{}.js declares {} variables, expected one", file_stem, script.vars.len()))?;
    let entries = var
        .value
        .as_array()
        .with_context(|| format!("var {} is {}, expected array", var.name, var.value.type_name()))?;

    let mut nodes = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        nodes.push(node_from_value(entry, &format!("{}[{}]", var.name, idx))?);
    }

    Ok(ChildTable {
        name: var.name.clone(),
        file: file_stem.to_string(),
        nodes,
    })
}

/// Build a nav-index shard from a parsed `navtreeindex<k>.js`.
pub fn nav_index_from_script(script: &JsScript, ordinal: usize) -> Result<NavIndexShard> {
    let expected = format!("NAVTREEINDEX{}", ordinal);
    let value = script
        .get(&expected)
        .with_context(|| format!("file declares no {}", expected))?;
    let object = value
        .as_object()
        .with_context(|| format!("{} is {}, expected object", expected, value.type_name()))?;

    let mut entries = Vec::with_capacity(object.len());
    for (url, path_value) in object {
        let path_items = path_value
            .as_array()
            .with_context(|| format!("{}[\"{}\"] is not an array", expected, url))?;

        let mut path = Vec::with_capacity(path_items.len());
        for item in path_items {
            let idx = item
                .as_int()
                .with_context(|| format!("{}[\"{}\"] holds a non-integer step", expected, url))?;
            if idx < 0 {
                bail!("{}[\"{}\"] holds a negative step", expected, url);
            }
            path.push(idx as usize);
        }
        entries.push((url.clone(), path));
    }

    Ok(NavIndexShard { ordinal, entries })
}

/// Shard ordinal from a `navtreeindex<k>` file stem.
pub fn parse_nav_index_name(stem: &str) -> Option<usize> {
    stem.strip_prefix("navtreeindex")?.parse().ok()
}

/// Shape one (label, link, children-or-null) entry, recursively.
fn node_from_value(value: &JsValue, at: &str) -> Result<NavNode> {
    let parts = value
        .as_array()
        .with_context(|| format!("{} is {}, expected array", at, value.type_name()))?;
    if parts.len() != 3 {
        bail!("{} has {} elements, expected 3", at, parts.len());
    }

    let label = parts[0]
        .as_str()
        .with_context(|| format!("{}[0] is {}, expected string label", at, parts[0].type_name()))?
        .to_string();

    let link = match &parts[1] {
        JsValue::Null => None,
        JsValue::Str(url) => Some(url.clone()),
        other => bail!("{}[1] is {}, expected link or null", at, other.type_name()),
    };

    let children = match &parts[2] {
        JsValue::Null => NavChildren::Leaf,
        JsValue::Str(table) => NavChildren::Ref(table.clone()),
        JsValue::Array(items) => {
            let mut children = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                children.push(node_from_value(item, &format!("{}[2][{}]", at, idx))?);
            }
            NavChildren::Inline(children)
        }
        other => bail!("{}[2] is {}, expected children, table name or null", at, other.type_name()),
    };

    Ok(NavNode { label, link, children })
}
