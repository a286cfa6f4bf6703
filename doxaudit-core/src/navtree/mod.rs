///! Navigation-tree model
///!
///! Covers `navtreedata.js` (the NAVTREE itself plus the NAVTREEINDEX
///! boundary list), the auxiliary child-table files it references
///! (`annotated_dup.js`, `class_*.js`, `dir_*.js`, ...), and the
///! paginated `navtreeindex<k>.js` shards.

mod parser;
mod types;

pub use parser::{
    child_table_from_script, nav_index_from_script, navtree_from_script, parse_nav_index_name,
};
pub use types::{ChildTable, NavChildren, NavIndexShard, NavNode, NavTreeData, TableMap};
