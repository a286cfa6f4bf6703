///! Generated-page inventory
///!
///! The "existing pages" side of link auditing: which `*.html` files
///! the doc root holds and which anchors each of them defines.

mod inventory;
mod link;

pub use inventory::{PageInfo, PageInventory, ScanError};
pub use link::LinkTarget;
