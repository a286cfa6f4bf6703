///! Structural validation of a loaded bundle
///!
///! The catalog audits the properties the generator's own build
///! pipeline is supposed to guarantee: tables are well-formed, links
///! land on existing pages and anchors, child tables wire up
///! acyclically, nav-index shards are ordered and partitioned, search
///! keys encode their labels, and class names cross-reference.

mod links;
mod nav;
mod runner;
mod search;
mod types;

pub use runner::{CheckOptions, run_checks};
pub use types::{CheckId, Diagnostic, Severity};
