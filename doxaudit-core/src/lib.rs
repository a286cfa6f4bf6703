///! doxaudit core library
///!
///! Parses the JavaScript index artifacts of a Doxygen HTML build
///! (navigation tree, child tables, nav-index shards, search index),
///! audits their structural properties against the generated pages,
///! answers searches the way the site widget does, and re-emits the
///! tables in the generator's layout.

pub mod bundle;
pub mod checks;
pub mod emit;
pub mod jsdata;
pub mod navtree;
pub mod pages;
pub mod report;
pub mod searchidx;

pub use bundle::{BundleStats, DocBundle};
pub use checks::{CheckId, CheckOptions, Diagnostic, Severity, run_checks};
pub use report::Report;
