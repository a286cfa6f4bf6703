//! One module per subcommand.

pub mod check;
pub mod rewrite;
pub mod search;
pub mod stats;
pub mod tree;
