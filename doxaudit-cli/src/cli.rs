//! Command-line argument definitions (clap).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "doxaudit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit and query the index artifacts of a Doxygen HTML build", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Also write daily-rolling log files into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the bundle and run the structural checks
    Check {
        /// Documentation root (the directory holding navtreedata.js)
        root: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fail on warnings too, not only errors
        #[arg(long)]
        strict: bool,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Query the search index the way the site widget does
    Search {
        /// Documentation root
        root: PathBuf,

        /// Search term (taken as typed; `~Scan`, `operator=` work)
        term: String,

        /// Restrict to one section (functions, classes, ...)
        #[arg(long)]
        section: Option<String>,

        /// Maximum number of hits
        #[arg(long)]
        limit: Option<usize>,

        /// Add the fuzzy tier the widget does not have
        #[arg(long)]
        fuzzy: bool,

        /// Similarity threshold for the fuzzy tier; implies --fuzzy
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = QueryFormat::Text)]
        format: QueryFormat,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the navigation tree
    Tree {
        /// Documentation root
        root: PathBuf,

        /// Maximum depth to print
        #[arg(long)]
        depth: Option<usize>,

        /// Expand child-table references
        #[arg(long)]
        tables: bool,

        /// Print the breadcrumb trail for this page instead
        #[arg(long)]
        page: Option<String>,
    },

    /// Print bundle statistics
    Stats {
        /// Documentation root
        root: PathBuf,
    },

    /// Re-emit every artifact in the generator's canonical layout
    Rewrite {
        /// Documentation root
        root: PathBuf,

        /// Output directory (never rewrites in place)
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_invocation() {
        let cli = Cli::parse_from(["doxaudit", "check", "docs/html", "--format", "json", "--strict"]);
        match cli.command {
            Command::Check { root, format, strict, .. } => {
                assert_eq!(root, PathBuf::from("docs/html"));
                assert_eq!(format, ReportFormat::Json);
                assert!(strict);
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_invocation() {
        let cli = Cli::parse_from([
            "doxaudit", "search", "docs/html", "eccentricity", "--section", "functions",
            "--threshold", "0.9",
        ]);
        match cli.command {
            Command::Search { term, section, threshold, fuzzy, .. } => {
                assert_eq!(term, "eccentricity");
                assert_eq!(section.as_deref(), Some("functions"));
                assert_eq!(threshold, Some(0.9));
                assert!(!fuzzy);
            }
            other => panic!("parsed as {:?}", other),
        }
    }
}
