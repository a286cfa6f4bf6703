use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod logging;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _logging_guard = logging::init_logging(&args.log_level, args.log_dir.as_deref());

    let code = match &args.command {
        Command::Check {
            root,
            format,
            output,
            strict,
            config,
        } => commands::check::run(root, *format, output.as_ref(), *strict, config.as_ref()).await?,
        Command::Search {
            root,
            term,
            section,
            limit,
            fuzzy,
            threshold,
            format,
            config,
        } => {
            commands::search::run(
                root,
                term,
                section.clone(),
                *limit,
                *fuzzy,
                *threshold,
                *format,
                config.as_ref(),
            )
            .await?
        }
        Command::Tree {
            root,
            depth,
            tables,
            page,
        } => commands::tree::run(root, *depth, *tables, page.clone()).await?,
        Command::Stats { root } => commands::stats::run(root).await?,
        Command::Rewrite { root, out } => commands::rewrite::run(root, out).await?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
