//! `doxaudit stats` - bundle statistics.

use anyhow::Result;
use doxaudit_core::bundle::DocBundle;
use std::path::Path;

pub async fn run(root: &Path) -> Result<i32> {
    let bundle = DocBundle::load(root).await?;
    println!("{}", bundle.stats());

    if !bundle.load_errors.is_empty() {
        println!();
        for error in &bundle.load_errors {
            println!("load error: {}: {}", error.file, error.message);
        }
    }
    Ok(0)
}
