//! `doxaudit rewrite` - canonical re-emission into another directory.

use anyhow::Result;
use doxaudit_core::bundle::DocBundle;
use doxaudit_core::emit::write_bundle;
use std::path::Path;

pub async fn run(root: &Path, out: &Path) -> Result<i32> {
    let bundle = DocBundle::load(root).await?;
    let written = write_bundle(&bundle, out).await?;
    println!("Wrote {} artifacts to {}", written.len(), out.display());

    if !bundle.load_errors.is_empty() {
        eprintln!(
            "{} artifacts failed to parse and were not rewritten; run 'doxaudit check' for details",
            bundle.load_errors.len()
        );
        return Ok(1);
    }
    Ok(0)
}
