//! File system utilities.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Ensure a directory exists
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Write a fetched page to `<dir>/<name>_page.html` for later inspection.
pub async fn dump_debug_page(dir: &Path, name: &str, html: &str) -> Result<PathBuf> {
    ensure_dir(dir).await?;
    let path = dir.join(format!("{name}_page.html"));
    tokio::fs::write(&path, html).await?;
    Ok(path)
}
