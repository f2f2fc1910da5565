pub mod compare;
pub mod completion;
pub mod load;
pub mod rank;

use anyhow::{Result, bail};
use std::path::Path;

/// Fail unless `path` exists and is a directory
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path '{}' does not exist", path.display());
    }
    if !path.is_dir() {
        bail!("'{}' is not a directory", path.display());
    }
    Ok(())
}
