//! File system helpers.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Atomically replace the contents of `path`.
///
/// The content is written to a temporary file in the same directory, synced,
/// and then renamed over the destination so a reader never observes a
/// half-written template. Parent directories are created when missing.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp.path().display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("nested").join("template.json");

        atomic_write(&file, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("template.json");
        std::fs::write(&file, "old content that is longer").unwrap();

        atomic_write(&file, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");

        // No temp files left behind
        let entries = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
