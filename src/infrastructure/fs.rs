//! Atomic file operations
//!
//! Writes go through tempfile + rename so a crash mid-write never leaves a
//! half-updated file visible to concurrent readers.

use std::io::Write;
use std::path::Path;

use crate::error::SyncResult;

/// Write content to a file atomically (tempfile + rename in the target
/// directory)
pub fn atomic_write(path: &Path, content: &[u8]) -> SyncResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(())
}
