//! File-backed code hasher
//!
//! Content-addressed digests over a resource's code payload: a single file
//! hashes directly; a directory hashes every file in sorted relative-path
//! order so the digest is independent of filesystem iteration order.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::domain::entities::ResourceDescriptor;
use crate::domain::ports::{CodeHashError, CodeHasher};
use crate::domain::value_objects::ContentHash;

/// Hashes code content from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodeHasher;

impl FileCodeHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CodeHasher for FileCodeHasher {
    fn hash(&self, descriptor: &ResourceDescriptor) -> Result<ContentHash, CodeHashError> {
        let location = descriptor.code_location().ok_or_else(|| {
            CodeHashError::new(format!(
                "resource '{}' has no code location",
                descriptor.logical_id()
            ))
        })?;

        if location.is_dir() {
            hash_directory(location)
        } else if location.is_file() {
            let content = std::fs::read(location)
                .map_err(|err| CodeHashError::new(err.to_string()))?;
            Ok(ContentHash::from_bytes(&content))
        } else {
            Err(CodeHashError::new(format!(
                "code location {} does not exist",
                location.display()
            )))
        }
    }
}

fn hash_directory(root: &Path) -> Result<ContentHash, CodeHashError> {
    let mut files = Vec::new();
    collect_files(root, &mut files).map_err(|err| CodeHashError::new(err.to_string()))?;
    files.sort();

    let mut hasher = Sha256::new();
    for path in files {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        // Forward slashes so the digest is identical across platforms.
        hasher.update(relative.to_string_lossy().replace('\\', "/").as_bytes());
        hasher.update([0u8]);
        let content =
            std::fs::read(&path).map_err(|err| CodeHashError::new(err.to_string()))?;
        hasher.update(&content);
        hasher.update([0u8]);
    }
    Ok(ContentHash::new(&format!("{:x}", hasher.finalize())))
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ResourceKind;
    use tempfile::tempdir;

    fn descriptor(location: &Path) -> ResourceDescriptor {
        ResourceDescriptor::new("F", ResourceKind::Function, serde_json::json!({}))
            .with_code_location(location)
    }

    #[test]
    fn file_hash_follows_content() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.py");
        std::fs::write(&file, "return 7").unwrap();

        let first = FileCodeHasher::new().hash(&descriptor(&file)).unwrap();
        std::fs::write(&file, "return 9").unwrap();
        let second = FileCodeHasher::new().hash(&descriptor(&file)).unwrap();

        assert!(!first.matches(&second));
    }

    #[test]
    fn directory_hash_is_stable_when_nothing_changes() {
        let dir = tempdir().unwrap();
        let code = dir.path().join("src");
        std::fs::create_dir_all(code.join("lib")).unwrap();
        std::fs::write(code.join("app.py"), "a").unwrap();
        std::fs::write(code.join("lib/util.py"), "b").unwrap();

        let first = FileCodeHasher::new().hash(&descriptor(&code)).unwrap();
        let second = FileCodeHasher::new().hash(&descriptor(&code)).unwrap();
        assert!(first.matches(&second));
    }

    #[test]
    fn directory_hash_sees_nested_file_edits() {
        let dir = tempdir().unwrap();
        let code = dir.path().join("src");
        std::fs::create_dir_all(code.join("lib")).unwrap();
        std::fs::write(code.join("app.py"), "a").unwrap();
        std::fs::write(code.join("lib/util.py"), "b").unwrap();

        let before = FileCodeHasher::new().hash(&descriptor(&code)).unwrap();
        std::fs::write(code.join("lib/util.py"), "changed").unwrap();
        let after = FileCodeHasher::new().hash(&descriptor(&code)).unwrap();

        assert!(!before.matches(&after));
    }

    #[test]
    fn missing_location_is_an_error() {
        let err = FileCodeHasher::new()
            .hash(&descriptor(Path::new("/nonexistent/code")))
            .unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[test]
    fn descriptor_without_code_is_an_error() {
        let bare = ResourceDescriptor::new("F", ResourceKind::Function, serde_json::json!({}));
        assert!(FileCodeHasher::new().hash(&bare).is_err());
    }
}
