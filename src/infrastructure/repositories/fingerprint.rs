//! TOML fingerprint repository
//!
//! One TOML file per stack identity under a state directory (default
//! `.stacksync/`), replaced atomically on save. A sibling lock file taken
//! with `fs2` gives per-identity mutual exclusion between concurrent
//! sessions; contention fails fast.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Fingerprint;
use crate::domain::ports::{FingerprintRepository, FingerprintStoreError, SessionLock};
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::fs::atomic_write;

/// Fingerprint record version; bump on incompatible layout changes
const FINGERPRINT_VERSION: u32 = 1;

/// TOML-file-backed fingerprint store
pub struct TomlFingerprintRepository {
    dir: PathBuf,
}

impl TomlFingerprintRepository {
    /// Store fingerprints under `dir` (created lazily on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default state directory next to the given template
    pub fn for_template(template: &Path) -> Self {
        let parent = template.parent().unwrap_or_else(|| Path::new("."));
        Self::new(parent.join(".stacksync"))
    }

    fn record_path(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.fingerprint.toml", sanitize(identity)))
    }

    fn lock_path(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", sanitize(identity)))
    }
}

/// File-system identifiers for stack identities: anything that is not
/// alphanumeric or `-`/`_` becomes `-`.
fn sanitize(identity: &str) -> String {
    identity
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// TOML representation of a fingerprint
#[derive(Debug, Serialize, Deserialize)]
struct TomlFingerprint {
    version: u32,
    structural_hash: String,
    synced_at: DateTime<Utc>,
    #[serde(default)]
    resources: BTreeMap<String, String>,
}

/// Holds the fs2 lock for the session; released on drop
struct FileSessionLock {
    _file: File,
}

impl SessionLock for FileSessionLock {}

impl FingerprintRepository for TomlFingerprintRepository {
    fn load(&self, identity: &str) -> Result<Option<Fingerprint>, FingerprintStoreError> {
        let path = self.record_path(identity);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|err| FingerprintStoreError::Io(err.to_string()))?;

        // A corrupt or incompatible record is treated as absent: the next
        // sync full-deploys and rewrites it.
        let record: TomlFingerprint = match toml::from_str(&content) {
            Ok(record) => record,
            Err(_) => return Ok(None),
        };
        if record.version != FINGERPRINT_VERSION {
            return Ok(None);
        }

        let resources = record
            .resources
            .into_iter()
            .map(|(id, hash)| (id, ContentHash::new(&hash)))
            .collect();
        Ok(Some(Fingerprint::from_parts(
            ContentHash::new(&record.structural_hash),
            resources,
            record.synced_at,
        )))
    }

    fn save(&self, identity: &str, fingerprint: &Fingerprint) -> Result<(), FingerprintStoreError> {
        let record = TomlFingerprint {
            version: FINGERPRINT_VERSION,
            structural_hash: fingerprint.structural_hash().to_string(),
            synced_at: fingerprint.synced_at(),
            resources: fingerprint
                .resources()
                .map(|(id, hash)| (id.clone(), hash.to_string()))
                .collect(),
        };
        let content = toml::to_string_pretty(&record)
            .map_err(|err| FingerprintStoreError::Io(err.to_string()))?;
        atomic_write(&self.record_path(identity), content.as_bytes())
            .map_err(|err| FingerprintStoreError::Io(err.to_string()))
    }

    fn acquire_session_lock(
        &self,
        identity: &str,
    ) -> Result<Box<dyn SessionLock>, FingerprintStoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| FingerprintStoreError::Io(err.to_string()))?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(identity))
            .map_err(|err| FingerprintStoreError::Io(err.to_string()))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Box::new(FileSessionLock { _file: file })),
            Err(_) => Err(FingerprintStoreError::SessionBusy {
                identity: identity.to_string(),
            }),
        }
    }
}
