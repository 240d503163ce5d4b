//! Sync result types

/// Terminal status of a sync session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Full infrastructure deployment completed
    Deployed { created: bool },
    /// Infra skipped; code pushed for drifted resources
    CodeSynced,
    /// Nothing changed since the last sync
    NoChanges,
    /// User declined the deploy confirmation
    Declined,
}

/// Outcome of one sync session
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub status: SyncStatus,
    /// Qualified ids of resources whose code was pushed successfully
    pub synced: Vec<String>,
    /// Resources whose code update the provider rejected, with messages
    pub failed: Vec<(String, String)>,
    /// Resources never dispatched (session cancelled mid-queue)
    pub not_attempted: Vec<String>,
}

impl SyncOutcome {
    pub fn deployed(created: bool) -> Self {
        Self {
            status: SyncStatus::Deployed { created },
            synced: Vec::new(),
            failed: Vec::new(),
            not_attempted: Vec::new(),
        }
    }

    pub fn no_changes() -> Self {
        Self {
            status: SyncStatus::NoChanges,
            synced: Vec::new(),
            failed: Vec::new(),
            not_attempted: Vec::new(),
        }
    }

    pub fn declined() -> Self {
        Self {
            status: SyncStatus::Declined,
            synced: Vec::new(),
            failed: Vec::new(),
            not_attempted: Vec::new(),
        }
    }

    pub fn code_synced(
        synced: Vec<String>,
        failed: Vec<(String, String)>,
        not_attempted: Vec<String>,
    ) -> Self {
        Self {
            status: SyncStatus::CodeSynced,
            synced,
            failed,
            not_attempted,
        }
    }

    /// Whether any queued resource update failed
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// All terminal statuses exit zero; partial code-sync failures are
    /// reported in the summary, not through the exit code.
    pub fn exit_code(&self) -> i32 {
        0
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        match self.status {
            SyncStatus::Deployed { created: true } => {
                "Stack creation succeeded. Sync infra completed.".to_string()
            }
            SyncStatus::Deployed { created: false } => {
                "Stack update succeeded. Sync infra completed.".to_string()
            }
            SyncStatus::NoChanges => "No changes detected, stack is up to date.".to_string(),
            SyncStatus::Declined => "Sync cancelled, no changes applied.".to_string(),
            SyncStatus::CodeSynced => {
                let mut summary = format!(
                    "Code sync completed: {} resource(s) updated",
                    self.synced.len()
                );
                if !self.failed.is_empty() {
                    summary.push_str(&format!(", {} failed", self.failed.len()));
                }
                if !self.not_attempted.is_empty() {
                    summary.push_str(&format!(", {} not attempted", self.not_attempted.len()));
                }
                summary
            }
        }
    }
}
