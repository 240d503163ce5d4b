//! Console event sink
//!
//! Renders sync progress to stderr so stdout stays clean for any
//! machine-readable output. Verbose mode adds per-phase detail.

use crate::domain::ports::{DeployOutcome, SyncEvent, SyncEventSink};

/// Prints sync events to stderr
pub struct ConsoleEventSink {
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl SyncEventSink for ConsoleEventSink {
    fn emit(&self, event: SyncEvent) {
        match event {
            SyncEvent::Started { identity, template } => {
                if self.verbose {
                    eprintln!(
                        "Syncing stack '{}' from {}...",
                        identity,
                        template.display()
                    );
                }
            }
            SyncEvent::TemplateResolved { stacks, resources } => {
                if self.verbose {
                    eprintln!("Resolved {} stack(s), {} resource(s).", stacks, resources);
                }
            }
            SyncEvent::InfraUnchanged => {
                eprintln!(
                    "Template has not been changed since last deployment, skipping infra sync..."
                );
            }
            SyncEvent::CodeSyncQueued { count } => {
                eprintln!("Queuing up code sync for the resources that require an update");
                if self.verbose {
                    eprintln!("{} resource(s) queued.", count);
                }
            }
            SyncEvent::FullDeployRequired { reason } => {
                eprintln!("Infra sync required: {}.", reason);
            }
            SyncEvent::DeployStarted { identity } => {
                eprintln!("Deploying stack '{}'...", identity);
            }
            SyncEvent::DeployCompleted { outcome } => match outcome {
                DeployOutcome::Created => {
                    eprintln!("Stack creation succeeded. Sync infra completed.")
                }
                DeployOutcome::Updated => {
                    eprintln!("Stack update succeeded. Sync infra completed.")
                }
            },
            SyncEvent::ResourceSynced { resource } => {
                eprintln!("Finished syncing {}.", resource);
            }
            SyncEvent::ResourceSyncFailed { resource, message } => {
                eprintln!("Failed to sync {}: {}", resource, message);
            }
            SyncEvent::ResourceSyncSkipped { resource } => {
                eprintln!("Skipped syncing {}.", resource);
            }
            SyncEvent::FingerprintSaved { identity } => {
                if self.verbose {
                    eprintln!("Recorded sync state for stack '{}'.", identity);
                }
            }
            SyncEvent::Completed { summary } => {
                eprintln!("{}", summary);
            }
        }
    }
}
