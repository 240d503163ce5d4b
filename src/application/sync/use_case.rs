//! Sync use case
//!
//! Drives the session state machine:
//! `Start -> Resolving -> Detecting -> {Gating -> Deploying | Queuing} ->
//! Persisting -> Done`, with `Failed` absorbing resolution, deploy, and
//! queue-level fatal errors.
//!
//! This use case is pure orchestration: resolution, detection, gating, and
//! queuing all live in their own components.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::sync::gate::DeploymentGate;
use crate::application::sync::options::SyncOptions;
use crate::application::sync::queue::{QueueReport, ResourceSyncQueue};
use crate::application::sync::result::SyncOutcome;
use crate::domain::entities::{Fingerprint, ResolvedTemplate, SessionState, SyncSession};
use crate::domain::ports::{
    AutoApprove, CodeHasher, Confirmation, DeployOutcome, FingerprintRepository,
    FingerprintStoreError, StackProvider, SyncEvent, SyncEventSink, TemplateSource,
};
use crate::domain::ports::NoopEventSink;
use crate::domain::services::{ChangeDetector, DetectionReport, TemplateResolver};
use crate::domain::value_objects::{ChangedResource, ContentHash, SyncDecision};
use crate::error::{SyncError, SyncResult};

/// Orchestrates one sync session end to end
pub struct SyncUseCase<S, P, R, H>
where
    S: TemplateSource,
    P: StackProvider,
    R: FingerprintRepository,
    H: CodeHasher,
{
    source: S,
    provider: P,
    fingerprints: R,
    hasher: H,
    confirmation: Box<dyn Confirmation>,
    events: Arc<dyn SyncEventSink>,
}

impl<S, P, R, H> SyncUseCase<S, P, R, H>
where
    S: TemplateSource,
    P: StackProvider,
    R: FingerprintRepository,
    H: CodeHasher,
{
    pub fn new(source: S, provider: P, fingerprints: R, hasher: H) -> Self {
        Self {
            source,
            provider,
            fingerprints,
            hasher,
            confirmation: Box::new(AutoApprove),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_confirmation(mut self, confirmation: Box<dyn Confirmation>) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn SyncEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Run one sync session.
    ///
    /// `cancel` is the session-level cancellation signal: it aborts a
    /// pending confirmation, stops queue dispatch, and suppresses the
    /// fingerprint save after an in-flight deploy completes.
    pub fn execute(&self, options: &SyncOptions, cancel: &AtomicBool) -> SyncResult<SyncOutcome> {
        options.validate()?;
        let mut session = SyncSession::new(&options.stack_identity);
        let result = self.run(options, cancel, &mut session);
        if result.is_err() {
            session.fail();
        }
        result
    }

    fn run(
        &self,
        options: &SyncOptions,
        cancel: &AtomicBool,
        session: &mut SyncSession,
    ) -> SyncResult<SyncOutcome> {
        let identity = session.identity().to_string();

        // Held until the session reaches a terminal state; a second session
        // for the same identity fails fast instead of queuing.
        let _lock = self
            .fingerprints
            .acquire_session_lock(&identity)
            .map_err(store_error)?;

        self.events.emit(SyncEvent::Started {
            identity: identity.clone(),
            template: options.template.clone(),
        });

        session.advance(SessionState::Resolving);
        let template = TemplateResolver::new(&self.source)
            .with_packaging_mode(options.packaging_mode())
            .resolve(&options.template)?;
        self.events.emit(SyncEvent::TemplateResolved {
            stacks: template.stack_count(),
            resources: template.resource_count(),
        });

        session.advance(SessionState::Detecting);
        let previous = self.fingerprints.load(&identity).map_err(store_error)?;
        let DetectionReport {
            structural_hash,
            decision,
        } = ChangeDetector::detect(&template, previous.as_ref(), &self.hasher)?;

        let outcome = match decision {
            SyncDecision::SkipInfra { changed } if changed.is_empty() => {
                self.events.emit(SyncEvent::InfraUnchanged);
                session.advance(SessionState::Done);
                SyncOutcome::no_changes()
            }
            SyncDecision::SkipInfra { changed } => {
                self.events.emit(SyncEvent::InfraUnchanged);
                self.events.emit(SyncEvent::CodeSyncQueued {
                    count: changed.len(),
                });
                self.code_sync(
                    options,
                    cancel,
                    session,
                    &identity,
                    &template,
                    &structural_hash,
                    previous.as_ref(),
                    changed,
                )?
            }
            SyncDecision::FullDeploy(reason) => {
                self.events.emit(SyncEvent::FullDeployRequired { reason });
                self.full_deploy(
                    options,
                    cancel,
                    session,
                    &identity,
                    &template,
                    &structural_hash,
                )?
            }
        };

        self.events.emit(SyncEvent::Completed {
            summary: outcome.summary(),
        });
        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn code_sync(
        &self,
        options: &SyncOptions,
        cancel: &AtomicBool,
        session: &mut SyncSession,
        identity: &str,
        template: &ResolvedTemplate,
        structural_hash: &ContentHash,
        previous: Option<&Fingerprint>,
        changed: Vec<ChangedResource>,
    ) -> SyncResult<SyncOutcome> {
        session.advance(SessionState::Queuing);
        let queue =
            ResourceSyncQueue::new(&self.provider, options.concurrency, Arc::clone(&self.events));
        let queue_report = queue.run(changed, cancel);

        session.advance(SessionState::Persisting);
        let fingerprint = merge_fingerprint(structural_hash, previous, template, &queue_report);
        self.save_fingerprint(identity, &fingerprint)?;
        session.advance(SessionState::Done);

        Ok(SyncOutcome::code_synced(
            queue_report
                .synced
                .iter()
                .map(|r| r.qualified_id.clone())
                .collect(),
            queue_report
                .failed
                .iter()
                .map(|(r, message)| (r.qualified_id.clone(), message.clone()))
                .collect(),
            queue_report
                .not_attempted
                .iter()
                .map(|r| r.qualified_id.clone())
                .collect(),
        ))
    }

    fn full_deploy(
        &self,
        options: &SyncOptions,
        cancel: &AtomicBool,
        session: &mut SyncSession,
        identity: &str,
        template: &ResolvedTemplate,
        structural_hash: &ContentHash,
    ) -> SyncResult<SyncOutcome> {
        session.advance(SessionState::Gating);
        let gate = DeploymentGate::new(
            &self.provider,
            self.confirmation.as_ref(),
            Arc::clone(&self.events),
        );

        if !gate.authorize(identity, options.auto_approve, cancel) {
            session.advance(SessionState::Done);
            return Ok(SyncOutcome::declined());
        }

        session.advance(SessionState::Deploying);
        let deploy_outcome = gate.deploy(template, &options.deploy_parameters())?;

        session.advance(SessionState::Persisting);
        if cancel.load(Ordering::SeqCst) {
            // The provider-side deploy ran to its natural end, but the
            // session was cancelled: leave the fingerprint alone so the
            // next invocation re-evaluates from scratch.
        } else {
            let mut fingerprint = Fingerprint::new(structural_hash.clone());
            for (qualified_id, hash) in ChangeDetector::code_hashes(template, &self.hasher)? {
                fingerprint.set_resource_hash(qualified_id, hash);
            }
            self.save_fingerprint(identity, &fingerprint)?;
        }
        session.advance(SessionState::Done);

        Ok(SyncOutcome::deployed(
            deploy_outcome == DeployOutcome::Created,
        ))
    }

    fn save_fingerprint(&self, identity: &str, fingerprint: &Fingerprint) -> SyncResult<()> {
        self.fingerprints
            .save(identity, fingerprint)
            .map_err(store_error)?;
        self.events.emit(SyncEvent::FingerprintSaved {
            identity: identity.to_string(),
        });
        Ok(())
    }
}

/// Fine-grained fingerprint update after a code-only sync: successfully
/// synced resources get their new hash, everything else keeps the previous
/// one. Keys for resources no longer in the tree are dropped, and failed
/// resources without history stay absent so the next invocation retries
/// them.
fn merge_fingerprint(
    structural_hash: &ContentHash,
    previous: Option<&Fingerprint>,
    template: &ResolvedTemplate,
    queue_report: &QueueReport,
) -> Fingerprint {
    let mut fingerprint = Fingerprint::new(structural_hash.clone());
    for (qualified_id, resource) in template.resources() {
        if !resource.has_code() {
            continue;
        }
        if let Some(synced) = queue_report
            .synced
            .iter()
            .find(|r| r.qualified_id == qualified_id)
        {
            fingerprint.set_resource_hash(qualified_id, synced.new_hash.clone());
        } else if let Some(old) = previous.and_then(|p| p.resource_hash(&qualified_id)) {
            fingerprint.set_resource_hash(qualified_id, old.clone());
        }
    }
    fingerprint
}

fn store_error(err: FingerprintStoreError) -> SyncError {
    match err {
        FingerprintStoreError::SessionBusy { identity } => SyncError::SyncInProgress { identity },
        FingerprintStoreError::Io(message) => SyncError::Fingerprint(message),
    }
}
