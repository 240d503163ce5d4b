//! Deployment gate
//!
//! Wraps the full-deploy path: confirmation first, then the provider call.
//! Provider rejections are terminal for the session and never retried; the
//! fingerprint is left untouched so the next attempt re-evaluates from
//! scratch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::entities::ResolvedTemplate;
use crate::domain::ports::{
    Confirmation, DeployOutcome, DeployParameters, StackProvider, SyncEvent, SyncEventSink,
};
use crate::error::{SyncError, SyncResult};

/// Confirmation + capability negotiation wrapper around the provider's
/// full-deploy call
pub struct DeploymentGate<'a, P: StackProvider> {
    provider: &'a P,
    confirmation: &'a dyn Confirmation,
    events: Arc<dyn SyncEventSink>,
}

impl<'a, P: StackProvider> DeploymentGate<'a, P> {
    pub fn new(
        provider: &'a P,
        confirmation: &'a dyn Confirmation,
        events: Arc<dyn SyncEventSink>,
    ) -> Self {
        Self {
            provider,
            confirmation,
            events,
        }
    }

    /// Ask the user whether to proceed. Cancellation pending at this point
    /// aborts the prompt immediately, as a decline; cancellation raised
    /// while the prompt was waiting overrides an affirmative answer.
    pub fn authorize(&self, identity: &str, auto_approve: bool, cancel: &AtomicBool) -> bool {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        if auto_approve {
            return true;
        }
        let approved = self
            .confirmation
            .confirm(&format!("Deploy infrastructure changes to stack '{identity}'?"));
        approved && !cancel.load(Ordering::SeqCst)
    }

    /// Invoke the provider's deploy capability with the resolved tree.
    /// The provider's message propagates verbatim on rejection.
    pub fn deploy(
        &self,
        template: &ResolvedTemplate,
        parameters: &DeployParameters,
    ) -> SyncResult<DeployOutcome> {
        self.events.emit(SyncEvent::DeployStarted {
            identity: parameters.stack_identity.clone(),
        });
        let outcome = self
            .provider
            .deploy(template, parameters)
            .map_err(|err| SyncError::Provider {
                message: err.message,
                code: err.code,
            })?;
        self.events.emit(SyncEvent::DeployCompleted { outcome });
        Ok(outcome)
    }
}
