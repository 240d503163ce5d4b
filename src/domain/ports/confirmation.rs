//! Confirmation port - interactive yes/no before a full deploy

/// Asks the user whether to proceed
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything; used with `--yes` and in non-interactive callers
pub struct AutoApprove;

impl Confirmation for AutoApprove {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything; useful in tests and dry contexts
pub struct DeclineAll;

impl Confirmation for DeclineAll {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
