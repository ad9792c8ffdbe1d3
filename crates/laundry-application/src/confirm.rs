//! Confirmation seam for destructive actions.

/// Asks the operator a yes/no question.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers yes without asking. Used for `--yes` and scripted runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!("[Confirm] Auto-confirmed: {}", message);
        true
    }
}
