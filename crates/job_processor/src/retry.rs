use tracing::trace;

/// What to do after a pick, or the alignment of a picked part, failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(strum_macros::Display)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PickRetryAction {
    Retry,
    SkipPlacement,
    Abort,
}

/// Failures that are handled per placement, everything else is fatal to the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(strum_macros::Display)]
pub enum FailureKind {
    PickMissed,
    FeederEmpty,
    OffsetTooLarge,
    MeasurementUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
        }
    }

    /// `attempt` is 1-based. An override, usually from a delegate, is returned as-is.
    pub fn decide(&self, failure: FailureKind, attempt: u32, delegate_override: Option<PickRetryAction>) -> PickRetryAction {
        let action = match delegate_override {
            Some(action) => action,
            None if attempt < self.max_attempts => PickRetryAction::Retry,
            None => PickRetryAction::SkipPlacement,
        };
        trace!(
            "retry decision. failure: {}, attempt: {}/{}, override: {:?}, action: {}",
            failure, attempt, self.max_attempts, delegate_override, action
        );
        action
    }
}
