//! Args decouple CLI arg handling requirements from the internal data structures.

use clap::ValueEnum;
use job_processor::retry::PickRetryAction;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum PickFailureArg {
    /// Retry up to the configured number of attempts, then skip the placement
    Default,
    Retry,
    Skip,
    Abort,
}

impl PickFailureArg {
    /// `None` leaves the decision to the retry policy.
    pub fn to_pick_retry_action(&self) -> Option<PickRetryAction> {
        match self {
            PickFailureArg::Default => None,
            PickFailureArg::Retry => Some(PickRetryAction::Retry),
            PickFailureArg::Skip => Some(PickRetryAction::SkipPlacement),
            PickFailureArg::Abort => Some(PickRetryAction::Abort),
        }
    }
}
