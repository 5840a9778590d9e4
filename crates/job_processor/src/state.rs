use derivative::Derivative;

#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(strum_macros::Display)]
pub enum JobState {
    #[derivative(Default)]
    Uninitialized,
    Loaded,
    Running,
    Paused,
    Stopped,
    Error,
}

impl JobState {
    /// A new job must be loaded to leave a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Stopped | JobState::Error)
    }

    pub fn can_load(&self) -> bool {
        !matches!(self, JobState::Running | JobState::Paused)
    }

    pub fn can_start(&self) -> bool {
        matches!(self, JobState::Loaded | JobState::Paused)
    }
}
