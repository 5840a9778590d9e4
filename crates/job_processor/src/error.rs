use hardware::error::{HardwareFault, MeasurementUnavailable};
use math::pose::Pose;
use pnp::head::NozzleId;
use pnp::part::PartId;
use pnp::placement::RefDes;
use thiserror::Error;

use crate::state::JobState;

/// Category of a failure that stopped a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(strum_macros::Display)]
pub enum JobError {
    HardwareFault,
    FeederError,
    HeadError,
    PickError,
    AlignmentError,
    PartError,
}

/// A failure that is fatal to the running job.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error}: {description}")]
pub struct JobFailure {
    pub error: JobError,
    pub description: String,
}

impl JobFailure {
    pub fn new(error: JobError, description: impl Into<String>) -> Self {
        Self {
            error,
            description: description.into(),
        }
    }
}

impl From<HardwareFault> for JobFailure {
    fn from(value: HardwareFault) -> Self {
        Self::new(JobError::HardwareFault, value.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("Offset too large. offset: {offset}, limit: {limit}")]
    OffsetTooLarge { offset: Pose, limit: f64 },
    #[error(transparent)]
    MeasurementUnavailable(#[from] MeasurementUnavailable),
    #[error(transparent)]
    HardwareFault(#[from] HardwareFault),
}

/// A problem with the job or the machine setup, found when loading a job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationIssue {
    #[error("Duplicate placement. board: {board}, placement: {placement}")]
    DuplicatePlacement { board: String, placement: RefDes },
    #[error("Unknown part. placement: {placement}, part: {part}")]
    UnknownPart { placement: RefDes, part: PartId },
    #[error("Invalid part height. part: {part}, height: {height}")]
    InvalidPartHeight { part: PartId, height: f64 },
    #[error("Part is not assigned to any enabled feeder. part: {part}")]
    NoFeeder { part: PartId },
    #[error("Missing vision settings. part: {part}")]
    MissingVisionSettings { part: PartId },
    #[error("Machine has no nozzles")]
    NoNozzles,
    #[error("Nozzle is holding a part. nozzle: {nozzle}, part: {part}")]
    NozzleOccupied { nozzle: NozzleId, part: PartId },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobProcessorError {
    #[error("Invalid transition. state: {state}, command: {command}")]
    InvalidTransition { state: JobState, command: &'static str },
    #[error("Job configuration invalid. issues: [{}]", format_issues(.0))]
    InvalidConfiguration(Vec<ConfigurationIssue>),
    #[error(transparent)]
    HardwareFault(#[from] HardwareFault),
}

fn format_issues(issues: &[ConfigurationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_issues_are_listed() {
        // given
        let error = JobProcessorError::InvalidConfiguration(vec![
            ConfigurationIssue::NoNozzles,
            ConfigurationIssue::NoFeeder {
                part: PartId::from("P1"),
            },
        ]);

        // expect
        assert_eq!(
            error.to_string(),
            "Job configuration invalid. issues: [Machine has no nozzles, Part is not assigned to any enabled feeder. part: P1]"
        );
    }

    #[test]
    fn job_failure_display() {
        // given
        let failure = JobFailure::from(HardwareFault::Motion("axis stalled".to_string()));

        // expect
        assert_eq!(failure.error, JobError::HardwareFault);
        assert_eq!(failure.to_string(), "HardwareFault: Motion fault. reason: axis stalled");
    }
}
