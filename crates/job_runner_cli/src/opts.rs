#![deny(missing_docs)]

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::args::PickFailureArg;
use cli::parsers::pose_parser;
use job_processor::config::JobProcessorConfig;
use math::pose::Pose;

/// Runs a job against a simulated machine.
#[derive(Parser, Debug)]
#[command(name = "job_runner_cli")]
#[command(bin_name = "job_runner_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    /// Scenario file (JSON) with the machine setup, parts, job and simulation script
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub(crate) scenario: PathBuf,

    /// Action when a pick or alignment fails
    #[arg(long, value_enum, default_value_t = PickFailureArg::Default)]
    pub(crate) on_pick_failure: PickFailureArg,

    /// Maximum pick attempts per placement, overrides the scenario
    #[arg(long, value_name = "ATTEMPTS")]
    pub(crate) max_pick_attempts: Option<u32>,

    /// Where parts that failed alignment are dropped, e.g. 'x=0,y=300,z=-5', overrides the scenario
    #[arg(long, value_name = "POSE", value_parser = pose_parser)]
    pub(crate) discard_pose: Option<Pose>,

    /// Disable bottom vision alignment
    #[arg(long)]
    pub(crate) no_alignment: bool,

    /// Skip checking the job against the machine setup before running it
    #[arg(long)]
    pub(crate) no_validate: bool,

    /// Real-time (SCHED_FIFO) priority of the hardware thread, 1-99
    #[arg(long, value_name = "PRIORITY", value_parser = clap::value_parser!(u8).range(1..=99))]
    pub(crate) hardware_priority: Option<u8>,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

impl Opts {
    /// Command line arguments take precedence over the scenario configuration.
    pub(crate) fn apply_overrides(&self, mut config: JobProcessorConfig) -> JobProcessorConfig {
        if let Some(max_pick_attempts) = self.max_pick_attempts {
            config.retry.max_pick_attempts = max_pick_attempts;
        }
        if let Some(discard_pose) = self.discard_pose {
            config.discard_pose = discard_pose;
        }
        if self.no_alignment {
            config.alignment.enabled = false;
        }
        if self.no_validate {
            config.validate_on_load = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides() {
        // given
        let opts = Opts::parse_from([
            "job_runner_cli",
            "--scenario",
            "scenario.json",
            "--max-pick-attempts",
            "5",
            "--discard-pose",
            "x=1,y=2",
            "--no-validate",
        ]);

        // when
        let config = opts.apply_overrides(JobProcessorConfig::default());

        // then
        assert_eq!(config.retry.max_pick_attempts, 5);
        assert_eq!(config.discard_pose, Pose::new(1.0, 2.0, 0.0, 0.0));
        assert!(!config.validate_on_load);
        assert!(config.alignment.enabled);
    }

    #[test]
    fn priority_range() {
        // when
        let result = Opts::try_parse_from([
            "job_runner_cli",
            "--scenario",
            "scenario.json",
            "--hardware-priority",
            "100",
        ]);

        // then
        assert!(result.is_err());
    }
}
