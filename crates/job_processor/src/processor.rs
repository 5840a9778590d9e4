use std::sync::Arc;

use derivative::Derivative;
use hardware::channel::MachineHandle;
use hardware::vision::VisionMeasurement;
use pnp::job::Job;
use pnp::library::PartLibrary;
use tracing::{error, info, warn};

use crate::config::JobProcessorConfig;
use crate::control::JobControl;
use crate::delegate::{DefaultDelegate, JobProcessorDelegate};
use crate::error::{JobFailure, JobProcessorError};
use crate::event::{JobProcessorEvent, JobProcessorListener, JobProgress, Listeners};
use crate::sequencer::{Cursor, PlacementSequencer, SequenceOutcome};
use crate::state::JobState;
use crate::validation::validate_job;

/// Everything the processor needs from the machine, passed in explicitly.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct MachineContext {
    pub parts: PartLibrary,
    pub machine: MachineHandle,
    #[derivative(Debug = "ignore")]
    pub vision: Box<dyn VisionMeasurement>,
}

impl MachineContext {
    pub fn new(parts: PartLibrary, machine: MachineHandle, vision: impl VisionMeasurement + 'static) -> Self {
        Self {
            parts,
            machine,
            vision: Box::new(vision),
        }
    }
}

/// Owns the lifecycle of a job.
///
/// ```text
/// Uninitialized --load--> Loaded --start--> Running --pause--> Paused --start--> Running
/// Running --(done | stop)--> Stopped
/// Running --(fatal failure)--> Error
/// ```
///
/// `Stopped` and `Error` are terminal, a job must be loaded again to run it again. [`JobProcessor::start`] drives
/// the job on the calling thread, a [`JobControl`] is used to pause or stop it from elsewhere (e.g. a listener or
/// another thread).
#[derive(Derivative)]
#[derivative(Debug)]
pub struct JobProcessor {
    config: JobProcessorConfig,
    context: MachineContext,
    #[derivative(Debug = "ignore")]
    delegate: Box<dyn JobProcessorDelegate>,
    listeners: Listeners,
    control: JobControl,

    state: JobState,
    /// Owned by the caller, shared for the duration of the run.
    job: Option<Arc<Job>>,
    cursor: Cursor,
    progress: JobProgress,
}

impl JobProcessor {
    pub fn new(config: JobProcessorConfig, context: MachineContext) -> Self {
        Self {
            config,
            context,
            delegate: Box::new(DefaultDelegate),
            listeners: Listeners::default(),
            control: JobControl::default(),
            state: JobState::default(),
            job: None,
            cursor: Cursor::default(),
            progress: JobProgress::default(),
        }
    }

    pub fn with_delegate(mut self, delegate: impl JobProcessorDelegate + 'static) -> Self {
        self.set_delegate(delegate);
        self
    }

    pub fn set_delegate(&mut self, delegate: impl JobProcessorDelegate + 'static) {
        self.delegate = Box::new(delegate);
    }

    pub fn add_listener(&mut self, listener: impl JobProcessorListener + 'static) {
        self.listeners
            .add(Box::new(listener));
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn progress(&self) -> JobProgress {
        self.progress
    }

    pub fn job(&self) -> Option<&Arc<Job>> {
        self.job.as_ref()
    }

    pub fn control(&self) -> JobControl {
        self.control.clone()
    }

    pub fn config(&self) -> &JobProcessorConfig {
        &self.config
    }

    /// Replaces the current job. Rejected while a job is running or paused.
    ///
    /// When validation is enabled and finds issues the job is not loaded and the state is unchanged.
    pub fn load(&mut self, job: Arc<Job>) -> Result<(), JobProcessorError> {
        if !self.state.can_load() {
            return Err(self.invalid_transition("load"));
        }

        if self.config.validate_on_load {
            let resources = self.context.machine.snapshot()?;
            let issues = validate_job(&job, &self.context.parts, &resources, &self.config);
            if !issues.is_empty() {
                for issue in issues.iter() {
                    warn!("Job configuration issue. job: {}, issue: {}", job.name, issue);
                }
                return Err(JobProcessorError::InvalidConfiguration(issues));
            }
        }

        info!("Job loaded. job: {}, placements: {}", job.name, job.placement_count());

        self.progress = JobProgress::new(job.placement_count());
        self.cursor = Cursor::default();
        self.control.reset();
        self.listeners
            .emit(JobProcessorEvent::JobLoaded(&job));
        self.job = Some(job);

        self.transition(JobState::Loaded);
        Ok(())
    }

    /// Runs, or resumes, the loaded job on the calling thread.
    ///
    /// Returns once the job is paused, stopped or failed, with the resulting state.
    pub fn start(&mut self) -> Result<JobState, JobProcessorError> {
        let job = match (&self.job, self.state.can_start()) {
            (Some(job), true) => job.clone(),
            _ => return Err(self.invalid_transition("start")),
        };

        self.control.clear_pause();
        self.transition(JobState::Running);

        let result = {
            let mut sequencer = PlacementSequencer::new(
                &self.context.machine,
                &mut *self.context.vision,
                &self.context.parts,
                &self.config,
                &mut *self.delegate,
                &mut self.listeners,
                &self.control,
            );
            sequencer.run(&job, &mut self.cursor, &mut self.progress)
        };

        match result {
            Ok(SequenceOutcome::Completed) => {
                info!(
                    "Job completed. job: {}, placed: {}, skipped: {}",
                    job.name, self.progress.placed, self.progress.skipped
                );
                self.transition(JobState::Stopped);
            }
            Ok(SequenceOutcome::Paused) => self.transition(JobState::Paused),
            Ok(SequenceOutcome::Stopped) => self.transition(JobState::Stopped),
            Err(failure) => self.fail(failure),
        }

        Ok(self.state)
    }

    /// A running job pauses at the next placement boundary, use [`JobControl::pause`] while [`JobProcessor::start`]
    /// is driving it.
    pub fn pause(&mut self) -> Result<(), JobProcessorError> {
        match self.state {
            JobState::Running => {
                self.control.pause();
                Ok(())
            }
            JobState::Paused => Ok(()),
            _ => Err(self.invalid_transition("pause")),
        }
    }

    pub fn stop(&mut self) -> Result<(), JobProcessorError> {
        match self.state {
            JobState::Loaded | JobState::Paused => {
                self.transition(JobState::Stopped);
                Ok(())
            }
            JobState::Running => {
                self.control.stop();
                Ok(())
            }
            _ => Err(self.invalid_transition("stop")),
        }
    }

    fn fail(&mut self, failure: JobFailure) {
        error!("Job failed. error: {}, description: {}", failure.error, failure.description);
        self.listeners
            .emit(JobProcessorEvent::JobEncounteredError {
                error: failure.error,
                description: &failure.description,
            });
        self.transition(JobState::Error);
    }

    fn transition(&mut self, state: JobState) {
        info!("Job state changed. from: {}, to: {}", self.state, state);
        self.state = state;
        self.listeners
            .emit(JobProcessorEvent::JobStateChanged(state));
    }

    fn invalid_transition(&self, command: &'static str) -> JobProcessorError {
        if self.state.is_terminal() {
            warn!("Command rejected, load a job first. state: {}, command: {}", self.state, command);
        } else {
            warn!("Command rejected. state: {}, command: {}", self.state, command);
        }
        JobProcessorError::InvalidTransition {
            state: self.state,
            command,
        }
    }
}
