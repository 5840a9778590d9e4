use crossbeam_channel::Sender;
use derivative::Derivative;
use math::pose::Pose;
use pnp::board_location::BoardLocation;
use pnp::job::Job;
use pnp::placement::{Placement, RefDes};

use crate::error::{JobError, JobFailure};
use crate::state::JobState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobProgress {
    pub placed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl JobProgress {
    pub fn new(total: usize) -> Self {
        Self {
            placed: 0,
            skipped: 0,
            total,
        }
    }

    pub fn processed(&self) -> usize {
        self.placed + self.skipped
    }
}

/// Delivered synchronously, in order, on the thread driving the job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobProcessorEvent<'a> {
    JobLoaded(&'a Job),
    JobStateChanged(JobState),
    JobEncounteredError {
        error: JobError,
        description: &'a str,
    },
    BoardProcessingStarted(&'a BoardLocation),
    PartProcessingStarted {
        board_location: &'a BoardLocation,
        placement: &'a Placement,
    },
    PartPicked {
        board_location: &'a BoardLocation,
        placement: &'a Placement,
    },
    PartPlaced {
        board_location: &'a BoardLocation,
        placement: &'a Placement,
        /// Machine pose the part was placed at, including the alignment correction.
        pose: Pose,
    },
    PartProcessingCompleted {
        board_location: &'a BoardLocation,
        placement: &'a Placement,
    },
    PartSkipped {
        board_location: &'a BoardLocation,
        placement: &'a Placement,
    },
    DetailedStatusUpdated(&'a str),
}

pub trait JobProcessorListener: Send {
    fn on_event(&mut self, event: &JobProcessorEvent<'_>);
}

impl<F> JobProcessorListener for F
where
    F: FnMut(&JobProcessorEvent<'_>) + Send,
{
    fn on_event(&mut self, event: &JobProcessorEvent<'_>) {
        self(event)
    }
}

#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct Listeners {
    #[derivative(Debug = "ignore")]
    listeners: Vec<Box<dyn JobProcessorListener>>,
}

impl Listeners {
    pub fn add(&mut self, listener: Box<dyn JobProcessorListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: JobProcessorEvent<'_>) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

/// Owned copy of an event, for listeners that hand events to another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEventRecord {
    JobLoaded { job: String },
    JobStateChanged(JobState),
    JobEncounteredError(JobFailure),
    BoardProcessingStarted { board: String },
    PartProcessingStarted { board: String, placement: RefDes },
    PartPicked { board: String, placement: RefDes },
    PartPlaced { board: String, placement: RefDes, pose: Pose },
    PartProcessingCompleted { board: String, placement: RefDes },
    PartSkipped { board: String, placement: RefDes },
    DetailedStatusUpdated(String),
}

impl From<&JobProcessorEvent<'_>> for JobEventRecord {
    fn from(event: &JobProcessorEvent<'_>) -> Self {
        fn ids(board_location: &BoardLocation, placement: &Placement) -> (String, RefDes) {
            (board_location.board.name.clone(), placement.id.clone())
        }

        match *event {
            JobProcessorEvent::JobLoaded(job) => Self::JobLoaded {
                job: job.name.clone(),
            },
            JobProcessorEvent::JobStateChanged(state) => Self::JobStateChanged(state),
            JobProcessorEvent::JobEncounteredError {
                error,
                description,
            } => Self::JobEncounteredError(JobFailure::new(error, description)),
            JobProcessorEvent::BoardProcessingStarted(board_location) => Self::BoardProcessingStarted {
                board: board_location.board.name.clone(),
            },
            JobProcessorEvent::PartProcessingStarted {
                board_location,
                placement,
            } => {
                let (board, placement) = ids(board_location, placement);
                Self::PartProcessingStarted {
                    board,
                    placement,
                }
            }
            JobProcessorEvent::PartPicked {
                board_location,
                placement,
            } => {
                let (board, placement) = ids(board_location, placement);
                Self::PartPicked {
                    board,
                    placement,
                }
            }
            JobProcessorEvent::PartPlaced {
                board_location,
                placement,
                pose,
            } => {
                let (board, placement) = ids(board_location, placement);
                Self::PartPlaced {
                    board,
                    placement,
                    pose,
                }
            }
            JobProcessorEvent::PartProcessingCompleted {
                board_location,
                placement,
            } => {
                let (board, placement) = ids(board_location, placement);
                Self::PartProcessingCompleted {
                    board,
                    placement,
                }
            }
            JobProcessorEvent::PartSkipped {
                board_location,
                placement,
            } => {
                let (board, placement) = ids(board_location, placement);
                Self::PartSkipped {
                    board,
                    placement,
                }
            }
            JobProcessorEvent::DetailedStatusUpdated(status) => Self::DetailedStatusUpdated(status.to_string()),
        }
    }
}

/// Forwards a [`JobEventRecord`] for every event, a disconnected receiver is ignored.
#[derive(Debug)]
pub struct ChannelListener {
    sender: Sender<JobEventRecord>,
}

impl ChannelListener {
    pub fn new(sender: Sender<JobEventRecord>) -> Self {
        Self {
            sender,
        }
    }
}

impl JobProcessorListener for ChannelListener {
    fn on_event(&mut self, event: &JobProcessorEvent<'_>) {
        let _ = self
            .sender
            .send(JobEventRecord::from(event));
    }
}
