use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use derivative::Derivative;
use math::pose::Pose;
use pnp::feeder::FeederId;
use pnp::head::NozzleId;
use rt_thread::RtThread;
use tracing::{debug, error, info, trace};

use crate::error::HardwareFault;
use crate::motion::MotionExecutor;
use crate::resources::MachineResources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Picked,
    /// The executor reported that the part was not picked up, the feeder was not advanced.
    Missed,
    FeederEmpty,
}

#[derive(Debug, Clone)]
pub struct HardwareChannelOptions {
    pub thread_name: String,
    /// Real-time priority for the hardware thread, see [`RtThread`].
    pub priority: Option<u8>,
}

impl Default for HardwareChannelOptions {
    fn default() -> Self {
        Self {
            thread_name: "hardware".to_string(),
            priority: None,
        }
    }
}

type Reply<T> = Sender<Result<T, HardwareFault>>;

enum Request {
    MoveTo {
        nozzle: NozzleId,
        pose: Pose,
        reply: Reply<()>,
    },
    Pick {
        nozzle: NozzleId,
        feeder: FeederId,
        reply: Reply<PickOutcome>,
    },
    Place {
        nozzle: NozzleId,
        reply: Reply<()>,
    },
    Discard {
        nozzle: NozzleId,
        pose: Pose,
        reply: Reply<()>,
    },
    Snapshot {
        reply: Reply<MachineResources>,
    },
    SetFeederEnabled {
        feeder: FeederId,
        enabled: bool,
        reply: Reply<()>,
    },
    Shutdown,
}

/// Serializes every hardware command onto one thread.
///
/// Commands are executed one at a time, in the order they arrive, callers block until their command completed.
/// Dropping the channel lets already queued commands finish, then stops the thread.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct HardwareChannel {
    handle: MachineHandle,
    #[derivative(Debug = "ignore")]
    join_handle: Option<JoinHandle<()>>,
}

impl HardwareChannel {
    pub fn spawn<E>(executor: E, resources: MachineResources, options: HardwareChannelOptions) -> Result<Self, HardwareFault>
    where
        E: MotionExecutor + 'static,
    {
        let (sender, receiver) = unbounded::<Request>();

        let worker = Worker {
            executor,
            resources,
        };

        let join_handle = RtThread::spawn(&options.thread_name, options.priority, move || worker.run(receiver))
            .map_err(|error| HardwareFault::ThreadStart(error.to_string()))?;

        info!("Hardware channel started. thread: {}", options.thread_name);

        Ok(Self {
            handle: MachineHandle {
                sender,
            },
            join_handle: Some(join_handle),
        })
    }

    pub fn handle(&self) -> MachineHandle {
        self.handle.clone()
    }
}

impl Drop for HardwareChannel {
    fn drop(&mut self) {
        // queued behind any in-flight commands
        let _ = self
            .handle
            .sender
            .send(Request::Shutdown);

        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                error!("Hardware thread panicked");
            }
        }
    }
}

/// Cloneable handle used to issue commands to the hardware thread.
#[derive(Debug, Clone)]
pub struct MachineHandle {
    sender: Sender<Request>,
}

impl MachineHandle {
    fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T, HardwareFault> {
        let (reply_sender, reply_receiver) = bounded(1);
        self.sender
            .send(build(reply_sender))
            .map_err(|_| HardwareFault::ChannelClosed)?;

        reply_receiver
            .recv()
            .map_err(|_| HardwareFault::ChannelClosed)?
    }

    pub fn move_to(&self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        self.request(|reply| Request::MoveTo {
            nozzle: nozzle.clone(),
            pose,
            reply,
        })
    }

    /// Moves to the next pick pose of the feeder and picks.
    ///
    /// Only a confirmed pick advances the feeder and records the part on the nozzle.
    pub fn pick(&self, nozzle: &NozzleId, feeder: &FeederId) -> Result<PickOutcome, HardwareFault> {
        self.request(|reply| Request::Pick {
            nozzle: nozzle.clone(),
            feeder: feeder.clone(),
            reply,
        })
    }

    /// Places at the current location.
    pub fn place(&self, nozzle: &NozzleId) -> Result<(), HardwareFault> {
        self.request(|reply| Request::Place {
            nozzle: nozzle.clone(),
            reply,
        })
    }

    /// Moves to `pose` and releases whatever the nozzle holds.
    pub fn discard(&self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        self.request(|reply| Request::Discard {
            nozzle: nozzle.clone(),
            pose,
            reply,
        })
    }

    pub fn snapshot(&self) -> Result<MachineResources, HardwareFault> {
        self.request(|reply| Request::Snapshot {
            reply,
        })
    }

    pub fn set_feeder_enabled(&self, feeder: &FeederId, enabled: bool) -> Result<(), HardwareFault> {
        self.request(|reply| Request::SetFeederEnabled {
            feeder: feeder.clone(),
            enabled,
            reply,
        })
    }
}

struct Worker<E> {
    executor: E,
    resources: MachineResources,
}

impl<E: MotionExecutor> Worker<E> {
    fn run(mut self, receiver: Receiver<Request>) {
        debug!("Hardware thread running");

        while let Ok(request) = receiver.recv() {
            // a caller that gave up waiting is not an error for the hardware
            match request {
                Request::MoveTo {
                    nozzle,
                    pose,
                    reply,
                } => {
                    let _ = reply.send(self.move_to(&nozzle, pose));
                }
                Request::Pick {
                    nozzle,
                    feeder,
                    reply,
                } => {
                    let _ = reply.send(self.pick(&nozzle, &feeder));
                }
                Request::Place {
                    nozzle,
                    reply,
                } => {
                    let _ = reply.send(self.place(&nozzle));
                }
                Request::Discard {
                    nozzle,
                    pose,
                    reply,
                } => {
                    let _ = reply.send(self.discard(&nozzle, pose));
                }
                Request::Snapshot {
                    reply,
                } => {
                    let _ = reply.send(Ok(self.resources.clone()));
                }
                Request::SetFeederEnabled {
                    feeder,
                    enabled,
                    reply,
                } => {
                    let result = self
                        .resources
                        .feeder_mut(&feeder)
                        .map(|feeder| feeder.enabled = enabled);
                    let _ = reply.send(result);
                }
                Request::Shutdown => break,
            }
        }

        debug!("Hardware thread stopped");
    }

    fn move_to(&mut self, nozzle: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        self.resources.nozzle_mut(nozzle)?;
        trace!("move_to. nozzle: {}, pose: {}", nozzle, pose);
        self.executor.move_to(nozzle, pose)
    }

    fn pick(&mut self, nozzle_id: &NozzleId, feeder_id: &FeederId) -> Result<PickOutcome, HardwareFault> {
        let nozzle = self.resources.nozzle_mut(nozzle_id)?;
        if let Some(part) = &nozzle.part {
            return Err(HardwareFault::NozzleOccupied {
                nozzle: nozzle_id.clone(),
                part: part.clone(),
            });
        }

        let feeder = self.resources.feeder_mut(feeder_id)?;
        if !feeder.has_part() {
            debug!("Feeder empty. feeder: {}", feeder_id);
            return Ok(PickOutcome::FeederEmpty);
        }
        let pick_pose = feeder.next_pick_pose();

        trace!("pick. nozzle: {}, feeder: {}, pose: {}", nozzle_id, feeder_id, pick_pose);
        self.executor.move_to(nozzle_id, pick_pose)?;
        if !self.executor.pick(nozzle_id)? {
            return Ok(PickOutcome::Missed);
        }

        let feeder = self.resources.feeder_mut(feeder_id)?;
        feeder.advance();
        let part_id = feeder.part_id.clone();

        self.resources.nozzle_mut(nozzle_id)?.part = Some(part_id);

        Ok(PickOutcome::Picked)
    }

    fn place(&mut self, nozzle_id: &NozzleId) -> Result<(), HardwareFault> {
        let nozzle = self.resources.nozzle_mut(nozzle_id)?;
        if nozzle.is_empty() {
            return Err(HardwareFault::NozzleEmpty(nozzle_id.clone()));
        }

        trace!("place. nozzle: {}", nozzle_id);
        self.executor.place(nozzle_id)?;

        self.resources.nozzle_mut(nozzle_id)?.part = None;
        Ok(())
    }

    fn discard(&mut self, nozzle_id: &NozzleId, pose: Pose) -> Result<(), HardwareFault> {
        if self
            .resources
            .nozzle_mut(nozzle_id)?
            .is_empty()
        {
            trace!("discard, nozzle already empty. nozzle: {}", nozzle_id);
            return Ok(());
        }

        trace!("discard. nozzle: {}, pose: {}", nozzle_id, pose);
        self.executor.move_to(nozzle_id, pose)?;
        self.executor.place(nozzle_id)?;

        self.resources.nozzle_mut(nozzle_id)?.part = None;
        Ok(())
    }
}
