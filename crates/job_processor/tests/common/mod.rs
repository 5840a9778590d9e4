#![allow(dead_code)]

use std::sync::Arc;

use crossbeam_channel::{Receiver, unbounded};
use hardware::channel::{HardwareChannel, HardwareChannelOptions};
use hardware::resources::MachineResources;
use hardware::simulator::{MotionLog, SimulatedMotion};
use hardware::vision::VisionMeasurement;
use job_processor::config::JobProcessorConfig;
use job_processor::event::{ChannelListener, JobEventRecord};
use job_processor::processor::{JobProcessor, MachineContext};
use math::pose::Pose;
use nalgebra::Vector2;
use pnp::board_location::BoardLocation;
use pnp::feeder::{Feeder, FeederId};
use pnp::head::{Head, HeadId};
use pnp::job::Job;
use pnp::library::PartLibrary;
use pnp::package::Package;
use pnp::part::{AlignmentSettings, Part, PartId};
use pnp::pcb::{Board, PcbSide};
use pnp::placement::{Placement, RefDes};

pub const PART_HEIGHT: f64 = 0.5;

pub fn part(id: &str) -> Part {
    Part::new(PartId::from(id), Package::new("0603".to_string(), 0.8, 1.6), PART_HEIGHT).with_alignment(
        AlignmentSettings {
            max_vision_passes: 3,
            max_linear_offset: 0.05,
            max_angular_offset: 0.5,
            ..AlignmentSettings::default()
        },
    )
}

pub fn parts() -> PartLibrary {
    PartLibrary::try_from_parts(vec![part("P1"), part("P2")]).unwrap()
}

pub fn resources() -> MachineResources {
    MachineResources::new(vec![Head::new(HeadId::from("H1"), &["N1"])], vec![
        Feeder::new(
            FeederId::from("F1"),
            PartId::from("P1"),
            Pose::new(200.0, 20.0, -1.0, 0.0),
            Vector2::new(4.0, 0.0),
            100,
        ),
        Feeder::new(
            FeederId::from("F2"),
            PartId::from("P2"),
            Pose::new(200.0, 40.0, -1.0, 0.0),
            Vector2::new(4.0, 0.0),
            100,
        ),
    ])
}

/// [`resources`] with a second feeder `F3` stocking `P1`.
pub fn resources_with_second_p1_feeder() -> MachineResources {
    let mut resources = resources();
    resources.feeders.push(Feeder::new(
        FeederId::from("F3"),
        PartId::from("P1"),
        Pose::new(200.0, 60.0, -1.0, 0.0),
        Vector2::new(4.0, 0.0),
        100,
    ));
    resources
}

pub fn placement(id: &str, part_id: &str, pose: Pose) -> Placement {
    Placement::new(RefDes::from(id), PartId::from(part_id), pose, PcbSide::Top)
}

pub fn job(placements: Vec<Placement>) -> Arc<Job> {
    let board = Board::new("board_1".to_string(), 50.0, placements);
    Arc::new(Job::new("job_1".to_string(), vec![BoardLocation::new(
        board,
        Pose::ZERO,
        PcbSide::Top,
    )]))
}

/// Placements `R1..=Rn` of part `P1`, 5mm apart.
pub fn job_with_placements(count: usize) -> Arc<Job> {
    job((1..=count)
        .map(|index| placement(&format!("R{}", index), "P1", Pose::new(5.0 * index as f64, 10.0, 0.0, 0.0)))
        .collect())
}

pub struct TestSetup {
    pub processor: JobProcessor,
    pub events: Receiver<JobEventRecord>,
    pub motion_log: MotionLog,
    // dropped last, stops the hardware thread
    pub channel: HardwareChannel,
}

impl TestSetup {
    pub fn new(config: JobProcessorConfig, motion: SimulatedMotion, vision: impl VisionMeasurement + 'static) -> Self {
        Self::with_resources(config, motion, vision, resources())
    }

    pub fn with_resources(
        config: JobProcessorConfig,
        motion: SimulatedMotion,
        vision: impl VisionMeasurement + 'static,
        resources: MachineResources,
    ) -> Self {
        let motion_log = motion.log();
        let channel = HardwareChannel::spawn(motion, resources, HardwareChannelOptions::default()).unwrap();

        let mut processor = JobProcessor::new(config, MachineContext::new(parts(), channel.handle(), vision));
        let (sender, events) = unbounded();
        processor.add_listener(ChannelListener::new(sender));

        Self {
            processor,
            events,
            motion_log,
            channel,
        }
    }

    /// Events received since the last call.
    pub fn take_events(&self) -> Vec<JobEventRecord> {
        self.events.try_iter().collect()
    }
}

pub fn count<F: Fn(&JobEventRecord) -> bool>(events: &[JobEventRecord], predicate: F) -> usize {
    events
        .iter()
        .filter(|event| predicate(event))
        .count()
}
