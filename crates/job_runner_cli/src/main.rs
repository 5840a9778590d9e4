use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use hardware::channel::{HardwareChannel, HardwareChannelOptions};
use hardware::simulator::SimulatedMotion;
use job_processor::delegate::FixedActionDelegate;
use job_processor::event::{JobEventRecord, JobProcessorEvent};
use job_processor::processor::{JobProcessor, MachineContext};
use job_processor::state::JobState;
use tracing::{debug, info};

use crate::opts::Opts;
use crate::scenario::Scenario;

mod opts;
mod report;
mod scenario;

fn main() -> anyhow::Result<()> {
    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;

    let opts = Opts::parse_from(args);

    cli::tracing::configure_tracing(opts.trace.clone(), opts.verbose.clone())?;

    let scenario = Scenario::load(&opts.scenario)?;
    let config = opts.apply_overrides(scenario.config.clone());
    debug!("Effective configuration. config: {:?}", config);

    let parts = scenario.part_library()?;
    let resources = scenario.machine_resources();
    let vision = scenario.vision();
    let motion = SimulatedMotion::new().with_pick_results(
        scenario
            .simulation
            .pick_results
            .iter()
            .copied(),
    );
    let motion_log = motion.log();

    let channel = HardwareChannel::spawn(motion, resources, HardwareChannelOptions {
        priority: opts.hardware_priority,
        ..HardwareChannelOptions::default()
    })?;

    let mut processor = JobProcessor::new(config, MachineContext::new(parts, channel.handle(), vision));
    if let Some(action) = opts
        .on_pick_failure
        .to_pick_retry_action()
    {
        info!("Pick failures resolved by the command line. action: {}", action);
        processor.set_delegate(FixedActionDelegate(action));
    }
    processor.add_listener(|event: &JobProcessorEvent<'_>| {
        println!("{}", report::format_event(&JobEventRecord::from(event)));
    });

    processor.load(Arc::new(scenario.job))?;
    let state = processor.start()?;

    let progress = processor.progress();
    println!(
        "Job finished. state: {}, placed: {}, skipped: {}, total: {}",
        state, progress.placed, progress.skipped, progress.total
    );
    info!(
        "Motion summary. picks: {}, places: {}",
        motion_log.pick_count(),
        motion_log.place_count()
    );

    if state == JobState::Error {
        bail!("Job failed");
    }

    Ok(())
}
