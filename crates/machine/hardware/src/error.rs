use pnp::feeder::FeederId;
use pnp::head::NozzleId;
use pnp::part::PartId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HardwareFault {
    #[error("Motion fault. reason: {0}")]
    Motion(String),
    #[error("Unknown nozzle. nozzle: {0}")]
    UnknownNozzle(NozzleId),
    #[error("Unknown feeder. feeder: {0}")]
    UnknownFeeder(FeederId),
    #[error("Nozzle already holds a part. nozzle: {nozzle}, part: {part}")]
    NozzleOccupied { nozzle: NozzleId, part: PartId },
    #[error("Nozzle holds no part. nozzle: {0}")]
    NozzleEmpty(NozzleId),
    #[error("Unable to start hardware thread. reason: {0}")]
    ThreadStart(String),
    #[error("Hardware channel closed")]
    ChannelClosed,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Measurement unavailable. reason: {reason}")]
pub struct MeasurementUnavailable {
    pub reason: String,
}

impl MeasurementUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
