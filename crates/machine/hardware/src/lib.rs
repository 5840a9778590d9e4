//! Access to the machine hardware.
//!
//! All motion is funneled through a single [`channel::HardwareChannel`], which owns the [`motion::MotionExecutor`]
//! and the mutable machine resources (feeders, nozzles) on a dedicated thread.

pub mod channel;
pub mod error;
pub mod motion;
pub mod resources;
pub mod simulator;
pub mod vision;
