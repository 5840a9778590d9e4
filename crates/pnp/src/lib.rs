pub mod board_location;
pub mod feeder;
pub mod head;
pub mod job;
pub mod library;
pub mod package;
pub mod part;
pub mod pcb;
pub mod placement;
